use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};
use std::sync::LazyLock;

pub static PROVIDER_FAILURES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "curator_provider_failures_total",
        "Source adapter calls that failed and were treated as empty",
        &["provider"]
    )
    .expect("provider failure counter registers once")
});

pub static IMAGE_RESOLUTIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "curator_image_resolutions_total",
        "Cover images resolved, by the fallback step that produced them",
        &["source"]
    )
    .expect("image resolution counter registers once")
});

pub static LLM_CALLS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "curator_llm_calls_total",
        "Language model calls by outcome",
        &["outcome"]
    )
    .expect("llm call counter registers once")
});

pub static LLM_RETRIES: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!(
        "curator_llm_retries_total",
        "Language model attempts that were retried after backoff"
    )
    .expect("llm retry counter registers once")
});

pub static SUMMARIES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "curator_summaries_total",
        "Summarization requests by execution path",
        &["path"]
    )
    .expect("summary counter registers once")
});

/// Render the default registry in the text exposition format.
pub fn render() -> Result<(Vec<u8>, String), prometheus::Error> {
    use prometheus::{Encoder, TextEncoder};

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok((buffer, encoder.format_type().to_string()))
}
