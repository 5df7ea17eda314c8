// Summarizer Agent: cited summaries over arbitrarily large aggregated text
//
// Small inputs go to the model in one pass. Inputs at or above the word limit
// are split into word-bounded chunks, summarised one by one in order, and the
// partial summaries are reduced with a final call. Every model call goes
// through the shared admission gate and its own retry policy; if any call
// exhausts its retries the whole request fails with no partial output.

use crate::error::SummarizationError;
use crate::llm::{AdmissionGate, ChatMessage, LanguageModel, RetryPolicy};
use crate::metrics;
use crate::models::SummaryRequest;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

pub const SYSTEM_PROMPT: &str = "You are a concise, domain-expert summariser.";

const NO_KEYWORDS: &str =
    "No highlighted keywords were provided. Summarize the content based on the data provided below.";

const TASK: &str = "TASK:\n\
• Bullet-point summary by main topic.\n\
• Cite items as [docId:<id>].\n\
• Do NOT mention source names.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummarizerSettings {
    /// Inputs with fewer words than this are summarised in a single call.
    pub single_pass_word_limit: usize,
    pub chunk_words: usize,
    /// Pause between consecutive chunk calls.
    pub chunk_pause: Duration,
    pub temperature: f32,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            single_pass_word_limit: 75_000,
            chunk_words: 3_000,
            chunk_pause: Duration::from_millis(500),
            temperature: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SinglePass,
    Chunking,
    Reducing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::SinglePass => "single_pass",
            Stage::Chunking => "chunking",
            Stage::Reducing => "reducing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryPlan {
    SinglePass,
    Chunked(Vec<String>),
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split into consecutive chunks of at most `size` words, re-joined with
/// single spaces. The last chunk may be shorter.
pub fn chunk_words(text: &str, size: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(size.max(1))
        .map(|chunk| chunk.join(" "))
        .collect()
}

/// The request-specific parts of the prompt, shared by every call for that
/// request.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptContext {
    highlight: String,
    mapping: String,
}

impl PromptContext {
    pub fn from_request(request: &SummaryRequest) -> Self {
        let highlight = if request.highlighted_keywords.is_empty() {
            NO_KEYWORDS.to_string()
        } else {
            format!(
                "Using the following highlighted keywords: {}.",
                request.highlighted_keywords.join(", ")
            )
        };
        let mapping = if request.doc_id_mapping.trim().is_empty() {
            String::new()
        } else {
            format!("Reference mapping:\n{}", request.doc_id_mapping)
        };
        Self { highlight, mapping }
    }

    pub fn messages(&self, content: &str) -> Vec<ChatMessage> {
        let user = format!(
            "{}\n{}\n\nCONTENT:\n{}\n\n{}",
            self.highlight, self.mapping, content, TASK
        );
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user.trim()),
        ]
    }
}

pub struct SummarizerAgent {
    llm: Arc<dyn LanguageModel>,
    gate: AdmissionGate,
    retry: RetryPolicy,
    settings: SummarizerSettings,
}

impl SummarizerAgent {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        gate: AdmissionGate,
        retry: RetryPolicy,
        settings: SummarizerSettings,
    ) -> Self {
        Self {
            llm,
            gate,
            retry,
            settings,
        }
    }

    pub fn settings(&self) -> &SummarizerSettings {
        &self.settings
    }

    pub fn plan(&self, text: &str) -> SummaryPlan {
        if word_count(text) < self.settings.single_pass_word_limit {
            SummaryPlan::SinglePass
        } else {
            SummaryPlan::Chunked(chunk_words(text, self.settings.chunk_words))
        }
    }

    pub async fn summarize(&self, request: &SummaryRequest) -> Result<String, SummarizationError> {
        let context = PromptContext::from_request(request);
        let text = request.combined_text();

        let outcome = match self.plan(&text) {
            SummaryPlan::SinglePass => {
                info!(stage = %Stage::SinglePass, words = word_count(&text), "summarizing");
                metrics::SUMMARIES.with_label_values(&["single_pass"]).inc();
                self.call(Stage::SinglePass, &context.messages(&text)).await
            }
            SummaryPlan::Chunked(chunks) => {
                metrics::SUMMARIES.with_label_values(&["chunked"]).inc();
                self.map_reduce(&context, &chunks).await
            }
        };

        match &outcome {
            Ok(summary) => info!(stage = %Stage::Done, chars = summary.len(), "summary ready"),
            Err(e) => error!(stage = %Stage::Failed, error = %e, "summarization failed"),
        }
        outcome
    }

    async fn map_reduce(
        &self,
        context: &PromptContext,
        chunks: &[String],
    ) -> Result<String, SummarizationError> {
        let total = chunks.len();
        let mut partials = Vec::with_capacity(total);

        for (i, chunk) in chunks.iter().enumerate() {
            info!(stage = %Stage::Chunking, chunk = i + 1, of = total, "summarizing chunk");
            partials.push(self.call(Stage::Chunking, &context.messages(chunk)).await?);
            if i + 1 < total {
                tokio::time::sleep(self.settings.chunk_pause).await;
            }
        }

        info!(stage = %Stage::Reducing, partials = partials.len(), "reducing partial summaries");
        let combined = partials.join("\n\n");
        self.call(Stage::Reducing, &context.messages(&combined)).await
    }

    /// One model call: wait for the gate, then retry within the held slot.
    async fn call(
        &self,
        stage: Stage,
        messages: &[ChatMessage],
    ) -> Result<String, SummarizationError> {
        let llm = self.llm.as_ref();
        let temperature = self.settings.temperature;

        let result = self
            .gate
            .run(|| self.retry.run(move || llm.complete(messages, temperature)))
            .await
            .map_err(|closed| {
                error!(%stage, "admission gate closed, model call refused");
                closed
            })?;

        match result {
            Ok(text) => {
                metrics::LLM_CALLS.with_label_values(&["ok"]).inc();
                Ok(text)
            }
            Err(exhausted) => {
                metrics::LLM_CALLS.with_label_values(&["failed"]).inc();
                error!(%stage, attempts = exhausted.attempts, "model call exhausted its retries");
                Err(SummarizationError::RetriesExhausted {
                    attempts: exhausted.attempts,
                    last: exhausted.last,
                })
            }
        }
    }
}
