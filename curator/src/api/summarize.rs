use crate::agents::gallery;
use crate::agents::SummarizerAgent;
use crate::citations;
use crate::error::ApiError;
use crate::models::{ClusterOutcome, ClusterSummaryRequest, SummaryRequest, SummaryResponse};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};
use warp::{Rejection, Reply};

pub async fn handle_summarize(
    request: SummaryRequest,
    summarizer: Arc<SummarizerAgent>,
) -> Result<impl Reply, Rejection> {
    info!(
        keywords = request.highlighted_keywords.len(),
        "Processing summarize request"
    );

    let summary = summarizer
        .summarize(&request)
        .await
        .map_err(|e| warp::reject::custom(ApiError::Summarization(e)))?;

    let mapping = citations::parse_mapping(&request.doc_id_mapping);
    Ok(warp::reply::json(&SummaryResponse {
        success: true,
        numbered_summary: citations::number_citations(&summary, &mapping),
        references: citations::references(&summary, &mapping),
        summary,
    }))
}

pub async fn handle_cluster_summaries(
    request: ClusterSummaryRequest,
    summarizer: Arc<SummarizerAgent>,
) -> Result<impl Reply, Rejection> {
    let outcomes = gallery::summarize_clusters(&summarizer, &request.documents).await;

    let mut clusters: BTreeMap<String, ClusterOutcome> = BTreeMap::new();
    for cluster in outcomes {
        let original_label = cluster.label.to_string();
        let outcome = match cluster.outcome {
            Ok(summary) => ClusterOutcome {
                success: true,
                original_label: original_label.clone(),
                summary: Some(summary),
            },
            Err(e) => {
                warn!(cluster = %cluster.display_label, error = %e, "cluster summary failed");
                ClusterOutcome {
                    success: false,
                    original_label: original_label.clone(),
                    summary: None,
                }
            }
        };
        // two clusters can share a display name; keep both apart
        let key = if clusters.contains_key(&cluster.display_label) {
            format!("{} ({})", cluster.display_label, original_label)
        } else {
            cluster.display_label
        };
        clusters.insert(key, outcome);
    }

    Ok(warp::reply::json(&json!({
        "success": true,
        "clusters": clusters,
    })))
}
