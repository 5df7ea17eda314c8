// Enrichment Client: keywords and cluster labels from the text-analytics service
//
// The service answers with arrays aligned to the submitted `texts` array, so
// records are matched back purely by position. Any length mismatch fails the
// whole batch.

use crate::error::EnrichmentError;
use crate::models::{CanonicalRecord, ClusterLabel, Enrichment};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// One request's worth of texts, tagged with the search request id.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentBatch {
    pub request_id: Uuid,
    pub texts: Vec<String>,
}

impl EnrichmentBatch {
    /// `title + " " + description` per record, in record order.
    pub fn for_records(request_id: Uuid, records: &[CanonicalRecord]) -> Self {
        Self {
            request_id,
            texts: records.iter().map(CanonicalRecord::analysis_text).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub keywords_list: Vec<Vec<String>>,
    #[serde(default)]
    pub cluster_labels: Vec<ClusterLabel>,
}

#[async_trait]
pub trait TextAnalytics: Send + Sync {
    async fn analyze(&self, batch: &EnrichmentBatch) -> Result<AnalysisResponse, EnrichmentError>;
}

#[derive(Serialize)]
struct AnalysisRequest<'a> {
    texts: &'a [String],
}

/// HTTP client for the `/process_texts` endpoint.
#[derive(Clone)]
pub struct HttpTextAnalytics {
    client: Client,
    base_url: String,
}

impl HttpTextAnalytics {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl TextAnalytics for HttpTextAnalytics {
    async fn analyze(&self, batch: &EnrichmentBatch) -> Result<AnalysisResponse, EnrichmentError> {
        let url = format!("{}/process_texts", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .header("X-Request-Id", batch.request_id.to_string())
            .json(&AnalysisRequest {
                texts: &batch.texts,
            })
            .send()
            .await
            .map_err(EnrichmentError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| EnrichmentError::Decode(e.to_string()))
    }
}

#[derive(Clone)]
pub struct Enricher {
    service: Arc<dyn TextAnalytics>,
}

impl Enricher {
    pub fn new(service: Arc<dyn TextAnalytics>) -> Self {
        Self { service }
    }

    pub async fn enrich(
        &self,
        request_id: Uuid,
        records: Vec<CanonicalRecord>,
    ) -> Result<Vec<CanonicalRecord>, EnrichmentError> {
        if records.is_empty() {
            return Ok(records);
        }

        let batch = EnrichmentBatch::for_records(request_id, &records);
        info!(request_id = %request_id, texts = batch.texts.len(), "submitting texts for enrichment");

        let response = self.service.analyze(&batch).await.map_err(|e| {
            error!(request_id = %request_id, error = %e, "enrichment failed");
            e
        })?;

        apply(records, response).map_err(|e| {
            error!(request_id = %request_id, error = %e, "enrichment response rejected");
            e
        })
    }
}

/// Attach `keywords_list[i]` and `cluster_labels[i]` to `records[i]`.
pub fn apply(
    records: Vec<CanonicalRecord>,
    response: AnalysisResponse,
) -> Result<Vec<CanonicalRecord>, EnrichmentError> {
    let expected = records.len();
    if response.keywords_list.len() != expected || response.cluster_labels.len() != expected {
        return Err(EnrichmentError::Misaligned {
            expected,
            keywords: response.keywords_list.len(),
            labels: response.cluster_labels.len(),
        });
    }

    Ok(records
        .into_iter()
        .zip(response.keywords_list)
        .zip(response.cluster_labels)
        .map(|((mut record, keywords), cluster_label)| {
            record.enrichment = Some(Enrichment {
                keywords,
                cluster_label,
            });
            record
        })
        .collect())
}
