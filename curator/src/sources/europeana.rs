use super::fields::{lenient_list, OneOrMany};
use super::{fetch_json, page_offset, SourceAdapter};
use crate::error::ProviderError;
use crate::models::SearchQuery;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

const PROVIDER: &str = "europeana";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EuropeanaEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default, deserialize_with = "lenient_list")]
    pub items: Vec<EuropeanaItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EuropeanaItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<OneOrMany<String>>,
    #[serde(default)]
    pub dc_description: Option<OneOrMany<String>>,
    #[serde(default)]
    pub data_provider: Option<OneOrMany<String>>,
    #[serde(default)]
    pub dc_creator: Option<OneOrMany<String>>,
    #[serde(default)]
    pub edm_preview: Option<OneOrMany<String>>,
    #[serde(default)]
    pub rights: Option<OneOrMany<String>>,
}

/// General aggregator search (Europeana Search API v2).
#[derive(Clone)]
pub struct EuropeanaAdapter {
    client: Client,
    endpoint: String,
    api_key: String,
    page_size: u32,
}

impl EuropeanaAdapter {
    pub fn new(client: Client, endpoint: String, api_key: String, page_size: u32) -> Self {
        Self {
            client,
            endpoint,
            api_key,
            page_size,
        }
    }
}

#[async_trait]
impl SourceAdapter for EuropeanaAdapter {
    type Envelope = EuropeanaEnvelope;

    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn search(&self, query: &SearchQuery) -> Result<EuropeanaEnvelope, ProviderError> {
        info!(provider = PROVIDER, term = %query.term, page = query.page, "searching");

        // Europeana's `start` is 1-based.
        let start = page_offset(query.page, self.page_size) + 1;
        let mut params: Vec<(&str, String)> = vec![
            ("wskey", self.api_key.clone()),
            ("query", query.term.clone()),
            ("rows", self.page_size.to_string()),
            ("start", start.to_string()),
        ];
        if let Some(filter) = query.filter.as_deref().filter(|f| !f.trim().is_empty()) {
            params.push(("qf", filter.to_string()));
        }

        let envelope: EuropeanaEnvelope =
            fetch_json(PROVIDER, self.client.get(&self.endpoint).query(&params)).await?;

        if envelope.success == Some(false) {
            return Err(ProviderError::Decode {
                provider: PROVIDER,
                reason: envelope
                    .error
                    .unwrap_or_else(|| "search reported failure".to_string()),
            });
        }

        Ok(envelope)
    }
}
