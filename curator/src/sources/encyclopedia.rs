use super::fields::lenient_list;
use super::{fetch_json, page_offset, SourceAdapter};
use crate::error::ProviderError;
use crate::models::SearchQuery;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

const PROVIDER: &str = "encyclopedia";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncyclopediaEnvelope {
    #[serde(default)]
    pub query: EncyclopediaQuery,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncyclopediaQuery {
    #[serde(default)]
    pub searchinfo: Option<SearchInfo>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub search: Vec<EncyclopediaPage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchInfo {
    #[serde(default)]
    pub totalhits: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncyclopediaPage {
    #[serde(default)]
    pub pageid: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    /// HTML fragment with `<span class="searchmatch">` markup.
    #[serde(default)]
    pub snippet: Option<String>,
}

/// Encyclopedia full-text search (MediaWiki `list=search`).
#[derive(Clone)]
pub struct EncyclopediaAdapter {
    client: Client,
    endpoint: String,
    page_size: u32,
}

impl EncyclopediaAdapter {
    pub fn new(client: Client, endpoint: String, page_size: u32) -> Self {
        Self {
            client,
            endpoint,
            page_size,
        }
    }
}

#[async_trait]
impl SourceAdapter for EncyclopediaAdapter {
    type Envelope = EncyclopediaEnvelope;

    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn search(&self, query: &SearchQuery) -> Result<EncyclopediaEnvelope, ProviderError> {
        info!(provider = PROVIDER, term = %query.term, page = query.page, "searching");

        let params: [(&str, String); 7] = [
            ("action", "query".to_string()),
            ("list", "search".to_string()),
            ("format", "json".to_string()),
            ("srprop", "snippet".to_string()),
            ("srsearch", query.term.clone()),
            ("sroffset", page_offset(query.page, self.page_size).to_string()),
            ("srlimit", self.page_size.to_string()),
        ];

        fetch_json(PROVIDER, self.client.get(&self.endpoint).query(&params)).await
    }
}
