use super::fields::{lenient_list, OneOrMany};
use super::{fetch_json, page_offset, SourceAdapter};
use crate::error::ProviderError;
use crate::models::SearchQuery;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

const PROVIDER: &str = "library";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryEnvelope {
    #[serde(default)]
    pub info: LibraryInfo,
    #[serde(default, deserialize_with = "lenient_list")]
    pub docs: Vec<LibraryDoc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryInfo {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryDoc {
    #[serde(default)]
    pub pnx: Pnx,
}

/// Primo "normalized XML" record, in its JSON rendering.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pnx {
    #[serde(default)]
    pub control: PnxControl,
    #[serde(default)]
    pub display: PnxDisplay,
    #[serde(default)]
    pub sort: PnxSort,
    #[serde(default)]
    pub addata: PnxAddata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PnxControl {
    #[serde(default)]
    pub recordid: Option<OneOrMany<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PnxDisplay {
    #[serde(default)]
    pub title: Option<OneOrMany<String>>,
    #[serde(default)]
    pub creator: Option<OneOrMany<String>>,
    #[serde(default)]
    pub publisher: Option<OneOrMany<String>>,
    #[serde(default)]
    pub description: Option<OneOrMany<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PnxSort {
    #[serde(default)]
    pub title: Option<OneOrMany<String>>,
}

/// Bibliographic identifiers used for cover lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PnxAddata {
    #[serde(default)]
    pub doi: Option<OneOrMany<String>>,
    #[serde(default)]
    pub issn: Option<OneOrMany<String>>,
    #[serde(default)]
    pub isbn: Option<OneOrMany<String>>,
}

/// Library-catalog search (Ex Libris Primo REST API).
#[derive(Clone)]
pub struct LibraryAdapter {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    vid: String,
    scope: String,
    tab: String,
    page_size: u32,
}

impl LibraryAdapter {
    pub fn new(
        client: Client,
        endpoint: String,
        api_key: Option<String>,
        vid: String,
        scope: String,
        tab: String,
        page_size: u32,
    ) -> Self {
        Self {
            client,
            endpoint,
            api_key,
            vid,
            scope,
            tab,
            page_size,
        }
    }
}

#[async_trait]
impl SourceAdapter for LibraryAdapter {
    type Envelope = LibraryEnvelope;

    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn search(&self, query: &SearchQuery) -> Result<LibraryEnvelope, ProviderError> {
        info!(provider = PROVIDER, term = %query.term, page = query.page, "searching");

        let mut params: Vec<(&str, String)> = vec![
            ("q", format!("any,contains,{}", query.term)),
            ("vid", self.vid.clone()),
            ("scope", self.scope.clone()),
            ("tab", self.tab.clone()),
            ("offset", page_offset(query.page, self.page_size).to_string()),
            ("limit", self.page_size.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("apikey", key.clone()));
        }

        fetch_json(PROVIDER, self.client.get(&self.endpoint).query(&params)).await
    }
}
