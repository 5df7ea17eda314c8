// Image Resolver: cover images for library-catalog records
//
// Lookups run in strict priority order and stop at the first hit:
// DOI lookup, ISSN lookup, title search, then a URL built from the ISBN.
// A failing lookup only means "no result" for that step.

use crate::error::LookupError;
use crate::metrics;
use crate::models::NO_IMAGE;
use crate::sources::fields::first_text;
use crate::sources::library::LibraryDoc;
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// External cover-image lookup service.
#[async_trait]
pub trait CoverLookup: Send + Sync {
    async fn by_doi(&self, doi: &str) -> Result<Option<String>, LookupError>;
    async fn by_issn(&self, issn: &str) -> Result<Option<String>, LookupError>;
    async fn by_title(&self, title: &str) -> Result<Option<String>, LookupError>;
}

/// Identifiers pulled from a catalog record that can lead to a cover.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverHints {
    pub doi: Option<String>,
    pub issn: Option<String>,
    pub title: Option<String>,
    pub isbn: Option<String>,
}

impl CoverHints {
    pub fn from_doc(doc: &LibraryDoc) -> Self {
        let pnx = &doc.pnx;
        Self {
            doi: first_text(&pnx.addata.doi).map(str::to_string),
            issn: first_text(&pnx.addata.issn).and_then(normalize_issn),
            title: first_text(&pnx.display.title)
                .or_else(|| first_text(&pnx.sort.title))
                .map(str::to_string),
            isbn: first_text(&pnx.addata.isbn).map(str::to_string),
        }
    }
}

/// Keep only the digits and check character of an ISSN.
pub fn normalize_issn(raw: &str) -> Option<String> {
    let issn: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    (!issn.is_empty()).then_some(issn)
}

#[derive(Clone)]
pub struct ImageResolver {
    lookup: Arc<dyn CoverLookup>,
    isbn_base_url: String,
}

impl ImageResolver {
    pub fn new(lookup: Arc<dyn CoverLookup>, isbn_base_url: String) -> Self {
        Self {
            lookup,
            isbn_base_url,
        }
    }

    /// Deterministic cover URL for an ISBN. No network call.
    pub fn isbn_cover_url(&self, isbn: &str) -> String {
        format!("{}?client=primo&isbn={}/lc.jpg", self.isbn_base_url, isbn)
    }

    pub async fn resolve(&self, hints: &CoverHints) -> String {
        if let Some(doi) = &hints.doi {
            if let Some(url) = first_hit("doi", doi, self.lookup.by_doi(doi).await) {
                return found("doi", url);
            }
        }
        if let Some(issn) = &hints.issn {
            if let Some(url) = first_hit("issn", issn, self.lookup.by_issn(issn).await) {
                return found("issn", url);
            }
        }
        if let Some(title) = &hints.title {
            if let Some(url) = first_hit("title", title, self.lookup.by_title(title).await) {
                return found("title", url);
            }
        }
        if let Some(isbn) = &hints.isbn {
            return found("isbn", self.isbn_cover_url(isbn));
        }

        metrics::IMAGE_RESOLUTIONS.with_label_values(&["none"]).inc();
        NO_IMAGE.to_string()
    }

    /// Resolve every document concurrently; output is index-aligned with `docs`.
    pub async fn resolve_all(&self, docs: &[LibraryDoc]) -> Vec<String> {
        let hints: Vec<CoverHints> = docs.iter().map(CoverHints::from_doc).collect();
        join_all(hints.iter().map(|h| self.resolve(h))).await
    }
}

fn first_hit(
    step: &'static str,
    key: &str,
    outcome: Result<Option<String>, LookupError>,
) -> Option<String> {
    match outcome {
        Ok(Some(url)) if !url.trim().is_empty() => Some(url),
        Ok(_) => {
            debug!(step, key, "no cover from lookup");
            None
        }
        Err(e) => {
            warn!(step, key, error = %e, "cover lookup failed, trying next candidate");
            None
        }
    }
}

fn found(step: &'static str, url: String) -> String {
    metrics::IMAGE_RESOLUTIONS.with_label_values(&[step]).inc();
    url
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoverEntry {
    #[serde(default)]
    cover_image_url: Option<String>,
}

#[derive(Deserialize)]
struct ArticleResponse {
    #[serde(default)]
    included: Vec<CoverEntry>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<CoverEntry>,
}

/// Cover lookup against the Third Iron (BrowZine) public API.
#[derive(Clone)]
pub struct ThirdIronLookup {
    client: Client,
    base_url: String,
    library_id: String,
    access_token: Option<String>,
}

impl ThirdIronLookup {
    pub fn new(
        client: Client,
        base_url: String,
        library_id: String,
        access_token: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            library_id,
            access_token,
        }
    }

    fn library_url(&self) -> String {
        format!(
            "{}/libraries/{}",
            self.base_url.trim_end_matches('/'),
            self.library_id
        )
    }

    fn token_param(&self) -> Vec<(&'static str, String)> {
        self.access_token
            .iter()
            .map(|token| ("access_token", token.clone()))
            .collect()
    }

    async fn search(&self, param: &'static str, value: &str) -> Result<Option<String>, LookupError> {
        let mut params = self.token_param();
        params.push((param, value.to_string()));

        let response = self
            .client
            .get(format!("{}/search", self.library_url()))
            .query(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.data.into_iter().next().and_then(|e| e.cover_image_url))
    }
}

#[async_trait]
impl CoverLookup for ThirdIronLookup {
    async fn by_doi(&self, doi: &str) -> Result<Option<String>, LookupError> {
        let mut params = self.token_param();
        params.push(("include", "journal".to_string()));

        let response = self
            .client
            .get(format!("{}/articles/doi/{}", self.library_url(), doi))
            .query(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body: ArticleResponse = response.json().await?;
        Ok(body.included.into_iter().next().and_then(|e| e.cover_image_url))
    }

    async fn by_issn(&self, issn: &str) -> Result<Option<String>, LookupError> {
        self.search("issns", issn).await
    }

    async fn by_title(&self, title: &str) -> Result<Option<String>, LookupError> {
        self.search("query", title).await
    }
}
