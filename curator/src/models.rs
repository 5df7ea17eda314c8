use crate::citations::Reference;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel stored in `preview_image` when no cover could be found.
pub const NO_IMAGE: &str = "No image available";

/// Origin tag for a record. Serialised the way the gallery UI expects:
/// library records as `EXLIB`, encyclopedia records as `WIKI`, and aggregator
/// records with whatever rights statement the provider attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RightsLabel {
    Implicit(String),
    Library,
    Encyclopedia,
}

impl RightsLabel {
    pub const LIBRARY_TAG: &'static str = "EXLIB";
    pub const ENCYCLOPEDIA_TAG: &'static str = "WIKI";
}

impl From<String> for RightsLabel {
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::LIBRARY_TAG => RightsLabel::Library,
            Self::ENCYCLOPEDIA_TAG => RightsLabel::Encyclopedia,
            _ => RightsLabel::Implicit(value),
        }
    }
}

impl From<RightsLabel> for String {
    fn from(label: RightsLabel) -> Self {
        match label {
            RightsLabel::Implicit(rights) => rights,
            RightsLabel::Library => RightsLabel::LIBRARY_TAG.to_string(),
            RightsLabel::Encyclopedia => RightsLabel::ENCYCLOPEDIA_TAG.to_string(),
        }
    }
}

/// Grouping key assigned by the text-analytics service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClusterLabel {
    Number(i64),
    Text(String),
}

impl ClusterLabel {
    /// `unknown` (any case) marks a record the service could not place.
    pub fn is_grouped(&self) -> bool {
        match self {
            ClusterLabel::Number(_) => true,
            ClusterLabel::Text(text) => !text.trim().eq_ignore_ascii_case("unknown"),
        }
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterLabel::Number(n) => write!(f, "{}", n),
            ClusterLabel::Text(text) => f.write_str(text),
        }
    }
}

/// Keywords and cluster label always travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    #[serde(default)]
    pub keywords: Vec<String>,
    pub cluster_label: ClusterLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "rights")]
    pub rights_label: RightsLabel,
    #[serde(default)]
    pub data_provider: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default = "no_image")]
    pub preview_image: String,
    #[serde(flatten)]
    pub enrichment: Option<Enrichment>,
}

fn no_image() -> String {
    NO_IMAGE.to_string()
}

impl CanonicalRecord {
    /// The text submitted for keyword extraction and fed into summaries.
    pub fn analysis_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    pub fn cluster_label(&self) -> Option<&ClusterLabel> {
        self.enrichment.as_ref().map(|e| &e.cluster_label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub term: String,
    pub filter: Option<String>,
    /// One-based, as the gallery client counts pages.
    pub page: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub items: Vec<CanonicalRecord>,
    pub total_results: u64,
}

/// Input to the summarization engine. Field names follow the gallery client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(rename = "highlightedKeys", default)]
    pub highlighted_keywords: Vec<String>,
    #[serde(rename = "europeanaText", default)]
    pub europeana_text: String,
    #[serde(rename = "wikipediaText", default)]
    pub wikipedia_text: String,
    #[serde(rename = "libraryText", default)]
    pub library_text: String,
    /// Newline-delimited `[docId: X]: title` lines.
    #[serde(rename = "sourceMapping", default)]
    pub doc_id_mapping: String,
}

impl SummaryRequest {
    /// The three provider blobs joined the way they are sent to the model.
    pub fn combined_text(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.europeana_text, self.wikipedia_text, self.library_text
        )
    }
}

// API Request/Response models
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordListRequest {
    #[serde(default)]
    pub search_input: String,
    #[serde(default)]
    pub filter_query: Option<String>,
    #[serde(default)]
    pub page_number: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RecordListResponse {
    pub success: bool,
    pub data: SearchResults,
}

/// `summary` is the model text with its `[docId: X]` tokens intact;
/// `numberedSummary` swaps them for reference numbers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: String,
    pub numbered_summary: String,
    pub references: Vec<Reference>,
}

/// A record as it sits in a saved gallery, with the citation id the client
/// assigned to it and any passages the user highlighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryDocument {
    pub doc_id: String,
    #[serde(flatten)]
    pub record: CanonicalRecord,
    #[serde(default)]
    pub highlights: Vec<String>,
    /// Name the user gave the document's cluster, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_cluster_label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClusterSummaryRequest {
    #[serde(default)]
    pub documents: Vec<GalleryDocument>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOutcome {
    pub success: bool,
    /// The enrichment label the cluster was grouped under.
    pub original_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}
