//! Citation tokens.
//!
//! Summaries cite sources with `[docId: <id>]`. The model is asked for
//! `[docId:<id>]` and usually adds a space, so both spellings are accepted.
//! The mapping text sent with a request (`[docId: X]: title`, one per line)
//! numbers the documents in line order starting at 1.

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[docId:\s*([^\]]+)\]").expect("citation token pattern is valid")
});

static MAPPING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[docId:\s*([^\]]+)\]\s*:?\s*(.*)$").expect("mapping line pattern is valid")
});

/// Format the citation token for a document id.
pub fn token(doc_id: &str) -> String {
    format!("[docId: {}]", doc_id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub doc_id: String,
    pub number: usize,
    pub title: String,
}

/// Build the mapping text for `(doc_id, title)` pairs in display order.
pub fn mapping_text<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    entries
        .into_iter()
        .map(|(doc_id, title)| format!("{}: {}", token(doc_id), title))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse mapping text. Lines that are not mapping entries are skipped and do
/// not consume a number.
pub fn parse_mapping(text: &str) -> Vec<MappingEntry> {
    text.lines()
        .filter_map(|line| MAPPING_LINE.captures(line))
        .enumerate()
        .map(|(i, caps)| MappingEntry {
            doc_id: caps[1].trim().to_string(),
            number: i + 1,
            title: caps[2].trim().to_string(),
        })
        .collect()
}

/// Distinct cited ids in order of first appearance.
pub fn cited_ids(summary: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    TOKEN
        .captures_iter(summary)
        .map(|caps| caps[1].trim().to_string())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Replace each citation token with its reference number, `[?]` when the id
/// is not in the mapping.
pub fn number_citations(summary: &str, mapping: &[MappingEntry]) -> String {
    TOKEN
        .replace_all(summary, |caps: &regex::Captures| {
            let id = caps[1].trim();
            match mapping.iter().find(|entry| entry.doc_id == id) {
                Some(entry) => format!("[{}]", entry.number),
                None => "[?]".to_string(),
            }
        })
        .into_owned()
}

/// One cited source, as the client lists it under a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub doc_id: String,
    pub number: Option<usize>,
    pub title: Option<String>,
}

/// The sources a summary cites, in order of first citation. Ids missing from
/// the mapping are kept with no number or title.
pub fn references(summary: &str, mapping: &[MappingEntry]) -> Vec<Reference> {
    cited_ids(summary)
        .into_iter()
        .map(|doc_id| {
            let entry = mapping.iter().find(|entry| entry.doc_id == doc_id);
            Reference {
                number: entry.map(|e| e.number),
                title: entry.map(|e| e.title.clone()),
                doc_id,
            }
        })
        .collect()
}
