//! Field shapes shared by the provider payloads.
//!
//! Providers are loose about cardinality: the same field arrives as a bare
//! scalar on one record and as a list on the next. `OneOrMany` accepts both,
//! and the helpers below collapse an optional field to its authoritative
//! (first) value. Result lists are decoded one element at a time so a single
//! malformed record does not cost the whole page.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn first(&self) -> Option<&T> {
        match self {
            OneOrMany::One(value) => Some(value),
            OneOrMany::Many(values) => values.first(),
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// First non-blank value of an optional text field.
pub fn first_text(field: &Option<OneOrMany<String>>) -> Option<&str> {
    field
        .as_ref()
        .and_then(OneOrMany::first)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// First value of an optional text field, or the empty string.
pub fn text_or_empty(field: &Option<OneOrMany<String>>) -> String {
    first_text(field).unwrap_or_default().to_string()
}

/// Decode a result list element by element, dropping the elements that do not
/// fit `T`. A missing or null list is empty; a non-list is still an error.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let total = raw.len();
    let kept: Vec<T> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(element) => Some(element),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed result element");
                None
            }
        })
        .collect();
    if kept.len() < total {
        warn!(kept = kept.len(), total, "result list partially decoded");
    }
    Ok(kept)
}
