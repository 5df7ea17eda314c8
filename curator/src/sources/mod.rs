//! Source adapters, one per external provider.
//!
//! Each adapter performs exactly one outbound search call and hands back the
//! provider's own envelope. Mapping into `CanonicalRecord` happens later in
//! the normalizer, so adapters stay thin transport shims.

pub mod encyclopedia;
pub mod europeana;
pub mod fields;
pub mod library;

use crate::error::ProviderError;
use crate::models::SearchQuery;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

pub use encyclopedia::{EncyclopediaAdapter, EncyclopediaEnvelope};
pub use europeana::{EuropeanaAdapter, EuropeanaEnvelope};
pub use library::{LibraryAdapter, LibraryEnvelope};

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Provider-native result envelope. `Default` is the empty result used
    /// when the provider is unavailable.
    type Envelope: Default + Send + 'static;

    /// Short provider name used in logs and metrics.
    fn provider(&self) -> &'static str;

    async fn search(&self, query: &SearchQuery) -> Result<Self::Envelope, ProviderError>;
}

/// Send a prepared request and decode the JSON body.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|source| ProviderError::Transport { provider, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| ProviderError::Transport { provider, source })?;
    debug!(provider, bytes = body.len(), "provider responded");

    serde_json::from_slice(&body).map_err(|e| ProviderError::Decode {
        provider,
        reason: e.to_string(),
    })
}

/// One-based page number to the offset of its first item. Page 0 is read
/// as page 1.
pub(crate) fn page_offset(page: u32, page_size: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(page_size)
}
