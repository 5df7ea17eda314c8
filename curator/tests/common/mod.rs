//! In-process stand-ins for the external collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use curator::agents::enrichment::{AnalysisResponse, EnrichmentBatch};
use curator::agents::{CoverLookup, Enricher, ImageResolver, SummarizerAgent, SummarizerSettings, TextAnalytics};
use curator::error::{EnrichmentError, LlmError, LookupError, ProviderError};
use curator::llm::{AdmissionGate, ChatMessage, LanguageModel, RetryPolicy};
use curator::models::{ClusterLabel, SearchQuery};
use curator::sources::SourceAdapter;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Source adapter answering every search with a fixed envelope, or failing
/// when none is configured.
pub struct StaticSource<E> {
    provider: &'static str,
    envelope: Option<E>,
    pub calls: AtomicUsize,
}

impl<E> StaticSource<E> {
    pub fn ok(provider: &'static str, envelope: E) -> Self {
        Self {
            provider,
            envelope: Some(envelope),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(provider: &'static str) -> Self {
        Self {
            provider,
            envelope: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl<E> SourceAdapter for StaticSource<E>
where
    E: Clone + Default + Send + Sync + 'static,
{
    type Envelope = E;

    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn search(&self, _query: &SearchQuery) -> Result<E, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.envelope.clone().ok_or(ProviderError::Status {
            provider: self.provider,
            status: 503,
        })
    }
}

/// Cover lookup that never finds anything.
pub struct NoCovers;

#[async_trait]
impl CoverLookup for NoCovers {
    async fn by_doi(&self, _doi: &str) -> Result<Option<String>, LookupError> {
        Ok(None)
    }

    async fn by_issn(&self, _issn: &str) -> Result<Option<String>, LookupError> {
        Ok(None)
    }

    async fn by_title(&self, _title: &str) -> Result<Option<String>, LookupError> {
        Ok(None)
    }
}

pub const ISBN_COVERS: &str = "https://covers.example/index.php";

pub fn image_resolver() -> ImageResolver {
    ImageResolver::new(Arc::new(NoCovers), ISBN_COVERS.to_string())
}

/// Cover lookup answering DOIs from a fixed table. Each answer is delayed by
/// `delay`, so a slow first lookup finishes after faster later ones.
pub struct DoiCovers {
    pub covers: HashMap<String, String>,
    pub delay: Duration,
}

#[async_trait]
impl CoverLookup for DoiCovers {
    async fn by_doi(&self, doi: &str) -> Result<Option<String>, LookupError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.covers.get(doi).cloned())
    }

    async fn by_issn(&self, _issn: &str) -> Result<Option<String>, LookupError> {
        Ok(None)
    }

    async fn by_title(&self, _title: &str) -> Result<Option<String>, LookupError> {
        Ok(None)
    }
}

/// Text-analytics stand-in. Keywords are each text's first word and cluster
/// labels are the text's index, so misalignment is easy to spot.
#[derive(Default)]
pub struct EchoAnalytics {
    pub batches: Mutex<Vec<EnrichmentBatch>>,
    pub fail: bool,
    pub drop_last: bool,
}

#[async_trait]
impl TextAnalytics for EchoAnalytics {
    async fn analyze(&self, batch: &EnrichmentBatch) -> Result<AnalysisResponse, EnrichmentError> {
        self.batches.lock().unwrap().push(batch.clone());
        if self.fail {
            return Err(EnrichmentError::Status(500));
        }

        let mut response = AnalysisResponse {
            keywords_list: batch
                .texts
                .iter()
                .map(|t| t.split_whitespace().take(1).map(str::to_string).collect())
                .collect(),
            cluster_labels: (0..batch.texts.len() as i64).map(ClusterLabel::Number).collect(),
        };
        if self.drop_last {
            response.keywords_list.pop();
        }
        Ok(response)
    }
}

pub fn enricher(analytics: Arc<EchoAnalytics>) -> Enricher {
    Enricher::new(analytics)
}

type Reply = dyn Fn(usize, &[ChatMessage]) -> Result<String, LlmError> + Send + Sync;

/// Language model stand-in that records every conversation it receives and
/// tracks how many calls overlap.
pub struct MockLlm {
    reply: Box<Reply>,
    latency: Duration,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockLlm {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(usize, &[ChatMessage]) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            latency: Duration::from_millis(10),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers call `n` (1-based) with `summary of call n`.
    pub fn numbered() -> Self {
        Self::new(|n, _| Ok(format!("summary of call {}", n)))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn user_prompt(&self, call: usize) -> String {
        self.calls.lock().unwrap()[call][1].content.clone()
    }
}

#[async_trait]
impl LanguageModel for MockLlm {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _temperature: f32,
    ) -> Result<String, LlmError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(messages.to_vec());
            calls.len()
        };

        tokio::time::sleep(self.latency).await;
        let out = (self.reply)(n, messages);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        out
    }
}

pub fn summarizer(llm: Arc<MockLlm>, gate: AdmissionGate, settings: SummarizerSettings) -> SummarizerAgent {
    SummarizerAgent::new(llm, gate, RetryPolicy::default(), settings)
}

pub fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
}
