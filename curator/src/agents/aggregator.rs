// Aggregator: fans out to the three providers and assembles one result list
//
// Record order is provider-block order (aggregator, library, encyclopedia)
// and is never changed after this point; enrichment relies on it.

use super::enrichment::Enricher;
use super::images::ImageResolver;
use super::normalizer;
use crate::error::EnrichmentError;
use crate::metrics;
use crate::models::{CanonicalRecord, SearchQuery, SearchResults};
use crate::sources::{EncyclopediaEnvelope, EuropeanaEnvelope, LibraryEnvelope, SourceAdapter};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub type EuropeanaSource = Arc<dyn SourceAdapter<Envelope = EuropeanaEnvelope>>;
pub type LibrarySource = Arc<dyn SourceAdapter<Envelope = LibraryEnvelope>>;
pub type EncyclopediaSource = Arc<dyn SourceAdapter<Envelope = EncyclopediaEnvelope>>;

/// Normalized records before enrichment.
#[derive(Debug, Clone)]
pub struct Aggregated {
    pub records: Vec<CanonicalRecord>,
    pub total_results: u64,
}

#[derive(Clone)]
pub struct Aggregator {
    europeana: EuropeanaSource,
    library: LibrarySource,
    encyclopedia: EncyclopediaSource,
    images: ImageResolver,
    enricher: Enricher,
}

impl Aggregator {
    pub fn new(
        europeana: EuropeanaSource,
        library: LibrarySource,
        encyclopedia: EncyclopediaSource,
        images: ImageResolver,
        enricher: Enricher,
    ) -> Self {
        Self {
            europeana,
            library,
            encyclopedia,
            images,
            enricher,
        }
    }

    /// Full search pipeline: aggregate, then enrich. Enrichment failure fails
    /// the whole search.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults, EnrichmentError> {
        let request_id = Uuid::new_v4();
        let aggregated = self.aggregate(request_id, query).await;
        let items = self.enricher.enrich(request_id, aggregated.records).await?;

        info!(request_id = %request_id, items = items.len(), total = aggregated.total_results, "search complete");
        Ok(SearchResults {
            items,
            total_results: aggregated.total_results,
        })
    }

    #[instrument(skip(self, query), fields(term = %query.term, page = query.page))]
    pub async fn aggregate(&self, request_id: Uuid, query: &SearchQuery) -> Aggregated {
        let (europeana, library, encyclopedia) = tokio::join!(
            fetch_or_empty(self.europeana.as_ref(), query, request_id),
            fetch_or_empty(self.library.as_ref(), query, request_id),
            fetch_or_empty(self.encyclopedia.as_ref(), query, request_id),
        );

        let covers = self.images.resolve_all(&library.docs).await;

        let mut records = Vec::with_capacity(
            europeana.items.len() + library.docs.len() + encyclopedia.query.search.len(),
        );
        records.extend(europeana.items.iter().map(normalizer::from_europeana));
        records.extend(
            library
                .docs
                .iter()
                .zip(covers)
                .map(|(doc, cover)| normalizer::from_library(doc, cover)),
        );
        records.extend(encyclopedia.query.search.iter().map(normalizer::from_encyclopedia));

        // Summed per provider, duplicates across providers count twice. The
        // encyclopedia contributes the size of the page it returned.
        let total_results = europeana.total_results
            + library.info.total
            + encyclopedia.query.search.len() as u64;

        info!(
            request_id = %request_id,
            europeana = europeana.items.len(),
            library = library.docs.len(),
            encyclopedia = encyclopedia.query.search.len(),
            total_results,
            "aggregated provider results"
        );

        Aggregated {
            records,
            total_results,
        }
    }
}

async fn fetch_or_empty<E: Default + Send + 'static>(
    adapter: &dyn SourceAdapter<Envelope = E>,
    query: &SearchQuery,
    request_id: Uuid,
) -> E {
    match adapter.search(query).await {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(
                request_id = %request_id,
                provider = adapter.provider(),
                error = %e,
                "provider unavailable, continuing without its results"
            );
            metrics::PROVIDER_FAILURES
                .with_label_values(&[adapter.provider()])
                .inc();
            E::default()
        }
    }
}
