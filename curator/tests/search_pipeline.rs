mod common;

use common::{enricher, image_resolver, DoiCovers, EchoAnalytics, StaticSource, ISBN_COVERS};
use curator::agents::aggregator::{EncyclopediaSource, EuropeanaSource, LibrarySource};
use curator::agents::{Aggregator, ImageResolver};
use curator::error::EnrichmentError;
use curator::models::{ClusterLabel, RightsLabel, SearchQuery, NO_IMAGE};
use curator::sources::{EncyclopediaEnvelope, EuropeanaEnvelope, LibraryEnvelope};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

fn europeana_two() -> EuropeanaEnvelope {
    serde_json::from_value(json!({
        "success": true,
        "totalResults": 120,
        "items": [
            {
                "id": "/eu/1",
                "title": ["Bridge at dusk"],
                "dcDescription": ["Oil on canvas"],
                "rights": ["http://rightsstatements.org/vocab/InC/1.0/"],
                "dataProvider": ["Rijksmuseum"],
                "dcCreator": ["Monet"],
                "edmPreview": ["https://img.example/eu1.jpg"]
            },
            {
                "id": "/eu/2",
                "title": "Harbour",
                "dcDescription": ["Etching"]
            }
        ]
    }))
    .unwrap()
}

fn library_one() -> LibraryEnvelope {
    serde_json::from_value(json!({
        "info": { "total": 40 },
        "docs": [{
            "pnx": {
                "control": { "recordid": ["lib-1"] },
                "display": {
                    "title": ["Portrait studies"],
                    "publisher": ["Yale University Press"],
                    "description": ["A survey of portraiture"]
                }
            }
        }]
    }))
    .unwrap()
}

fn encyclopedia_three() -> EncyclopediaEnvelope {
    serde_json::from_value(json!({
        "query": {
            "searchinfo": { "totalhits": 9000 },
            "search": [
                { "pageid": 11, "title": "Bridge", "snippet": "A <span class=\"searchmatch\">bridge</span> spans" },
                { "pageid": 12, "title": "Portrait", "snippet": "A painting" },
                { "pageid": 13, "title": "River", "snippet": "Water &amp; banks" }
            ]
        }
    }))
    .unwrap()
}

fn query() -> SearchQuery {
    SearchQuery {
        term: "bridge".to_string(),
        filter: None,
        page: 1,
    }
}

struct Harness {
    aggregator: Aggregator,
    analytics: Arc<EchoAnalytics>,
}

fn harness(
    europeana: StaticSource<EuropeanaEnvelope>,
    library: StaticSource<LibraryEnvelope>,
    encyclopedia: StaticSource<EncyclopediaEnvelope>,
    analytics: EchoAnalytics,
) -> Harness {
    let analytics = Arc::new(analytics);
    let europeana: EuropeanaSource = Arc::new(europeana);
    let library: LibrarySource = Arc::new(library);
    let encyclopedia: EncyclopediaSource = Arc::new(encyclopedia);

    Harness {
        aggregator: Aggregator::new(
            europeana,
            library,
            encyclopedia,
            image_resolver(),
            enricher(analytics.clone()),
        ),
        analytics,
    }
}

fn all_healthy() -> Harness {
    harness(
        StaticSource::ok("europeana", europeana_two()),
        StaticSource::ok("library", library_one()),
        StaticSource::ok("encyclopedia", encyclopedia_three()),
        EchoAnalytics::default(),
    )
}

#[tokio::test]
async fn records_come_back_in_provider_block_order() {
    let h = all_healthy();
    let results = h.aggregator.search(&query()).await.unwrap();

    let ids: Vec<&str> = results.items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["/eu/1", "/eu/2", "lib-1", "11", "12", "13"]);
    assert_eq!(results.total_results, 120 + 40 + 3);
}

#[tokio::test]
async fn enrichment_is_submitted_once_in_record_order() {
    let h = all_healthy();
    let results = h.aggregator.search(&query()).await.unwrap();

    let batches = h.analytics.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    let expected: Vec<String> = results.items.iter().map(|r| r.analysis_text()).collect();
    assert_eq!(batches[0].texts, expected);
    assert_eq!(batches[0].texts.len(), 6);
    assert!(batches[0].texts[2].starts_with("Portrait studies "));
}

#[tokio::test]
async fn enrichment_results_land_on_matching_records() {
    let h = all_healthy();
    let results = h.aggregator.search(&query()).await.unwrap();

    for (i, record) in results.items.iter().enumerate() {
        let enrichment = record.enrichment.as_ref().expect("every record is enriched");
        let first_word = record.title.split_whitespace().next().unwrap();
        assert_eq!(enrichment.keywords, vec![first_word.to_string()]);
        assert_eq!(enrichment.cluster_label, ClusterLabel::Number(i as i64));
    }
}

#[tokio::test]
async fn records_are_normalized_per_provider() {
    let h = all_healthy();
    let items = h.aggregator.search(&query()).await.unwrap().items;

    assert_eq!(items[0].preview_image, "https://img.example/eu1.jpg");
    assert_eq!(items[0].creator, "Monet");
    assert_eq!(items[1].title, "Harbour");
    assert_eq!(items[1].preview_image, NO_IMAGE);

    assert_eq!(items[2].rights_label, RightsLabel::Library);
    assert_eq!(items[2].creator, "Yale University Press");
    assert_eq!(items[2].preview_image, NO_IMAGE);

    assert_eq!(items[3].rights_label, RightsLabel::Encyclopedia);
    assert_eq!(items[3].description, "A bridge spans");
    assert_eq!(items[5].description, "Water & banks");
    assert_eq!(items[4].data_provider, "Wikipedia");
}

#[tokio::test]
async fn failed_provider_contributes_nothing() {
    let h = harness(
        StaticSource::ok("europeana", europeana_two()),
        StaticSource::failing("library"),
        StaticSource::ok("encyclopedia", encyclopedia_three()),
        EchoAnalytics::default(),
    );
    let results = h.aggregator.search(&query()).await.unwrap();

    let ids: Vec<&str> = results.items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["/eu/1", "/eu/2", "11", "12", "13"]);
    assert_eq!(results.total_results, 120 + 3);
    assert_eq!(h.analytics.batches.lock().unwrap()[0].texts.len(), 5);
}

#[tokio::test]
async fn all_providers_down_is_an_empty_success() {
    let h = harness(
        StaticSource::failing("europeana"),
        StaticSource::failing("library"),
        StaticSource::failing("encyclopedia"),
        EchoAnalytics::default(),
    );
    let results = h.aggregator.search(&query()).await.unwrap();

    assert!(results.items.is_empty());
    assert_eq!(results.total_results, 0);
    assert!(h.analytics.batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn enrichment_failure_fails_the_search() {
    let h = harness(
        StaticSource::ok("europeana", europeana_two()),
        StaticSource::ok("library", library_one()),
        StaticSource::ok("encyclopedia", encyclopedia_three()),
        EchoAnalytics {
            fail: true,
            ..Default::default()
        },
    );

    let err = h.aggregator.search(&query()).await.unwrap_err();
    assert!(matches!(err, EnrichmentError::Status(500)));
}

#[tokio::test]
async fn short_enrichment_response_fails_the_search() {
    let h = harness(
        StaticSource::ok("europeana", europeana_two()),
        StaticSource::ok("library", library_one()),
        StaticSource::ok("encyclopedia", encyclopedia_three()),
        EchoAnalytics {
            drop_last: true,
            ..Default::default()
        },
    );

    let err = h.aggregator.search(&query()).await.unwrap_err();
    assert!(matches!(
        err,
        EnrichmentError::Misaligned {
            expected: 6,
            keywords: 5,
            labels: 6
        }
    ));
}

fn library_two_with_hints() -> LibraryEnvelope {
    serde_json::from_value(json!({
        "info": { "total": 2 },
        "docs": [
            {
                "pnx": {
                    "control": { "recordid": ["lib-doi"] },
                    "display": { "title": ["Bridges of Paris"] },
                    "addata": { "doi": ["10.1000/bridges"], "isbn": ["9780000000001"] }
                }
            },
            {
                "pnx": {
                    "control": { "recordid": ["lib-isbn"] },
                    "display": { "title": ["Harbour sketches"] },
                    "addata": { "isbn": ["9780000000002"] }
                }
            }
        ]
    }))
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn covers_land_on_the_library_record_they_were_resolved_for() {
    let covers = DoiCovers {
        covers: HashMap::from([(
            "10.1000/bridges".to_string(),
            "https://img.example/bridges.jpg".to_string(),
        )]),
        delay: Duration::from_millis(200),
    };
    let analytics = Arc::new(EchoAnalytics::default());
    let europeana: EuropeanaSource = Arc::new(StaticSource::<EuropeanaEnvelope>::failing("europeana"));
    let library: LibrarySource = Arc::new(StaticSource::ok("library", library_two_with_hints()));
    let encyclopedia: EncyclopediaSource =
        Arc::new(StaticSource::<EncyclopediaEnvelope>::failing("encyclopedia"));
    let aggregator = Aggregator::new(
        europeana,
        library,
        encyclopedia,
        ImageResolver::new(Arc::new(covers), ISBN_COVERS.to_string()),
        enricher(analytics),
    );

    let items = aggregator.search(&query()).await.unwrap().items;

    let placed: Vec<(&str, &str)> = items
        .iter()
        .map(|r| (r.id.as_str(), r.preview_image.as_str()))
        .collect();
    assert_eq!(
        placed,
        vec![
            ("lib-doi", "https://img.example/bridges.jpg"),
            (
                "lib-isbn",
                "https://covers.example/index.php?client=primo&isbn=9780000000002/lc.jpg"
            ),
        ]
    );
}
