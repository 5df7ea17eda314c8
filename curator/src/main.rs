use curator::agents::{
    Aggregator, Enricher, HttpTextAnalytics, ImageResolver, SummarizerAgent, SummarizerSettings,
    ThirdIronLookup,
};
use curator::llm::{AdmissionGate, ChatCompletionClient, RetryPolicy};
use curator::sources::{EncyclopediaAdapter, EuropeanaAdapter, LibraryAdapter};
use curator::{api, config, error, metrics, middleware};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use warp::{Filter, Reply};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!("Starting curator aggregation and summarization service");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .user_agent(concat!("curator/", env!("CARGO_PKG_VERSION")))
        .build()?;

    // Search pipeline
    let europeana = EuropeanaAdapter::new(
        http.clone(),
        config.europeana_api_url.clone(),
        config.europeana_api_key.clone(),
        config.page_size,
    );
    let library = LibraryAdapter::new(
        http.clone(),
        config.primo_api_url.clone(),
        config.primo_api_key.clone(),
        config.primo_vid.clone(),
        config.primo_scope.clone(),
        config.primo_tab.clone(),
        config.page_size,
    );
    let encyclopedia = EncyclopediaAdapter::new(
        http.clone(),
        config.wikipedia_api_url.clone(),
        config.page_size,
    );
    let images = ImageResolver::new(
        Arc::new(ThirdIronLookup::new(
            http.clone(),
            config.thirdiron_api_url.clone(),
            config.thirdiron_library_id.clone(),
            config.thirdiron_access_token.clone(),
        )),
        config.syndetics_url.clone(),
    );
    let enricher = Enricher::new(Arc::new(HttpTextAnalytics::new(
        http.clone(),
        config.enrichment_service_url.clone(),
    )));
    let aggregator = Arc::new(Aggregator::new(
        Arc::new(europeana),
        Arc::new(library),
        Arc::new(encyclopedia),
        images,
        enricher,
    ));
    info!("Search pipeline ready");

    // Summarization engine: one gate for the whole process
    let llm = ChatCompletionClient::new(
        http,
        config.openai_api_url.clone(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    );
    let summarizer = Arc::new(SummarizerAgent::new(
        Arc::new(llm),
        AdmissionGate::single(),
        RetryPolicy::default(),
        SummarizerSettings {
            temperature: config.llm_temperature,
            ..SummarizerSettings::default()
        },
    ));
    info!(model = %config.openai_model, "Summarization engine ready");

    // Build API routes
    let api_routes = api::routes(aggregator, summarizer);

    // Health check route
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "healthy"})));

    // Metrics route
    let metrics_route = warp::path("metrics").and(warp::get()).map(|| {
        match metrics::render() {
            Ok((buffer, content_type)) => {
                warp::reply::with_header(buffer, "Content-Type", content_type).into_response()
            }
            Err(e) => {
                error!("Failed to encode metrics: {}", e);
                warp::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    });

    let routes = health
        .or(metrics_route)
        .or(api_routes)
        .recover(error::handle_rejection)
        .with(warp::log("api"))
        .with(middleware::cors());

    // Start server
    let addr = ([0, 0, 0, 0], config.port);
    info!("Server listening on {}", addr.1);

    warp::serve(routes).run(addr).await;

    Ok(())
}
