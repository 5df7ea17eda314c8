use crate::agents::Aggregator;
use crate::error::ApiError;
use crate::models::{RecordListRequest, RecordListResponse, SearchQuery};
use std::sync::Arc;
use tracing::info;
use warp::{Rejection, Reply};

pub async fn handle_record_list(
    request: RecordListRequest,
    aggregator: Arc<Aggregator>,
) -> Result<impl Reply, Rejection> {
    let term = request.search_input.trim().to_lowercase();
    if term.is_empty() {
        return Err(warp::reject::custom(ApiError::BadRequest(
            "searchInput must not be empty".to_string(),
        )));
    }

    let query = SearchQuery {
        term,
        filter: request.filter_query,
        page: request.page_number.unwrap_or(1).max(1),
    };
    info!("Processing record list: {} (page {})", query.term, query.page);

    let data = aggregator
        .search(&query)
        .await
        .map_err(|e| warp::reject::custom(ApiError::Enrichment(e)))?;

    Ok(warp::reply::json(&RecordListResponse {
        success: true,
        data,
    }))
}
