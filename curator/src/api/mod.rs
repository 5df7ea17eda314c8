use crate::agents::{Aggregator, SummarizerAgent};
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

mod search;
mod summarize;

pub fn routes(
    aggregator: Arc<Aggregator>,
    summarizer: Arc<SummarizerAgent>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let api = warp::path("api").and(warp::path("v1"));

    let record_list_route = api
        .and(warp::path("recordList"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_aggregator(aggregator))
        .and_then(search::handle_record_list);

    let summarize_route = api
        .and(warp::path("summarize"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_summarizer(summarizer.clone()))
        .and_then(summarize::handle_summarize);

    let cluster_route = api
        .and(warp::path("summarize"))
        .and(warp::path("clusters"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_summarizer(summarizer))
        .and_then(summarize::handle_cluster_summaries);

    record_list_route.or(summarize_route).or(cluster_route)
}

fn with_aggregator(
    aggregator: Arc<Aggregator>,
) -> impl Filter<Extract = (Arc<Aggregator>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || aggregator.clone())
}

fn with_summarizer(
    summarizer: Arc<SummarizerAgent>,
) -> impl Filter<Extract = (Arc<SummarizerAgent>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || summarizer.clone())
}
