pub fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_headers(vec![
            "Origin",
            "X-Requested-With",
            "Content-Type",
            "Accept",
            "Access-Control-Allow-Origin",
            "Access-Control-Allow-Headers",
        ])
        .allow_methods(vec!["POST", "GET", "OPTIONS"])
}
