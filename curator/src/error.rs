use thiserror::Error;
use warp::http::StatusCode;
use warp::{reject::Reject, Rejection, Reply};

/// A single source adapter call failed. Absorbed by the aggregator.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider} unavailable: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned status {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("{provider} payload could not be decoded: {reason}")]
    Decode { provider: &'static str, reason: String },
}

impl ProviderError {
    pub fn provider(&self) -> &'static str {
        match self {
            ProviderError::Transport { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::Decode { provider, .. } => provider,
        }
    }
}

/// A cover-image lookup failed. Treated as "no result" by the resolver.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("cover lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("cover lookup returned status {0}")]
    Status(u16),
}

#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("text-analytics service unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("text-analytics service returned status {0}")]
    Status(u16),

    #[error("text-analytics response could not be decoded: {0}")]
    Decode(String),

    #[error("text-analytics response misaligned: sent {expected} texts, got {keywords} keyword lists and {labels} cluster labels")]
    Misaligned {
        expected: usize,
        keywords: usize,
        labels: usize,
    },
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("chat-completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat-completion endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("chat-completion response contained no message")]
    EmptyCompletion,
}

/// The admission gate stopped admitting calls.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("language model admission gate is closed")]
pub struct GateClosed;

#[derive(Error, Debug)]
pub enum SummarizationError {
    #[error("language model call failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: LlmError },

    #[error(transparent)]
    GateClosed(#[from] GateClosed),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Enrichment failed: {0}")]
    Enrichment(#[from] EnrichmentError),

    #[error("Summarization failed: {0}")]
    Summarization(#[from] SummarizationError),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl Reject for ApiError {}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Rejection> {
    let (code, message, details) = if let Some(api_err) = err.find::<ApiError>() {
        let (code, message) = match api_err {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            ApiError::Enrichment(_) => (StatusCode::BAD_GATEWAY, "Error fetching data"),
            ApiError::Summarization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error generating summary")
            }
            ApiError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };
        (code, message, api_err.to_string())
    } else if let Some(body_err) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, "Bad request", body_err.to_string())
    } else {
        return Err(err);
    };

    let json = warp::reply::json(&serde_json::json!({
        "success": false,
        "error": message,
        "details": details,
    }));

    Ok(warp::reply::with_status(json, code))
}
