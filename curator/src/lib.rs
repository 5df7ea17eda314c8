//! Multi-provider artwork metadata aggregation with cited summarization.
//!
//! A search fans out to three providers (`sources`), normalizes and enriches
//! the results (`agents`). Summaries are produced separately by
//! `agents::summarizer` through the shared, rate-limited model backend (`llm`).

pub mod agents;
pub mod api;
pub mod citations;
pub mod config;
pub mod error;
pub mod llm;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod sources;
