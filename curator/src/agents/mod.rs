pub mod aggregator;
pub mod enrichment;
pub mod gallery;
pub mod images;
pub mod normalizer;
pub mod summarizer;

pub use aggregator::Aggregator;
pub use enrichment::{Enricher, HttpTextAnalytics, TextAnalytics};
pub use images::{CoverLookup, ImageResolver, ThirdIronLookup};
pub use summarizer::{SummarizerAgent, SummarizerSettings};
