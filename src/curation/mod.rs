//! Feedback curation core
//!
//! Accumulates user correction feedback, scores it, curates a bounded
//! golden set of labeled examples through stratified sampling, and prunes
//! the raw population by age and quality.

pub mod analytics;
pub mod curator;
pub mod scorer;
pub mod store;

pub use analytics::{AnalyticsReporter, ExportSnapshot, FeedbackStats, PatternCount};
pub use curator::{CurationOutcome, GoldenSetCurator};
pub use store::FeedbackStore;
