//! Feedback Curator - correction feedback curation library
//!
//! A background companion service for a prompt-classification front end:
//! - Bounded persistence of user correction feedback
//! - Multi-factor quality scoring
//! - Stratified golden set curation with per-category quotas
//! - Retention pruning and derived analytics
//! - HTTP surface and periodic scheduler
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use feedback_curator::curation::FeedbackStore;
//! use feedback_curator::service::CurationService;
//!
//! let store = Arc::new(FeedbackStore::new()?);
//! let service = Arc::new(CurationService::new(store));
//! let outcome = service.on_scheduler_tick()?;
//! ```

// Core modules (order matters for cross-module dependencies)
pub mod types;
pub mod error;
pub mod config;
pub mod curation;
pub mod service;
pub mod server;
pub mod cli;

// Re-export commonly used types for convenience
pub use curation::{
    AnalyticsReporter, CurationOutcome, ExportSnapshot, FeedbackStats, FeedbackStore,
    GoldenSetCurator,
};

pub use error::CurationError;

pub use service::CurationService;

pub use types::{Category, FeedbackRecord, GoldenSetEntry, ScoredFeedback};

pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
