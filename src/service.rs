//! Curation service - boundary operations and the periodic scheduler
//!
//! Wraps the store, curator, and reporter behind the operations external
//! callers use: feedback submission, golden set access, stats, export, and
//! scheduler ticks. A re-entrancy guard keeps curation single-flight across
//! the periodic timer, the startup run, and post-submission triggers.

use std::sync::{Arc, Mutex, TryLockError};

use chrono::{DateTime, Utc};
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::curation::{
    AnalyticsReporter, CurationOutcome, ExportSnapshot, FeedbackStats, FeedbackStore,
    GoldenSetCurator,
};
use crate::error::{CurationError, Result};
use crate::types::{FeedbackRecord, GoldenSetEntry};

/// Service facade over the curation core
pub struct CurationService {
    store: Arc<FeedbackStore>,
    curator: GoldenSetCurator,
    reporter: AnalyticsReporter,
    /// Held for the duration of a curation pass; an overlapping trigger
    /// skips instead of queueing a duplicate run
    curation_guard: Mutex<()>,
}

impl CurationService {
    pub fn new(store: Arc<FeedbackStore>) -> Self {
        Self {
            curator: GoldenSetCurator::new(store.clone()),
            reporter: AnalyticsReporter::new(store.clone()),
            store,
            curation_guard: Mutex::new(()),
        }
    }

    /// Validate and append one feedback record
    ///
    /// The submission result is independent of any curation that follows it.
    pub fn submit_feedback(&self, record: FeedbackRecord) -> Result<()> {
        if record.prompt.trim().is_empty() {
            return Err(CurationError::InvalidRecord(
                "prompt must not be empty".to_string(),
            ));
        }
        let count = self.store.append(record)?;
        info!("Feedback accepted, store holds {} records", count);
        Ok(())
    }

    /// Fire-and-forget curation run, used after a submission
    pub fn trigger_curation(self: &Arc<Self>) {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = service.run_curation(Utc::now()) {
                warn!("Post-submission curation failed: {}", e);
            }
        });
    }

    /// Current curated golden set
    pub fn golden_set(&self) -> Result<Vec<GoldenSetEntry>> {
        self.store.load_golden_set()
    }

    /// Summary statistics at the current instant
    pub fn stats(&self) -> Result<FeedbackStats> {
        self.reporter.stats(Utc::now())
    }

    /// Export snapshot at the current instant
    pub fn export(&self) -> Result<ExportSnapshot> {
        self.reporter.export(Utc::now())
    }

    /// One scheduled curation run
    pub fn on_scheduler_tick(&self) -> Result<Option<CurationOutcome>> {
        self.run_curation(Utc::now())
    }

    /// Run a curation cycle unless one is already in flight
    ///
    /// Returns `Ok(None)` when the cycle was skipped by the guard. A guard
    /// poisoned by a panicked pass is reclaimed, so the next trigger still
    /// runs from persisted state.
    pub fn run_curation(&self, now: DateTime<Utc>) -> Result<Option<CurationOutcome>> {
        let _guard = match self.curation_guard.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                debug!("Curation already in flight, skipping trigger");
                return Ok(None);
            }
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        let outcome = self.curator.curate(now)?;
        Ok(Some(outcome))
    }
}

/// Periodic curation driver
///
/// The first tick fires immediately and doubles as the startup run.
pub async fn run_scheduler(service: Arc<CurationService>, interval: Duration) {
    info!("Curation scheduler started, interval {:?}", interval);
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        match service.on_scheduler_tick() {
            Ok(Some(outcome)) => {
                debug!(
                    "Scheduled curation: population {}, golden set {}, pruned {}",
                    outcome.population, outcome.golden_set_size, outcome.pruned
                );
            }
            Ok(None) => {}
            Err(e) => warn!("Scheduled curation failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use tempfile::TempDir;

    fn service() -> (TempDir, Arc<CurationService>) {
        let dir = tempfile::tempdir().unwrap();
        let store = FeedbackStore::with_dir(dir.path().to_path_buf()).unwrap();
        (dir, Arc::new(CurationService::new(Arc::new(store))))
    }

    #[test]
    fn test_rejects_empty_prompt() {
        let (_dir, service) = service();
        let record = FeedbackRecord::new("   ", Category::General, Category::Coding, Utc::now());
        let err = service.submit_feedback(record).unwrap_err();
        assert!(matches!(err, CurationError::InvalidRecord(_)));
        assert_eq!(service.stats().unwrap().total_feedback, 0);
    }

    #[test]
    fn test_submit_then_tick_builds_golden_set() {
        let (_dir, service) = service();
        for i in 0..3 {
            let record = FeedbackRecord::new(
                format!("please review my pull request number {}", i),
                Category::General,
                Category::Coding,
                Utc::now(),
            );
            service.submit_feedback(record).unwrap();
        }

        let outcome = service.on_scheduler_tick().unwrap().unwrap();
        assert_eq!(outcome.population, 3);
        assert_eq!(service.golden_set().unwrap().len(), 3);
    }

    #[test]
    fn test_guard_skips_reentrant_run() {
        let (_dir, service) = service();
        let _held = service.curation_guard.lock().unwrap();
        let result = service.run_curation(Utc::now()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_curation_runs_after_poisoned_guard() {
        let (_dir, service) = service();
        service
            .submit_feedback(FeedbackRecord::new(
                "a prompt that outlives a crashed cycle",
                Category::General,
                Category::Coding,
                Utc::now(),
            ))
            .unwrap();

        // Poison the guard by panicking while holding it
        let poisoner = Arc::clone(&service);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.curation_guard.lock().unwrap();
            panic!("simulated curation crash");
        })
        .join();

        let outcome = service.run_curation(Utc::now()).unwrap();
        assert!(outcome.is_some());
        assert_eq!(service.golden_set().unwrap().len(), 1);
    }

    #[test]
    fn test_tick_on_empty_store_is_noop() {
        let (_dir, service) = service();
        let outcome = service.on_scheduler_tick().unwrap().unwrap();
        assert_eq!(outcome.population, 0);
        assert!(service.golden_set().unwrap().is_empty());
    }
}
