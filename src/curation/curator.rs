//! Golden set curation - scoring, stratified sampling, and retention pruning
//!
//! One curation cycle scores the full feedback population, samples a diverse
//! high-quality golden set in two passes, replaces the persisted set
//! wholesale, then prunes the raw records by age and quality.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::scorer;
use super::store::{FeedbackStore, MAX_RECORDS};
use crate::error::Result;
use crate::types::{Category, FeedbackRecord, GoldenSetEntry, ScoredFeedback};

/// Target golden set size
pub const GOLDEN_SET_TARGET: usize = 50;

/// Pass-1 floor: highest-scoring records taken per category regardless of
/// global rank, so rare categories are never starved by a global top-K
pub const MIN_PER_CATEGORY: usize = 5;

/// Pass-2 ceiling: one dominant category cannot crowd out the budget
pub const MAX_PER_CATEGORY: usize = 10;

/// Records newer than this survive pruning unconditionally
pub const RETENTION_WINDOW_DAYS: i64 = 14;

/// Older records survive pruning only above this quality score
pub const RETENTION_QUALITY_FLOOR: f64 = 40.0;

/// Summary of one curation cycle
#[derive(Debug, Clone, Default)]
pub struct CurationOutcome {
    /// Records in the population at the start of the cycle
    pub population: usize,
    /// Entries in the freshly curated golden set
    pub golden_set_size: usize,
    /// Records surviving the retention pass
    pub retained: usize,
    /// Records dropped by the retention pass
    pub pruned: usize,
}

/// Orchestrates scoring, sampling, and pruning against the store
pub struct GoldenSetCurator {
    store: Arc<FeedbackStore>,
}

impl GoldenSetCurator {
    pub fn new(store: Arc<FeedbackStore>) -> Self {
        Self { store }
    }

    /// Run one full curation cycle at the given instant
    ///
    /// An empty population is a no-op: nothing persisted is touched. Any
    /// persistence failure aborts the remaining steps of the cycle; each
    /// store write is atomic, so prior state stays intact.
    pub fn curate(&self, now: DateTime<Utc>) -> Result<CurationOutcome> {
        let records = self.store.load_all()?;
        if records.is_empty() {
            debug!("No feedback recorded, skipping curation cycle");
            return Ok(CurationOutcome::default());
        }

        let frequency = scorer::pattern_frequency(&records);
        let mut scored: Vec<ScoredFeedback> = records
            .iter()
            .map(|record| ScoredFeedback {
                quality_score: scorer::score_record(record, &frequency, now),
                record: record.clone(),
            })
            .collect();
        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| {
            b.quality_score
                .partial_cmp(&a.quality_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let entries = sample_golden_set(&scored);
        self.store.save_golden_set(&entries)?;

        let (retained, pruned) = self.prune(&scored, now)?;

        info!(
            "Curation cycle complete: {} records scored, golden set {}, pruned {}",
            scored.len(),
            entries.len(),
            pruned
        );

        Ok(CurationOutcome {
            population: scored.len(),
            golden_set_size: entries.len(),
            retained,
            pruned,
        })
    }

    /// Retention pass: keep recent or high-quality records, newest-first cap
    fn prune(&self, scored: &[ScoredFeedback], now: DateTime<Utc>) -> Result<(usize, usize)> {
        let total = scored.len();
        let cutoff = now - Duration::days(RETENTION_WINDOW_DAYS);

        let mut kept: Vec<FeedbackRecord> = scored
            .iter()
            .filter(|sf| sf.record.timestamp >= cutoff || sf.quality_score > RETENTION_QUALITY_FLOOR)
            .map(|sf| sf.record.clone())
            .collect();

        kept.sort_by_key(|record| record.timestamp);
        if kept.len() > MAX_RECORDS {
            let excess = kept.len() - MAX_RECORDS;
            kept.drain(..excess);
        }

        let pruned = total - kept.len();
        // Skip the write when nothing was dropped
        if pruned > 0 {
            self.store.replace_all(&kept)?;
            debug!("Retention pass pruned {} of {} records", pruned, total);
        }
        Ok((kept.len(), pruned))
    }
}

/// Two-pass stratified sampling over a population sorted by score descending
///
/// Pass 1 guarantees every category a floor of representation even when its
/// best records rank poorly overall; pass 2 fills the remaining budget in
/// global score order subject to the per-category ceiling. A prompt
/// contributes at most one entry, its highest-scoring occurrence.
fn sample_golden_set(scored: &[ScoredFeedback]) -> Vec<GoldenSetEntry> {
    let mut entries = Vec::new();
    let mut used_prompts: HashSet<&str> = HashSet::new();
    let mut per_category: HashMap<Category, usize> = HashMap::new();

    for category in Category::ALL {
        let mut taken = 0;
        for sf in scored {
            if taken >= MIN_PER_CATEGORY {
                break;
            }
            if sf.record.correct_category != category
                || used_prompts.contains(sf.record.prompt.as_str())
            {
                continue;
            }
            entries.push(GoldenSetEntry::from_scored(sf));
            used_prompts.insert(sf.record.prompt.as_str());
            *per_category.entry(category).or_insert(0) += 1;
            taken += 1;
        }
    }

    for sf in scored {
        if entries.len() >= GOLDEN_SET_TARGET {
            break;
        }
        if used_prompts.contains(sf.record.prompt.as_str()) {
            continue;
        }
        let count = per_category.entry(sf.record.correct_category).or_insert(0);
        if *count >= MAX_PER_CATEGORY {
            continue;
        }
        entries.push(GoldenSetEntry::from_scored(sf));
        used_prompts.insert(sf.record.prompt.as_str());
        *count += 1;
    }

    entries
}
