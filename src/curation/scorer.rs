//! Quality scoring for feedback records
//!
//! Computes a composite quality score from five additive components -
//! recency, external rating, classifier confidence, prompt length, and
//! error-pattern frequency - capped at 30/20/20/15/15 points respectively.
//! Scoring is pure and deterministic given the population's pattern
//! frequency map and an explicit `now`, so curation stays idempotent and
//! testable.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::types::FeedbackRecord;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Recency component cap, reached by a record scored at its creation instant
const RECENCY_MAX: f64 = 30.0;

/// Flat rating contribution when no external rating was supplied
const RATING_DEFAULT: f64 = 10.0;

/// Frequency component cap; systemic error patterns saturate here
const FREQUENCY_MAX: f64 = 15.0;

/// Count occurrences of each `incorrect->correct` pattern in the population
pub fn pattern_frequency(records: &[FeedbackRecord]) -> HashMap<String, usize> {
    let mut frequency: HashMap<String, usize> = HashMap::new();
    for record in records {
        *frequency.entry(record.pattern_key()).or_insert(0) += 1;
    }
    frequency
}

/// Score one record against the full population's pattern frequencies
pub fn score_record(
    record: &FeedbackRecord,
    pattern_frequency: &HashMap<String, usize>,
    now: DateTime<Utc>,
) -> f64 {
    let frequency = pattern_frequency
        .get(&record.pattern_key())
        .copied()
        .unwrap_or(1);

    recency_component(record.timestamp, now)
        + rating_component(record.user_quality_score)
        + confidence_component(record.confidence)
        + length_component(&record.prompt)
        + frequency_component(frequency)
}

/// Up to 30 points, decaying linearly to 0 over 30 days
fn recency_component(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_days = (now - timestamp).num_milliseconds() as f64 / MS_PER_DAY;
    (RECENCY_MAX - age_days).clamp(0.0, RECENCY_MAX)
}

/// Up to 20 points from an external rater; flat 10 when absent
fn rating_component(user_quality_score: Option<u8>) -> f64 {
    match user_quality_score {
        Some(score) => (f64::from(score) / 100.0) * 20.0,
        None => RATING_DEFAULT,
    }
}

/// Up to 20 points proportional to classifier confidence
fn confidence_component(confidence: f64) -> f64 {
    (confidence * 20.0).clamp(0.0, 20.0)
}

/// 15 points in the optimal band, 10 acceptable, 5 otherwise
///
/// Rewards neither trivially short nor excessively long prompts.
fn length_component(prompt: &str) -> f64 {
    let len = prompt.chars().count();
    if (50..=200).contains(&len) {
        15.0
    } else if (20..=500).contains(&len) {
        10.0
    } else {
        5.0
    }
}

/// Up to 15 points, `ln(freq) * 5`, so recurring misclassification patterns
/// outscore one-offs
fn frequency_component(frequency: usize) -> f64 {
    let frequency = frequency.max(1);
    ((frequency as f64).ln() * 5.0).min(FREQUENCY_MAX)
}
