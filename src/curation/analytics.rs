//! Read-only analytics over the feedback population
//!
//! Derives error-pattern frequencies, time-bucketed counts, and a quality
//! distribution from the stored records, plus a serializable export snapshot.
//! Never mutates store state; quality scores are recomputed on demand.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::scorer;
use super::store::FeedbackStore;
use crate::error::Result;
use crate::types::{FeedbackRecord, GoldenSetEntry};

/// Records scoring above this count as high quality
pub const HIGH_QUALITY_THRESHOLD: f64 = 60.0;

/// Records scoring below this count as low quality
pub const LOW_QUALITY_THRESHOLD: f64 = 30.0;

/// One `incorrect->correct` pattern and its occurrence count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternCount {
    pub pattern: String,
    pub count: usize,
}

/// Summary statistics over the feedback population
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackStats {
    pub total_feedback: usize,
    /// Error patterns sorted by count descending
    pub pattern_counts: Vec<PatternCount>,
    pub last_24_hours: usize,
    pub last_7_days: usize,
    pub last_30_days: usize,
    pub average_quality: f64,
    pub high_quality: usize,
    pub low_quality: usize,
}

/// Full snapshot for external inspection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub exported_at: DateTime<Utc>,
    pub summary: FeedbackStats,
    pub feedback: Vec<FeedbackRecord>,
    pub golden_set: Vec<GoldenSetEntry>,
}

/// Derives summary views from the store; read-only
pub struct AnalyticsReporter {
    store: Arc<FeedbackStore>,
}

impl AnalyticsReporter {
    pub fn new(store: Arc<FeedbackStore>) -> Self {
        Self { store }
    }

    /// Summary statistics at the given instant
    pub fn stats(&self, now: DateTime<Utc>) -> Result<FeedbackStats> {
        let records = self.store.load_all()?;
        Ok(summarize(&records, now))
    }

    /// Snapshot combining raw feedback, the current golden set, and summary
    /// counts; timestamps serialize as ISO-8601
    pub fn export(&self, now: DateTime<Utc>) -> Result<ExportSnapshot> {
        let records = self.store.load_all()?;
        let golden_set = self.store.load_golden_set()?;
        let summary = summarize(&records, now);
        Ok(ExportSnapshot {
            exported_at: now,
            summary,
            feedback: records,
            golden_set,
        })
    }
}

fn summarize(records: &[FeedbackRecord], now: DateTime<Utc>) -> FeedbackStats {
    let frequency = scorer::pattern_frequency(records);

    let mut pattern_counts: Vec<PatternCount> = frequency
        .iter()
        .map(|(pattern, count)| PatternCount {
            pattern: pattern.clone(),
            count: *count,
        })
        .collect();
    pattern_counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.pattern.cmp(&b.pattern)));

    let day_ago = now - Duration::hours(24);
    let week_ago = now - Duration::days(7);
    let month_ago = now - Duration::days(30);
    let last_24_hours = records.iter().filter(|r| r.timestamp >= day_ago).count();
    let last_7_days = records.iter().filter(|r| r.timestamp >= week_ago).count();
    let last_30_days = records.iter().filter(|r| r.timestamp >= month_ago).count();

    let scores: Vec<f64> = records
        .iter()
        .map(|r| scorer::score_record(r, &frequency, now))
        .collect();
    let average_quality = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };
    let high_quality = scores.iter().filter(|s| **s > HIGH_QUALITY_THRESHOLD).count();
    let low_quality = scores.iter().filter(|s| **s < LOW_QUALITY_THRESHOLD).count();

    FeedbackStats {
        total_feedback: records.len(),
        pattern_counts,
        last_24_hours,
        last_7_days,
        last_30_days,
        average_quality,
        high_quality,
        low_quality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use tempfile::TempDir;

    fn store() -> (TempDir, Arc<FeedbackStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = FeedbackStore::with_dir(dir.path().to_path_buf()).unwrap();
        (dir, Arc::new(store))
    }

    fn record(
        prompt: &str,
        incorrect: Category,
        correct: Category,
        age_days: i64,
        now: DateTime<Utc>,
    ) -> FeedbackRecord {
        let mut r = FeedbackRecord::new(prompt, incorrect, correct, now - Duration::days(age_days));
        r.confidence = 0.5;
        r
    }

    #[test]
    fn test_stats_on_empty_store() {
        let (_dir, store) = store();
        let stats = AnalyticsReporter::new(store).stats(Utc::now()).unwrap();
        assert_eq!(stats.total_feedback, 0);
        assert_eq!(stats.average_quality, 0.0);
        assert!(stats.pattern_counts.is_empty());
    }

    #[test]
    fn test_pattern_counts_sorted_descending() {
        let (_dir, store) = store();
        let now = Utc::now();
        let mut records = Vec::new();
        for i in 0..3 {
            records.push(record(
                &format!("repeat {}", i),
                Category::General,
                Category::Coding,
                0,
                now,
            ));
        }
        records.push(record(
            "single",
            Category::Coding,
            Category::General,
            0,
            now,
        ));
        store.replace_all(&records).unwrap();

        let stats = AnalyticsReporter::new(store).stats(now).unwrap();
        assert_eq!(stats.pattern_counts[0].pattern, "general->coding");
        assert_eq!(stats.pattern_counts[0].count, 3);
        assert_eq!(stats.pattern_counts[1].count, 1);
    }

    #[test]
    fn test_time_buckets() {
        let (_dir, store) = store();
        let now = Utc::now();
        let records = vec![
            record("today", Category::General, Category::Coding, 0, now),
            record("this week", Category::General, Category::Coding, 3, now),
            record("this month", Category::General, Category::Coding, 20, now),
            record("ancient", Category::General, Category::Coding, 90, now),
        ];
        store.replace_all(&records).unwrap();

        let stats = AnalyticsReporter::new(store).stats(now).unwrap();
        assert_eq!(stats.total_feedback, 4);
        assert_eq!(stats.last_24_hours, 1);
        assert_eq!(stats.last_7_days, 2);
        assert_eq!(stats.last_30_days, 3);
    }

    #[test]
    fn test_quality_distribution_thresholds() {
        let (_dir, store) = store();
        let now = Utc::now();
        // Fresh, rated, confident, optimal length: 30 + 20 + 20 + 15 = 85
        let mut high = record(
            &"h".repeat(100),
            Category::General,
            Category::Coding,
            0,
            now,
        );
        high.confidence = 1.0;
        high.user_quality_score = Some(100);
        // Stale and weak: 0 + 10 + 2 + 5 = 17
        let mut low = record("meh", Category::Coding, Category::General, 45, now);
        low.confidence = 0.1;
        store.replace_all(&[high, low]).unwrap();

        let stats = AnalyticsReporter::new(store).stats(now).unwrap();
        assert_eq!(stats.high_quality, 1);
        assert_eq!(stats.low_quality, 1);
        assert!((stats.average_quality - 51.0).abs() < 0.01);
    }

    #[test]
    fn test_export_matches_store_and_does_not_mutate() {
        let (_dir, store) = store();
        let now = Utc::now();
        let records = vec![
            record("alpha entry text", Category::General, Category::Coding, 1, now),
            record("beta entry text", Category::Coding, Category::General, 2, now),
        ];
        store.replace_all(&records).unwrap();

        let reporter = AnalyticsReporter::new(store.clone());
        let snapshot = reporter.export(now).unwrap();

        assert_eq!(snapshot.summary.total_feedback, store.load_all().unwrap().len());
        assert_eq!(snapshot.feedback.len(), 2);
        assert!(snapshot.golden_set.is_empty());

        // Export twice: store contents unchanged
        let again = reporter.export(now).unwrap();
        assert_eq!(again.feedback.len(), 2);
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_export_timestamps_are_iso8601() {
        let (_dir, store) = store();
        let now = Utc::now();
        store
            .replace_all(&[record("gamma", Category::General, Category::Coding, 0, now)])
            .unwrap();

        let snapshot = AnalyticsReporter::new(store).export(now).unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();
        let ts = json["feedback"][0]["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }
}
