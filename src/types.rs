//! Shared types used across modules
//!
//! Core record shapes for feedback submissions and the curated golden set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification category for a prompt
///
/// A closed taxonomy baked into the curator. The variant order here is the
/// stratum order used during sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    GrammarSpelling,
    ImageGeneration,
    Coding,
    ResearchAnalysis,
    ContentCreation,
    General,
}

impl Category {
    /// All categories in stratum order
    pub const ALL: [Category; 6] = [
        Category::GrammarSpelling,
        Category::ImageGeneration,
        Category::Coding,
        Category::ResearchAnalysis,
        Category::ContentCreation,
        Category::General,
    ];

    /// Wire label for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::GrammarSpelling => "grammar_spelling",
            Category::ImageGeneration => "image_generation",
            Category::Coding => "coding",
            Category::ResearchAnalysis => "research_analysis",
            Category::ContentCreation => "content_creation",
            Category::General => "general",
        }
    }

    /// Parse from a wire label
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "grammar_spelling" => Some(Category::GrammarSpelling),
            "image_generation" => Some(Category::ImageGeneration),
            "coding" => Some(Category::Coding),
            "research_analysis" => Some(Category::ResearchAnalysis),
            "content_creation" => Some(Category::ContentCreation),
            "general" => Some(Category::General),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One user-asserted correction of a prior category assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Original user text
    pub prompt: String,
    /// Category the classifier previously assigned
    pub incorrect_category: Category,
    /// Category the user asserts is correct
    pub correct_category: Category,
    /// Creation instant
    pub timestamp: DateTime<Utc>,
    /// Classifier confidence at the time of the original assignment
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Optional external rating (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_quality_score: Option<u8>,
    /// Provenance tag
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_confidence() -> f64 {
    0.5
}

fn default_source() -> String {
    "user_feedback".to_string()
}

impl FeedbackRecord {
    /// Create a record with default confidence and source
    pub fn new(
        prompt: impl Into<String>,
        incorrect_category: Category,
        correct_category: Category,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            incorrect_category,
            correct_category,
            timestamp,
            confidence: default_confidence(),
            user_quality_score: None,
            source: default_source(),
        }
    }

    /// Error-pattern key, e.g. `coding->general`
    pub fn pattern_key(&self) -> String {
        format!("{}->{}", self.incorrect_category, self.correct_category)
    }
}

/// A feedback record plus its derived quality score
///
/// Derived, never persisted as the source of truth - recomputed from the raw
/// record on every curation cycle.
#[derive(Debug, Clone)]
pub struct ScoredFeedback {
    pub record: FeedbackRecord,
    pub quality_score: f64,
}

/// One curated labeled example
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenSetEntry {
    pub prompt: String,
    pub correct_category: Category,
    /// Always "high" for entries produced by this pipeline
    pub confidence_label: String,
    /// Human-readable provenance, e.g. "Corrected from coding to general"
    pub rationale: String,
    pub quality_score: f64,
    pub source: String,
}

impl GoldenSetEntry {
    /// Build an entry from a scored source record
    pub fn from_scored(scored: &ScoredFeedback) -> Self {
        let record = &scored.record;
        Self {
            prompt: record.prompt.clone(),
            correct_category: record.correct_category,
            confidence_label: "high".to_string(),
            rationale: format!(
                "Corrected from {} to {}",
                record.incorrect_category, record.correct_category
            ),
            quality_score: scored.quality_score,
            source: record.source.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("poetry"), None);
    }

    #[test]
    fn test_category_serde_labels() {
        let json = serde_json::to_string(&Category::ResearchAnalysis).unwrap();
        assert_eq!(json, "\"research_analysis\"");
        let parsed: Category = serde_json::from_str("\"grammar_spelling\"").unwrap();
        assert_eq!(parsed, Category::GrammarSpelling);
    }

    #[test]
    fn test_record_defaults_on_deserialize() {
        let json = r#"{
            "prompt": "fix my email",
            "incorrect_category": "coding",
            "correct_category": "grammar_spelling",
            "timestamp": "2026-08-01T12:00:00Z"
        }"#;
        let record: FeedbackRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.confidence, 0.5);
        assert_eq!(record.user_quality_score, None);
        assert_eq!(record.source, "user_feedback");
        assert_eq!(record.pattern_key(), "coding->grammar_spelling");
    }

    #[test]
    fn test_golden_entry_rationale() {
        let record = FeedbackRecord::new(
            "draw a cat",
            Category::General,
            Category::ImageGeneration,
            Utc::now(),
        );
        let entry = GoldenSetEntry::from_scored(&ScoredFeedback {
            record,
            quality_score: 55.0,
        });
        assert_eq!(entry.rationale, "Corrected from general to image_generation");
        assert_eq!(entry.confidence_label, "high");
    }
}
