use crate::domain::model::KeywordCounts;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCategory {
    pub name: String,
    pub patterns: Vec<String>,
}

impl KeywordCategory {
    pub fn new(name: &str, patterns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            patterns: patterns.iter().map(|p| p.to_lowercase()).collect(),
        }
    }
}

/// 預設的期刊投稿狀態關鍵字
pub fn default_categories() -> Vec<KeywordCategory> {
    vec![
        KeywordCategory::new(
            "revise_resubmit",
            &["and resubmit", "r&r", "& resubmit", "&resubmit"],
        ),
        KeywordCategory::new("forthcoming", &["forthcoming", "accepted"]),
    ]
}

/// Counts non-overlapping, case-insensitive substring hits of every pattern
/// in each category. No word-boundary matching.
pub fn count_keywords(text: &str, categories: &[KeywordCategory]) -> KeywordCounts {
    let lowered = text.to_lowercase();
    let entries = categories
        .iter()
        .map(|category| {
            let total = category
                .patterns
                .iter()
                .filter(|pattern| !pattern.is_empty())
                .map(|pattern| lowered.matches(pattern.to_lowercase().as_str()).count())
                .sum();
            (category.name.clone(), total)
        })
        .collect();
    KeywordCounts::new(entries)
}
