use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 某個網址最後一次觀察到的文字
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub url: String,
    pub text: String,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
            saved_at: Some(Utc::now()),
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Occurrence counts per keyword category, in category order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordCounts {
    entries: Vec<(String, usize)>,
}

impl KeywordCounts {
    pub fn new(entries: Vec<(String, usize)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, category: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSpan {
    pub old: String,
    pub new: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    pub significant: bool,
    pub old_word_count: usize,
    pub new_word_count: usize,
    pub spans: Vec<ChangeSpan>,
    pub old_keywords: KeywordCounts,
    pub new_keywords: KeywordCounts,
}

impl ChangeReport {
    pub fn word_delta(&self) -> usize {
        self.old_word_count.abs_diff(self.new_word_count)
    }
}

/// 單一網址在一次監控中的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteOutcome {
    /// 第一次看到，只儲存不通知
    Baseline,
    Unchanged,
    Changed,
    Unreachable { status_code: u16 },
    Failed { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub outcomes: Vec<(String, SiteOutcome)>,
}

impl RunSummary {
    pub fn record(&mut self, url: &str, outcome: SiteOutcome) {
        self.outcomes.push((url.to_string(), outcome));
    }

    pub fn count(&self, predicate: impl Fn(&SiteOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| predicate(o)).count()
    }

    pub fn changed(&self) -> usize {
        self.count(|o| matches!(o, SiteOutcome::Changed))
    }

    pub fn unreachable(&self) -> usize {
        self.count(|o| matches!(o, SiteOutcome::Unreachable { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SiteOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn outcome_for(&self, url: &str) -> Option<&SiteOutcome> {
        self.outcomes
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, outcome)| outcome)
    }
}
