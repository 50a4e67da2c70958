use crate::core::diff::{opcodes, OpTag};
use crate::core::keywords::{count_keywords, default_categories, KeywordCategory};
use crate::domain::model::{ChangeReport, ChangeSpan};
use serde::{Deserialize, Serialize};

pub const DEFAULT_THRESHOLD: usize = 3;

/// How edit regions are turned into `ChangeSpan`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanGranularity {
    /// Every removed and inserted word folded into one old/new pair.
    #[default]
    Aggregated,
    /// One span per contiguous edit region.
    PerRegion,
}

/// Pure comparison of two text snapshots.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    threshold: usize,
    granularity: SpanGranularity,
    categories: Vec<KeywordCategory>,
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, SpanGranularity::default(), default_categories())
    }
}

impl ChangeDetector {
    pub fn new(
        threshold: usize,
        granularity: SpanGranularity,
        categories: Vec<KeywordCategory>,
    ) -> Self {
        Self {
            threshold,
            granularity,
            categories,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn categories(&self) -> &[KeywordCategory] {
        &self.categories
    }

    /// 字數差距達到門檻即視為重大變更
    pub fn is_significant(&self, old_word_count: usize, new_word_count: usize) -> bool {
        old_word_count.abs_diff(new_word_count) >= self.threshold
    }

    pub fn evaluate(&self, old_text: &str, new_text: &str) -> ChangeReport {
        let old_words: Vec<&str> = old_text.split_whitespace().collect();
        let new_words: Vec<&str> = new_text.split_whitespace().collect();

        let significant = self.is_significant(old_words.len(), new_words.len());
        let spans = if significant {
            self.changed_spans(&old_words, &new_words)
        } else {
            Vec::new()
        };

        ChangeReport {
            significant,
            old_word_count: old_words.len(),
            new_word_count: new_words.len(),
            spans,
            old_keywords: count_keywords(old_text, &self.categories),
            new_keywords: count_keywords(new_text, &self.categories),
        }
    }

    fn changed_spans(&self, old_words: &[&str], new_words: &[&str]) -> Vec<ChangeSpan> {
        let regions: Vec<ChangeSpan> = opcodes(old_words, new_words)
            .into_iter()
            .filter(|op| op.tag != OpTag::Equal)
            .map(|op| ChangeSpan {
                old: old_words[op.old].join(" "),
                new: new_words[op.new].join(" "),
            })
            .collect();

        match self.granularity {
            SpanGranularity::PerRegion => regions,
            SpanGranularity::Aggregated if regions.is_empty() => regions,
            SpanGranularity::Aggregated => vec![ChangeSpan {
                old: join_non_empty(regions.iter().map(|span| span.old.as_str())),
                new: join_non_empty(regions.iter().map(|span| span.new.as_str())),
            }],
        }
    }
}

fn join_non_empty<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
