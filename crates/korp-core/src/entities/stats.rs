use serde::{Deserialize, Serialize};

use crate::enums::Label;

/// A `(word, count)` pair from a frequency list. Serialized as a two-element
/// JSON array, the shape the backend emits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "(String, u64)", into = "(String, u64)")]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

impl From<(String, u64)> for WordCount {
    fn from((word, count): (String, u64)) -> Self {
        Self { word, count }
    }
}

impl From<WordCount> for (String, u64) {
    fn from(value: WordCount) -> Self {
        (value.word, value.count)
    }
}

/// Word and character totals for one label.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelStats {
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub char_count: u64,
    #[serde(default)]
    pub frequent_words: Vec<WordCount>,
}

/// Aggregate corpus statistics as returned by `/get_stats`.
///
/// Replaced wholesale on every fetch; never merged with an older snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total_words: u64,
    #[serde(default)]
    pub total_chars: u64,
    #[serde(default)]
    pub total_sentences: u64,
    #[serde(default)]
    pub human: LabelStats,
    #[serde(default, rename = "ki")]
    pub ai: LabelStats,
    #[serde(default)]
    pub total_frequent_words: Vec<WordCount>,
}

impl StatsSnapshot {
    #[must_use]
    pub const fn for_label(&self, label: Label) -> &LabelStats {
        match label {
            Label::Human => &self.human,
            Label::Ai => &self.ai,
        }
    }

    /// First `n` entries of a frequency list; `None` selects the combined list.
    #[must_use]
    pub fn top_words(&self, label: Option<Label>, n: usize) -> &[WordCount] {
        let list = match label {
            Some(label) => &self.for_label(label).frequent_words,
            None => &self.total_frequent_words,
        };
        &list[..n.min(list.len())]
    }
}

/// Per-label integer totals keyed the way `/get_data_status` reports them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountsByLabel {
    #[serde(default, rename = "menschlich")]
    pub human: u64,
    #[serde(default, rename = "ki")]
    pub ai: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct AveragesByLabel {
    #[serde(default, rename = "menschlich")]
    pub human: f64,
    #[serde(default, rename = "ki")]
    pub ai: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordsByLabel {
    #[serde(default, rename = "menschlich")]
    pub human: Vec<WordCount>,
    #[serde(default, rename = "ki")]
    pub ai: Vec<WordCount>,
    #[serde(default)]
    pub total: Vec<WordCount>,
}

/// Optional summary the backend may attach to a corpus listing.
///
/// Every section is optional; older backends send only `word_counts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusSummary {
    #[serde(default)]
    pub word_counts: Option<CountsByLabel>,
    #[serde(default)]
    pub char_counts: Option<CountsByLabel>,
    #[serde(default)]
    pub avg_lengths: Option<AveragesByLabel>,
    #[serde(default)]
    pub frequent_words: Option<WordsByLabel>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STATS_FIXTURE: &str = r#"{
        "total_words": 9,
        "total_chars": 38,
        "total_sentences": 3,
        "human": {"word_count": 4, "char_count": 15, "frequent_words": [["the", 2], ["sky", 1]]},
        "ki": {"word_count": 5, "char_count": 23, "frequent_words": [["model", 3]]},
        "total_frequent_words": [["model", 3], ["the", 2], ["sky", 1]]
    }"#;

    #[test]
    fn parses_stats_reply() {
        let snapshot: StatsSnapshot = serde_json::from_str(STATS_FIXTURE).unwrap();
        assert_eq!(snapshot.total_words, 9);
        assert_eq!(snapshot.for_label(Label::Ai).word_count, 5);
        assert_eq!(
            snapshot.human.frequent_words[0],
            WordCount {
                word: "the".into(),
                count: 2,
            }
        );
    }

    #[test]
    fn top_words_truncates_and_selects_list() {
        let snapshot: StatsSnapshot = serde_json::from_str(STATS_FIXTURE).unwrap();
        assert_eq!(snapshot.top_words(None, 2).len(), 2);
        assert_eq!(snapshot.top_words(Some(Label::Ai), 10).len(), 1);
        assert_eq!(snapshot.top_words(Some(Label::Human), 0).len(), 0);
    }

    #[test]
    fn empty_corpus_reply_is_all_zero() {
        let snapshot: StatsSnapshot = serde_json::from_str(
            r#"{"total_words":0,"total_chars":0,"total_sentences":0,
                "human":{"word_count":0,"char_count":0,"frequent_words":[]},
                "ki":{"word_count":0,"char_count":0,"frequent_words":[]},
                "total_frequent_words":[]}"#,
        )
        .unwrap();
        assert_eq!(snapshot, StatsSnapshot::default());
    }

    #[test]
    fn word_count_serializes_as_pair() {
        let json = serde_json::to_string(&WordCount {
            word: "ki".into(),
            count: 7,
        })
        .unwrap();
        assert_eq!(json, r#"["ki",7]"#);
    }

    #[test]
    fn status_summary_tolerates_partial_sections() {
        let summary: StatusSummary =
            serde_json::from_str(r#"{"word_counts":{"menschlich":4,"ki":5,"total":9}}"#).unwrap();
        assert_eq!(
            summary.word_counts,
            Some(CountsByLabel {
                human: 4,
                ai: 5,
                total: 9,
            })
        );
        assert!(summary.avg_lengths.is_none());
    }
}
