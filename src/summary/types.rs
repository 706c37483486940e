// src/summary/types.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved key of the merged summary in [`SummaryData`].
pub const OVERALL_KEY: &str = "overall";
/// Reserved key of the per-summary statistics block.
pub const STATISTICS_KEY: &str = "statistics";
/// Reserved key of the row count inside the statistics block.
pub const PARTICIPANTS_KEY: &str = "participants";

/// Mean and sample standard deviation of a score column, plus the raw
/// moments needed to merge it with other groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    /// Rounded to 2 dp; `None` when the column had no values.
    pub mean: Option<f64>,
    /// Rounded to 2 dp; `None` with fewer than two values.
    pub std_dev: Option<f64>,
    pub summation: f64,
    pub sum_of_squares: f64,
    pub count: u64,
}

/// Result of one declared aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Aggregate {
    Score(ScoreSummary),
    /// Label → count, in codebook order.
    Counts(IndexMap<String, u64>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub participants: u64,
    /// Median name → median, one per bracket that asks for it.
    #[serde(flatten)]
    pub medians: IndexMap<String, f64>,
}

/// Summary of one group, or of all groups merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupSummary {
    #[serde(flatten)]
    pub aggregates: IndexMap<String, Aggregate>,
    pub statistics: Statistics,
}

impl GroupSummary {
    pub fn counts(&self, name: &str) -> Option<&IndexMap<String, u64>> {
        match self.aggregates.get(name)? {
            Aggregate::Counts(c) => Some(c),
            Aggregate::Score(_) => None,
        }
    }

    pub fn score(&self, name: &str) -> Option<&ScoreSummary> {
        match self.aggregates.get(name)? {
            Aggregate::Score(s) => Some(s),
            Aggregate::Counts(_) => None,
        }
    }

    pub fn median(&self, name: &str) -> Option<f64> {
        self.statistics.medians.get(name).copied()
    }

    pub fn participants(&self) -> u64 {
        self.statistics.participants
    }
}

/// The overall summary has exactly the same shape as a group summary.
pub type OverallSummary = GroupSummary;

/// Summaries keyed by group label, with the merged summary under `"overall"`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryData(pub IndexMap<String, GroupSummary>);

impl SummaryData {
    pub fn get(&self, label: &str) -> Option<&GroupSummary> {
        self.0.get(label)
    }

    pub fn overall(&self) -> Option<&OverallSummary> {
        self.0.get(OVERALL_KEY)
    }

    /// Per-group summaries in codebook order, without the overall entry.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &GroupSummary)> {
        self.0
            .iter()
            .filter(|(k, _)| k.as_str() != OVERALL_KEY)
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
