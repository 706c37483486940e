// src/summary/group.rs
use indexmap::IndexMap;

use super::index::{PlannedAggregate, SummaryPlan};
use super::median::median;
use super::moments::Moments;
use super::tally::tally;
use super::types::{Aggregate, GroupSummary, Statistics};
use crate::dataset::cell;

/// Raw bracket values kept per median name so medians can be re-selected
/// over the union of groups. Never serialised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetainedValues(IndexMap<String, Vec<f64>>);

impl RetainedValues {
    pub(crate) fn get(&self, median_name: &str) -> &[f64] {
        self.0.get(median_name).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Output of summarising one group: the public summary plus what the merge needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOutcome {
    pub summary: GroupSummary,
    pub(crate) retained: RetainedValues,
}

/// Summarise the rows of a single group.
pub fn summarise_group(plan: &SummaryPlan<'_>, rows: &[&[String]]) -> GroupOutcome {
    let column = |idx: usize| rows.iter().map(move |r| cell(r, idx));

    let mut aggregates = IndexMap::with_capacity(plan.aggregates.len());
    let mut medians = IndexMap::new();
    let mut retained = IndexMap::new();

    for planned in &plan.aggregates {
        let result = match planned {
            PlannedAggregate::Categorical { labels, idx, .. } => {
                Aggregate::Counts(tally(column(*idx), labels))
            }
            PlannedAggregate::Bracket {
                brackets,
                median_name,
                idx,
                ..
            } => match median_name {
                Some(median_name) => {
                    let mut nums = Vec::with_capacity(rows.len());
                    let counts = brackets.categorise(column(*idx), Some(&mut nums));
                    // median() reorders in place; keep the original for merging
                    medians.insert(median_name.to_string(), median(&mut nums.clone()));
                    retained.insert(median_name.to_string(), nums);
                    Aggregate::Counts(counts)
                }
                None => Aggregate::Counts(brackets.categorise(column(*idx), None)),
            },
            PlannedAggregate::Score { idx, .. } => {
                Aggregate::Score(Moments::accumulate(column(*idx)).finish())
            }
        };
        aggregates.insert(planned.name().to_string(), result);
    }

    GroupOutcome {
        summary: GroupSummary {
            aggregates,
            statistics: Statistics {
                participants: rows.len() as u64,
                medians,
            },
        },
        retained: RetainedValues(retained),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebook::Codebook;
    use crate::dataset::RawDataset;

    #[test]
    fn summarises_every_planned_aggregate() -> anyhow::Result<()> {
        let cb = Codebook::from_yaml_str(
            r#"
name: tiny
group_by: {column: g, labels: {1: a}}
filter: {column: s, include: 1}
columns:
  - {kind: categorical, column: smoker, name: isSmoking, labels: {0: "no", 1: "yes"}}
  - {kind: optional_categorical, column: dialysis, name: underDialysis, labels: {0: "no", 1: "yes"}}
  - {kind: bracket, column: income, name: income, median_name: medianIncome, thresholds: [[0, "low"], [1500, "mid"], [2000, "high"]]}
  - {kind: bracket, column: age, name: age, thresholds: [[0, "young"], [60, "old"]]}
  - {kind: score, column: dom1, name: physical}
"#,
        )?;
        let ds = RawDataset::from_strs(
            &["g", "s", "smoker", "income", "age", "dom1"],
            &[
                &["1", "1", "0", "1499", "30", "1"],
                &["1", "1", "1", "500", "61", "2"],
                &["1", "1", "", "", "", "3"],
                &["1", "1", "1", "1500", "45", "4"],
                &["1", "1", "0", "2000", "70", "5"],
            ],
        )?;
        let plan = SummaryPlan::resolve(&cb, ds.headers())?;
        let rows: Vec<&[String]> = ds.rows().iter().map(Vec::as_slice).collect();
        let out = summarise_group(&plan, &rows);
        let s = &out.summary;

        assert_eq!(s.participants(), 5);
        assert!(s.counts("underDialysis").is_none());
        assert_eq!(s.counts("isSmoking").unwrap()["no"], 2);
        assert_eq!(s.counts("isSmoking").unwrap()["yes"], 2);

        let income = s.counts("income").unwrap();
        assert_eq!((income["low"], income["mid"], income["high"]), (2, 1, 1));
        assert_eq!(s.median("medianIncome"), Some(1499.5));
        assert_eq!(out.retained.get("medianIncome"), &[1499.0, 500.0, 1500.0, 2000.0]);

        assert_eq!(s.counts("age").unwrap()["old"], 2);
        assert_eq!(s.statistics.medians.len(), 1);

        let physical = s.score("physical").unwrap();
        assert_eq!(physical.mean, Some(3.0));
        assert_eq!(physical.std_dev, Some(1.58));
        Ok(())
    }

    #[test]
    fn empty_group_yields_zeroes() -> anyhow::Result<()> {
        let cb = Codebook::from_yaml_str(
            r#"
name: tiny
group_by: {column: g, labels: {1: a}}
filter: {column: s, include: 1}
columns:
  - {kind: categorical, column: sex, name: sex, labels: {1: male, 2: female}}
  - {kind: bracket, column: age, name: age, median_name: medianAge, thresholds: [[0, "all"]]}
  - {kind: score, column: dom1, name: physical}
"#,
        )?;
        let plan = SummaryPlan::resolve(&cb, &["g", "s", "sex", "age", "dom1"])?;
        let out = summarise_group(&plan, &[]);
        assert_eq!(out.summary.participants(), 0);
        assert_eq!(out.summary.counts("sex").unwrap()["female"], 0);
        assert_eq!(out.summary.median("medianAge"), Some(0.0));
        assert_eq!(out.summary.score("physical").unwrap().mean, None);
        Ok(())
    }
}
