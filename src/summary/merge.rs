// src/summary/merge.rs
use indexmap::IndexMap;

use super::group::GroupOutcome;
use super::index::{PlannedAggregate, SummaryPlan};
use super::median::median;
use super::moments::Moments;
use super::types::{Aggregate, GroupSummary, OverallSummary, Statistics};

/// Combine per-group outcomes into the overall summary without touching raw rows.
///
/// Counts and participants add up label by label, score moments add up
/// and are finished once, and medians are re-selected over the union of
/// the retained values. Group order does not affect the result.
pub fn merge_groups(plan: &SummaryPlan<'_>, groups: &[GroupOutcome]) -> OverallSummary {
    let summaries = || groups.iter().map(|g| &g.summary);

    let mut aggregates = IndexMap::with_capacity(plan.aggregates.len());
    for planned in &plan.aggregates {
        let name = planned.name();
        let merged = match planned {
            PlannedAggregate::Categorical { labels, .. } => {
                let zero = labels.iter().map(|(_, l)| (l.to_string(), 0));
                Aggregate::Counts(sum_counts(zero, summaries().filter_map(|s| s.counts(name))))
            }
            PlannedAggregate::Bracket { brackets, .. } => {
                let zero = brackets.labels().map(|l| (l.to_string(), 0));
                Aggregate::Counts(sum_counts(zero, summaries().filter_map(|s| s.counts(name))))
            }
            PlannedAggregate::Score { .. } => {
                let total = summaries()
                    .filter_map(|s| s.score(name))
                    .map(Moments::from)
                    .fold(Moments::default(), |acc, m| acc + m);
                Aggregate::Score(total.finish())
            }
        };
        aggregates.insert(name.to_string(), merged);
    }

    let medians = plan
        .median_names()
        .map(|median_name| {
            let mut union: Vec<f64> = groups
                .iter()
                .flat_map(|g| g.retained.get(median_name).iter().copied())
                .collect();
            (median_name.to_string(), median(&mut union))
        })
        .collect();

    GroupSummary {
        aggregates,
        statistics: Statistics {
            participants: summaries().map(GroupSummary::participants).sum(),
            medians,
        },
    }
}

fn sum_counts<'a>(
    zero: impl Iterator<Item = (String, u64)>,
    parts: impl Iterator<Item = &'a IndexMap<String, u64>>,
) -> IndexMap<String, u64> {
    let mut total: IndexMap<String, u64> = zero.collect();
    for part in parts {
        for (label, n) in part {
            *total.entry(label.clone()).or_default() += n;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebook::Codebook;
    use crate::dataset::RawDataset;
    use crate::summary::group::summarise_group;

    const CODEBOOK: &str = r#"
name: tiny
group_by: {column: g, labels: {1: a, 2: b}}
filter: {column: s, include: 1}
columns:
  - {kind: categorical, column: sex, name: sex, labels: {1: male, 2: female}}
  - {kind: bracket, column: age, name: age, median_name: medianAge, thresholds: [[0, "young"], [50, "old"]]}
  - {kind: score, column: dom1, name: physical}
"#;

    fn outcome(plan: &SummaryPlan<'_>, ds: &RawDataset) -> GroupOutcome {
        let rows: Vec<&[String]> = ds.rows().iter().map(Vec::as_slice).collect();
        summarise_group(plan, &rows)
    }

    #[test]
    fn merge_matches_direct_summary() -> anyhow::Result<()> {
        let cb = Codebook::from_yaml_str(CODEBOOK)?;
        let headers = ["g", "s", "sex", "age", "dom1"];
        let first = RawDataset::from_strs(
            &headers,
            &[&["1", "1", "1", "20", "2.5"], &["1", "1", "2", "64", "3.5"]],
        )?;
        let second = RawDataset::from_strs(
            &headers,
            &[
                &["2", "1", "2", "33", "4"],
                &["2", "1", "", "51", ""],
                &["2", "1", "2", "", "1"],
            ],
        )?;
        let all = RawDataset::new(
            first.headers().to_vec(),
            first.rows().iter().chain(second.rows()).cloned().collect(),
        )?;

        let plan = SummaryPlan::resolve(&cb, &headers)?;
        let merged = merge_groups(&plan, &[outcome(&plan, &first), outcome(&plan, &second)]);
        let direct = outcome(&plan, &all).summary;

        assert_eq!(merged, direct);
        assert_eq!(merged.participants(), 5);
        assert_eq!(merged.counts("sex").unwrap()["female"], 3);
        assert_eq!(merged.median("medianAge"), Some(42.0));
        Ok(())
    }

    #[test]
    fn merge_is_order_independent() -> anyhow::Result<()> {
        let cb = Codebook::from_yaml_str(CODEBOOK)?;
        let headers = ["g", "s", "sex", "age", "dom1"];
        let plan = SummaryPlan::resolve(&cb, &headers)?;
        let a = outcome(&plan, &RawDataset::from_strs(&headers, &[&["1", "1", "1", "10", "1"]])?);
        let b = outcome(&plan, &RawDataset::from_strs(&headers, &[&["2", "1", "2", "90", "5"]])?);
        assert_eq!(
            merge_groups(&plan, &[a.clone(), b.clone()]),
            merge_groups(&plan, &[b, a])
        );
        Ok(())
    }

    #[test]
    fn merging_nothing_gives_empty_summary() -> anyhow::Result<()> {
        let cb = Codebook::from_yaml_str(CODEBOOK)?;
        let plan = SummaryPlan::resolve(&cb, &["g", "s", "sex", "age", "dom1"])?;
        let empty = merge_groups(&plan, &[]);
        assert_eq!(empty.participants(), 0);
        assert_eq!(empty.counts("age").unwrap()["old"], 0);
        assert_eq!(empty.median("medianAge"), Some(0.0));
        assert_eq!(empty.score("physical").unwrap().count, 0);
        Ok(())
    }
}
