// src/summary/mod.rs
pub mod bracket;
pub mod group;
pub mod index;
pub mod median;
pub mod merge;
pub mod moments;
pub mod partition;
pub mod tally;
pub mod types;

use indexmap::IndexMap;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, instrument};

use crate::codebook::{Codebook, DatasetKind};
use crate::dataset::RawDataset;
use crate::error::SummaryError;

pub use group::{summarise_group, GroupOutcome};
pub use index::{ColumnIndex, SummaryPlan};
pub use merge::merge_groups;
pub use partition::{partition, GroupRows};
pub use types::{Aggregate, GroupSummary, OverallSummary, ScoreSummary, Statistics, SummaryData};

/// Summarise `dataset` per group and overall, as declared by `codebook`.
///
/// Fails only when the header row does not carry a column the codebook
/// requires; that check happens before any row is read.
#[instrument(level = "info", skip_all, fields(codebook = %codebook.name, rows = dataset.len()))]
pub fn summarise(codebook: &Codebook, dataset: &RawDataset) -> Result<SummaryData, SummaryError> {
    let start = Instant::now();

    // ─── 1) locate every declared column ─────────────────────────────
    let plan = SummaryPlan::resolve(codebook, dataset.headers())?;

    // ─── 2) drop non-respondents, bucket by group ────────────────────
    let groups = partition(dataset, &plan);

    // ─── 3) groups are independent; summarise them in parallel ───────
    let outcomes: Vec<GroupOutcome> = groups
        .par_iter()
        .map(|g| summarise_group(&plan, &g.rows))
        .collect();

    // ─── 4) fold into the overall summary ────────────────────────────
    let overall = merge_groups(&plan, &outcomes);

    let mut out = IndexMap::with_capacity(groups.len() + 1);
    for (group, outcome) in groups.iter().zip(outcomes) {
        out.insert(group.label.clone(), outcome.summary);
    }
    info!(
        groups = groups.len(),
        participants = overall.participants(),
        elapsed = ?start.elapsed(),
        "summarised dataset"
    );
    out.insert(types::OVERALL_KEY.to_string(), overall);
    Ok(SummaryData(out))
}

/// Summarise with the codebook registered for `kind`.
pub fn summarise_kind(kind: DatasetKind, dataset: &RawDataset) -> Result<SummaryData, SummaryError> {
    summarise(kind.codebook()?, dataset)
}
