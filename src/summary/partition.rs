// src/summary/partition.rs
use std::collections::HashMap;
use tracing::debug;

use super::index::SummaryPlan;
use crate::dataset::{cell, parse_code, RawDataset};

/// The included rows of one group.
#[derive(Debug, Clone)]
pub struct GroupRows<'d> {
    pub code: u32,
    pub label: String,
    pub rows: Vec<&'d [String]>,
}

/// Split `dataset` into one bucket per declared group, in codebook order.
///
/// Rows whose filter cell is not the inclusion code, or whose group code is
/// not declared, are dropped; every declared group gets a bucket even when
/// it stays empty.
pub fn partition<'d>(dataset: &'d RawDataset, plan: &SummaryPlan<'_>) -> Vec<GroupRows<'d>> {
    let group_by = &plan.codebook.group_by;
    let include = plan.codebook.filter.include;

    let mut groups: Vec<GroupRows<'d>> = group_by
        .labels
        .iter()
        .map(|(code, label)| GroupRows {
            code,
            label: label.to_string(),
            rows: Vec::new(),
        })
        .collect();
    let slot: HashMap<u32, usize> = groups.iter().enumerate().map(|(i, g)| (g.code, i)).collect();

    let mut excluded = 0usize;
    let mut unknown_group = 0usize;
    for row in dataset.rows() {
        if parse_code(cell(row, plan.filter_idx)) != Some(include) {
            excluded += 1;
            continue;
        }
        match parse_code(cell(row, plan.group_idx)).and_then(|c| slot.get(&c)) {
            Some(&i) => groups[i].rows.push(row.as_slice()),
            None => unknown_group += 1,
        }
    }

    debug!(
        rows = dataset.len(),
        excluded,
        unknown_group,
        groups = groups.len(),
        "partitioned rows"
    );
    groups
}
