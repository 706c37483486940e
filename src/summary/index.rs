// src/summary/index.rs
use std::collections::HashMap;
use tracing::{debug, instrument};

use super::bracket::Brackets;
use crate::codebook::{CodeMap, Codebook, ColumnSpec};
use crate::error::SummaryError;

/// Header name → zero-based position.
///
/// Header order in uploaded files is arbitrary, so every lookup goes
/// through this map. When a name repeats, the last position wins.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_ref().trim().to_string(), i))
            .collect();
        Self { positions }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Position of a column the codebook cannot do without.
    pub fn require(&self, column: &str, aggregate: &str) -> Result<usize, SummaryError> {
        self.get(column).ok_or_else(|| SummaryError::MissingColumn {
            column: column.to_string(),
            aggregate: aggregate.to_string(),
        })
    }
}

/// One aggregate with its source column already located.
#[derive(Debug, Clone)]
pub enum PlannedAggregate<'c> {
    Categorical {
        name: &'c str,
        labels: &'c CodeMap,
        idx: usize,
    },
    Bracket {
        name: &'c str,
        brackets: Brackets<'c>,
        median_name: Option<&'c str>,
        idx: usize,
    },
    Score {
        name: &'c str,
        idx: usize,
    },
}

impl PlannedAggregate<'_> {
    pub fn name(&self) -> &str {
        match self {
            PlannedAggregate::Categorical { name, .. }
            | PlannedAggregate::Bracket { name, .. }
            | PlannedAggregate::Score { name, .. } => name,
        }
    }
}

/// A codebook resolved against one header row.
///
/// Building the plan is the only place a dataset can be rejected for not
/// matching its codebook, so nothing is summarised from a bad file.
#[derive(Debug, Clone)]
pub struct SummaryPlan<'c> {
    pub codebook: &'c Codebook,
    pub group_idx: usize,
    pub filter_idx: usize,
    pub aggregates: Vec<PlannedAggregate<'c>>,
}

impl<'c> SummaryPlan<'c> {
    #[instrument(level = "debug", skip_all, fields(codebook = %codebook.name, headers = headers.len()))]
    pub fn resolve<S: AsRef<str>>(
        codebook: &'c Codebook,
        headers: &[S],
    ) -> Result<Self, SummaryError> {
        let index = ColumnIndex::new(headers);
        let group_idx = index.require(&codebook.group_by.column, "group")?;
        let filter_idx = index.require(&codebook.filter.column, "filter")?;

        let mut aggregates = Vec::with_capacity(codebook.columns.len());
        for spec in &codebook.columns {
            let planned = match spec {
                ColumnSpec::Categorical {
                    column,
                    name,
                    labels,
                } => PlannedAggregate::Categorical {
                    name,
                    labels,
                    idx: index.require(column, name)?,
                },
                ColumnSpec::OptionalCategorical {
                    column,
                    name,
                    labels,
                } => match index.get(column) {
                    Some(idx) => PlannedAggregate::Categorical { name, labels, idx },
                    None => {
                        debug!(column = %column, aggregate = %name, "optional column absent; skipping");
                        continue;
                    }
                },
                ColumnSpec::Bracket {
                    column,
                    name,
                    thresholds,
                    median_name,
                } => PlannedAggregate::Bracket {
                    name,
                    brackets: Brackets::new(thresholds),
                    median_name: median_name.as_deref(),
                    idx: index.require(column, name)?,
                },
                ColumnSpec::Score { column, name } => PlannedAggregate::Score {
                    name,
                    idx: index.require(column, name)?,
                },
            };
            aggregates.push(planned);
        }

        Ok(Self {
            codebook,
            group_idx,
            filter_idx,
            aggregates,
        })
    }

    /// Median names in declaration order.
    pub fn median_names(&self) -> impl Iterator<Item = &'c str> + '_ {
        self.aggregates.iter().filter_map(|a| match a {
            PlannedAggregate::Bracket { median_name, .. } => *median_name,
            _ => None,
        })
    }
}
