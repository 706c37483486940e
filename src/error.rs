use thiserror::Error;

/// Errors surfaced by the summary engine.
///
/// Only structural problems are raised here. Per-cell anomalies (missing
/// values, unknown codes, filtered rows) are tolerated and logged instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SummaryError {
    /// A column required by the codebook is not in the header row.
    #[error("dataset is missing required column `{column}` (needed for `{aggregate}`)")]
    MissingColumn { column: String, aggregate: String },

    #[error("row {row} has {found} cells but the header row has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid codebook `{codebook}`: {reason}")]
    InvalidCodebook { codebook: String, reason: String },

    #[error("no codebook is registered for dataset kind `{0}`")]
    NoCodebook(String),
}

impl SummaryError {
    /// True when the dataset does not match the declared codebook template.
    pub fn is_template_mismatch(&self) -> bool {
        matches!(self, SummaryError::MissingColumn { .. })
    }
}
