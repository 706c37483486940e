// src/dataset.rs
use crate::error::SummaryError;

/// Missing-value sentinel used by the ingestion side.
pub const MISSING: &str = "";

/// A parsed survey table, one row per participant.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    /// Column names, in the order the file declared them.
    headers: Vec<String>,
    /// Each data row, aligned to `headers` by position.
    rows: Vec<Vec<String>>,
}

impl RawDataset {
    /// Build a dataset, rejecting rows whose cell count differs from the header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, SummaryError> {
        let expected = headers.len();
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find_map(|(i, r)| (r.len() != expected).then_some((i, r.len())))
        {
            return Err(SummaryError::RaggedRow {
                row,
                expected,
                found,
            });
        }
        Ok(Self { headers, rows })
    }

    /// Convenience for tests and small callers holding string slices.
    pub fn from_strs(headers: &[&str], rows: &[&[&str]]) -> Result<Self, SummaryError> {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Raw cell at `idx`; out-of-range positions read as missing.
pub(crate) fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map_or(MISSING, String::as_str)
}

/// The trimmed value, or `None` when the cell holds the missing sentinel.
pub(crate) fn present(raw: &str) -> Option<&str> {
    let v = raw.trim();
    (v != MISSING).then_some(v)
}

/// Parse a coded cell. Integral decimals such as `"2.0"` are accepted.
pub(crate) fn parse_code(raw: &str) -> Option<u32> {
    let v = present(raw)?;
    v.parse::<u32>().ok().or_else(|| {
        let f = v.parse::<f64>().ok()?;
        (f.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&f)).then_some(f as u32)
    })
}

/// Parse a numeric cell, ignoring non-finite spellings such as `"NaN"`.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    present(raw)?.parse::<f64>().ok().filter(|f| f.is_finite())
}
