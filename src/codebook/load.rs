// src/codebook/load.rs
use anyhow::{Context, Result};
use std::{collections::HashSet, fs, path::Path};
use tracing::debug;

use super::types::{CodeMap, Codebook, ColumnSpec, MAX_CODE};
use crate::error::SummaryError;
use crate::summary::types::{OVERALL_KEY, PARTICIPANTS_KEY, STATISTICS_KEY};

impl Codebook {
    /// Parse and validate a codebook written in YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let codebook: Codebook = serde_yaml::from_str(text).context("parsing YAML codebook")?;
        codebook.validate()?;
        Ok(codebook)
    }

    /// Parse and validate a codebook written in JSON.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let codebook: Codebook = serde_json::from_str(text).context("parsing JSON codebook")?;
        codebook.validate()?;
        Ok(codebook)
    }

    /// Load a codebook from disk; `.json` files are read as JSON, anything else as YAML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading codebook {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let codebook = if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
        .with_context(|| format!("loading codebook {}", path.display()))?;
        debug!(
            codebook = %codebook.name,
            version = codebook.version,
            columns = codebook.columns.len(),
            "loaded codebook"
        );
        Ok(codebook)
    }

    /// Check the invariants the summariser relies on.
    pub fn validate(&self) -> Result<(), SummaryError> {
        let invalid = |reason: String| SummaryError::InvalidCodebook {
            codebook: self.name.clone(),
            reason,
        };

        if self.group_by.labels.is_empty() {
            return Err(invalid(format!(
                "group-by column `{}` declares no groups",
                self.group_by.column
            )));
        }
        if self.group_by.labels.iter().any(|(_, label)| label == OVERALL_KEY) {
            return Err(invalid(format!("group label `{OVERALL_KEY}` is reserved")));
        }
        check_codes(&self.group_by.column, &self.group_by.labels).map_err(invalid)?;

        let mut names = HashSet::new();
        let mut medians = HashSet::new();
        for spec in &self.columns {
            let name = spec.name();
            if name == STATISTICS_KEY {
                return Err(invalid(format!("aggregate name `{STATISTICS_KEY}` is reserved")));
            }
            if !names.insert(name) {
                return Err(invalid(format!("aggregate `{name}` is declared twice")));
            }

            match spec {
                ColumnSpec::Categorical { labels, .. }
                | ColumnSpec::OptionalCategorical { labels, .. } => {
                    if labels.is_empty() {
                        return Err(invalid(format!("`{name}` declares no codes")));
                    }
                    check_codes(name, labels).map_err(invalid)?;
                }
                ColumnSpec::Bracket {
                    thresholds,
                    median_name,
                    ..
                } => {
                    if thresholds.is_empty() {
                        return Err(invalid(format!("`{name}` declares no thresholds")));
                    }
                    if thresholds.iter().any(|(t, _)| !t.is_finite()) {
                        return Err(invalid(format!("`{name}` has a non-finite threshold")));
                    }
                    if thresholds.windows(2).any(|w| w[0].0 >= w[1].0) {
                        return Err(invalid(format!(
                            "`{name}` thresholds must be strictly ascending"
                        )));
                    }
                    let labels = thresholds.iter().map(|(_, l)| l.as_str());
                    if let Some(label) = first_duplicate(labels) {
                        return Err(invalid(format!("`{name}` declares bracket `{label}` twice")));
                    }
                    if let Some(m) = median_name {
                        if m == PARTICIPANTS_KEY || !medians.insert(m.as_str()) {
                            return Err(invalid(format!("median name `{m}` is already taken")));
                        }
                    }
                }
                ColumnSpec::Score { .. } => {}
            }
        }
        Ok(())
    }
}

/// Codes must stay below [`MAX_CODE`] and labels must be distinct.
fn check_codes(owner: &str, labels: &CodeMap) -> Result<(), String> {
    if let Some((code, _)) = labels.iter().find(|(code, _)| *code > MAX_CODE) {
        return Err(format!("`{owner}` code {code} exceeds {MAX_CODE}"));
    }
    match first_duplicate(labels.iter().map(|(_, label)| label)) {
        Some(label) => Err(format!("`{owner}` declares label `{label}` twice")),
        None => Ok(()),
    }
}

fn first_duplicate<'a>(labels: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    labels.into_iter().find(|label| !seen.insert(*label))
}
