// src/codebook/registry.rs
use once_cell::sync::Lazy;

use super::types::Codebook;
use crate::error::SummaryError;

static HEALTH_ROUND: Lazy<Codebook> = Lazy::new(|| {
    Codebook::from_yaml_str(include_str!("health_round.yaml"))
        .expect("bundled health-round codebook must be valid")
});

/// The kinds of survey dataset the dashboard accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    HealthRound,
    Census,
}

impl DatasetKind {
    pub fn as_str(&self) -> &str {
        match self {
            DatasetKind::HealthRound => "Health Round",
            DatasetKind::Census => "Census",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            DatasetKind::HealthRound => 1,
            DatasetKind::Census => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(DatasetKind::HealthRound),
            2 => Some(DatasetKind::Census),
            _ => None,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "health round" | "healthround" | "hr" => Some(DatasetKind::HealthRound),
            "census" => Some(DatasetKind::Census),
            _ => None,
        }
    }

    /// The codebook that interprets datasets of this kind.
    pub fn codebook(&self) -> Result<&'static Codebook, SummaryError> {
        match self {
            DatasetKind::HealthRound => Ok(&*HEALTH_ROUND),
            DatasetKind::Census => Err(SummaryError::NoCodebook(self.as_str().to_string())),
        }
    }
}
