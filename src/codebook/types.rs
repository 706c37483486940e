// src/codebook/types.rs

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest code a codebook may declare; counters are sized by the top code.
pub const MAX_CODE: u32 = 65_535;

/// Integer code → descriptive label, in declaration order.
///
/// Keys may be written as integers (YAML) or numeric strings (JSON).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CodeMap(pub IndexMap<u32, String>);

/// One map key of a [`CodeMap`].
struct Code(u32);

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CodeVisitor;

        impl<'de> Visitor<'de> for CodeVisitor {
            type Value = Code;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a non-negative integer code")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u32::try_from(value)
                    .map(Code)
                    .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u32::try_from(value)
                    .map(Code)
                    .map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .trim()
                    .parse()
                    .map(Code)
                    .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_any(CodeVisitor)
    }
}

impl<'de> Deserialize<'de> for CodeMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CodeMapVisitor;

        impl<'de> Visitor<'de> for CodeMapVisitor {
            type Value = CodeMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of integer codes to labels")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut codes = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((Code(code), label)) = map.next_entry::<Code, String>()? {
                    if codes.insert(code, label).is_some() {
                        return Err(de::Error::custom(format!("code {code} is declared twice")));
                    }
                }
                Ok(CodeMap(codes))
            }
        }

        deserializer.deserialize_map(CodeMapVisitor)
    }
}

impl CodeMap {
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        Self(pairs.into_iter().map(|(c, l)| (c, l.into())).collect())
    }

    /// Size of a counter array that can be indexed by every declared code.
    pub fn slots(&self) -> usize {
        self.0.keys().max().map_or(0, |&max| max as usize + 1)
    }

    pub fn label(&self, code: u32) -> Option<&str> {
        self.0.get(&code).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.0.iter().map(|(c, l)| (*c, l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How one source column is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSpec {
    /// Coded column that every dataset of this kind must carry.
    Categorical {
        column: String,
        name: String,
        labels: CodeMap,
    },
    /// Coded column that some datasets omit.
    OptionalCategorical {
        column: String,
        name: String,
        labels: CodeMap,
    },
    /// Continuous column bucketed by ascending lower bounds.
    Bracket {
        column: String,
        name: String,
        thresholds: Vec<(f64, String)>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        median_name: Option<String>,
    },
    /// Continuous score summarised by mean and sample standard deviation.
    Score { column: String, name: String },
}

impl ColumnSpec {
    pub fn column(&self) -> &str {
        match self {
            ColumnSpec::Categorical { column, .. }
            | ColumnSpec::OptionalCategorical { column, .. }
            | ColumnSpec::Bracket { column, .. }
            | ColumnSpec::Score { column, .. } => column,
        }
    }

    /// Aggregate name used as the key in the summary output.
    pub fn name(&self) -> &str {
        match self {
            ColumnSpec::Categorical { name, .. }
            | ColumnSpec::OptionalCategorical { name, .. }
            | ColumnSpec::Bracket { name, .. }
            | ColumnSpec::Score { name, .. } => name,
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, ColumnSpec::OptionalCategorical { .. })
    }
}

/// Column that splits rows into groups (e.g. subdistrict).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBySpec {
    pub column: String,
    pub labels: CodeMap,
}

/// Column whose coded value decides whether a row is summarised at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub column: String,
    pub include: u32,
}

/// Full interpretation of one dataset kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Codebook {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub group_by: GroupBySpec,
    pub filter: FilterSpec,
    pub columns: Vec<ColumnSpec>,
}

fn default_version() -> u32 {
    1
}
