// src/summary/bracket.rs
use indexmap::IndexMap;

use crate::dataset::parse_number;

/// Ordered lower bounds with their labels, ready for lookups.
#[derive(Debug, Clone)]
pub struct Brackets<'a> {
    bounds: Vec<f64>,
    labels: Vec<&'a str>,
}

impl<'a> Brackets<'a> {
    /// `thresholds` must be strictly ascending; codebook validation enforces it.
    pub fn new(thresholds: &'a [(f64, String)]) -> Self {
        let (bounds, labels): (Vec<f64>, Vec<&str>) = thresholds
            .iter()
            .map(|(t, l)| (*t, l.as_str()))
            .unzip();
        Self { bounds, labels }
    }

    /// Index of the bracket holding `value`: the largest bound not above it.
    /// `None` when the value is below the first bound.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        self.bounds.partition_point(|&b| b <= value).checked_sub(1)
    }

    pub fn labels(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.labels.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Histogram of `values` by bracket label.
    ///
    /// When `collect` is given, every parsed value is also pushed onto it for
    /// a later median. Values below the first bound fall outside every
    /// bracket but are still collected.
    pub fn categorise<'v, I>(
        &self,
        values: I,
        mut collect: Option<&mut Vec<f64>>,
    ) -> IndexMap<String, u64>
    where
        I: IntoIterator<Item = &'v str>,
    {
        let mut counts = vec![0u64; self.len()];
        for raw in values {
            let Some(num) = parse_number(raw) else {
                continue;
            };
            if let Some(i) = self.index_of(num) {
                counts[i] += 1;
            }
            if let Some(out) = collect.as_deref_mut() {
                out.push(num);
            }
        }

        self.labels
            .iter()
            .zip(counts)
            .map(|(label, n)| (label.to_string(), n))
            .collect()
    }
}
