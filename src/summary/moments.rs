// src/summary/moments.rs
use std::ops::{Add, AddAssign};

use super::types::ScoreSummary;
use crate::dataset::parse_number;

/// Sufficient statistics of a score column.
///
/// Two `Moments` over disjoint rows add up to the moments of their union,
/// so nothing is rounded until [`Moments::finish`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    pub sum: f64,
    pub sum_of_squares: f64,
    pub count: u64,
}

impl Moments {
    /// Single pass over `values`, skipping missing and non-numeric cells.
    pub fn accumulate<'v, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'v str>,
    {
        let mut m = Moments::default();
        for x in values.into_iter().filter_map(parse_number) {
            m.push(x);
        }
        m
    }

    pub fn push(&mut self, x: f64) {
        self.sum += x;
        self.sum_of_squares += x * x;
        self.count += 1;
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Bessel-corrected standard deviation; needs at least two values.
    pub fn sample_std_dev(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        // float noise can push a zero variance slightly negative
        let variance = (self.sum_of_squares / n - mean * mean).max(0.0);
        Some((variance * n / (n - 1.0)).sqrt())
    }

    /// Derive the presentable mean / std-dev, keeping the raw moments alongside.
    pub fn finish(&self) -> ScoreSummary {
        ScoreSummary {
            mean: self.mean().map(round2),
            std_dev: self.sample_std_dev().map(round2),
            summation: self.sum,
            sum_of_squares: self.sum_of_squares,
            count: self.count,
        }
    }
}

impl AddAssign for Moments {
    fn add_assign(&mut self, rhs: Self) {
        self.sum += rhs.sum;
        self.sum_of_squares += rhs.sum_of_squares;
        self.count += rhs.count;
    }
}

impl Add for Moments {
    type Output = Moments;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl From<&ScoreSummary> for Moments {
    fn from(s: &ScoreSummary) -> Self {
        Moments {
            sum: s.summation,
            sum_of_squares: s.sum_of_squares,
            count: s.count,
        }
    }
}

/// Round half up to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0 + 0.5).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_sample_std_dev() {
        let s = Moments::accumulate(["1", "2", "3", "4", "5"]).finish();
        assert_eq!(s.mean, Some(3.0));
        assert_eq!(s.std_dev, Some(1.58));
        assert_eq!(s.summation, 15.0);
        assert_eq!(s.sum_of_squares, 55.0);
        assert_eq!(s.count, 5);
    }

    #[test]
    fn missing_cells_do_not_count() {
        let m = Moments::accumulate(["", "10", " ", "20", "bad"]);
        assert_eq!(m.count, 2);
        assert_eq!(m.mean(), Some(15.0));
    }

    #[test]
    fn merged_moments_match_single_pass() {
        let whole = Moments::accumulate(["1.5", "2.25", "7", "8", "10.75", "3"]);
        let left = Moments::accumulate(["1.5", "2.25", "7"]);
        let right = Moments::accumulate(["8", "10.75", "3"]);
        let merged = left + right;
        assert_eq!(merged.count, whole.count);
        assert!((merged.sum - whole.sum).abs() < 1e-9);
        assert!((merged.sum_of_squares - whole.sum_of_squares).abs() < 1e-9);
        assert_eq!(merged.finish().mean, whole.finish().mean);
        assert_eq!(merged.finish().std_dev, whole.finish().std_dev);
    }

    #[test]
    fn undefined_statistics_are_none() {
        let empty = Moments::default().finish();
        assert_eq!(empty.mean, None);
        assert_eq!(empty.std_dev, None);

        let single = Moments::accumulate(["4"]).finish();
        assert_eq!(single.mean, Some(4.0));
        assert_eq!(single.std_dev, None);

        let constant = Moments::accumulate(["0.1", "0.1", "0.1"]).finish();
        assert_eq!(constant.std_dev, Some(0.0));
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round2(1.005_f64 + 1e-12), 1.01);
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(-1.255), -1.25);
    }

    #[test]
    fn restores_from_score_summary() {
        let m = Moments::accumulate(["2", "4"]);
        assert_eq!(Moments::from(&m.finish()), m);
    }
}
