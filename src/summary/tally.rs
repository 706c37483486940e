// src/summary/tally.rs
use indexmap::IndexMap;
use tracing::trace;

use crate::codebook::CodeMap;
use crate::dataset::{parse_code, present};

/// Count how often each codebook label occurs in `values`.
///
/// Counting goes through a dense array indexed by code. Codes that fit in
/// the array but have no label land in a slot that is never read back;
/// codes past the array and cells that are not codes are discarded. Missing
/// cells are skipped entirely.
///
/// ```
/// use surveysum::codebook::CodeMap;
/// use surveysum::summary::tally::tally;
///
/// let labels = CodeMap::new([(0, "no"), (1, "yes")]);
/// let counts = tally(["0", "1", "0", "", "1", "1", ""], &labels);
/// assert_eq!(counts["no"], 2);
/// assert_eq!(counts["yes"], 3);
/// ```
pub fn tally<'v, I>(values: I, labels: &CodeMap) -> IndexMap<String, u64>
where
    I: IntoIterator<Item = &'v str>,
{
    let mut counts = vec![0u64; labels.slots()];
    let mut stray = 0u64;

    for raw in values {
        if present(raw).is_none() {
            continue;
        }
        match parse_code(raw).and_then(|code| counts.get_mut(code as usize)) {
            Some(slot) => *slot += 1,
            None => stray += 1,
        }
    }
    if stray > 0 {
        trace!(stray, "ignored cells outside the codebook domain");
    }

    labels
        .iter()
        .map(|(code, label)| (label.to_string(), counts[code as usize]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary() -> CodeMap {
        CodeMap::new([(0, "no"), (1, "yes")])
    }

    #[test]
    fn excludes_missing_values() {
        let counts = tally(["0", "1", "0", "", "1", "1", ""], &binary());
        assert_eq!(
            counts,
            IndexMap::from([("no".to_string(), 2), ("yes".to_string(), 3)])
        );
    }

    #[test]
    fn keeps_codebook_order_and_zero_counts() {
        let labels = CodeMap::new([(3, "c"), (1, "a"), (2, "b")]);
        let counts = tally(["1", "1"], &labels);
        let keys: Vec<_> = counts.keys().map(String::as_str).collect();
        assert_eq!(keys, ["c", "a", "b"]);
        assert_eq!(counts["a"], 2);
        assert_eq!(counts["b"], 0);
        assert_eq!(counts["c"], 0);
    }

    #[test]
    fn tolerates_codes_outside_the_codebook() {
        // employment codes skip 0, 1 and 6..=9
        let labels = CodeMap::new([(2, "student"), (5, "working"), (10, "pensioner")]);
        let counts = tally(["2", "6", "99", "abc", "10", "-3", "5"], &labels);
        assert_eq!(counts["student"], 1);
        assert_eq!(counts["working"], 1);
        assert_eq!(counts["pensioner"], 1);
        assert_eq!(counts.values().sum::<u64>(), 3);
    }
}
