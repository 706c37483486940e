// src/summary/median.rs

/// Median of `nums` by quickselect, partially reordering the slice in place.
///
/// Rank `n / 2` is selected; for even lengths the other middle element is
/// the largest value left of it. Returns `0.0` for an empty slice.
pub fn median(nums: &mut [f64]) -> f64 {
    let n = nums.len();
    if n == 0 {
        return 0.0;
    }

    let mid = n / 2;
    let (lower, upper, _) = nums.select_nth_unstable_by(mid, f64::total_cmp);
    let upper = *upper;
    if n % 2 == 1 {
        return upper;
    }
    let lower = lower.iter().copied().max_by(f64::total_cmp).unwrap_or(upper);
    (lower + upper) / 2.0
}
