//! Assertion helpers and exact references shared by unit and integration
//! tests. Not part of the digest itself.

use crate::tdigest::Scale;

pub fn all_scales() -> [Scale; 9] {
    [
        Scale::K1,
        Scale::K1Fast,
        Scale::K1Spliced,
        Scale::K1SplicedFast,
        Scale::K2,
        Scale::K2Spliced,
        Scale::K3,
        Scale::K3Spliced,
        Scale::Quadratic,
    ]
}

/// Bitwise equality, for the contracts the digest promises exactly
/// (extrema, boundary ranks, round trips).
pub fn assert_exact(what: &str, want: f64, got: f64) {
    assert!(got == want, "{what}: wanted exactly {want}, digest returned {got}");
}

/// Relative closeness against a nonzero expectation.
pub fn assert_rel_close(what: &str, want: f64, got: f64, rtol: f64) {
    let rel_err = (got - want).abs() / want.abs().max(f64::MIN_POSITIVE);
    assert!(
        rel_err < rtol,
        "{what}: {got} is off {want} by rel {rel_err:.3e} (allowed {rtol:.3e})"
    );
}

/// Absolute closeness, for rank-space quantities that live near zero.
pub fn assert_abs_close(what: &str, want: f64, got: f64, atol: f64) {
    let err = (got - want).abs();
    assert!(
        err <= atol,
        "{what}: {got} misses {want} by {err:.3e} (allowed {atol:.3e})"
    );
}

/// A grid read off the digest must never decrease.
pub fn assert_monotone_chain(what: &str, grid: &[f64]) {
    for (i, pair) in grid.windows(2).enumerate() {
        assert!(
            pair[1] >= pair[0],
            "{what}: order breaks between index {i} and {}: {} then {}",
            i + 1,
            pair[0],
            pair[1]
        );
    }
}

pub fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Exact empirical quantile: the order statistic at rank ⌊q·n⌋.
pub fn quantile_on_sorted(q: f64, sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let idx = (q * n as f64).clamp(0.0, (n - 1) as f64);
    sorted[idx.floor() as usize]
}

/// Exact empirical CDF with the midpoint convention on ties.
pub fn cdf_on_sorted(x: f64, sorted: &[f64]) -> f64 {
    let below = sorted.partition_point(|&v| v < x);
    let at = sorted[below..].iter().take_while(|&&v| v == x).count();
    (below as f64 + at as f64 / 2.0) / sorted.len() as f64
}
