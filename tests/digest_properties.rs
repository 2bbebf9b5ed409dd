//! End-to-end accuracy and invariant checks over seeded datasets.

use taildigest::tdigest::test_helpers::{
    all_scales, assert_abs_close, assert_exact, cdf_on_sorted, quantile_on_sorted, sorted_copy,
};
use taildigest::{Scale, TDigest};
use taildigest_testdata::{gen_dataset, DistKind};

fn build(scale: Scale, compression: f64, data: &[f64]) -> TDigest {
    let mut td = TDigest::with_scaler(scale, compression, 0.0, 0);
    for &x in data {
        td.add(x, 1.0).unwrap();
    }
    td
}

/// Digest estimate must land between the exact quantiles at q ± slack.
fn assert_in_rank_bracket(label: &str, td: &mut TDigest, sorted: &[f64], q: f64, slack: f64) {
    let got = td.quantile(q);
    let lo = quantile_on_sorted((q - slack).max(0.0), sorted);
    let hi = quantile_on_sorted((q + slack).min(1.0), sorted);
    assert!(
        got >= lo && got <= hi,
        "{label}: Q({q}) = {got} outside exact bracket [{lo}, {hi}]"
    );
}

#[test]
fn normal_median_tracks_reference() {
    let data = gen_dataset(DistKind::Normal { mu: 10.0, sigma: 3.0 }, 200_000, 42);
    let sorted = sorted_copy(&data);
    let want = quantile_on_sorted(0.5, &sorted);

    for scale in all_scales() {
        let mut td = build(scale, 1000.0, &data);
        assert_eq!(td.check_weights(), 0, "{scale:?} violated its ceiling");

        let got = td.quantile(0.5);
        let rel = (got - want).abs() / want.abs();
        assert!(
            rel < 5e-3,
            "{scale:?}: median {got} vs reference {want}, rel={rel:e}"
        );
        // and against the distribution itself
        assert!((got - 10.0).abs() < 0.1, "{scale:?}: median {got} far from 10");
    }
}

#[test]
fn uniform_tail_quantiles_track_reference() {
    let data = gen_dataset(DistKind::Uniform { lo: 0.0, hi: 100.0 }, 200_000, 42);
    let sorted = sorted_copy(&data);

    for scale in all_scales() {
        let mut td = build(scale, 1000.0, &data);
        assert_eq!(td.check_weights(), 0, "{scale:?} violated its ceiling");

        for (q, rtol) in [(0.5, 5e-3), (0.9, 5e-3), (0.99, 2e-3), (0.999, 1e-3)] {
            let want = quantile_on_sorted(q, &sorted);
            let got = td.quantile(q);
            let rel = (got - want).abs() / want.abs();
            assert!(
                rel < rtol,
                "{scale:?}: Q({q}) = {got} vs reference {want}, rel={rel:e}"
            );
        }
        assert_exact("Q(0)", sorted[0], td.quantile(0.0));
        assert_exact("Q(1)", sorted[sorted.len() - 1], td.quantile(1.0));
    }
}

#[test]
fn cdf_tracks_reference() {
    let data = gen_dataset(DistKind::Normal { mu: 10.0, sigma: 3.0 }, 200_000, 7);
    let sorted = sorted_copy(&data);

    for scale in [Scale::K2Spliced, Scale::K3Spliced, Scale::K1Fast] {
        let mut td = build(scale, 1000.0, &data);
        assert_abs_close(
            "CDF at the mean",
            cdf_on_sorted(10.0, &sorted),
            td.cdf(10.0),
            5e-3,
        );
        assert_exact("far below", 0.0, td.cdf(-100.0));
        assert_exact("far above", 1.0, td.cdf(110.0));
    }
}

#[test]
fn cdf_inverts_quantile_within_envelope() {
    let data = gen_dataset(DistKind::Mixture, 100_000, 9);

    for scale in all_scales() {
        let mut td = build(scale, 200.0, &data);
        for q in [0.001, 0.01, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99, 0.999] {
            let v = td.quantile(q);
            let back = td.cdf(v);
            assert!(
                (back - q).abs() <= 0.02,
                "{scale:?}: CDF(Q({q})) = {back}, drifted by {}",
                (back - q).abs()
            );
        }
    }
}

#[test]
fn merged_digests_track_the_union() {
    let a = gen_dataset(DistKind::Uniform { lo: 0.0, hi: 100.0 }, 50_000, 11);
    let b = gen_dataset(DistKind::Normal { mu: 50.0, sigma: 10.0 }, 50_000, 12);
    let mut union = a.clone();
    union.extend_from_slice(&b);
    let sorted = sorted_copy(&union);

    for scale in [Scale::K2Spliced, Scale::K3Spliced, Scale::Quadratic] {
        let mut left = build(scale, 400.0, &a);
        let right = build(scale, 400.0, &b);
        left.merge(&right);

        assert_exact("count", 100_000.0, left.count());
        assert_exact("min", sorted[0], left.min());
        assert_exact("max", sorted[sorted.len() - 1], left.max());
        assert_eq!(left.check_weights(), 0, "{scale:?} merge broke ceilings");

        for q in [0.01, 0.1, 0.5, 0.9, 0.99] {
            assert_in_rank_bracket("merged", &mut left, &sorted, q, 0.01);
        }
    }
}

#[test]
fn lognormal_extremes_are_exact() {
    let data = gen_dataset(DistKind::LogNormal { mu: 0.0, sigma: 1.5 }, 50_000, 3);
    let sorted = sorted_copy(&data);

    let mut td = build(Scale::default(), 500.0, &data);
    assert_exact("Q(0)", sorted[0], td.quantile(0.0));
    assert_exact("Q(1)", sorted[sorted.len() - 1], td.quantile(1.0));
    assert_exact("min", sorted[0], td.min());
    assert_exact("max", sorted[sorted.len() - 1], td.max());
}
