//! Scale functions: the q ↔ k mapping that shapes centroid weight ceilings.
//!
//! A scale function is a monotone bijection between the quantile `q ∈ [0,1]`
//! and an internal coordinate `k`. One unit of k corresponds to one centroid,
//! so the quantile span of a unit k-step, `max(q, δ, n)`, is the ceiling
//! (as a fraction of total weight) the compactor grants a cluster whose left
//! edge sits at `q`. Steeper k near the tails means tighter clusters there.
//!
//! Variants:
//! - `K1`: arcsine; symmetric tail emphasis.
//! - `K2`: logit; heavier centre weighting. The normaliser grows with
//!   `ln(n/δ)` so cluster counts stay bounded as streams grow.
//! - `K3`: one-sided logs on either side of the median; sharper tails.
//! - `Quadratic`: piecewise-quadratic baseline.
//! - `*Spliced`: same interior shape, but one unit of k is reserved for each
//!   outermost unit-weight band, so unit-weight ingest pins the extreme
//!   centroids to weight 1 and `k(0) = 0`, `k(1) = δ` hold exactly.
//! - `*Fast`: arcsine replaced by the fast approximation; same contract to
//!   within ≈1e-6.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::tdigest::fastasin::fast_asin;

const Q_EPS: f64 = 1e-15;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    K1,
    K1Fast,
    K1Spliced,
    K1SplicedFast,
    K2,
    /// Logit interior with unit-weight tail bands (default).
    #[default]
    K2Spliced,
    K3,
    K3Spliced,
    Quadratic,
}

impl Scale {
    /// Forward map q → k. Monotone non-decreasing; `compression` is δ and `n`
    /// the total weight of the digest being shaped.
    pub fn k(self, q: f64, compression: f64, n: f64) -> f64 {
        match self {
            Scale::K1 => k1_k(q, compression, f64::asin),
            Scale::K1Fast => k1_k(q, compression, fast_asin),
            Scale::K2 => k2_k(q, compression, n),
            Scale::K3 => k3_k(q, compression, n),
            Scale::Quadratic => quad_k(q, compression),
            Scale::K1Spliced | Scale::K1SplicedFast | Scale::K2Spliced | Scale::K3Spliced => {
                spliced_k(self.base(), q, compression, n)
            }
        }
    }

    /// Inverse map k → q, clamped to [0, 1] outside the covered range.
    pub fn q(self, k: f64, compression: f64, n: f64) -> f64 {
        match self {
            Scale::K1 | Scale::K1Fast => k1_q(k, compression),
            Scale::K2 => k2_q(k, compression, n),
            Scale::K3 => k3_q(k, compression, n),
            Scale::Quadratic => quad_q(k, compression),
            Scale::K1Spliced | Scale::K1SplicedFast | Scale::K2Spliced | Scale::K3Spliced => {
                spliced_q(self.base(), k, compression, n)
            }
        }
    }

    /// Maximum quantile fraction a single cluster may span when its left edge
    /// sits at `q`: the width of one unit k-step there. The compactor's
    /// weight ceiling is `n · max(q, δ, n)`.
    pub fn max(self, q: f64, compression: f64, n: f64) -> f64 {
        match self {
            Scale::K1 | Scale::K1Fast => k1_max(q, compression),
            Scale::K2 => k2_max(q, compression, n),
            Scale::K3 => k3_max(q, compression, n),
            Scale::Quadratic => quad_max(q, compression),
            Scale::K1Spliced | Scale::K1SplicedFast | Scale::K2Spliced | Scale::K3Spliced => {
                spliced_max(self.base(), q, compression, n)
            }
        }
    }

    /// The interior shape underneath a spliced variant.
    fn base(self) -> Scale {
        match self {
            Scale::K1Spliced => Scale::K1,
            Scale::K1SplicedFast => Scale::K1Fast,
            Scale::K2Spliced => Scale::K2,
            Scale::K3Spliced => Scale::K3,
            other => other,
        }
    }
}

#[inline]
fn clamp_unit(q: f64) -> f64 {
    q.clamp(0.0, 1.0)
}

/// Keep q strictly inside (0, 1) for maps with infinite slope at the edges.
#[inline]
fn clamp_open(q: f64) -> f64 {
    q.clamp(Q_EPS, 1.0 - Q_EPS)
}

/* ----------------------- K1: arcsine ----------------------- */

fn k1_k(q: f64, compression: f64, asin: fn(f64) -> f64) -> f64 {
    let q = clamp_unit(q);
    compression / (2.0 * PI) * (asin(2.0 * q - 1.0) + FRAC_PI_2)
}

fn k1_q(k: f64, compression: f64) -> f64 {
    let s = k * (2.0 * PI) / compression - FRAC_PI_2;
    if s <= -FRAC_PI_2 {
        0.0
    } else if s >= FRAC_PI_2 {
        1.0
    } else {
        (s.sin() + 1.0) / 2.0
    }
}

fn k1_max(q: f64, compression: f64) -> f64 {
    let q = clamp_unit(q);
    2.0 * (PI / compression).sin() * (q * (1.0 - q)).sqrt()
}

/* ----------------------- K2: logit ----------------------- */

fn k2_z(compression: f64, n: f64) -> f64 {
    (4.0 * (n / compression).ln() + 24.0).max(f64::EPSILON)
}

fn k2_k(q: f64, compression: f64, n: f64) -> f64 {
    let q = clamp_open(q);
    compression / k2_z(compression, n) * (q / (1.0 - q)).ln()
}

fn k2_q(k: f64, compression: f64, n: f64) -> f64 {
    let s = k * k2_z(compression, n) / compression;
    1.0 / (1.0 + (-s).exp())
}

fn k2_max(q: f64, compression: f64, n: f64) -> f64 {
    let q = clamp_unit(q);
    q * (1.0 - q) * k2_z(compression, n) / compression
}

/* ----------------------- K3: one-sided logs ----------------------- */

fn k3_z(compression: f64, n: f64) -> f64 {
    (4.0 * (n / compression).ln() + 21.0).max(f64::EPSILON)
}

fn k3_k(q: f64, compression: f64, n: f64) -> f64 {
    let q = clamp_open(q);
    let scale = compression / k3_z(compression, n);
    if q <= 0.5 {
        scale * (2.0 * q).ln()
    } else {
        -scale * (2.0 * (1.0 - q)).ln()
    }
}

fn k3_q(k: f64, compression: f64, n: f64) -> f64 {
    let s = k * k3_z(compression, n) / compression;
    if s <= 0.0 {
        0.5 * s.exp()
    } else {
        1.0 - 0.5 * (-s).exp()
    }
}

fn k3_max(q: f64, compression: f64, n: f64) -> f64 {
    let q = clamp_unit(q);
    q.min(1.0 - q) * k3_z(compression, n) / compression
}

/* ----------------------- Quadratic baseline ----------------------- */

fn quad_k(q: f64, compression: f64) -> f64 {
    let q = clamp_unit(q);
    let r = if q < 0.5 {
        (q * 0.5).sqrt()
    } else {
        1.0 - ((1.0 - q) * 0.5).sqrt()
    };
    compression * r
}

fn quad_q(k: f64, compression: f64) -> f64 {
    let r = (k / compression).clamp(0.0, 1.0);
    if r < 0.5 {
        2.0 * r * r
    } else {
        1.0 - 2.0 * (1.0 - r) * (1.0 - r)
    }
}

fn quad_max(q: f64, compression: f64) -> f64 {
    let q = clamp_unit(q);
    (quad_q(quad_k(q, compression) + 1.0, compression) - q).max(0.0)
}

/* ----------------------- Splicing ----------------------- */

/// Quantile width of one unit of weight at each extreme.
#[inline]
fn tail_band(n: f64) -> f64 {
    (1.0 / n.max(2.0)).min(0.25)
}

fn spliced_k(base: Scale, q: f64, compression: f64, n: f64) -> f64 {
    let q = clamp_unit(q);
    let q_lo = tail_band(n);
    let interior = (compression - 2.0).max(1.0);
    if q <= q_lo {
        return q / q_lo;
    }
    if q >= 1.0 - q_lo {
        return (1.0 + interior) + (q - (1.0 - q_lo)) / q_lo;
    }
    let k_lo = base.k(q_lo, compression, n);
    let span = (base.k(1.0 - q_lo, compression, n) - k_lo).max(Q_EPS);
    1.0 + (base.k(q, compression, n) - k_lo) * interior / span
}

fn spliced_q(base: Scale, k: f64, compression: f64, n: f64) -> f64 {
    let q_lo = tail_band(n);
    let interior = (compression - 2.0).max(1.0);
    if k <= 1.0 {
        return k.max(0.0) * q_lo;
    }
    if k >= 1.0 + interior {
        return 1.0 - q_lo + (k - (1.0 + interior)).min(1.0) * q_lo;
    }
    let k_lo = base.k(q_lo, compression, n);
    let span = (base.k(1.0 - q_lo, compression, n) - k_lo).max(Q_EPS);
    base.q(k_lo + (k - 1.0) * span / interior, compression, n)
}

fn spliced_max(base: Scale, q: f64, compression: f64, n: f64) -> f64 {
    let q = clamp_unit(q);
    if q * n < 1.0 || (1.0 - q) * n < 1.0 {
        return 1.0 / n.max(1.0);
    }
    base.max(q, compression, n)
}

/* ------------------------------ TESTS ------------------------------ */
