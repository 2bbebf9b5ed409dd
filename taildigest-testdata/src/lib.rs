//! taildigest-testdata
//! Seeded synthetic data generators shared by benches and integration tests.
//! Shapes mirror the streams the digest is built for: flat telemetry counters,
//! normal-ish latencies, heavy-tailed sizes, and a clumpy mixture.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal, Normal};

/// Available synthetic distributions.
#[derive(Clone, Copy, Debug)]
pub enum DistKind {
    /// Uniform in [lo, hi)
    Uniform { lo: f64, hi: f64 },
    /// Gaussian with the given mean and standard deviation
    Normal { mu: f64, sigma: f64 },
    /// Log-normal: exp(N(mu, sigma²)); heavy right tail
    LogNormal { mu: f64, sigma: f64 },
    /// Mixed: clumps, a broad region, and heavy tails on [0, 100]
    Mixture,
}

/// Generate `n` samples for the chosen distribution.
pub fn gen_dataset(kind: DistKind, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(n);

    match kind {
        DistKind::Uniform { lo, hi } => {
            for _ in 0..n {
                out.push(lo + (hi - lo) * rng.random::<f64>());
            }
        }
        DistKind::Normal { mu, sigma } => {
            let normal = Normal::new(mu, sigma).unwrap();
            for _ in 0..n {
                out.push(normal.sample(&mut rng));
            }
        }
        DistKind::LogNormal { mu, sigma } => {
            let lognormal = LogNormal::new(mu, sigma).unwrap();
            for _ in 0..n {
                out.push(lognormal.sample(&mut rng));
            }
        }
        DistKind::Mixture => {
            for _ in 0..n {
                let bucket: u32 = rng.random_range(0..100);
                let v = match bucket {
                    // Clumps around 10, 50, 90 with micro-noise
                    0..=29 => {
                        let center = match rng.random_range(0..3) {
                            0 => 10.0,
                            1 => 50.0,
                            _ => 90.0,
                        };
                        center + rng.random_range(-1.0..1.0) * 1e-1
                    }
                    // Broad uniform region
                    30..=69 => rng.random::<f64>() * 100.0,
                    // Heavier tails near 0 and 100
                    _ => {
                        let exp = rng.random_range(3.0..9.0);
                        if rng.random_bool(0.5) {
                            100.0 * rng.random::<f64>().clamp(1e-12, 1.0).powf(exp)
                        } else {
                            100.0 * (1.0 - rng.random::<f64>().clamp(1e-12, 1.0).powf(exp))
                        }
                    }
                };
                out.push(v.clamp(0.0, 100.0));
            }
        }
    }
    out
}
