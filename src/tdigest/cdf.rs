// src/tdigest/cdf.rs
use super::TDigest;

impl TDigest {
    /// Cumulative rank of `x` in [0, 1].
    ///
    /// Forces a merge so pending observations are visible. Returns NaN on an
    /// empty digest. The interpolation regions mirror `quantile`: half a
    /// centroid of weight hangs off each side of every mean, and the
    /// outermost halves stretch to the observed extrema.
    pub fn cdf(&mut self, x: f64) -> f64 {
        self.process();
        if self.processed.is_empty() || x.is_nan() {
            return f64::NAN;
        }

        if self.processed.len() == 1 {
            let m = self.processed[0].mean();
            return if x < m {
                0.0
            } else if x > m {
                1.0
            } else {
                0.5
            };
        }

        let (min, max) = (self.min(), self.max());
        if x <= min {
            return 0.0;
        }
        if x >= max {
            return 1.0;
        }

        let total = self.processed_weight;
        let cells = self.processed.as_slice();

        let first = cells[0];
        if x <= first.mean() {
            // left tail: the first half-centroid spread over [min, mean0]
            if first.mean() - min > 0.0 {
                return (x - min) / (first.mean() - min) * first.weight() / 2.0 / total;
            }
            return 0.0;
        }
        let last = cells[cells.len() - 1];
        if x >= last.mean() {
            if max - last.mean() > 0.0 {
                return 1.0 - (max - x) / (max - last.mean()) * last.weight() / 2.0 / total;
            }
            return 1.0;
        }

        // strictly between two means now
        let idx = cells.partition_point(|c| c.mean() < x);
        let (left, right) = (cells[idx - 1], cells[idx]);
        let t = (x - left.mean()) / (right.mean() - left.mean());
        let rank = self.cumulative[idx - 1] + t * (self.cumulative[idx] - self.cumulative[idx - 1]);
        (rank / total).clamp(0.0, 1.0)
    }
}
