// src/tdigest/quantile.rs
use super::TDigest;

impl TDigest {
    /// Value at cumulative rank `q · total_weight`.
    ///
    /// Forces a merge so pending observations are visible. Returns NaN on an
    /// empty digest; `q` outside [0, 1] clamps, so `quantile(0) == min` and
    /// `quantile(1) == max` hold exactly.
    pub fn quantile(&mut self, q: f64) -> f64 {
        self.process();
        if self.processed.is_empty() || q.is_nan() {
            return f64::NAN;
        }
        let q = q.clamp(0.0, 1.0);
        if q <= 0.0 {
            return self.min();
        }
        if q >= 1.0 {
            return self.max();
        }
        if self.processed.len() == 1 {
            return self.processed[0].mean();
        }

        let total = self.processed_weight;
        let target = q * total;
        let cells = self.processed.as_slice();
        let idx = self.cumulative.partition_point(|&c| c < target);

        if idx == 0 {
            // first half-centroid: interpolate up from the observed minimum
            let c0 = cells[0];
            let half = c0.weight() / 2.0;
            let v = self.min() + (target / half) * (c0.mean() - self.min());
            return v.max(self.min());
        }
        if idx == cells.len() {
            // last half-centroid: interpolate out to the observed maximum
            let cn = cells[cells.len() - 1];
            let half = cn.weight() / 2.0;
            let v = cn.mean() + ((target - (total - half)) / half) * (self.max() - cn.mean());
            return v.min(self.max());
        }

        let (left, right) = (cells[idx - 1], cells[idx]);
        let (lo, hi) = (self.cumulative[idx - 1], self.cumulative[idx]);
        left.mean() + ((target - lo) / (hi - lo)) * (right.mean() - left.mean())
    }
}
