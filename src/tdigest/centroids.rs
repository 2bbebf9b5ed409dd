//! Centroid representation for the digest.
//!
//! A centroid is a weighted mean summarising a cluster of nearby
//! observations. `CentroidList` is the container the digest works with: the
//! processed half is kept sorted ascending by mean, the unprocessed half is
//! the same type used as an append-only scratch buffer.

use std::cmp::Ordering;
use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{TdError, TdResult};

/// A centroid summarizes a cluster in the digest: `weight` observations
/// clustered at `mean`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Centroid {
    mean: OrderedFloat<f64>,
    weight: OrderedFloat<f64>,
}

impl PartialOrd for Centroid {
    fn partial_cmp(&self, other: &Centroid) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Centroid {
    fn cmp(&self, other: &Centroid) -> Ordering {
        // Ordering is by mean alone; ties are resolved by the (stable) sort.
        self.mean.cmp(&other.mean)
    }
}

impl Centroid {
    pub fn new(mean: f64, weight: f64) -> Self {
        Centroid {
            mean: OrderedFloat::from(mean),
            weight: OrderedFloat::from(weight),
        }
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean.into_inner()
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight.into_inner()
    }

    /// Absorb `other` into this centroid using the incremental weighted-mean
    /// update. Fails when `other` carries negative weight; absorbing into a
    /// zero-weight centroid takes `other`'s mean outright.
    pub fn add(&mut self, other: Centroid) -> TdResult<()> {
        if other.weight() < 0.0 {
            return Err(TdError::InvalidWeight {
                context: "centroid add",
            });
        }
        self.fold(other);
        Ok(())
    }

    /// Absorption without the weight check, for the compaction loop where
    /// weights were validated at ingest.
    #[inline]
    pub(crate) fn fold(&mut self, other: Centroid) {
        let w0 = self.weight.into_inner();
        if w0 != 0.0 {
            let w = w0 + other.weight();
            let m = self.mean.into_inner() + other.weight() * (other.mean() - self.mean.into_inner()) / w;
            self.weight = OrderedFloat::from(w);
            self.mean = OrderedFloat::from(m);
        } else {
            self.mean = other.mean;
            self.weight = other.weight;
        }
    }
}

impl fmt::Display for Centroid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{mean: {:.6} weight: {:.6}}}",
            self.mean.into_inner(),
            self.weight.into_inner()
        )
    }
}

/// An ordered sequence of centroids, ascending by mean. Duplicate means are
/// retained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentroidList(Vec<Centroid>);

impl CentroidList {
    /// Build a sorted list from an arbitrary sequence of centroids.
    pub fn from_unsorted(mut centroids: Vec<Centroid>) -> Self {
        centroids.sort();
        CentroidList(centroids)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        CentroidList(Vec::with_capacity(capacity))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Centroid] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Centroid> {
        self.0.iter()
    }

    pub fn total_weight(&self) -> f64 {
        self.0.iter().map(|c| c.weight()).sum()
    }

    #[inline]
    pub(crate) fn push(&mut self, c: Centroid) {
        self.0.push(c);
    }

    /// Clears contents but keeps the allocation, so steady-state merge cycles
    /// stay allocation-free.
    #[inline]
    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    /// Move all of `other`'s centroids onto the end of this list, leaving
    /// `other` empty with its capacity intact.
    #[inline]
    pub(crate) fn append(&mut self, other: &mut CentroidList) {
        self.0.append(&mut other.0);
    }

    /// Stable sort ascending by mean: equal means keep their buffer order, so
    /// compaction output is identical however ties arrived.
    #[inline]
    pub(crate) fn sort_by_mean(&mut self) {
        self.0.sort();
    }

    /// Multiply every weight by `factor`, dropping centroids that fall below
    /// `floor`. Returns the surviving total weight.
    pub(crate) fn scale_weights(&mut self, factor: f64, floor: f64) -> f64 {
        let mut total = 0.0;
        self.0.retain_mut(|c| {
            let w = c.weight() * factor;
            if w < floor {
                return false;
            }
            *c = Centroid::new(c.mean(), w);
            total += w;
            true
        });
        total
    }
}

impl std::ops::Index<usize> for CentroidList {
    type Output = Centroid;

    fn index(&self, index: usize) -> &Centroid {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a CentroidList {
    type Item = &'a Centroid;
    type IntoIter = std::slice::Iter<'a, Centroid>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Centroid, CentroidList};
    use crate::error::TdError;

    #[test]
    fn add_with_negative_weight_fails() {
        let mut c = Centroid::new(0.0, 0.0);
        let err = c.add(Centroid::new(0.0, -1.0)).unwrap_err();
        assert_eq!(
            err,
            TdError::InvalidWeight {
                context: "centroid add"
            }
        );
        // failed absorption leaves the centroid untouched
        assert_eq!(c, Centroid::new(0.0, 0.0));
    }

    #[test]
    fn add_into_zero_weight_takes_other() {
        let mut c = Centroid::new(1.0, 0.0);
        c.add(Centroid::new(2.0, 1.0)).unwrap();
        assert_eq!(c, Centroid::new(2.0, 1.0));
    }

    #[test]
    fn add_weight_order_of_magnitude() {
        let mut c = Centroid::new(1.0, 1.0);
        c.add(Centroid::new(10.0, 10.0)).unwrap();
        assert_eq!(c.weight(), 11.0);
        assert_eq!(c.mean(), 9.181818181818182);
    }

    #[test]
    fn add_zero_weight_is_noop() {
        let mut c = Centroid::new(3.0, 4.0);
        c.add(Centroid::new(100.0, 0.0)).unwrap();
        assert_eq!(c, Centroid::new(3.0, 4.0));
    }

    #[test]
    fn list_sorts_by_mean_ascending() {
        let list = CentroidList::from_unsorted(vec![
            Centroid::new(2.0, 1.0),
            Centroid::new(1.0, 1.0),
        ]);
        assert_eq!(list[0].mean(), 1.0);
        assert_eq!(list[1].mean(), 2.0);
    }

    #[test]
    fn list_single_element_is_identity() {
        let list = CentroidList::from_unsorted(vec![Centroid::new(1.0, 1.0)]);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].mean(), 1.0);
    }

    #[test]
    fn list_retains_duplicate_means() {
        let list = CentroidList::from_unsorted(vec![
            Centroid::new(1.0, 1.0),
            Centroid::new(1.0, 2.0),
        ]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.total_weight(), 3.0);
    }

    #[test]
    fn display_uses_fixed_fraction() {
        let c = Centroid::new(7.0, 1.0);
        assert_eq!(c.to_string(), "{mean: 7.000000 weight: 1.000000}");
    }
}
