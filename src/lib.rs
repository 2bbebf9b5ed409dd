pub mod error;
pub mod tdigest;

pub use error::{TdError, TdResult};
pub use tdigest::{Centroid, CentroidList, Scale, TDigest};
