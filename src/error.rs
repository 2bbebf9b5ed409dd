// src/error.rs
use core::fmt;

/// Library-wide error for taildigest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TdError {
    /// Non-positive or NaN weight supplied to an ingest call, or a negative
    /// weight supplied to a centroid absorption.
    /// `context` pinpoints where it came from (e.g., "sample weight", "centroid add").
    InvalidWeight { context: &'static str },

    /// User tried to insert NaN/±inf as a sample value.
    NonFiniteInput { context: &'static str },

    /// Malformed binary input during unmarshalling.
    CorruptData { context: &'static str },
}

impl fmt::Display for TdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TdError::InvalidWeight { context } => write!(
                f,
                "tdigest: weight must be positive and finite ({}). \
hint: drop or clamp non-positive weights before feeding the digest",
                context
            ),
            TdError::NonFiniteInput { context } => write!(
                f,
                "tdigest: non-finite values are not allowed ({}). \
hint: clean your data or drop NaN/±inf before adding samples",
                context
            ),
            TdError::CorruptData { context } => write!(
                f,
                "tdigest: corrupt binary input ({}). \
hint: the buffer is not a digest or centroid list produced by this codec",
                context
            ),
        }
    }
}

impl std::error::Error for TdError {}

pub type TdResult<T> = Result<T, TdError>;

#[cfg(test)]
mod tests {
    use super::TdError;

    #[test]
    fn display_carries_context() {
        let e = TdError::InvalidWeight {
            context: "sample weight",
        };
        assert!(e.to_string().contains("sample weight"));

        let e = TdError::CorruptData { context: "magic" };
        assert!(e.to_string().contains("corrupt"));
    }
}
