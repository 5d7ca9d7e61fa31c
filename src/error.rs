//! Error type for table construction and insertion.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TableError {
    /// A computed bucket index fell outside `[0, capacity)`. Only a broken
    /// hash function produces this; `insert` reports it before mutating.
    #[error("bucket index {index} out of range for capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },
    #[error("table capacity must be at least one bucket")]
    ZeroCapacity,
    #[error("load factor must be finite and greater than zero, got {0}")]
    InvalidLoadFactor(f64),
}

pub type Result<T> = core::result::Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let e = TableError::IndexOutOfRange {
            index: 17,
            capacity: 16,
        };
        assert_eq!(e.to_string(), "bucket index 17 out of range for capacity 16");
        assert_eq!(
            TableError::InvalidLoadFactor(-1.0).to_string(),
            "load factor must be finite and greater than zero, got -1"
        );
    }
}
