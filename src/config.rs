//! Table configuration: initial bucket count and growth threshold.

use crate::error::{Result, TableError};

pub const DEFAULT_INITIAL_CAPACITY: usize = 16;
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Checks that the capacity is positive and the load factor is a finite,
    /// strictly positive number. Load factors above 1.0 are allowed: chains
    /// simply get longer before the table grows.
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(TableError::ZeroCapacity);
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(TableError::InvalidLoadFactor(self.load_factor));
        }
        Ok(())
    }
}
