//! Core geometry newtypes

use std::ops::{Add, Mul};

/// Length along the scroll axis, in the same unit as `row_extent_px`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Extent(u64);

impl Extent {
    /// Zero extent.
    pub const ZERO: Self = Self(0);

    /// Create a new Extent from a raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw u64 value.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Add an amount, saturating at u64::MAX.
    pub fn saturating_add(&self, other: Extent) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtract an amount, saturating at 0.
    pub fn saturating_sub(&self, other: Extent) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for Extent {
    type Output = Extent;

    fn add(self, rhs: Extent) -> Extent {
        self.saturating_add(rhs)
    }
}

impl Mul<usize> for RowExtent {
    type Output = Extent;

    fn mul(self, rows: usize) -> Extent {
        Extent(self.0.saturating_mul(rows as u64))
    }
}

/// Error returned when attempting to create a zero RowExtent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("row extent must be >= 1 (got {0})")]
pub struct InvalidRowExtent(pub u64);

/// Fixed extent of one row. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowExtent(u64);

impl RowExtent {
    /// Smallest valid row extent.
    pub const ONE: Self = Self(1);

    /// Extent of a standard list row (48).
    pub const STANDARD: Self = Self(48);

    /// Smart constructor that rejects zero.
    pub fn new(extent: u64) -> Result<Self, InvalidRowExtent> {
        if extent == 0 {
            Err(InvalidRowExtent(extent))
        } else {
            Ok(Self(extent))
        }
    }

    /// Get the raw u64 value.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Row extent as a plain [`Extent`].
    pub fn extent(&self) -> Extent {
        Extent(self.0)
    }
}

impl Default for RowExtent {
    fn default() -> Self {
        Self::ONE
    }
}
