//! Scale functions for position mappings.
//!
//! A scale maps a domain interval onto a range interval. The coordinate
//! transform is built from two linear scales per panel, and their
//! inverses give the reverse mapping.

use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale for the named axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateRange`] if the domain has zero span or
    /// either bound is not finite.
    pub fn new(axis: &'static str, domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        let span = domain.1 - domain.0;
        if !span.is_finite() || span == 0.0 {
            return Err(Error::DegenerateRange { axis, min: domain.0, max: domain.1 });
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Unit scale over the domain: maps `domain` onto `[0, 1]`.
    ///
    /// # Errors
    ///
    /// See [`LinearScale::new`].
    pub fn unit(axis: &'static str, domain: (f64, f64)) -> Result<Self> {
        Self::new(axis, domain, (0.0, 1.0))
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f64) -> f64 {
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}
