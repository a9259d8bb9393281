//! The request pool: how much of each resource the requester wants pulled
//! out of the network on the next committed tick.
//!
//! Values are always finite and non-negative. The pool survives between
//! ticks until it is serviced, the requester changes, or network membership
//! changes.

use std::collections::BTreeMap;

use logistics_types::{ResourceName, ResourceTotals};

use crate::error::NetworkError;

/// Whether a committed request is waiting to be serviced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    /// Nothing to service.
    #[default]
    Idle,
    /// The next tick will carve the requested amounts out of the pool and
    /// hand them to the requester.
    Pending,
}

/// Requested amount per resource type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestPool {
    requests: BTreeMap<ResourceName, f64>,
}

impl RequestPool {
    /// Create an empty request pool.
    pub const fn new() -> Self {
        Self {
            requests: BTreeMap::new(),
        }
    }

    /// Replace the contents with a zero request for each resource.
    pub fn seed<'a>(&mut self, resources: impl IntoIterator<Item = &'a ResourceName>) {
        self.requests = resources.into_iter().map(|r| (r.clone(), 0.0)).collect();
    }

    /// Set the requested amount for `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidAmount`] if `amount` is negative or not
    /// finite.
    pub fn set(&mut self, resource: &ResourceName, amount: f64) -> Result<(), NetworkError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(NetworkError::InvalidAmount {
                resource: resource.clone(),
                amount,
            });
        }
        self.requests.insert(resource.clone(), amount);
        Ok(())
    }

    /// Set the requested amount clamped to `[0, ceiling]` and return the
    /// value actually stored.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidAmount`] if `amount` is NaN or infinite.
    pub fn set_clamped(
        &mut self,
        resource: &ResourceName,
        amount: f64,
        ceiling: f64,
    ) -> Result<f64, NetworkError> {
        if !amount.is_finite() {
            return Err(NetworkError::InvalidAmount {
                resource: resource.clone(),
                amount,
            });
        }
        let clamped = amount.min(ceiling).max(0.0);
        self.set(resource, clamped)?;
        Ok(clamped)
    }

    /// The requested amount for `resource`, zero when absent.
    pub fn get(&self, resource: &ResourceName) -> f64 {
        self.requests.get(resource).copied().unwrap_or(0.0)
    }

    /// Iterate entries in resource-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceName, f64)> {
        self.requests.iter().map(|(k, v)| (k, *v))
    }

    /// Whether any entry asks for a positive amount.
    pub fn has_outstanding(&self) -> bool {
        self.requests.values().any(|v| *v > 0.0)
    }

    /// Reset every entry to zero, keeping the keys.
    pub fn reset(&mut self) {
        for value in self.requests.values_mut() {
            *value = 0.0;
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.requests.clear();
    }

    /// Copy the entries out for display.
    pub fn to_totals(&self) -> ResourceTotals {
        self.requests.clone()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn fuel() -> ResourceName {
        ResourceName::new("Fuel")
    }

    #[test]
    fn seed_creates_zero_entries() {
        let mut pool = RequestPool::new();
        let names = [fuel(), ResourceName::new("Water")];
        pool.seed(&names);
        assert_eq!(pool.iter().count(), 2);
        assert!(!pool.has_outstanding());
    }

    #[test]
    fn set_rejects_negative_and_non_finite() {
        let mut pool = RequestPool::new();
        assert!(pool.set(&fuel(), -1.0).is_err());
        assert!(pool.set(&fuel(), f64::NAN).is_err());
        assert!(pool.set(&fuel(), f64::INFINITY).is_err());
        assert!(pool.set(&fuel(), 4.0).is_ok());
        assert_eq!(pool.get(&fuel()), 4.0);
    }

    #[test]
    fn set_clamped_bounds_value() {
        let mut pool = RequestPool::new();
        assert_eq!(pool.set_clamped(&fuel(), 20.0, 15.0).ok(), Some(15.0));
        assert_eq!(pool.set_clamped(&fuel(), -5.0, 15.0).ok(), Some(0.0));
        assert_eq!(pool.set_clamped(&fuel(), 3.0, -1.0).ok(), Some(0.0));
        assert!(pool.set_clamped(&fuel(), f64::NAN, 15.0).is_err());
    }

    #[test]
    fn reset_keeps_keys() {
        let mut pool = RequestPool::new();
        assert!(pool.set(&fuel(), 7.0).is_ok());
        assert!(pool.has_outstanding());
        pool.reset();
        assert!(!pool.has_outstanding());
        assert_eq!(pool.iter().count(), 1);
        pool.clear();
        assert_eq!(pool.iter().count(), 0);
    }

    #[test]
    fn missing_entry_reads_zero() {
        assert_eq!(RequestPool::new().get(&fuel()), 0.0);
    }
}
