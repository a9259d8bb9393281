//! Fair-share distribution of a target amount across containers of one
//! resource type.
//!
//! The rule is water-filling with priority to small containers:
//!
//! 1. `portion = amount / count` is the naive even share.
//! 2. Containers whose capacity is below `portion` (minors) are filled to
//!    capacity and their capacity is taken out of `amount`.
//! 3. The remaining containers (majors) are re-divided the same way until
//!    either no minors are left, in which case every major gets exactly
//!    `portion`, or the remaining amount runs out, in which case every
//!    remaining major gets zero.
//!
//! Each round either shrinks the major set or ends, so the loop terminates.
//! Comparisons are plain float comparisons with no epsilon.
//!
//! [`share_resource`] is pure: it takes capacities and returns amounts.
//! [`apply_share`] writes the result back into the fleet.

use logistics_types::Fleet;

use crate::registry::ContainerRef;

/// Amounts assigned by one distribution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Share {
    /// Assigned amount per container, in input order.
    pub amounts: Vec<f64>,
    /// Part of the target that did not fit anywhere. Non-zero only when the
    /// target exceeds the total capacity.
    pub discarded: f64,
}

impl Share {
    /// Sum of the assigned amounts.
    pub fn assigned(&self) -> f64 {
        self.amounts.iter().sum()
    }
}

/// Distribute `amount` across containers with the given `capacities`.
///
/// Negative, NaN, and infinite targets are treated as zero. Every container
/// is assigned a value, so calling this with a zero target clears stale
/// amounts. When `amount` exceeds the total capacity every container is
/// filled and the remainder is reported in [`Share::discarded`].
pub fn share_resource(capacities: &[f64], amount: f64) -> Share {
    let mut amounts = vec![0.0; capacities.len()];
    let mut remaining = if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    };

    let mut majors: Vec<(usize, f64)> = capacities
        .iter()
        .map(|cap| cap.max(0.0))
        .enumerate()
        .collect();

    while !majors.is_empty() {
        let portion = remaining / count_as_f64(majors.len());
        let (minors, rest): (Vec<_>, Vec<_>) =
            majors.into_iter().partition(|&(_, cap)| cap < portion);

        if minors.is_empty() {
            for &(index, _) in &rest {
                assign(&mut amounts, index, portion);
            }
            remaining = 0.0;
            break;
        }

        for (index, cap) in minors {
            assign(&mut amounts, index, cap);
            remaining -= cap;
        }

        if remaining <= 0.0 {
            remaining = 0.0;
            break;
        }
        majors = rest;
    }

    Share {
        amounts,
        discarded: remaining,
    }
}

/// Write a [`Share`] back into the containers it was computed for.
///
/// `group` must be the container list the capacities were read from, in the
/// same order.
pub fn apply_share(fleet: &mut Fleet, group: &[ContainerRef], share: &Share) {
    for (r, &amount) in group.iter().zip(&share.amounts) {
        if let Some(container) = r.resolve_mut(fleet) {
            container.amount = amount;
        }
    }
}

fn assign(amounts: &mut [f64], index: usize, value: f64) {
    if let Some(slot) = amounts.get_mut(index) {
        *slot = value;
    }
}

fn count_as_f64(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}
