//! Classification rules: exempt/active/inactive partitioning.
//!
//! Observer-rated controllers are exempt and filtered before any network
//! call. The remaining controllers are classified on their aggregated hours
//! alone; active controllers are dropped from the result.

use serde::Serialize;

use crate::activity::ControllerActivity;
use crate::roster::{Membership, Rating, RosterEntry};

/// A controller exempt from the activity requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExemptController {
    pub cid: u32,
    pub first_name: String,
    pub last_name: String,
}

/// Roster identity joined with aggregated activity. The unit handed to the
/// notice mailer and the roster remover.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerActivityRecord {
    pub cid: u32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub hours: f64,
    pub rating: Rating,
    pub positions: Vec<String>,
    pub membership: Membership,
}

impl ControllerActivityRecord {
    #[must_use]
    pub fn new(entry: &RosterEntry, activity: ControllerActivity) -> Self {
        Self {
            cid: entry.cid,
            first_name: entry.first_name.clone(),
            last_name: entry.last_name.clone(),
            email: entry.email.clone(),
            hours: activity.hours,
            rating: entry.rating,
            positions: activity.positions,
            membership: entry.membership.clone(),
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Outcome of one classification run.
///
/// `inactive` and `exempt` preserve roster order. `total_processed` counts
/// only non-exempt controllers whose session history was actually examined;
/// controllers skipped on fetch failure are excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub inactive: Vec<ControllerActivityRecord>,
    pub exempt: Vec<ExemptController>,
    pub total_processed: usize,
}

/// Splits the roster into exempt observers and everyone else, preserving
/// order. Pure filter, zero API cost; runs before any session fetch.
#[must_use]
pub fn partition_observers(roster: Vec<RosterEntry>) -> (Vec<ExemptController>, Vec<RosterEntry>) {
    let mut exempt = Vec::new();
    let mut remaining = Vec::new();
    for entry in roster {
        if entry.rating.is_observer() {
            exempt.push(ExemptController {
                cid: entry.cid,
                first_name: entry.first_name,
                last_name: entry.last_name,
            });
        } else {
            remaining.push(entry);
        }
    }
    (exempt, remaining)
}

/// The inactivity rule: strictly fewer hours than the threshold.
#[must_use]
pub fn is_inactive(hours: f64, min_hours: f64) -> bool {
    hours < min_hours
}

/// Number of batches needed to cover `total` entries, by ceiling division.
#[must_use]
pub const fn batch_count(total: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        0
    } else {
        total.div_ceil(batch_size)
    }
}
