//! Core domain logic for the controller activity auditor.
//!
//! This crate contains the pure pieces of the audit pipeline:
//! - Roster types: controllers, ratings, membership
//! - Activity aggregation: time-windowed controlling hours per controller
//! - Classification rules: exempt/active/inactive partitioning
//! - Removal confirmation: the staged sign-off required before destructive
//!   roster actions

pub mod activity;
pub mod classify;
pub mod removal;
pub mod roster;

pub use activity::{
    ActivityError, ControllerActivity, Session, TIMESTAMP_FORMAT, aggregate_sessions,
    parse_timestamp,
};
pub use classify::{
    ClassificationResult, ControllerActivityRecord, ExemptController, batch_count, is_inactive,
    partition_observers,
};
pub use removal::{ConfirmationStage, RemovalConfirmation};
pub use roster::{Membership, Rating, RosterEntry, UnknownRating};
