//! Time-windowed aggregation of controlling sessions.
//!
//! A controller's activity is the total connected time, over a trailing
//! lookback window, on positions whose callsign starts with one of the
//! facility's watched prefixes. Hours are rounded to two decimals once at
//! the end so per-session rounding error cannot compound.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use thiserror::Error;

/// Wire format of session timestamps, e.g. `2025-06-01T18:30:00Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Errors raised by activity aggregation inputs.
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("invalid timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        source: chrono::ParseError,
    },
}

/// One continuous connection to a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub callsign: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Aggregated activity for one controller over the lookback window.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerActivity {
    /// Total controlling hours, rounded to two decimals. Never negative.
    pub hours: f64,
    /// Distinct callsigns worked, sorted lexicographically.
    pub positions: Vec<String>,
}

/// Parses a session timestamp as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ActivityError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| ActivityError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

/// Sums the controller's connected time within the lookback window.
///
/// A session counts only if it started at or after `now - lookback_days`
/// AND its callsign starts with one of `watched_prefixes` (case-sensitive
/// prefix match). A session that ends before it starts is a data-integrity
/// fault: it is logged and skipped, contributing nothing.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate_sessions(
    sessions: &[Session],
    now: DateTime<Utc>,
    lookback_days: i64,
    watched_prefixes: &[String],
) -> ControllerActivity {
    let cutoff = now - Duration::days(lookback_days);
    let mut total_seconds: i64 = 0;
    let mut positions = BTreeSet::new();

    for session in sessions {
        if session.start < cutoff {
            continue;
        }
        if !watched_prefixes
            .iter()
            .any(|prefix| session.callsign.starts_with(prefix.as_str()))
        {
            continue;
        }
        if session.end < session.start {
            tracing::warn!(
                callsign = %session.callsign,
                start = %session.start,
                end = %session.end,
                "session ends before it starts, skipping"
            );
            continue;
        }
        total_seconds += (session.end - session.start).num_seconds();
        positions.insert(session.callsign.clone());
    }

    ControllerActivity {
        hours: round_hours(total_seconds as f64 / SECONDS_PER_HOUR),
        positions: positions.into_iter().collect(),
    }
}

/// Rounds to two decimal places.
fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}
