//! Batched activity classification over the roster.
//!
//! Observers are exempted before any network call. Everyone else is
//! examined in fixed-size sequential batches with an unconditional pause
//! between batches — proactive rate-limit avoidance, separate from the
//! per-request backoff in [`crate::RetryPolicy`].

use std::time::Duration;

use chrono::{DateTime, Utc};

use ca_core::{
    ClassificationResult, ControllerActivityRecord, aggregate_sessions, batch_count, is_inactive,
    partition_observers,
};

use crate::Client;

/// Knobs for one classification run.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Trailing activity window in days.
    pub lookback_days: i64,
    /// Controllers below this many hours are inactive.
    pub min_hours: f64,
    /// Position-callsign prefixes that count toward the requirement.
    pub watched_prefixes: Vec<String>,
    /// Controllers fetched per batch.
    pub batch_size: usize,
    /// Unconditional pause between batches (not after the last).
    pub batch_pause: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            lookback_days: 90,
            min_hours: 3.0,
            watched_prefixes: Vec::new(),
            batch_size: 10,
            batch_pause: Duration::from_secs(30),
        }
    }
}

impl Client {
    /// Classifies the roster against the current time.
    pub async fn classify(
        &self,
        roster: Vec<ca_core::RosterEntry>,
        config: &ClassifierConfig,
    ) -> ClassificationResult {
        self.classify_at(roster, config, Utc::now()).await
    }

    /// Classifies the roster against an explicit `now`.
    ///
    /// The result is a pure function of the roster, the session snapshots,
    /// and `now`; re-running over unchanged inputs yields an identical
    /// result.
    pub async fn classify_at(
        &self,
        roster: Vec<ca_core::RosterEntry>,
        config: &ClassifierConfig,
        now: DateTime<Utc>,
    ) -> ClassificationResult {
        let (exempt, remaining) = partition_observers(roster);
        let batch_size = config.batch_size.max(1);
        tracing::info!(
            exempt = exempt.len(),
            rated = remaining.len(),
            batches = batch_count(remaining.len(), batch_size),
            "classifying roster"
        );

        let mut inactive = Vec::new();
        let mut total_processed = 0_usize;

        for (index, batch) in remaining.chunks(batch_size).enumerate() {
            if index > 0 {
                tracing::debug!(
                    pause_secs = config.batch_pause.as_secs_f64(),
                    "pausing before next batch"
                );
                tokio::time::sleep(config.batch_pause).await;
            }
            tracing::debug!(batch = index + 1, size = batch.len(), "processing batch");

            for entry in batch {
                match self.controller_sessions(entry.cid).await {
                    Ok(sessions) => {
                        let activity = aggregate_sessions(
                            &sessions,
                            now,
                            config.lookback_days,
                            &config.watched_prefixes,
                        );
                        total_processed += 1;
                        tracing::info!(
                            cid = entry.cid,
                            name = %entry.full_name(),
                            hours = activity.hours,
                            processed = total_processed,
                            "controller processed"
                        );
                        if is_inactive(activity.hours, config.min_hours) {
                            inactive.push(ControllerActivityRecord::new(entry, activity));
                        }
                    }
                    Err(err) => {
                        // Unknown activity, not inactive: skip this one
                        // controller, keep the run alive.
                        tracing::warn!(
                            cid = entry.cid,
                            name = %entry.full_name(),
                            error = %err,
                            "skipping controller, session history unavailable"
                        );
                    }
                }
            }
        }

        ClassificationResult {
            inactive,
            exempt,
            total_processed,
        }
    }
}
