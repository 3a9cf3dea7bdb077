//! VATUSA/VATSIM API clients for the controller activity auditor.
//!
//! Provides:
//! - [`Client`]: read-only roster and session-history retrieval with
//!   bounded exponential-backoff retry, plus the batched activity
//!   classifier built on top of it
//! - [`RemovalClient`]: the credentialed, destructive roster-removal
//!   endpoints

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use ca_core::Session;

pub mod classify;
mod removal;
mod retry;
mod wire;

pub use classify::ClassifierConfig;
pub use removal::{RemovalClient, RemovalCredentials, RemovalFailure, RemovalReport};
pub use retry::RetryPolicy;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// VATUSA membership API (roster, removal).
pub const VATUSA_API_URL: &str = "https://api.vatusa.net/v2";
/// VATSIM statistics API (per-controller session history).
pub const VATSIM_API_URL: &str = "https://api.vatsim.net/v2";

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// Transport fault that persisted through the final retry attempt.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Every attempt drew a retryable status; no definitive response.
    #[error("retry budget exhausted after {attempts} attempts: GET {url}")]
    RetriesExhausted { url: String, attempts: u32 },
    /// Definitive non-200 response the caller cannot use.
    #[error("unexpected status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    /// The body did not match the documented payload shape.
    #[error("invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
    /// A required credential was absent or blank at construction time.
    #[error("missing credential: {name}")]
    MissingCredential { name: &'static str },
    /// Membership kind with no removal endpoint. Reported, never dropped.
    #[error("unsupported membership {membership:?} for CID {cid}")]
    UnsupportedMembership { cid: u32, membership: String },
}

/// Read-only client for the roster and session-history APIs.
pub struct Client {
    http: reqwest::Client,
    roster_base: String,
    sessions_base: String,
    retry: RetryPolicy,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("roster_base", &self.roster_base)
            .field("sessions_base", &self.sessions_base)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client against the production VATUSA/VATSIM endpoints.
    pub fn new(retry: RetryPolicy) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ApiError::ClientBuild)?;
        Ok(Self {
            http,
            roster_base: VATUSA_API_URL.to_string(),
            sessions_base: VATSIM_API_URL.to_string(),
            retry,
        })
    }

    /// Overrides the roster API base URL.
    #[must_use]
    pub fn with_roster_base(mut self, base: impl Into<String>) -> Self {
        self.roster_base = trim_base(base.into());
        self
    }

    /// Overrides the session-history API base URL.
    #[must_use]
    pub fn with_sessions_base(mut self, base: impl Into<String>) -> Self {
        self.sessions_base = trim_base(base.into());
        self
    }

    /// Fetches the full roster (home and visiting) for a facility.
    ///
    /// A failure here is fatal to the run; there is no meaningful partial
    /// result without a roster.
    pub async fn roster(&self, facility: &str) -> Result<Vec<ca_core::RosterEntry>, ApiError> {
        let url = format!("{}/facility/{facility}/roster/both", self.roster_base);
        let response = retry::fetch_with_retry(&self.http, &url, &self.retry).await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ApiError::Status { url, status });
        }
        let payload: wire::RosterResponse =
            response.json().await.map_err(|err| ApiError::InvalidResponse {
                url: url.clone(),
                message: err.to_string(),
            })?;
        Ok(payload
            .data
            .into_iter()
            .filter_map(wire::RosterRecord::into_entry)
            .collect())
    }

    /// Fetches one controller's full ATC session history.
    ///
    /// Sessions with unparseable timestamps are logged and dropped; they
    /// never abort the controller. A non-200 response means "unknown
    /// activity", not "inactive" — the caller must skip, not classify.
    pub async fn controller_sessions(&self, cid: u32) -> Result<Vec<Session>, ApiError> {
        let url = format!("{}/members/{cid}/atc", self.sessions_base);
        let response = retry::fetch_with_retry(&self.http, &url, &self.retry).await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ApiError::Status { url, status });
        }
        let payload: wire::SessionsResponse =
            response.json().await.map_err(|err| ApiError::InvalidResponse {
                url: url.clone(),
                message: err.to_string(),
            })?;
        Ok(payload
            .items
            .into_iter()
            .filter_map(|record| record.into_session(cid))
            .collect())
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}
