//! Roster removal endpoints. Destructive and credentialed.
//!
//! Home and visiting controllers are removed through different endpoints;
//! any other membership is reported as a failure without a request being
//! made. Callers are expected to have walked the confirmation state
//! machine in `ca-core` before touching this.

use std::fmt;
use std::time::Duration;

use ca_core::{ControllerActivityRecord, Membership};

use crate::{ApiError, DEFAULT_TIMEOUT, VATUSA_API_URL};

/// Pause between removal requests. Courtesy, not backoff.
const REQUEST_PAUSE: Duration = Duration::from_secs(1);

/// API key plus the administrator CID removals are attributed to.
///
/// Validated at construction; a blank credential never reaches a request.
#[derive(Clone)]
pub struct RemovalCredentials {
    api_key: String,
    admin_cid: String,
}

impl fmt::Debug for RemovalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemovalCredentials")
            .field("api_key", &"[REDACTED]")
            .field("admin_cid", &self.admin_cid)
            .finish()
    }
}

impl RemovalCredentials {
    pub fn new(
        api_key: impl Into<String>,
        admin_cid: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let api_key = api_key.into();
        let admin_cid = admin_cid.into();
        if api_key.trim().is_empty() {
            return Err(ApiError::MissingCredential { name: "api_key" });
        }
        if admin_cid.trim().is_empty() {
            return Err(ApiError::MissingCredential { name: "admin_cid" });
        }
        Ok(Self { api_key, admin_cid })
    }
}

/// One failed removal, with enough context for the summary.
#[derive(Debug, Clone)]
pub struct RemovalFailure {
    pub cid: u32,
    pub name: String,
    pub reason: String,
}

/// Per-record outcomes of a removal pass.
#[derive(Debug, Clone, Default)]
pub struct RemovalReport {
    pub succeeded: Vec<u32>,
    pub failed: Vec<RemovalFailure>,
}

impl RemovalReport {
    /// True when at least one removal ran and none failed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        !self.succeeded.is_empty() && self.failed.is_empty()
    }
}

/// Client for the authenticated roster-removal endpoints.
#[derive(Debug)]
pub struct RemovalClient {
    http: reqwest::Client,
    base_url: String,
    credentials: RemovalCredentials,
    request_pause: Duration,
}

impl RemovalClient {
    pub fn new(credentials: RemovalCredentials) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ApiError::ClientBuild)?;
        Ok(Self {
            http,
            base_url: VATUSA_API_URL.to_string(),
            credentials,
            request_pause: REQUEST_PAUSE,
        })
    }

    /// Overrides the removal API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the pause between removal requests.
    #[must_use]
    pub const fn with_request_pause(mut self, pause: Duration) -> Self {
        self.request_pause = pause;
        self
    }

    /// Removes a home controller from the facility roster.
    pub async fn remove_home(
        &self,
        facility: &str,
        cid: u32,
        reason: &str,
    ) -> Result<(), ApiError> {
        let url = format!("{}/facility/{facility}/roster/{cid}", self.base_url);
        let response = self
            .http
            .delete(&url)
            .form(&[
                ("reason", reason),
                ("apikey", &self.credentials.api_key),
                ("by", &self.credentials.admin_cid),
            ])
            .send()
            .await?;
        let status = response.status();
        if status == reqwest::StatusCode::OK {
            Ok(())
        } else {
            Err(ApiError::Status { url, status })
        }
    }

    /// Removes a visiting controller from the facility roster.
    pub async fn remove_visitor(
        &self,
        facility: &str,
        cid: u32,
        reason: &str,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/facility/{facility}/roster/manageVisitor/{cid}",
            self.base_url
        );
        let response = self
            .http
            .delete(&url)
            .form(&[("reason", reason), ("apikey", &self.credentials.api_key)])
            .send()
            .await?;
        let status = response.status();
        if status == reqwest::StatusCode::OK {
            Ok(())
        } else {
            Err(ApiError::Status { url, status })
        }
    }

    /// Removes each inactive controller, routing on membership. Failures
    /// are collected per record; one failure never stops the rest.
    pub async fn remove_all(
        &self,
        records: &[ControllerActivityRecord],
        facility: &str,
        lookback_days: i64,
    ) -> RemovalReport {
        let mut report = RemovalReport::default();

        for (index, record) in records.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.request_pause).await;
            }
            let reason = format!(
                "Controller was removed in good standing due to inactivity. \
                 ({:.2} hours in last {lookback_days} days)",
                record.hours
            );
            let outcome = match &record.membership {
                Membership::Home => self.remove_home(facility, record.cid, &reason).await,
                Membership::Visitor => self.remove_visitor(facility, record.cid, &reason).await,
                Membership::Other(value) => Err(ApiError::UnsupportedMembership {
                    cid: record.cid,
                    membership: value.clone(),
                }),
            };
            match outcome {
                Ok(()) => {
                    tracing::info!(
                        cid = record.cid,
                        name = %record.full_name(),
                        membership = %record.membership,
                        "controller removed"
                    );
                    report.succeeded.push(record.cid);
                }
                Err(err) => {
                    tracing::warn!(
                        cid = record.cid,
                        name = %record.full_name(),
                        error = %err,
                        "removal failed"
                    );
                    report.failed.push(RemovalFailure {
                        cid: record.cid,
                        name: record.full_name(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use httpmock::Method::DELETE;
    use httpmock::MockServer;

    use ca_core::Rating;

    use super::*;

    fn credentials() -> RemovalCredentials {
        RemovalCredentials::new("test-key", "800000").unwrap()
    }

    fn test_client(server: &MockServer) -> RemovalClient {
        RemovalClient::new(credentials())
            .unwrap()
            .with_base_url(server.base_url())
            .with_request_pause(Duration::ZERO)
    }

    fn record(cid: u32, membership: Membership) -> ControllerActivityRecord {
        ControllerActivityRecord {
            cid,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            hours: 1.25,
            rating: Rating::C1,
            positions: vec!["JAX_TWR".to_string()],
            membership,
        }
    }

    #[test]
    fn credentials_reject_blank_values() {
        assert!(matches!(
            RemovalCredentials::new("", "800000"),
            Err(ApiError::MissingCredential { name: "api_key" })
        ));
        assert!(matches!(
            RemovalCredentials::new("key", "   "),
            Err(ApiError::MissingCredential { name: "admin_cid" })
        ));
    }

    #[test]
    fn credentials_debug_redacts_api_key() {
        let debug = format!("{:?}", credentials());
        assert!(!debug.contains("test-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn home_removal_hits_roster_endpoint_with_credentials() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/facility/ZJX/roster/1000001")
                    .body_contains("apikey=test-key")
                    .body_contains("by=800000");
                then.status(200);
            })
            .await;

        test_client(&server)
            .remove_home("ZJX", 1_000_001, "inactivity")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn visitor_removal_hits_manage_visitor_endpoint() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/facility/ZJX/roster/manageVisitor/1000002")
                    .body_contains("apikey=test-key");
                then.status(200);
            })
            .await;

        test_client(&server)
            .remove_visitor("ZJX", 1_000_002, "inactivity")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_200_removal_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/facility/ZJX/roster/1000001");
                then.status(404);
            })
            .await;

        let err = test_client(&server)
            .remove_home("ZJX", 1_000_001, "inactivity")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { .. }));
    }

    #[tokio::test]
    async fn unsupported_membership_fails_without_a_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE);
                then.status(200);
            })
            .await;

        let records = [record(1_000_003, Membership::Other("staff".to_string()))];
        let report = test_client(&server).remove_all(&records, "ZJX", 90).await;

        assert!(report.succeeded.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].reason.contains("unsupported membership"));
        assert!(!report.all_succeeded());
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn remove_all_routes_on_membership_and_reports() {
        let server = MockServer::start_async().await;
        let home = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/facility/ZJX/roster/1000001")
                    .body_contains("1.25+hours+in+last+90+days");
                then.status(200);
            })
            .await;
        let visitor = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/facility/ZJX/roster/manageVisitor/1000002");
                then.status(500);
            })
            .await;

        let records = [
            record(1_000_001, Membership::Home),
            record(1_000_002, Membership::Visitor),
        ];
        let report = test_client(&server).remove_all(&records, "ZJX", 90).await;

        home.assert_async().await;
        visitor.assert_async().await;
        assert_eq!(report.succeeded, vec![1_000_001]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].cid, 1_000_002);
        assert!(!report.all_succeeded());
    }
}
