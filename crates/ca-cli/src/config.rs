//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Datelike, Utc};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use ca_api::{ClassifierConfig, RetryPolicy};
use ca_notify::{MailerConfig, NoticeContext};

/// Position prefixes that count toward the ZJX activity requirement.
const ZJX_WATCHED_PREFIXES: &[&str] = &[
    "JAX_", "MCO_", "PNS_", "CAE_", "CHS_", "DAB_", "FLO_", "MYR_", "PAM_", "SAV_", "TLH_", "VLD_",
    "VPS_", "NBC_", "OZR_", "SSC_", "ABY_", "COF_", "CRE_", "CRG_", "DHN_", "DTS_", "ECP_", "EGI_",
    "EVB_", "EZM_", "FIN_", "GNV_", "HRT_", "HXD_", "ISM_", "JKA_", "LCQ_", "LEE_", "LHW_", "MLB_",
    "MMT_", "NDZ_", "NEN_", "NFJ_", "NIP_", "_NPA", "NRB_", "NSE_", "OCF_", "ORL_", "SFB_", "SGJ_",
    "SVN_", "TIX_", "TOI_", "TTS_", "VAD_", "VQQ_", "XMR_",
];

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Facility short identifier.
    pub facility: String,
    /// Facility display name, used in notices.
    pub facility_name: String,
    /// Position prefixes counting toward the activity requirement.
    pub watched_prefixes: Vec<String>,
    /// Trailing activity window in days.
    pub lookback_days: i64,
    /// Hours required over the window to stay active.
    pub min_hours: f64,
    /// Controllers fetched per batch.
    pub batch_size: usize,
    /// Pause between batches, in seconds.
    pub batch_pause_secs: u64,
    /// Retry attempt budget per request.
    pub retry_max_attempts: u32,
    /// Base backoff delay, in seconds.
    pub retry_base_delay_secs: u64,
    /// Membership API base URL (roster and removal).
    pub roster_base_url: String,
    /// Statistics API base URL (session history).
    pub sessions_base_url: String,
    /// VATUSA API key, required for removal.
    pub vatusa_api_key: Option<String>,
    /// CID removals are attributed to, required for removal.
    pub admin_cid: Option<String>,
    /// Sender address for notices.
    pub email_address: Option<String>,
    /// Sender password for notices.
    pub email_password: Option<String>,
    /// SMTP submission host.
    pub smtp_host: String,
    /// SMTP submission port (implicit TLS).
    pub smtp_port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("facility", &self.facility)
            .field("facility_name", &self.facility_name)
            .field("watched_prefixes", &self.watched_prefixes.len())
            .field("lookback_days", &self.lookback_days)
            .field("min_hours", &self.min_hours)
            .field("batch_size", &self.batch_size)
            .field("batch_pause_secs", &self.batch_pause_secs)
            .field("retry_max_attempts", &self.retry_max_attempts)
            .field("retry_base_delay_secs", &self.retry_base_delay_secs)
            .field("roster_base_url", &self.roster_base_url)
            .field("sessions_base_url", &self.sessions_base_url)
            .field("vatusa_api_key", &self.vatusa_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("admin_cid", &self.admin_cid)
            .field("email_address", &self.email_address)
            .field("email_password", &self.email_password.as_ref().map(|_| "[REDACTED]"))
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            facility: "ZJX".to_string(),
            facility_name: "Jacksonville ARTCC".to_string(),
            watched_prefixes: ZJX_WATCHED_PREFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
            lookback_days: 90,
            min_hours: 3.0,
            batch_size: 10,
            batch_pause_secs: 30,
            retry_max_attempts: 10,
            retry_base_delay_secs: 5,
            roster_base_url: ca_api::VATUSA_API_URL.to_string(),
            sessions_base_url: ca_api::VATSIM_API_URL.to_string(),
            vatusa_api_key: None,
            admin_cid: None,
            email_address: None,
            email_password: None,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (CA_*)
        figment = figment.merge(Env::prefixed("CA_"));

        figment.extract()
    }

    /// Classifier knobs derived from this configuration.
    #[must_use]
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            lookback_days: self.lookback_days,
            min_hours: self.min_hours,
            watched_prefixes: self.watched_prefixes.clone(),
            batch_size: self.batch_size,
            batch_pause: Duration::from_secs(self.batch_pause_secs),
        }
    }

    /// Backoff schedule derived from this configuration.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts,
            base_delay: Duration::from_secs(self.retry_base_delay_secs),
            jitter: true,
        }
    }

    /// Facility context for rendered notices.
    #[must_use]
    pub fn notice_context(&self) -> NoticeContext {
        NoticeContext {
            facility: self.facility.clone(),
            facility_name: self.facility_name.clone(),
            min_hours: self.min_hours,
            lookback_days: self.lookback_days,
            year: Utc::now().year(),
        }
    }

    /// SMTP account for notices. Blank fields are rejected by
    /// `Mailer::new`, so absent secrets fail at mailer construction.
    #[must_use]
    pub fn mailer_config(&self) -> MailerConfig {
        MailerConfig {
            address: self.email_address.clone().unwrap_or_default(),
            password: self.email_password.clone().unwrap_or_default(),
            smtp_host: self.smtp_host.clone(),
            smtp_port: self.smtp_port,
        }
    }
}

/// Returns the platform-specific config directory for ca.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ca"))
}
