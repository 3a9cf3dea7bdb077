//! Inactivity notice rendering and SMTP delivery.
//!
//! Renders the HTML removal notice for one inactive controller and sends
//! it over authenticated SMTP (implicit TLS, Gmail-style submission on
//! port 465 by default). Rendering is pure; delivery is the only I/O.

use std::fmt;

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use ca_core::ControllerActivityRecord;

/// Notice mailer errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// A required credential was absent or blank at construction time.
    #[error("missing credential: {name}")]
    MissingCredential { name: &'static str },
    /// An address that lettre cannot represent.
    #[error("invalid mailbox {address:?}: {source}")]
    InvalidMailbox {
        address: String,
        source: lettre::address::AddressError,
    },
    /// Failed to build the message.
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    /// SMTP connection or delivery failure.
    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// SMTP account the notices are sent from.
#[derive(Clone)]
pub struct MailerConfig {
    pub address: String,
    pub password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl fmt::Debug for MailerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailerConfig")
            .field("address", &self.address)
            .field("password", &"[REDACTED]")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

/// Facility context rendered into every notice.
#[derive(Debug, Clone)]
pub struct NoticeContext {
    /// Facility short identifier, e.g. `ZJX`.
    pub facility: String,
    /// Facility display name, e.g. `Jacksonville ARTCC`.
    pub facility_name: String,
    /// Hours required to stay active.
    pub min_hours: f64,
    /// The activity window the hours were measured over.
    pub lookback_days: i64,
    /// Copyright year for the footer.
    pub year: i32,
}

/// Sends inactivity notices over SMTP.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl fmt::Debug for Mailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailer")
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

impl Mailer {
    /// Builds the mailer, validating credentials up front so a missing
    /// secret fails here rather than mid-run.
    pub fn new(config: &MailerConfig) -> Result<Self, NotifyError> {
        if config.address.trim().is_empty() {
            return Err(NotifyError::MissingCredential {
                name: "email_address",
            });
        }
        if config.password.trim().is_empty() {
            return Err(NotifyError::MissingCredential {
                name: "email_password",
            });
        }
        let sender = parse_mailbox(&config.address)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.address.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self { transport, sender })
    }

    /// Renders and sends the removal notice for one inactive controller.
    pub async fn send_notice(
        &self,
        record: &ControllerActivityRecord,
        context: &NoticeContext,
    ) -> Result<(), NotifyError> {
        let recipient = parse_mailbox(&record.email)?;
        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(format!(
                "VATUSA {}: Removal Notice - Controller Inactivity",
                context.facility
            ))
            .header(ContentType::TEXT_HTML)
            .body(render_notice(record, context))?;
        self.transport.send(message).await?;
        tracing::info!(cid = record.cid, name = %record.full_name(), "notice sent");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|source| NotifyError::InvalidMailbox {
            address: address.to_string(),
            source,
        })
}

/// Renders the HTML removal notice. Pure; everything variable comes from
/// the record and the context.
#[must_use]
pub fn render_notice(record: &ControllerActivityRecord, context: &NoticeContext) -> String {
    let positions = if record.positions.is_empty() {
        "No positions worked".to_string()
    } else {
        record.positions.join("<br>\n        ")
    };
    format!(
        r#"<html>
  <head>
    <style>
      body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333333; }}
      .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
      .header {{ background-color: #003087; color: white; padding: 20px; text-align: center; }}
      .content {{ padding: 20px; background-color: #ffffff; }}
      .stats-box {{ background-color: #f5f5f5; padding: 15px; margin: 20px 0; border-radius: 5px; }}
      .footer {{ text-align: center; padding: 20px; font-size: 12px; color: #666666;
                 border-top: 1px solid #dddddd; margin-top: 20px; }}
      .legal-text {{ font-size: 11px; color: #888888; line-height: 1.4; margin-top: 15px; }}
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header">
        <h1>{facility_name}</h1>
      </div>
      <div class="content">
        <p>Dear {first} {last},</p>

        <p>This email is to inform you that you have been removed from the
        {facility_name} ({facility}) roster due to inactivity, in accordance with
        VATUSA policies.</p>

        <div class="stats-box">
          <h3>Activity Summary - Past {lookback} Days</h3>
          <p><strong>Controller Information:</strong><br>
          Name: {first} {last}<br>
          CID: {cid}<br>
          Total Hours: {hours:.2}</p>

          <p><strong>Positions Worked:</strong><br>
        {positions}</p>
        </div>

        <p>To maintain active status, controllers must complete at least
        {min_hours} hours of controlling time within a {lookback}-day period. If you
        wish to return to {facility} in the future, you will need to reapply
        through VATUSA.</p>

        <p>We thank you for your service to the {facility_name} and wish you
        the best in your future endeavors.</p>

        <p>Best regards,<br>
        {facility_name} Staff</p>
      </div>
      <div class="footer">
        <p>&copy; {year} Virtual {facility_name}. All rights reserved.</p>
        <div class="legal-text">
          <p>This email is intended for {first} {last} ({cid}) ONLY.<br>
          If you believe that you received this email in error, contact the
          {facility} staff immediately.<br>
          This email is not related to any real life aviation bodies or the F.A.A.</p>

          <p>Do not reply to this email unless it asks you to do so; this inbox
          might be unmonitored.</p>
        </div>
      </div>
    </div>
  </body>
</html>
"#,
        facility = context.facility,
        facility_name = context.facility_name,
        min_hours = context.min_hours,
        lookback = context.lookback_days,
        year = context.year,
        first = record.first_name,
        last = record.last_name,
        cid = record.cid,
        hours = record.hours,
        positions = positions,
    )
}
