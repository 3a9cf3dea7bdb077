//! Send-notices command: email every inactive controller.

use anyhow::{Context, Result};

use ca_api::Client;
use ca_notify::Mailer;

use crate::Config;

pub async fn run(client: &Client, config: &Config) -> Result<()> {
    let roster = client
        .roster(&config.facility)
        .await
        .context("failed to fetch roster")?;
    let result = client.classify(roster, &config.classifier_config()).await;

    // Credentials are validated before any mail is attempted.
    let mailer = Mailer::new(&config.mailer_config())
        .context("email credentials not configured (set CA_EMAIL_ADDRESS / CA_EMAIL_PASSWORD)")?;
    let context = config.notice_context();

    println!("\nSending inactivity notices...");
    let mut sent = 0_usize;
    let mut failed = 0_usize;
    for record in &result.inactive {
        match mailer.send_notice(record, &context).await {
            Ok(()) => {
                println!("✓ Sent notice to {}", record.full_name());
                sent += 1;
            }
            Err(err) => {
                tracing::warn!(cid = record.cid, error = %err, "notice delivery failed");
                println!("✗ Failed to send notice to {}", record.full_name());
                failed += 1;
            }
        }
    }

    println!("\nSummary:");
    println!("Total controllers processed: {}", result.total_processed);
    println!("Notices sent: {sent}");
    if failed > 0 {
        println!("Notices failed: {failed}");
    }
    println!("OBS controllers excluded: {}", result.exempt.len());
    Ok(())
}
