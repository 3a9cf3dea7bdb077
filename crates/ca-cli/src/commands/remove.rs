//! Remove command: interactive, destructive roster removal.
//!
//! The prompts drive the confirmation state machine in `ca-core`; the
//! machine decides, this module only does the I/O.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, ensure};

use ca_api::{Client, RemovalClient, RemovalCredentials};
use ca_core::RemovalConfirmation;

use crate::Config;

pub async fn run(client: &Client, config: &Config) -> Result<()> {
    let roster = client
        .roster(&config.facility)
        .await
        .context("failed to fetch roster")?;
    let result = client.classify(roster, &config.classifier_config()).await;

    if result.inactive.is_empty() {
        println!("No inactive controllers to remove.");
        return Ok(());
    }

    let mut confirmation =
        RemovalConfirmation::new(config.facility.clone(), result.inactive.len());
    let stdin = std::io::stdin();
    let confirmed = drive_confirmation(
        &mut stdin.lock(),
        &mut std::io::stdout(),
        &mut confirmation,
    )?;
    if !confirmed {
        return Ok(());
    }

    let credentials = RemovalCredentials::new(
        config.vatusa_api_key.clone().unwrap_or_default(),
        config.admin_cid.clone().unwrap_or_default(),
    )
    .context("removal credentials not configured (set CA_VATUSA_API_KEY / CA_ADMIN_CID)")?;
    let remover = RemovalClient::new(credentials)?.with_base_url(config.roster_base_url.clone());

    ensure!(confirmation.begin_execution(), "confirmation incomplete");
    println!("\nProcessing roster removals...");
    let report = remover
        .remove_all(&result.inactive, &config.facility, config.lookback_days)
        .await;

    println!("\n=== REMOVAL SUMMARY ===");
    println!("Total controllers processed: {}", result.inactive.len());
    println!("Successful removals: {}", report.succeeded.len());
    println!("Failed removals: {}", report.failed.len());
    for failure in &report.failed {
        println!("✗ {} (CID: {}): {}", failure.name, failure.cid, failure.reason);
    }
    if report.all_succeeded() {
        println!("All removals succeeded.");
    }
    Ok(())
}

/// Walks the operator through the three confirmation steps. Returns true
/// only when the machine reaches the fully confirmed stage.
fn drive_confirmation<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    confirmation: &mut RemovalConfirmation,
) -> Result<bool> {
    writeln!(output, "\n=== ROSTER REMOVAL VERIFICATION ===")?;
    writeln!(
        output,
        "You are about to remove {} controllers from {}",
        confirmation.count(),
        confirmation.facility()
    )?;
    writeln!(output, "\nThis action will:")?;
    writeln!(output, "1. Remove home controllers from the facility roster")?;
    writeln!(
        output,
        "2. Remove visiting controllers from the facility roster"
    )?;
    writeln!(output, "3. This action CANNOT be undone")?;

    write!(output, "\nDo you want to continue? (yes/no): ")?;
    output.flush()?;
    if !confirmation.confirm_intent(&read_line(input)?) {
        writeln!(output, "Roster removal cancelled.")?;
        return Ok(false);
    }

    writeln!(
        output,
        "\nPlease type the following verification code to continue: {}",
        confirmation.verification_code()
    )?;
    write!(output, "Verification code: ")?;
    output.flush()?;
    if !confirmation.verify_code(&read_line(input)?) {
        writeln!(output, "Incorrect verification code. Roster removal cancelled.")?;
        return Ok(false);
    }

    writeln!(output, "\n=== FINAL WARNING ===")?;
    writeln!(
        output,
        "This is your last chance to cancel this operation."
    )?;
    write!(output, "Type 'CONFIRM' to proceed with roster removal: ")?;
    output.flush()?;
    if !confirmation.confirm_final(&read_line(input)?) {
        writeln!(output, "Roster removal cancelled.")?;
        return Ok(false);
    }

    Ok(true)
}

fn read_line<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read confirmation input")?;
    Ok(line)
}
