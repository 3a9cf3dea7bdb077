//! Check command: classify the roster and display the results.

use std::fmt::Write;

use anyhow::{Context, Result};

use ca_api::Client;
use ca_core::ClassificationResult;

use crate::Config;

pub async fn run(client: &Client, config: &Config, json: bool) -> Result<()> {
    let roster = client
        .roster(&config.facility)
        .await
        .context("failed to fetch roster")?;
    let result = client.classify(roster, &config.classifier_config()).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!(
            "{}",
            render_report(&result, config.min_hours, config.lookback_days)
        );
    }
    Ok(())
}

/// Renders the inactive and exempt tables plus the summary counts.
#[must_use]
pub fn render_report(result: &ClassificationResult, min_hours: f64, lookback_days: i64) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "\nInactive Controllers (less than {min_hours} hours in last {lookback_days} days):"
    )
    .unwrap();
    writeln!(output, "{}", "=".repeat(80)).unwrap();
    writeln!(
        output,
        "{:<24} {:<10} {:<8} {:<8} Positions",
        "Name", "CID", "Hours", "Rating"
    )
    .unwrap();
    writeln!(output, "{}", "-".repeat(80)).unwrap();
    for record in &result.inactive {
        let positions = if record.positions.is_empty() {
            "No watched positions".to_string()
        } else {
            record.positions.join(", ")
        };
        writeln!(
            output,
            "{:<24} {:<10} {:<8.2} {:<8} {positions}",
            record.full_name(),
            record.cid,
            record.hours,
            record.rating.as_str(),
        )
        .unwrap();
    }

    writeln!(output, "\nExcluded OBS-Rated Controllers:").unwrap();
    writeln!(output, "{}", "=".repeat(40)).unwrap();
    writeln!(output, "{:<24} CID", "Name").unwrap();
    writeln!(output, "{}", "-".repeat(40)).unwrap();
    for controller in &result.exempt {
        writeln!(
            output,
            "{:<24} {}",
            format!("{} {}", controller.first_name, controller.last_name),
            controller.cid
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Total controllers processed: {}",
        result.total_processed
    )
    .unwrap();
    writeln!(
        output,
        "Total inactive controllers: {}",
        result.inactive.len()
    )
    .unwrap();
    writeln!(
        output,
        "Total OBS controllers excluded: {}",
        result.exempt.len()
    )
    .unwrap();

    output
}
