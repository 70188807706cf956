//! CSV format handling for command records and card output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to commands, including amount parsing
//! - Card report serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::core::CardReport;
use crate::types::{Cents, Command, CommandRecord};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Raw CSV record structure for deserialization
///
/// Columns: `type,card,hold,amount,name,currency`. Which of the optional
/// columns are required depends on the command type.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    /// Command type (create, load, authorize, reverse, capture, refund, query)
    #[serde(rename = "type")]
    pub command_type: String,

    /// Card label
    pub card: String,

    /// Hold label
    #[serde(default)]
    pub hold: Option<String>,

    /// Amount in currency units
    #[serde(default)]
    pub amount: Option<String>,

    /// Cardholder name (create) or merchant name (authorize)
    #[serde(default)]
    pub name: Option<String>,

    /// Currency code (create)
    #[serde(default)]
    pub currency: Option<String>,
}

/// Parse a currency amount into cents
///
/// The amount must be positive with at most two decimal places. Parsing is
/// exact; `10.005` is rejected rather than rounded.
///
/// # Arguments
///
/// * `amount` - Amount string, e.g. `"10.50"`
///
/// # Returns
///
/// * `Ok(Cents)` - The amount in cents
/// * `Err(String)` - If the amount is malformed, not positive, too precise or too large
pub fn parse_amount(amount: &str) -> Result<Cents, String> {
    let decimal = Decimal::from_str(amount.trim())
        .map_err(|_| format!("Invalid amount '{}'", amount))?;

    if decimal <= Decimal::ZERO {
        return Err(format!("Amount '{}' must be positive", amount));
    }

    if decimal.normalize().scale() > 2 {
        return Err(format!(
            "Amount '{}' has more than two decimal places",
            amount
        ));
    }

    decimal
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_u64())
        .ok_or_else(|| format!("Amount '{}' is too large", amount))
}

/// Format cents as a currency amount with two decimal places
pub fn format_cents(cents: Cents) -> String {
    format!("{:.2}", Decimal::from_i128_with_scale(i128::from(cents), 2))
}

fn required(field: Option<String>, column: &str, command: &str, card: &str) -> Result<String, String> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(format!(
            "{} command for card '{}' is missing '{}'",
            command, card, column
        )),
    }
}

/// Convert a CsvRecord to a CommandRecord
///
/// # Arguments
///
/// * `csv_record` - Raw CSV record
///
/// # Returns
///
/// * `Ok(CommandRecord)` - Successfully converted record
/// * `Err(String)` - Conversion error with details
///
/// # Errors
///
/// Returns an error if:
/// - The card label is empty
/// - The command type is unknown
/// - A column the command needs is missing or empty
/// - The amount is invalid (see [`parse_amount`])
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<CommandRecord, String> {
    let CsvRecord {
        command_type,
        card,
        hold,
        amount,
        name,
        currency,
    } = csv_record;

    let card = card.trim().to_string();
    if card.is_empty() {
        return Err(format!("{} command requires a card label", command_type));
    }

    let command_type = command_type.trim().to_lowercase();
    let kind = command_type.as_str();
    let cents = |amount: Option<String>| -> Result<Cents, String> {
        parse_amount(&required(amount, "amount", kind, &card)?)
    };

    let command = match kind {
        "create" => Command::CreateCard {
            cardholder_name: required(name, "name", kind, &card)?,
            currency: required(currency, "currency", kind, &card)?,
        },
        "load" => Command::LoadFunds {
            amount: cents(amount)?,
        },
        "authorize" => Command::Authorize {
            hold: required(hold, "hold", kind, &card)?,
            merchant_name: required(name, "name", kind, &card)?,
            amount: cents(amount)?,
        },
        "reverse" => Command::Reverse {
            hold: required(hold, "hold", kind, &card)?,
            amount: cents(amount)?,
        },
        "capture" => Command::Capture {
            hold: required(hold, "hold", kind, &card)?,
            amount: cents(amount)?,
        },
        "refund" => Command::Refund {
            hold: required(hold, "hold", kind, &card)?,
            amount: cents(amount)?,
        },
        "query" => Command::Query,
        _ => {
            return Err(format!(
                "Invalid command type: '{}' for card '{}'",
                command_type, card
            ))
        }
    };

    Ok(CommandRecord { card, command })
}

/// Write card reports to CSV output
///
/// # Arguments
///
/// * `reports` - Card reports to write
/// * `output` - Writer to output CSV to
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote all reports
/// * `Err(String)` - Write error with details
///
/// # Format
///
/// Output format: `card,card_number,cardholder,currency,loaded,blocked,total,available,usable`
/// - Reports are sorted by card label
/// - Amounts are printed in currency units with two decimal places
pub fn write_cards_csv(reports: &[CardReport], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "card",
            "card_number",
            "cardholder",
            "currency",
            "loaded",
            "blocked",
            "total",
            "available",
            "usable",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_reports = reports.to_vec();
    sorted_reports.sort_by(|a, b| a.label.cmp(&b.label));

    for report in sorted_reports {
        let snapshot = &report.snapshot;
        writer
            .write_record(&[
                report.label.clone(),
                snapshot.number.to_string(),
                snapshot.cardholder_name.clone(),
                snapshot.currency.to_string(),
                format_cents(snapshot.loaded_funds),
                format_cents(snapshot.blocked_funds),
                format_cents(snapshot.total_funds),
                format_cents(snapshot.available_funds),
                snapshot.usable.to_string(),
            ])
            .map_err(|e| format!("Failed to write card record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
