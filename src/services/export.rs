//! Files written to disk: the CSV rate sheet and downloaded PDFs

use crate::model::Quote;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const RATE_SHEET_FILE: &str = "Ocean_Freight_Rate_Sheet.csv";

#[derive(Serialize)]
struct RateSheetRow<'a> {
    #[serde(rename = "Carrier")]
    carrier: &'a str,
    #[serde(rename = "Origin")]
    origin: &'a str,
    #[serde(rename = "Destination")]
    destination: &'a str,
    #[serde(rename = "Original Price")]
    original_price: String,
    #[serde(rename = "Normalized Price (USD)")]
    normalized_price: String,
    #[serde(rename = "Surcharge Count")]
    surcharge_count: usize,
    #[serde(rename = "Flags")]
    flags: usize,
    #[serde(rename = "Risk Flags")]
    risk_flags: String,
}

impl<'a> From<&'a Quote> for RateSheetRow<'a> {
    fn from(quote: &'a Quote) -> Self {
        Self {
            carrier: quote.carrier_name(),
            origin: &quote.origin,
            destination: &quote.destination,
            original_price: format!("{} {}", quote.total_price, quote.currency),
            normalized_price: quote
                .normalized_total_price_usd
                .map(|usd| format!("${:.2}", usd))
                .unwrap_or_else(|| "N/A".to_string()),
            surcharge_count: quote.surcharges.len(),
            flags: quote.unmapped_count(),
            risk_flags: quote.risk_flags.join(", "),
        }
    }
}

/// Write one header row plus one row per quote
pub fn write_rate_sheet<W: Write>(quotes: &[Quote], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    if quotes.is_empty() {
        writer.write_record([
            "Carrier",
            "Origin",
            "Destination",
            "Original Price",
            "Normalized Price (USD)",
            "Surcharge Count",
            "Flags",
            "Risk Flags",
        ])?;
    }
    for quote in quotes {
        writer.serialize(RateSheetRow::from(quote))?;
    }
    writer.flush()?;
    Ok(())
}

/// Export the rate sheet into `dir`, returning the written path
pub fn export_rate_sheet(quotes: &[Quote], dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(RATE_SHEET_FILE);
    let file = fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_rate_sheet(quotes, file)?;
    tracing::info!(rows = quotes.len(), path = %path.display(), "exported rate sheet");
    Ok(path)
}

/// Replace characters that do not belong in a file name
pub fn safe_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        "download".to_string()
    } else {
        trimmed.to_string()
    }
}

/// File name for the booking confirmation of a carrier
pub fn booking_file_name(carrier: &str) -> String {
    safe_file_name(&format!("Booking_{}.pdf", carrier))
}

/// Save downloaded bytes as `dir/name`
pub fn save_download(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create download directory {}", dir.display()))?;
    let path = dir.join(safe_file_name(name));
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(bytes = bytes.len(), path = %path.display(), "saved download");
    Ok(path)
}
