//! Console summary and append-only CSV table for `QuoteRecord`s.
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::Result;
use crate::config::CURRENCY_PREFIX;
use crate::record::{COLUMNS, QuoteRecord};

const RULE_WIDTH: usize = 50;

/// Renders the fixed-layout summary block printed after every cycle.
pub fn format_summary(record: &QuoteRecord) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let lines = [
        String::new(),
        rule.clone(),
        format!("{} Quick Check - {}", record.symbol, record.formatted_timestamp()),
        rule.clone(),
        format!("Symbol         : {}", record.symbol),
        format!("Current Price  : {}", price(record.current_price)),
        format!("Previous Close : {}", price(record.previous_close)),
        format!("Day High       : {}", price(record.day_high)),
        format!("Day Low        : {}", price(record.day_low)),
        format!("Volume         : {}", thousands(record.volume)),
        rule,
        String::new(),
    ];
    lines.join("\n") + "\n"
}

/// Appends `record` as one row of the table at `path`.
///
/// A missing or empty file gets the header row first. Header and row go out in
/// a single write followed by a flush to disk.
pub fn append_row(record: &QuoteRecord, path: &Path) -> Result<()> {
    let needs_header = match path.metadata() {
        Ok(meta) => meta.len() == 0,
        Err(_) => true,
    };

    let mut chunk = String::new();
    if needs_header {
        chunk.push_str(&COLUMNS.join(","));
        chunk.push('\n');
    }
    chunk.push_str(&csv_row(record));
    chunk.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(chunk.as_bytes())?;
    file.flush()?;
    file.sync_data()?;

    info!("Appended row to {}", path.display());
    Ok(())
}

fn price(value: f64) -> String {
    format!("{}{:.2}", CURRENCY_PREFIX, value)
}

/// `1234567` -> `1,234,567`.
fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn csv_row(record: &QuoteRecord) -> String {
    [
        record.formatted_timestamp(),
        escape(&record.symbol),
        // Debug keeps the decimal point (`0.0`) so the column stays a float on re-read.
        format!("{:?}", record.current_price),
        format!("{:?}", record.previous_close),
        format!("{:?}", record.day_high),
        format!("{:?}", record.day_low),
        record.volume.to_string(),
    ]
    .join(",")
}

/// Quotes a field only when it contains a delimiter, a quote or a line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        String::from(field)
    }
}
