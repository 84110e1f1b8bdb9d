//! CSV row transformation for bulk financial imports.
//!
//! Uploaded files are read row-at-a-time, so memory use is bounded by row
//! size rather than file size. Column names are resolved against an
//! explicit ordered alias list per canonical field; the first matching
//! alias wins. A row that fails transformation is recorded as an error and
//! excluded from persistence without aborting the batch.

use std::collections::HashMap;
use std::io::Read;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Accepted header aliases per canonical field, first match wins.
const PRODUCT_NAME_ALIASES: &[&str] = &["product_name", "product"];
const PERIOD_DATE_ALIASES: &[&str] = &["period_date", "date"];
const SALES_VOLUME_ALIASES: &[&str] = &["sales_volume", "sales"];
const PRODUCTION_VOLUME_ALIASES: &[&str] = &["production_volume", "production"];
const TURNOVER_ALIASES: &[&str] = &["turnover_eur", "turnover"];
const RMPM_COST_ALIASES: &[&str] = &["rmpm_cost", "raw_material_cost"];
const OPERATING_COST_ALIASES: &[&str] = &["operating_cost", "opex"];
const NET_PROFIT_ALIASES: &[&str] = &["net_profit", "profit"];
const NET_MARGIN_ALIASES: &[&str] = &["net_margin", "margin"];
const CONTRIBUTIVE_MARGIN_ALIASES: &[&str] = &["contributive_margin", "contribution_margin"];

/// Errors that abort the whole import (not per-row failures).
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file could not be read as CSV at all.
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// A per-row transformation or persistence failure.
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    /// 1-based data row number (header excluded).
    pub row: usize,
    /// Human-readable failure description.
    pub error: String,
}

/// A financial record row in canonical shape, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialRow {
    /// Product business key.
    pub product_name: String,
    /// Reporting period date.
    pub period_date: NaiveDate,
    /// Sales volume.
    pub sales_volume: Option<Decimal>,
    /// Production volume.
    pub production_volume: Option<Decimal>,
    /// Turnover in EUR.
    pub turnover: Option<Decimal>,
    /// Raw material and packaging cost.
    pub rmpm_cost: Option<Decimal>,
    /// Operating cost.
    pub operating_cost: Option<Decimal>,
    /// Net profit.
    pub net_profit: Option<Decimal>,
    /// Net margin ratio; derived from profit/turnover when absent.
    pub net_margin: Option<Decimal>,
    /// Contributive margin.
    pub contributive_margin: Option<Decimal>,
}

/// Outcome of parsing and transforming an uploaded CSV.
#[derive(Debug, Default)]
pub struct ParsedImport {
    /// Successfully transformed rows with their 1-based row numbers.
    pub rows: Vec<(usize, FinancialRow)>,
    /// Rows that failed transformation.
    pub errors: Vec<RowError>,
    /// Total data rows seen.
    pub total: usize,
}

/// Parses CSV content into canonical financial rows, streaming row by row.
///
/// # Errors
///
/// Returns `ImportError::Csv` only when the header itself cannot be read;
/// individual bad rows are collected in `ParsedImport::errors`.
pub fn parse_financial_csv<R: Read>(reader: R) -> Result<ParsedImport, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();

    let mut parsed = ParsedImport::default();

    for (index, record) in csv_reader.records().enumerate() {
        let row_number = index + 1;
        parsed.total += 1;

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                parsed.errors.push(RowError {
                    row: row_number,
                    error: format!("unreadable row: {e}"),
                });
                continue;
            }
        };

        let fields: HashMap<&str, &str> = headers
            .iter()
            .map(String::as_str)
            .zip(record.iter())
            .filter(|(_, value)| !value.is_empty())
            .collect();

        match transform_row(&fields) {
            Ok(row) => parsed.rows.push((row_number, row)),
            Err(message) => parsed.errors.push(RowError {
                row: row_number,
                error: message,
            }),
        }
    }

    Ok(parsed)
}

/// Resolves the first matching alias in a row's fields.
fn lookup<'a>(fields: &HashMap<&str, &'a str>, aliases: &[&str]) -> Option<&'a str> {
    aliases.iter().find_map(|alias| fields.get(alias).copied())
}

/// Parses an optional numeric field, reporting the offending column on failure.
fn numeric(
    fields: &HashMap<&str, &str>,
    aliases: &[&str],
) -> Result<Option<Decimal>, String> {
    match lookup(fields, aliases) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<Decimal>()
            .map(Some)
            .map_err(|_| format!("invalid number '{raw}' for {}", aliases[0])),
    }
}

/// Transforms one CSV row into the canonical shape.
fn transform_row(fields: &HashMap<&str, &str>) -> Result<FinancialRow, String> {
    let product_name = lookup(fields, PRODUCT_NAME_ALIASES)
        .ok_or_else(|| "missing product_name".to_string())?
        .to_string();

    let period_date = lookup(fields, PERIOD_DATE_ALIASES)
        .ok_or_else(|| "missing period_date".to_string())?;
    let period_date = NaiveDate::parse_from_str(period_date, "%Y-%m-%d")
        .map_err(|_| format!("invalid period_date '{period_date}' (expected YYYY-MM-DD)"))?;

    let turnover = numeric(fields, TURNOVER_ALIASES)?;
    let net_profit = numeric(fields, NET_PROFIT_ALIASES)?;

    let net_margin = match numeric(fields, NET_MARGIN_ALIASES)? {
        Some(margin) => Some(margin),
        // Derived field: profit / turnover, guarded against zero turnover.
        None => match (net_profit, turnover) {
            (Some(profit), Some(t)) if !t.is_zero() => Some(profit / t),
            _ => None,
        },
    };

    Ok(FinancialRow {
        product_name,
        period_date,
        sales_volume: numeric(fields, SALES_VOLUME_ALIASES)?,
        production_volume: numeric(fields, PRODUCTION_VOLUME_ALIASES)?,
        turnover,
        rmpm_cost: numeric(fields, RMPM_COST_ALIASES)?,
        operating_cost: numeric(fields, OPERATING_COST_ALIASES)?,
        net_profit,
        net_margin,
        contributive_margin: numeric(fields, CONTRIBUTIVE_MARGIN_ALIASES)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(content: &str) -> ParsedImport {
        parse_financial_csv(content.as_bytes()).unwrap()
    }

    #[test]
    fn test_canonical_headers() {
        let parsed = parse(
            "product_name,period_date,sales_volume,turnover_eur,net_profit,net_margin\n\
             Plumpy*Nut,2025-09-30,1223,3746481,1135021,0.23\n",
        );
        assert_eq!(parsed.total, 1);
        assert!(parsed.errors.is_empty());

        let (row_number, row) = &parsed.rows[0];
        assert_eq!(*row_number, 1);
        assert_eq!(row.product_name, "Plumpy*Nut");
        assert_eq!(row.sales_volume, Some(dec!(1223)));
        assert_eq!(row.net_margin, Some(dec!(0.23)));
    }

    #[test]
    fn test_alias_headers_first_match_wins() {
        let parsed = parse(
            "product,date,sales,turnover,profit\n\
             Maleda PB,2025-08-31,607,1850000,425000\n",
        );
        assert!(parsed.errors.is_empty());
        let row = &parsed.rows[0].1;
        assert_eq!(row.product_name, "Maleda PB");
        assert_eq!(row.sales_volume, Some(dec!(607)));
        assert_eq!(row.turnover, Some(dec!(1850000)));
    }

    #[test]
    fn test_net_margin_derived_from_profit_and_turnover() {
        let parsed = parse(
            "product_name,period_date,turnover_eur,net_profit\n\
             Plumpy*Sup,2025-07-31,1000,230\n",
        );
        assert_eq!(parsed.rows[0].1.net_margin, Some(dec!(0.23)));
    }

    #[test]
    fn test_zero_turnover_produces_no_margin() {
        let parsed = parse(
            "product_name,period_date,turnover_eur,net_profit\n\
             Plumpy*Sup,2025-07-31,0,230\n",
        );
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.rows[0].1.net_margin, None);
    }

    #[test]
    fn test_bad_rows_do_not_abort_the_batch() {
        let parsed = parse(
            "product_name,period_date,sales_volume\n\
             Plumpy*Nut,2025-09-30,100\n\
             ,2025-09-30,100\n\
             Plumpy*Nut,not-a-date,100\n\
             Plumpy*Nut,2025-09-30,not-a-number\n\
             SQLNS 20g,2025-08-31,50\n",
        );
        assert_eq!(parsed.total, 5);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.errors.len(), 3);
        assert_eq!(parsed.rows.len() + parsed.errors.len(), parsed.total);

        assert_eq!(parsed.errors[0].row, 2);
        assert!(parsed.errors[0].error.contains("product_name"));
        assert!(parsed.errors[1].error.contains("period_date"));
        assert!(parsed.errors[2].error.contains("invalid number"));
    }

    #[test]
    fn test_headers_matched_case_insensitively() {
        let parsed = parse(
            "Product_Name,Period_Date,Sales_Volume\n\
             Plumpy*Nut,2025-09-30,42\n",
        );
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.rows[0].1.sales_volume, Some(dec!(42)));
    }
}
