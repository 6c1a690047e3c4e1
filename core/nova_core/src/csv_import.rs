//! # CSV guest import
//!
//! Organizers upload a spreadsheet export and then pick which columns hold
//! the guest's name, phone and (optionally) pledge amount.
//!
//! ## Format
//!
//! Plain comma-delimited text: first non-blank line is the header row, every
//! following non-blank line a data row, cells trimmed. Quoting is **not**
//! supported; a comma inside a field shifts the remaining cells of that row.
//!
//! ## Row rules
//!
//! * rows whose mapped name or phone is missing / blank are dropped;
//! * an unmapped pledge column gives every guest the default amount;
//! * a pledge cell that does not parse as a positive finite number, or
//!   exceeds [`MAX_PLEDGE_AMOUNT`], gives that row the default amount.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::types::{DEFAULT_PLEDGE_AMOUNT, MAX_PLEDGE_AMOUNT};

/// A parsed spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .filter(|l| !l.trim().is_empty());

        let header = lines
            .next()
            .ok_or_else(|| Error::validation("CSV file must have a header and at least one data row"))?;
        let headers = split_row(header);
        let rows: Vec<Vec<String>> = lines.map(split_row).collect();

        if rows.is_empty() {
            return Err(Error::validation(
                "CSV file must have a header and at least one data row",
            ));
        }
        Ok(Self { headers, rows })
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.split(',').map(|c| c.trim().to_string()).collect()
}

/// Which column feeds each guest field. `None` means unmapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub name: Option<usize>,
    pub phone: Option<usize>,
    pub pledge: Option<usize>,
}

impl ColumnMapping {
    /// Build from picker indices where any negative value means "unmapped".
    pub fn from_indices(name: i64, phone: i64, pledge: i64) -> Self {
        let idx = |v: i64| usize::try_from(v).ok();
        Self {
            name: idx(name),
            phone: idx(phone),
            pledge: idx(pledge),
        }
    }

    fn validate(&self, column_count: usize) -> Result<(usize, usize)> {
        let (Some(name), Some(phone)) = (self.name, self.phone) else {
            return Err(Error::validation(
                "Both the name and phone columns must be mapped",
            ));
        };
        for (field, col) in [("name", Some(name)), ("phone", Some(phone)), ("pledge", self.pledge)] {
            if let Some(col) = col {
                if col >= column_count {
                    return Err(Error::Validation(format!(
                        "{field} column {col} is out of range ({column_count} columns)"
                    )));
                }
            }
        }
        Ok((name, phone))
    }
}

/// One guest ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestEntry {
    pub name: String,
    pub phone: String,
    pub pledge_amount: i64,
}

impl GuestEntry {
    /// Normalize a hand-typed entry; `None` when name or phone is blank.
    pub fn new(name: &str, phone: &str, pledge: Option<f64>, default_pledge: i64) -> Option<Self> {
        let name = name.trim();
        let phone = phone.trim();
        if name.is_empty() || phone.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            phone: phone.to_string(),
            pledge_amount: resolve_pledge(pledge, default_pledge),
        })
    }
}

/// Whole-unit pledge, or `default_pledge` for missing / unusable amounts.
pub fn resolve_pledge(raw: Option<f64>, default_pledge: i64) -> i64 {
    match raw {
        Some(v) if v.is_finite() && (1.0..=MAX_PLEDGE_AMOUNT as f64).contains(&v.round()) => {
            v.round() as i64
        }
        _ => default_pledge,
    }
}

fn parse_pledge_cell(cell: Option<&String>) -> Option<f64> {
    cell.and_then(|c| c.parse::<f64>().ok())
}

/// Map `table` through `mapping` with the standard default pledge.
pub fn execute(table: &CsvTable, mapping: &ColumnMapping) -> Result<Vec<GuestEntry>> {
    execute_with_default(table, mapping, DEFAULT_PLEDGE_AMOUNT)
}

pub fn execute_with_default(
    table: &CsvTable,
    mapping: &ColumnMapping,
    default_pledge: i64,
) -> Result<Vec<GuestEntry>> {
    let (name_col, phone_col) = mapping.validate(table.headers.len())?;

    let entries = table
        .rows
        .iter()
        .filter_map(|row| {
            let name = row.get(name_col).map(String::as_str).unwrap_or("");
            let phone = row.get(phone_col).map(String::as_str).unwrap_or("");
            let pledge = mapping.pledge.and_then(|c| parse_pledge_cell(row.get(c)));
            GuestEntry::new(name, phone, pledge, default_pledge)
        })
        .collect();
    Ok(entries)
}
