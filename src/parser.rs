use csv::{ReaderBuilder, StringRecord, Trim};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::config::OptimizerConfig;
use crate::coverage::{CoverageRequest, Period};
use crate::error::CoverageError;

/// Roster, rotation grid and per-person lookups read from one CSV file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterSheet {
    pub roster: Vec<String>,
    pub schedule: HashMap<String, Vec<String>>,
    pub weekdays: HashMap<String, u8>,
    pub seniority: HashMap<String, u8>,
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

/// Locates each field by header name. A sheet where no field is named is
/// read positionally; otherwise a field without a header is absent.
fn resolve_columns<const N: usize>(headers: &StringRecord, fields: [&[&str]; N]) -> [Option<usize>; N] {
    let named = fields.map(|names| find_column(headers, names));
    if named.iter().all(Option::is_none) {
        let mut position = 0;
        return named.map(|_| {
            position += 1;
            (position <= headers.len()).then_some(position - 1)
        });
    }
    named
}

/// Parses an optional small integer, empty meaning `None`
fn parse_level(value: &str, context: impl FnOnce() -> String) -> Result<Option<u8>, CoverageError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| CoverageError::InvalidNumber {
        context: context(),
        value: value.to_string(),
    })
}

/// Parses a date in one of the accepted formats
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Loads the roster sheet from a CSV file
///
/// Expected columns: `name`, `seniority`, `weekday`, then one rotation
/// column per period in calendar order.
pub fn load_roster<P: AsRef<Path>>(csv_path: P) -> Result<RosterSheet, CoverageError> {
    let file = std::fs::File::open(csv_path)?;
    read_roster(file)
}

pub fn read_roster<R: Read>(source: R) -> Result<RosterSheet, CoverageError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let [name_col, seniority_col, weekday_col] = resolve_columns(
        &headers,
        [
            &["name", "fellow", "person"],
            &["seniority", "pgy", "level"],
            &["weekday", "clinic_day", "clinic day"],
        ],
    );
    let name_col = name_col.ok_or_else(|| CoverageError::MissingColumn("name".to_string()))?;
    let rotation_cols: Vec<usize> = (0..headers.len())
        .filter(|c| *c != name_col && Some(*c) != seniority_col && Some(*c) != weekday_col)
        .collect();

    let mut sheet = RosterSheet::default();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = row + 2;

        let name = record.get(name_col).unwrap_or("").to_string();
        if name.is_empty() {
            continue;
        }

        let cell = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("");
        let seniority = parse_level(cell(seniority_col), || format!("seniority on line {line}"))?;
        let weekday = parse_level(cell(weekday_col), || {
            format!("weekday on line {line}")
        })?
        .unwrap_or(0);
        let rotations: Vec<String> = rotation_cols
            .iter()
            .map(|&c| record.get(c).unwrap_or("").to_string())
            .collect();

        // A repeated name replaces the earlier row but keeps its roster position
        if sheet.schedule.contains_key(&name) {
            warn!(person = %name, line, "duplicate roster row replaces earlier one");
        } else {
            sheet.roster.push(name.clone());
        }

        match seniority {
            Some(level) => {
                sheet.seniority.insert(name.clone(), level);
            }
            None => {
                sheet.seniority.remove(&name);
            }
        }
        sheet.weekdays.insert(name.clone(), weekday);
        sheet.schedule.insert(name, rotations);
    }

    Ok(sheet)
}

/// Loads the period calendar from a CSV file with `number, start, end` columns
pub fn load_periods<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Period>, CoverageError> {
    let file = std::fs::File::open(csv_path)?;
    read_periods(file)
}

pub fn read_periods<R: Read>(source: R) -> Result<Vec<Period>, CoverageError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let [number_col, start_col, end_col] = resolve_columns(
        &headers,
        [
            &["number", "block", "period"],
            &["start", "start_date"],
            &["end", "end_date"],
        ],
    );

    let mut periods = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let line = row + 2;

        let number = match number_col.and_then(|c| record.get(c)).map(str::trim).unwrap_or("") {
            "" => row as u32 + 1,
            raw => raw.parse().map_err(|_| CoverageError::InvalidNumber {
                context: format!("period number on line {line}"),
                value: raw.to_string(),
            })?,
        };

        let date_at = |col: Option<usize>, label: &str| {
            let raw = col.and_then(|c| record.get(c)).unwrap_or("");
            let parsed = parse_date(raw);
            if parsed.is_none() && !raw.is_empty() {
                warn!(period = number, line, value = raw, "unreadable {label} date, treating as missing");
            }
            parsed
        };
        let start = date_at(start_col, "start");
        let end = date_at(end_col, "end");

        periods.push(Period { number, start, end });
    }

    Ok(periods)
}

/// Assembles an optimizer request from the two input files
pub fn load_request<P: AsRef<Path>, Q: AsRef<Path>>(
    roster_path: P,
    periods_path: Q,
    config: OptimizerConfig,
) -> Result<CoverageRequest, CoverageError> {
    let sheet = load_roster(roster_path)?;
    let periods = load_periods(periods_path)?;

    Ok(CoverageRequest {
        roster: sheet.roster,
        schedule: sheet.schedule,
        weekdays: sheet.weekdays,
        seniority: sheet.seniority,
        periods,
        config,
    })
}
