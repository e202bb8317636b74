use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::domain::time_series::{DEFAULT_SERVICE, TimeSeriesRow, TimeSeriesTable};

#[derive(Error, Debug)]
pub enum SeriesCsvError {
    #[error("failed to open time series file {path}: {source}")]
    Open { path: PathBuf, source: std::io::Error },
    #[error("failed to read time series csv: {0}")]
    Read(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("time series needs a demand or capacity column")]
    MissingFlowColumns,
    #[error("invalid date on line {line}: {value}")]
    InvalidDate { line: u64, value: String },
    #[error("invalid number in column {column} on line {line}: {value}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("negative value in column {column} on line {line}: {value}")]
    NegativeValue {
        line: u64,
        column: &'static str,
        value: f64,
    },
    #[error("time series file contains no rows")]
    Empty,
}

const PERIOD_ALIASES: &[&str] = &[
    "week",
    "weekcommencing",
    "week_commencing",
    "day",
    "date",
    "period_start",
];
const SERVICE_ALIASES: &[&str] = &["service", "entity"];
const DEMAND_ALIASES: &[&str] = &["starts", "clockstarts", "clockstarts_52+_weeks", "demand"];
const CAPACITY_ALIASES: &[&str] = &["stops", "clockstops", "clockstops_52+_weeks", "capacity"];
const ACTUAL_ALIASES: &[&str] = &[
    "over52weeks",
    "actual_waiting_list",
    "waitinglist",
    "waiting_list",
    "actual",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

struct ColumnMap {
    period: usize,
    service: Option<usize>,
    demand: Option<usize>,
    capacity: Option<usize>,
    actual: Option<usize>,
}

pub fn load_series_from_csv_file<P: AsRef<Path>>(path: P) -> Result<TimeSeriesTable, SeriesCsvError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| SeriesCsvError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    deserialize_series_from_csv_str(&contents)
}

pub fn deserialize_series_from_csv_str(input: &str) -> Result<TimeSeriesTable, SeriesCsvError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());
    read_series(reader)
}

fn read_series<R: Read>(mut reader: csv::Reader<R>) -> Result<TimeSeriesTable, SeriesCsvError> {
    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    let columns = map_columns(&headers)?;

    let mut table = TimeSeriesTable::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let field = |idx: Option<usize>| idx.and_then(|idx| record.get(idx)).unwrap_or("");

        let period_value = field(Some(columns.period));
        if period_value.is_empty() && record.iter().all(str::is_empty) {
            continue;
        }
        let period_start = parse_period(period_value).ok_or_else(|| SeriesCsvError::InvalidDate {
            line,
            value: period_value.to_string(),
        })?;

        let service = match field(columns.service) {
            "" => DEFAULT_SERVICE,
            name => name,
        };
        let row = TimeSeriesRow {
            period_start,
            demand: parse_count(field(columns.demand), "demand", line)?,
            capacity: parse_count(field(columns.capacity), "capacity", line)?,
            actual_waiting_list: parse_count(field(columns.actual), "actual_waiting_list", line)?,
        };
        table.push(service, row);
    }

    if table.is_empty() {
        return Err(SeriesCsvError::Empty);
    }
    log::info!(
        "loaded {} rows across {} services",
        table.len(),
        table.services().len()
    );
    Ok(table)
}

/// Trims, replaces spaces with `_`, drops parentheses and lower-cases.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .replace(' ', "_")
        .replace(['(', ')'], "")
        .to_lowercase()
}

fn map_columns(headers: &[String]) -> Result<ColumnMap, SeriesCsvError> {
    let find = |aliases: &[&str]| headers.iter().position(|header| aliases.contains(&header.as_str()));

    let columns = ColumnMap {
        period: find(PERIOD_ALIASES).ok_or(SeriesCsvError::MissingColumn("period"))?,
        service: find(SERVICE_ALIASES),
        demand: find(DEMAND_ALIASES),
        capacity: find(CAPACITY_ALIASES),
        actual: find(ACTUAL_ALIASES),
    };
    if columns.demand.is_none() && columns.capacity.is_none() {
        return Err(SeriesCsvError::MissingFlowColumns);
    }
    Ok(columns)
}

fn parse_period(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|datetime| datetime.date())
        })
}

fn parse_count(value: &str, column: &'static str, line: u64) -> Result<Option<f64>, SeriesCsvError> {
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let number: f64 = value.parse().map_err(|_| SeriesCsvError::InvalidNumber {
        line,
        column,
        value: value.to_string(),
    })?;
    if number < 0.0 {
        return Err(SeriesCsvError::NegativeValue {
            line,
            column,
            value: number,
        });
    }
    Ok(Some(number))
}
