use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Partition name used when the input carries no service column.
pub const DEFAULT_SERVICE: &str = "all";

#[derive(Error, Debug, PartialEq)]
pub enum SeriesError {
    #[error("unknown service: {0}")]
    UnknownService(String),
    #[error("duplicate period {period} in service {service}")]
    DuplicatePeriod { service: String, period: NaiveDate },
    #[error("rows {previous} and {current} are neither one day nor one week apart")]
    UnsupportedSpacing {
        previous: NaiveDate,
        current: NaiveDate,
    },
    #[error("gap in series between {previous} and {current}")]
    IrregularSpacing {
        previous: NaiveDate,
        current: NaiveDate,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    #[default]
    Week,
}

impl Granularity {
    pub fn days(self) -> i64 {
        match self {
            Granularity::Day => 1,
            Granularity::Week => 7,
        }
    }

    fn from_days(days: i64) -> Option<Self> {
        match days {
            1 => Some(Granularity::Day),
            7 => Some(Granularity::Week),
            _ => None,
        }
    }

    /// Moves `date` forward by `steps` periods; `None` past the calendar's range.
    pub fn advance(self, date: NaiveDate, steps: i64) -> Option<NaiveDate> {
        let days = self.days().checked_mul(steps)?;
        date.checked_add_signed(Duration::try_days(days)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesRow {
    pub period_start: NaiveDate,
    pub demand: Option<f64>,
    pub capacity: Option<f64>,
    pub actual_waiting_list: Option<f64>,
}

/// Every row of an input file, tagged with the service it belongs to.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesTable {
    rows: Vec<(String, TimeSeriesRow)>,
}

impl TimeSeriesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, service: impl Into<String>, row: TimeSeriesRow) {
        self.rows.push((service.into(), row));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn services(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self.rows.iter().map(|(name, _)| name.as_str()).collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// Returns the rows of one service ordered by period.
    pub fn select(&self, service: &str) -> Result<ServiceSeries, SeriesError> {
        let rows: Vec<TimeSeriesRow> = self
            .rows
            .iter()
            .filter(|(name, _)| name == service)
            .map(|(_, row)| row.clone())
            .collect();
        if rows.is_empty() {
            return Err(SeriesError::UnknownService(service.to_string()));
        }
        ServiceSeries::new(service, rows)
    }
}

/// The rows of a single service, unique and strictly increasing by period.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSeries {
    service: String,
    rows: Vec<TimeSeriesRow>,
}

impl ServiceSeries {
    pub fn new(service: &str, mut rows: Vec<TimeSeriesRow>) -> Result<Self, SeriesError> {
        rows.sort_by_key(|row| row.period_start);
        if let Some(pair) = rows
            .windows(2)
            .find(|pair| pair[0].period_start == pair[1].period_start)
        {
            return Err(SeriesError::DuplicatePeriod {
                service: service.to_string(),
                period: pair[0].period_start,
            });
        }
        Ok(Self {
            service: service.to_string(),
            rows,
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn rows(&self) -> &[TimeSeriesRow] {
        &self.rows
    }

    pub fn periods(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|row| row.period_start).collect()
    }

    pub fn row_at(&self, period: NaiveDate) -> Option<&TimeSeriesRow> {
        self.rows
            .binary_search_by_key(&period, |row| row.period_start)
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// Rows strictly before `as_of`.
    pub fn past(&self, as_of: NaiveDate) -> &[TimeSeriesRow] {
        let end = self.rows.partition_point(|row| row.period_start < as_of);
        &self.rows[..end]
    }

    pub fn last_actual_before(&self, as_of: NaiveDate) -> Option<&TimeSeriesRow> {
        self.past(as_of)
            .iter()
            .rev()
            .find(|row| row.actual_waiting_list.is_some())
    }

    pub fn first_actual(&self) -> Option<&TimeSeriesRow> {
        self.rows.iter().find(|row| row.actual_waiting_list.is_some())
    }

    /// Spacing shared by every pair of consecutive rows, `None` for a single row.
    pub fn native_granularity(&self) -> Result<Option<Granularity>, SeriesError> {
        let mut steps = self
            .rows
            .windows(2)
            .map(|pair| (pair[0].period_start, pair[1].period_start));
        let Some((previous, current)) = steps.next() else {
            return Ok(None);
        };
        let days = (current - previous).num_days();
        let granularity = Granularity::from_days(days)
            .ok_or(SeriesError::UnsupportedSpacing { previous, current })?;

        match steps.find(|(previous, current)| (*current - *previous).num_days() != days) {
            Some((previous, current)) => Err(SeriesError::IrregularSpacing { previous, current }),
            None => Ok(Some(granularity)),
        }
    }
}
