use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::time_series::{ServiceSeries, TimeSeriesRow};
use crate::services::percentiles::quantile_unsorted;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowColumn {
    Demand,
    Capacity,
}

impl FlowColumn {
    pub fn value(self, row: &TimeSeriesRow) -> Option<f64> {
        match self {
            FlowColumn::Demand => row.demand,
            FlowColumn::Capacity => row.capacity,
        }
    }
}

impl fmt::Display for FlowColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowColumn::Demand => write!(f, "demand"),
            FlowColumn::Capacity => write!(f, "capacity"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtrapolationError {
    #[error("no {column} history before {period}")]
    InsufficientHistory { column: FlowColumn, period: NaiveDate },
    #[error("quantile must be within [0, 1], got {0}")]
    InvalidQuantile(f64),
}

/// Estimates a future period's demand or capacity from the empirical
/// quantile of every observed value strictly before that period.
///
/// The window grows with the target period; simulated values never enter it.
#[derive(Debug, Clone)]
pub struct QuantileExtrapolator {
    quantile: f64,
    demand: Vec<(NaiveDate, f64)>,
    capacity: Vec<(NaiveDate, f64)>,
}

impl QuantileExtrapolator {
    pub fn new(series: &ServiceSeries, quantile: f64) -> Result<Self, ExtrapolationError> {
        if !(0.0..=1.0).contains(&quantile) {
            return Err(ExtrapolationError::InvalidQuantile(quantile));
        }
        Ok(Self {
            quantile,
            demand: observed(series, FlowColumn::Demand),
            capacity: observed(series, FlowColumn::Capacity),
        })
    }

    pub fn estimate(&self, period: NaiveDate, column: FlowColumn) -> Result<f64, ExtrapolationError> {
        let history = match column {
            FlowColumn::Demand => &self.demand,
            FlowColumn::Capacity => &self.capacity,
        };
        let end = history.partition_point(|(date, _)| *date < period);
        let window: Vec<f64> = history[..end].iter().map(|(_, value)| *value).collect();

        let estimate = quantile_unsorted(&window, self.quantile)
            .ok_or(ExtrapolationError::InsufficientHistory { column, period })?;
        log::debug!(
            "{column} estimate for {period}: {estimate:.2} from {} observations",
            window.len()
        );
        Ok(estimate)
    }
}

fn observed(series: &ServiceSeries, column: FlowColumn) -> Vec<(NaiveDate, f64)> {
    series
        .rows()
        .iter()
        .filter_map(|row| {
            column
                .value(row)
                .filter(|value| !value.is_nan())
                .map(|value| (row.period_start, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scenario::DEFAULT_QUANTILE;
    use crate::test_support::{on_date, weekly_series};

    #[test]
    fn reproduces_the_sixty_fifth_percentile_of_history() {
        let series = weekly_series(
            on_date(2025, 1, 6),
            &[1.0, 1.0, 1.0, 1.0, 1.0],
            &[10.0, 20.0, 10.0, 20.0, 10.0],
            &[],
        );
        let extrapolator = QuantileExtrapolator::new(&series, DEFAULT_QUANTILE).unwrap();

        let estimate = extrapolator
            .estimate(on_date(2025, 2, 10), FlowColumn::Capacity)
            .unwrap();
        assert_eq!(estimate, 16.0);
    }

    #[test]
    fn window_only_contains_rows_strictly_before_the_target() {
        let series = weekly_series(
            on_date(2025, 1, 6),
            &[2.0, 4.0, 100.0],
            &[1.0, 1.0, 1.0],
            &[],
        );
        let extrapolator = QuantileExtrapolator::new(&series, 0.5).unwrap();

        // Target 2025-01-20 sees [2, 4] only.
        assert_eq!(
            extrapolator.estimate(on_date(2025, 1, 20), FlowColumn::Demand),
            Ok(3.0)
        );
        // A later target also sees the 100.
        assert_eq!(
            extrapolator.estimate(on_date(2025, 1, 27), FlowColumn::Demand),
            Ok(4.0)
        );
    }

    #[test]
    fn missing_values_are_excluded() {
        let mut series_rows = weekly_series(
            on_date(2025, 1, 6),
            &[1.0, 1.0, 1.0],
            &[10.0, 20.0],
            &[],
        )
        .rows()
        .to_vec();
        series_rows[1].capacity = Some(f64::NAN);
        let series = ServiceSeries::new("Paeds", series_rows).unwrap();
        let extrapolator = QuantileExtrapolator::new(&series, 0.65).unwrap();

        assert_eq!(
            extrapolator.estimate(on_date(2025, 2, 3), FlowColumn::Capacity),
            Ok(10.0)
        );
    }

    #[test]
    fn empty_window_is_insufficient_history() {
        let series = weekly_series(on_date(2025, 1, 6), &[1.0], &[1.0], &[]);
        let extrapolator = QuantileExtrapolator::new(&series, 0.65).unwrap();

        assert_eq!(
            extrapolator.estimate(on_date(2025, 1, 6), FlowColumn::Demand),
            Err(ExtrapolationError::InsufficientHistory {
                column: FlowColumn::Demand,
                period: on_date(2025, 1, 6),
            })
        );
    }

    #[test]
    fn rejects_quantiles_outside_the_unit_interval() {
        let series = weekly_series(on_date(2025, 1, 6), &[1.0], &[1.0], &[]);
        assert!(matches!(
            QuantileExtrapolator::new(&series, 65.0),
            Err(ExtrapolationError::InvalidQuantile(_))
        ));
    }
}
