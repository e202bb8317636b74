use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::time_series::ServiceSeries;
use crate::services::extrapolation::{ExtrapolationError, FlowColumn, QuantileExtrapolator};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("no observed {column} for {period}")]
    MissingObservation { column: FlowColumn, period: NaiveDate },
    #[error(transparent)]
    Extrapolation(#[from] ExtrapolationError),
}

/// Supplies the demand (entrants) and capacity (exits) of a period.
pub trait FlowSource {
    fn demand(&self, period: NaiveDate) -> Result<f64, FlowError>;
    fn capacity(&self, period: NaiveDate) -> Result<f64, FlowError>;
}

/// Direct lookup into recorded data.
pub struct ObservedFlows<'a> {
    series: &'a ServiceSeries,
}

impl<'a> ObservedFlows<'a> {
    pub fn new(series: &'a ServiceSeries) -> Self {
        Self { series }
    }

    fn lookup(&self, period: NaiveDate, column: FlowColumn) -> Result<f64, FlowError> {
        self.series
            .row_at(period)
            .and_then(|row| column.value(row))
            .filter(|value| !value.is_nan())
            .ok_or(FlowError::MissingObservation { column, period })
    }
}

impl FlowSource for ObservedFlows<'_> {
    fn demand(&self, period: NaiveDate) -> Result<f64, FlowError> {
        self.lookup(period, FlowColumn::Demand)
    }

    fn capacity(&self, period: NaiveDate) -> Result<f64, FlowError> {
        self.lookup(period, FlowColumn::Capacity)
    }
}

/// Observed values where the data covers a period, quantile estimates beyond.
///
/// The first forecast period takes its capacity from the last actual row when
/// it has no observation of its own, so the forecast joins the recorded
/// history without a jump.
pub struct ForecastFlows<'a> {
    observed: ObservedFlows<'a>,
    extrapolator: QuantileExtrapolator,
    seam: Option<(NaiveDate, f64)>,
}

impl<'a> ForecastFlows<'a> {
    pub fn new(series: &'a ServiceSeries, extrapolator: QuantileExtrapolator) -> Self {
        Self {
            observed: ObservedFlows::new(series),
            extrapolator,
            seam: None,
        }
    }

    /// Uses `capacity` for `first_period` when it is not observed.
    pub fn with_seam(mut self, first_period: NaiveDate, capacity: Option<f64>) -> Self {
        self.seam = capacity
            .filter(|value| !value.is_nan())
            .map(|value| (first_period, value));
        self
    }

    fn resolve(&self, period: NaiveDate, column: FlowColumn) -> Result<f64, FlowError> {
        match self.observed.lookup(period, column) {
            Ok(value) => Ok(value),
            Err(FlowError::MissingObservation { .. }) => {
                if column == FlowColumn::Capacity {
                    if let Some((seam_period, value)) = self.seam {
                        if seam_period == period {
                            return Ok(value);
                        }
                    }
                }
                Ok(self.extrapolator.estimate(period, column)?)
            }
            Err(other) => Err(other),
        }
    }
}

impl FlowSource for ForecastFlows<'_> {
    fn demand(&self, period: NaiveDate) -> Result<f64, FlowError> {
        self.resolve(period, FlowColumn::Demand)
    }

    fn capacity(&self, period: NaiveDate) -> Result<f64, FlowError> {
        self.resolve(period, FlowColumn::Capacity)
    }
}

/// Adds constant demand and capacity offsets to another source.
pub struct OffsetFlows<S> {
    inner: S,
    demand_offset: f64,
    capacity_offset: f64,
}

impl<S: FlowSource> OffsetFlows<S> {
    pub fn new(inner: S, demand_offset: f64, capacity_offset: f64) -> Self {
        Self {
            inner,
            demand_offset,
            capacity_offset,
        }
    }
}

impl<S: FlowSource> FlowSource for OffsetFlows<S> {
    fn demand(&self, period: NaiveDate) -> Result<f64, FlowError> {
        Ok((self.inner.demand(period)? + self.demand_offset).max(0.0))
    }

    fn capacity(&self, period: NaiveDate) -> Result<f64, FlowError> {
        Ok((self.inner.capacity(period)? + self.capacity_offset).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scenario::DEFAULT_QUANTILE;
    use crate::test_support::{on_date, weekly_series};

    #[test]
    fn observed_flows_report_missing_values() {
        let series = weekly_series(on_date(2025, 1, 6), &[4.0, 6.0], &[3.0], &[]);
        let flows = ObservedFlows::new(&series);

        assert_eq!(flows.demand(on_date(2025, 1, 13)), Ok(6.0));
        assert_eq!(flows.capacity(on_date(2025, 1, 6)), Ok(3.0));
        assert_eq!(
            flows.capacity(on_date(2025, 1, 13)),
            Err(FlowError::MissingObservation {
                column: FlowColumn::Capacity,
                period: on_date(2025, 1, 13),
            })
        );
        assert!(flows.demand(on_date(2025, 1, 20)).is_err());
    }

    #[test]
    fn forecast_flows_prefer_observed_values_and_extrapolate_beyond_coverage() {
        let series = weekly_series(
            on_date(2025, 1, 6),
            &[10.0, 10.0, 10.0, 20.0, 20.0],
            &[5.0, 5.0, 5.0, 5.0, 5.0],
            &[],
        );
        let extrapolator = QuantileExtrapolator::new(&series, DEFAULT_QUANTILE).unwrap();
        let flows = ForecastFlows::new(&series, extrapolator);

        assert_eq!(flows.demand(on_date(2025, 1, 27)), Ok(20.0));
        assert_eq!(flows.demand(on_date(2025, 2, 10)), Ok(16.0));
        assert_eq!(flows.capacity(on_date(2025, 2, 10)), Ok(5.0));
    }

    #[test]
    fn seam_capacity_only_applies_to_the_first_forecast_period() {
        let series = weekly_series(
            on_date(2025, 1, 6),
            &[1.0, 1.0, 1.0],
            &[10.0, 10.0, 40.0],
            &[],
        );
        let extrapolator = QuantileExtrapolator::new(&series, 0.5).unwrap();
        let flows = ForecastFlows::new(&series, extrapolator).with_seam(on_date(2025, 1, 27), Some(40.0));

        assert_eq!(flows.capacity(on_date(2025, 1, 27)), Ok(40.0));
        assert_eq!(flows.capacity(on_date(2025, 2, 3)), Ok(10.0));
    }

    #[test]
    fn offsets_shift_flows_and_never_go_negative() {
        let series = weekly_series(on_date(2025, 1, 6), &[4.0], &[3.0], &[]);
        let flows = OffsetFlows::new(ObservedFlows::new(&series), 2.0, -5.0);

        assert_eq!(flows.demand(on_date(2025, 1, 6)), Ok(6.0));
        assert_eq!(flows.capacity(on_date(2025, 1, 6)), Ok(0.0));
    }
}
