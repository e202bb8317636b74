use chrono::NaiveDate;

use crate::domain::events::AdjustmentEvent;
use crate::domain::time_series::{Granularity, ServiceSeries, TimeSeriesRow};

pub fn on_date(year: i32, month: u32, day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn row(period: NaiveDate, demand: f64, capacity: f64, actual: Option<f64>) -> TimeSeriesRow {
    TimeSeriesRow {
        period_start: period,
        demand: Some(demand),
        capacity: Some(capacity),
        actual_waiting_list: actual,
    }
}

/// A future row without any recorded values.
pub fn placeholder(period: NaiveDate) -> TimeSeriesRow {
    TimeSeriesRow {
        period_start: period,
        demand: None,
        capacity: None,
        actual_waiting_list: None,
    }
}

pub fn adjustment(
    name: &str,
    start: NaiveDate,
    end: Option<NaiveDate>,
    delta: f64,
) -> AdjustmentEvent {
    AdjustmentEvent::new(name, start, end, delta).unwrap()
}

/// `count` consecutive weeks starting at `start`.
pub fn weeks(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count as i64)
        .map(|idx| Granularity::Week.advance(start, idx).unwrap())
        .collect()
}

/// Weekly series where row `i` gets `demand[i]`, `capacity[i]` and `actual[i]`.
pub fn weekly_series(
    start: NaiveDate,
    demand: &[f64],
    capacity: &[f64],
    actual: &[Option<f64>],
) -> ServiceSeries {
    let rows = weeks(start, demand.len())
        .into_iter()
        .enumerate()
        .map(|(idx, period)| TimeSeriesRow {
            period_start: period,
            demand: Some(demand[idx]),
            capacity: capacity.get(idx).copied(),
            actual_waiting_list: actual.get(idx).copied().flatten(),
        })
        .collect();
    ServiceSeries::new("Paeds", rows).unwrap()
}
