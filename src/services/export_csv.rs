use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::services::projection::{Projection, format_date};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write export csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct ExportRecord {
    period: String,
    actual_waiting_list: Option<String>,
    simulated_waiting_list: Option<String>,
    baseline_waiting_list: Option<String>,
    adjustments_applied: String,
}

pub fn write_export_csv_file<P: AsRef<Path>>(path: P, projection: &Projection) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    serialize_export_to_csv(file, projection)
}

/// One row per period recorded or simulated, oldest first.
pub fn serialize_export_to_csv<W: Write>(writer: W, projection: &Projection) -> Result<(), ExportError> {
    let periods: BTreeSet<NaiveDate> = projection
        .actual
        .periods()
        .into_iter()
        .chain(projection.forecast.periods())
        .collect();

    let mut csv_writer = csv::Writer::from_writer(writer);
    for period in periods {
        csv_writer.serialize(ExportRecord {
            period: format_date(period),
            actual_waiting_list: projection.actual.value_at(period).map(format_value),
            simulated_waiting_list: projection.forecast.value_at(period).map(format_value),
            baseline_waiting_list: projection.baseline.value_at(period).map(format_value),
            adjustments_applied: projection.adjustments.summary_at(period),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Whole numbers without decimals, anything else to two places.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{AdjustmentSet, ResetSchedule};
    use crate::domain::scenario::SimulationMode;
    use crate::domain::trajectory::{Trajectory, TrajectoryPoint};
    use crate::test_support::{adjustment, on_date};

    fn trajectory(points: &[(NaiveDate, f64)]) -> Trajectory {
        Trajectory::from_points(
            points
                .iter()
                .map(|(period, value)| TrajectoryPoint {
                    period: *period,
                    value: *value,
                })
                .collect(),
        )
    }

    fn projection() -> Projection {
        Projection {
            service: "Paeds".to_string(),
            as_of: on_date(2025, 9, 15),
            mode: SimulationMode::Forecast,
            initial_value: 90.0,
            actual: trajectory(&[(on_date(2025, 9, 1), 100.0), (on_date(2025, 9, 8), 90.0)]),
            forecast: trajectory(&[(on_date(2025, 9, 15), 82.5), (on_date(2025, 9, 22), 70.0)]),
            baseline: trajectory(&[(on_date(2025, 9, 15), 87.5), (on_date(2025, 9, 22), 80.0)]),
            adjustments: AdjustmentSet::new(vec![
                adjustment("Extra Clinic", on_date(2025, 9, 15), None, 5.0),
                adjustment("Locum A", on_date(2025, 9, 22), Some(on_date(2025, 9, 22)), 3.0),
            ])
            .unwrap(),
            resets: ResetSchedule::empty(),
        }
    }

    #[test]
    fn export_lists_actual_then_simulated_periods_with_active_adjustments() {
        let mut buffer = Vec::new();
        serialize_export_to_csv(&mut buffer, &projection()).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines,
            vec![
                "period,actual_waiting_list,simulated_waiting_list,baseline_waiting_list,adjustments_applied",
                "2025-09-01,100,,,",
                "2025-09-08,90,,,",
                "2025-09-15,,82.50,87.50,Extra Clinic (+5)",
                "2025-09-22,,70,80,Extra Clinic (+5); Locum A (+3)",
            ]
        );
    }

    #[test]
    fn format_value_drops_trailing_zeros_for_whole_numbers() {
        assert_eq!(format_value(12.0), "12");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(16.25), "16.25");
    }
}
