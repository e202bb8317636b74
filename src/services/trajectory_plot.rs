use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use plotters::coord::types::{RangedCoordf64, RangedCoordi32};
use plotters::prelude::*;
use thiserror::Error;

use crate::domain::trajectory::Trajectory;
use crate::services::projection::{Projection, format_date};

#[derive(Error, Debug)]
pub enum TrajectoryPlotError {
    #[error("projection has no periods to plot")]
    EmptyProjection,
    #[error("failed to render trajectory plot: {0}")]
    Plot(String),
}

const ACTUAL_COLOR: RGBColor = RGBColor(110, 110, 110);
const BASELINE_COLOR: RGBColor = RGBColor(150, 190, 230);
const FORECAST_COLOR: RGBColor = RGBColor(30, 122, 204);
const ADJUSTMENT_COLOR: RGBColor = RGBColor(46, 160, 67);
const RESET_COLOR: RGBColor = RGBColor(214, 39, 40);

/// Renders actual, baseline and scenario trajectories on one chart.
///
/// The x axis is the index into every period of the run; labels map the
/// index back to the period start date.
pub fn write_projection_png<P: AsRef<Path>>(
    output_path: P,
    projection: &Projection,
) -> Result<(), TrajectoryPlotError> {
    let periods: Vec<NaiveDate> = projection
        .actual
        .periods()
        .into_iter()
        .chain(projection.forecast.periods())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if periods.is_empty() {
        return Err(TrajectoryPlotError::EmptyProjection);
    }
    let index_of = |date: NaiveDate| periods.partition_point(|period| *period < date) as i32;

    let max_value = projection
        .actual
        .values()
        .into_iter()
        .chain(projection.forecast.values())
        .chain(projection.baseline.values())
        .fold(0.0_f64, f64::max);
    let max_y = (max_value * 1.1).max(1.0);
    let max_x = (periods.len() as i32 - 1).max(1);

    let root = BitMapBackend::new(output_path.as_ref(), (1100, 650)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| TrajectoryPlotError::Plot(e.to_string()))?;

    let caption = format!("{} waiting list", projection.service);
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(caption, ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(70)
        .build_cartesian_2d(0..max_x, 0.0..max_y)
        .map_err(|e| TrajectoryPlotError::Plot(e.to_string()))?;

    let label_count = periods.len().clamp(1, 10);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Period")
        .y_desc("Waiting list")
        .label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 20))
        .x_labels(label_count)
        .x_label_formatter(&|index| {
            if *index < 0 {
                return String::new();
            }
            periods
                .get(*index as usize)
                .map(|date| format_date(*date))
                .unwrap_or_default()
        })
        .draw()
        .map_err(|e| TrajectoryPlotError::Plot(e.to_string()))?;

    draw_trajectory(&mut chart, &projection.actual, &index_of, ACTUAL_COLOR, "Actual")?;
    draw_trajectory(&mut chart, &projection.baseline, &index_of, BASELINE_COLOR, "Baseline")?;
    draw_trajectory(&mut chart, &projection.forecast, &index_of, FORECAST_COLOR, "Scenario")?;

    if let Some(boundary) = as_of_index(&periods, projection.as_of) {
        chart
            .draw_series(LineSeries::new(
                [(boundary, 0.0), (boundary, max_y)],
                BLACK.mix(0.3).stroke_width(1),
            ))
            .map_err(|e| TrajectoryPlotError::Plot(e.to_string()))?;
    }

    let adjustment_markers: Vec<(i32, f64)> = projection
        .adjustments
        .events()
        .iter()
        .filter_map(|event| {
            projection
                .forecast
                .points()
                .iter()
                .find(|point| event.is_active(point.period))
                .map(|point| (index_of(point.period), point.value))
        })
        .collect();
    chart
        .draw_series(
            adjustment_markers
                .into_iter()
                .map(|coord| Circle::new(coord, 6, ADJUSTMENT_COLOR.filled())),
        )
        .map_err(|e| TrajectoryPlotError::Plot(e.to_string()))?
        .label("Adjustment starts")
        .legend(|(x, y)| Circle::new((x + 10, y), 5, ADJUSTMENT_COLOR.filled()));

    let reset_markers: Vec<(i32, f64)> = projection
        .resets
        .resets()
        .iter()
        .filter_map(|reset| {
            projection
                .forecast
                .value_at(reset.date)
                .map(|value| (index_of(reset.date), value))
        })
        .collect();
    chart
        .draw_series(
            reset_markers
                .into_iter()
                .map(|coord| Cross::new(coord, 7, RESET_COLOR.stroke_width(3))),
        )
        .map_err(|e| TrajectoryPlotError::Plot(e.to_string()))?
        .label("Reset")
        .legend(|(x, y)| Cross::new((x + 10, y), 5, RESET_COLOR.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 16))
        .draw()
        .map_err(|e| TrajectoryPlotError::Plot(e.to_string()))?;

    root.present()
        .map_err(|e| TrajectoryPlotError::Plot(e.to_string()))?;
    log::info!("rendered {} periods for {}", periods.len(), projection.service);
    Ok(())
}

/// Index of the first period on or after `as_of`, when `as_of` falls within
/// the plotted range.
fn as_of_index(periods: &[NaiveDate], as_of: NaiveDate) -> Option<i32> {
    let first = periods.first()?;
    let last = periods.last()?;
    if as_of <= *first || as_of > *last {
        return None;
    }
    Some(periods.partition_point(|period| *period < as_of) as i32)
}

fn draw_trajectory<DB, F>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordi32, RangedCoordf64>>,
    trajectory: &Trajectory,
    index_of: &F,
    color: RGBColor,
    label: &str,
) -> Result<(), TrajectoryPlotError>
where
    DB: DrawingBackend,
    F: Fn(NaiveDate) -> i32,
{
    if trajectory.is_empty() {
        return Ok(());
    }
    chart
        .draw_series(LineSeries::new(
            trajectory
                .points()
                .iter()
                .map(|point| (index_of(point.period), point.value)),
            color.stroke_width(2),
        ))
        .map_err(|e| TrajectoryPlotError::Plot(e.to_string()))?
        .label(label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    Ok(())
}
