use crate::services::projection_types::{ProjectionReport, ReportPoint};

pub fn format_projection_report(report: &ProjectionReport) -> String {
    let difference = match report.difference_from_baseline {
        Some(value) => format!("{value:.2}"),
        None => "n/a".to_string(),
    };

    let mut lines = Vec::new();
    lines.push("Waiting List Projection".to_string());
    lines.push(format!("Service: {}", report.service));
    lines.push(format!("As of: {}", report.as_of));
    lines.push(format!("Mode: {}", report.mode));
    lines.push(format!("Initial waiting list: {:.2}", report.initial_waiting_list));
    lines.push(format!("Simulated periods: {}", report.simulated_periods));
    lines.push(String::new());
    lines.push("Trajectory | Period | Waiting list".to_string());
    lines.push("-----------|--------|-------------".to_string());
    lines.push(format_point_row("Last actual", report.last_actual.as_ref()));
    lines.push(format_point_row("Scenario end", report.final_forecast.as_ref()));
    lines.push(format_point_row("Baseline end", report.final_baseline.as_ref()));
    lines.push(format_point_row("Scenario peak", report.forecast_peak.as_ref()));
    lines.push(String::new());
    lines.push(format!("Reduction against baseline: {difference}"));
    lines.push(format!(
        "Cleared on: {}",
        report.forecast_clears.as_deref().unwrap_or("n/a")
    ));

    if !report.adjustments.is_empty() {
        lines.push(String::new());
        lines.push("Adjustments:".to_string());
        for adjustment in &report.adjustments {
            let end = adjustment.end.as_deref().unwrap_or("open");
            lines.push(format!(
                "- {} {:+} from {} to {}",
                adjustment.name, adjustment.delta_capacity, adjustment.start, end
            ));
        }
    }
    if !report.resets.is_empty() {
        lines.push(String::new());
        lines.push("Resets:".to_string());
        for reset in &report.resets {
            let status = if reset.applied { "applied" } else { "not applied" };
            lines.push(format!("- {} to {} ({status})", reset.date, reset.value));
        }
    }

    lines.join("\n")
}

fn format_point_row(label: &str, point: Option<&ReportPoint>) -> String {
    match point {
        Some(point) => format!("{label} | {} | {:.2}", point.period, point.value),
        None => format!("{label} | n/a | n/a"),
    }
}
