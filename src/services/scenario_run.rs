use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::scenario::Scenario;
use crate::domain::time_series::{SeriesError, TimeSeriesTable};
use crate::services::projection::{Projection, ProjectionError, run_projection};
use crate::services::scenario_yaml::{ScenarioYamlError, load_scenario_from_yaml_file};
use crate::services::series_csv::{SeriesCsvError, load_series_from_csv_file};

#[derive(Error, Debug)]
pub enum ScenarioRunError {
    #[error("failed to load time series: {0}")]
    Series(#[from] SeriesCsvError),
    #[error("failed to load scenario: {0}")]
    Scenario(#[from] ScenarioYamlError),
    #[error("invalid as-of date: {0} (expected YYYY-MM-DD)")]
    InvalidAsOf(String),
    #[error("several services in the time series, pick one of: {}", .0.join(", "))]
    AmbiguousService(Vec<String>),
    #[error(transparent)]
    Service(#[from] SeriesError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

pub(crate) fn project_from_files(
    series_path: &str,
    scenario_path: Option<&str>,
    service: Option<&str>,
    as_of: &str,
) -> Result<Projection, ScenarioRunError> {
    let as_of = NaiveDate::parse_from_str(as_of, "%Y-%m-%d")
        .map_err(|_| ScenarioRunError::InvalidAsOf(as_of.to_string()))?;
    let table = load_series_from_csv_file(series_path)?;
    let scenario = match scenario_path {
        Some(path) => load_scenario_from_yaml_file(path)?,
        None => Scenario::default(),
    };

    let service = resolve_service(&table, service.or(scenario.service.as_deref()))?;
    let series = table.select(&service)?;
    Ok(run_projection(&series, &scenario, as_of)?)
}

/// Explicit choice first, otherwise the only service in the table.
fn resolve_service(table: &TimeSeriesTable, requested: Option<&str>) -> Result<String, ScenarioRunError> {
    if let Some(service) = requested {
        return Ok(service.to_string());
    }
    let mut services = table.services();
    if services.len() == 1 {
        Ok(services.remove(0))
    } else {
        Err(ScenarioRunError::AmbiguousService(services))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::series_csv::deserialize_series_from_csv_str;
    use assert_fs::prelude::*;

    const TWO_SERVICES: &str = "\
Week,Service,Starts,Stops,Over52Weeks
2025-09-01,Paeds,10,10,100
2025-09-08,Paeds,10,20,90
2025-09-01,Audiology,5,5,40
";

    #[test]
    fn single_service_is_picked_without_asking() {
        let table = deserialize_series_from_csv_str("Week,Starts\n2025-09-01,1\n").unwrap();
        assert_eq!(resolve_service(&table, None).unwrap(), "all");
    }

    #[test]
    fn several_services_need_an_explicit_choice() {
        let table = deserialize_series_from_csv_str(TWO_SERVICES).unwrap();

        let error = resolve_service(&table, None).unwrap_err();
        assert_eq!(
            error.to_string(),
            "several services in the time series, pick one of: Audiology, Paeds"
        );
        assert_eq!(resolve_service(&table, Some("Paeds")).unwrap(), "Paeds");
    }

    #[test]
    fn project_from_files_uses_the_scenario_service() {
        let series_file = assert_fs::NamedTempFile::new("series.csv").unwrap();
        series_file.write_str(TWO_SERVICES).unwrap();
        let scenario_file = assert_fs::NamedTempFile::new("scenario.yaml").unwrap();
        scenario_file.write_str("service: Paeds\nhorizon: 2\n").unwrap();

        let projection = project_from_files(
            series_file.path().to_str().unwrap(),
            Some(scenario_file.path().to_str().unwrap()),
            None,
            "2025-09-15",
        )
        .unwrap();

        assert_eq!(projection.service, "Paeds");
        assert_eq!(projection.initial_value, 90.0);
        assert_eq!(projection.forecast.len(), 2);
    }

    #[test]
    fn project_from_files_rejects_bad_as_of() {
        let series_file = assert_fs::NamedTempFile::new("series.csv").unwrap();
        series_file.write_str(TWO_SERVICES).unwrap();

        let error = project_from_files(
            series_file.path().to_str().unwrap(),
            None,
            Some("Paeds"),
            "next week",
        )
        .unwrap_err();
        assert!(matches!(error, ScenarioRunError::InvalidAsOf(_)));
    }

    #[test]
    fn unknown_service_is_reported() {
        let series_file = assert_fs::NamedTempFile::new("series.csv").unwrap();
        series_file.write_str(TWO_SERVICES).unwrap();

        let error = project_from_files(
            series_file.path().to_str().unwrap(),
            None,
            Some("Cardiology"),
            "2025-09-15",
        )
        .unwrap_err();
        assert!(matches!(
            error,
            ScenarioRunError::Service(SeriesError::UnknownService(_))
        ));
    }
}
