use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::events::{AdjustmentSet, ResetSchedule};
use crate::domain::trajectory::{Trajectory, TrajectoryPoint};
use crate::services::flow_source::{FlowError, FlowSource};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("periods must be strictly increasing: {current} follows {previous}")]
    NonMonotonicPeriods {
        previous: NaiveDate,
        current: NaiveDate,
    },
    #[error("initial waiting list must be a non-negative number, got {0}")]
    InvalidInitialValue(f64),
    #[error(transparent)]
    Flow(#[from] FlowError),
}

struct PeriodFlows {
    period: NaiveDate,
    demand: f64,
    capacity: f64,
}

/// Projects the waiting list across `periods`.
///
/// Per period: a reset on that date replaces the running value, then
/// `demand - (capacity + active adjustments)` is added and the result is
/// floored at zero. All inputs are resolved before the first step, so a run
/// either fails up front or yields one point per period.
pub fn simulate<S: FlowSource + ?Sized>(
    initial_value: f64,
    periods: &[NaiveDate],
    flows: &S,
    adjustments: &AdjustmentSet,
    resets: &ResetSchedule,
) -> Result<Trajectory, SimulationError> {
    if initial_value < 0.0 || !initial_value.is_finite() {
        return Err(SimulationError::InvalidInitialValue(initial_value));
    }
    check_strictly_increasing(periods)?;

    let resolved = periods
        .iter()
        .map(|&period| -> Result<PeriodFlows, FlowError> {
            Ok(PeriodFlows {
                period,
                demand: flows.demand(period)?,
                capacity: flows.capacity(period)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut waiting_list = initial_value;
    let points = resolved
        .iter()
        .map(|step| {
            if let Some(reset) = resets.reset_at(step.period) {
                waiting_list = reset.value;
            }
            let effective_capacity = step.capacity + adjustments.delta_at(step.period);
            let net_change = step.demand - effective_capacity;
            waiting_list = (waiting_list + net_change).max(0.0);
            TrajectoryPoint {
                period: step.period,
                value: waiting_list,
            }
        })
        .collect();

    Ok(Trajectory::from_points(points))
}

fn check_strictly_increasing(periods: &[NaiveDate]) -> Result<(), SimulationError> {
    match periods.windows(2).find(|pair| pair[1] <= pair[0]) {
        Some(pair) => Err(SimulationError::NonMonotonicPeriods {
            previous: pair[0],
            current: pair[1],
        }),
        None => Ok(()),
    }
}
