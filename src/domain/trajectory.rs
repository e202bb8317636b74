use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub period: NaiveDate,
    pub value: f64,
}

/// Waiting-list values in period order, as produced by one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn from_points(points: Vec<TrajectoryPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn periods(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|point| point.period).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.value).collect()
    }

    pub fn value_at(&self, period: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&period, |point| point.period)
            .ok()
            .map(|idx| self.points[idx].value)
    }

    pub fn first(&self) -> Option<&TrajectoryPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    pub fn peak(&self) -> Option<&TrajectoryPoint> {
        self.points
            .iter()
            .reduce(|best, point| if point.value > best.value { point } else { best })
    }

    pub fn first_at_or_below(&self, threshold: f64) -> Option<&TrajectoryPoint> {
        self.points.iter().find(|point| point.value <= threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::on_date;

    fn sample() -> Trajectory {
        Trajectory::from_points(vec![
            TrajectoryPoint { period: on_date(2025, 1, 6), value: 30.0 },
            TrajectoryPoint { period: on_date(2025, 1, 13), value: 45.0 },
            TrajectoryPoint { period: on_date(2025, 1, 20), value: 45.0 },
            TrajectoryPoint { period: on_date(2025, 1, 27), value: 0.0 },
        ])
    }

    #[test]
    fn peak_returns_the_earliest_maximum() {
        let trajectory = sample();
        let peak = trajectory.peak().unwrap();
        assert_eq!(peak.period, on_date(2025, 1, 13));
        assert_eq!(peak.value, 45.0);
    }

    #[test]
    fn value_at_and_first_at_or_below() {
        let trajectory = sample();
        assert_eq!(trajectory.value_at(on_date(2025, 1, 20)), Some(45.0));
        assert_eq!(trajectory.value_at(on_date(2025, 1, 21)), None);
        assert_eq!(
            trajectory.first_at_or_below(0.0).map(|point| point.period),
            Some(on_date(2025, 1, 27))
        );
    }
}
