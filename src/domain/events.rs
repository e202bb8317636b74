use std::collections::HashSet;

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventError {
    #[error("adjustment name must not be empty")]
    EmptyName,
    #[error("duplicate adjustment name: {0}")]
    DuplicateName(String),
    #[error("adjustment {0} has a zero or non-finite capacity change")]
    InvalidDelta(String),
    #[error("adjustment {name} ends on {end} before it starts on {start}")]
    EndBeforeStart {
        name: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("more than one reset on {0}")]
    DuplicateResetDate(NaiveDate),
    #[error("reset on {date} has an invalid value {value}")]
    InvalidResetValue { date: NaiveDate, value: f64 },
}

/// A capacity change that applies from `start` up to and including `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentEvent {
    pub name: String,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub delta_capacity: f64,
}

impl AdjustmentEvent {
    pub fn new(
        name: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
        delta_capacity: f64,
    ) -> Result<Self, EventError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EventError::EmptyName);
        }
        if delta_capacity == 0.0 || !delta_capacity.is_finite() {
            return Err(EventError::InvalidDelta(name.to_string()));
        }
        if let Some(end) = end {
            if end < start {
                return Err(EventError::EndBeforeStart {
                    name: name.to_string(),
                    start,
                    end,
                });
            }
        }
        Ok(Self {
            name: name.to_string(),
            start,
            end,
            delta_capacity,
        })
    }

    pub fn is_active(&self, period: NaiveDate) -> bool {
        self.start <= period && self.end.is_none_or(|end| period <= end)
    }

    /// Label used in exports, e.g. `Extra Clinic (+5)`.
    pub fn label(&self) -> String {
        format!("{} ({:+})", self.name, self.delta_capacity)
    }
}

/// Ordered list of adjustments with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjustmentSet {
    events: Vec<AdjustmentEvent>,
}

impl AdjustmentSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(events: Vec<AdjustmentEvent>) -> Result<Self, EventError> {
        let mut names = HashSet::new();
        for event in &events {
            if !names.insert(event.name.as_str()) {
                return Err(EventError::DuplicateName(event.name.clone()));
            }
        }
        Ok(Self { events })
    }

    pub fn events(&self) -> &[AdjustmentEvent] {
        &self.events
    }

    pub fn active_at(&self, period: NaiveDate) -> impl Iterator<Item = &AdjustmentEvent> {
        self.events.iter().filter(move |event| event.is_active(period))
    }

    pub fn delta_at(&self, period: NaiveDate) -> f64 {
        self.active_at(period).map(|event| event.delta_capacity).sum()
    }

    /// `"Extra Clinic (+5); Locum A (+3)"`, or an empty string.
    pub fn summary_at(&self, period: NaiveDate) -> String {
        self.active_at(period)
            .map(AdjustmentEvent::label)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Replaces the running waiting list with `value` on `date`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetEvent {
    pub date: NaiveDate,
    pub value: f64,
}

impl ResetEvent {
    pub fn new(date: NaiveDate, value: f64) -> Result<Self, EventError> {
        if value < 0.0 || !value.is_finite() {
            return Err(EventError::InvalidResetValue { date, value });
        }
        Ok(Self { date, value })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResetSchedule {
    resets: Vec<ResetEvent>,
}

impl ResetSchedule {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(mut resets: Vec<ResetEvent>) -> Result<Self, EventError> {
        resets.sort_by_key(|reset| reset.date);
        if let Some(pair) = resets.windows(2).find(|pair| pair[0].date == pair[1].date) {
            return Err(EventError::DuplicateResetDate(pair[0].date));
        }
        Ok(Self { resets })
    }

    pub fn resets(&self) -> &[ResetEvent] {
        &self.resets
    }

    pub fn reset_at(&self, period: NaiveDate) -> Option<&ResetEvent> {
        self.resets
            .binary_search_by_key(&period, |reset| reset.date)
            .ok()
            .map(|idx| &self.resets[idx])
    }
}
