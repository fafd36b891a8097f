use crate::domain::models::{RowCollection, Weekday};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RowField {
    Weekday,
    Start,
    End,
}

impl RowField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekday => "weekday",
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// Why a single active row cannot be turned into a busy interval.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowError {
    #[error("active row needs {}", join_fields(.fields))]
    MissingField { fields: Vec<RowField> },
    #[error("{} must be formatted as HH:MM", join_fields(.fields))]
    BadTimeFormat { fields: Vec<RowField> },
    #[error("start must be before end")]
    InvertedInterval,
}

impl RowError {
    pub fn fields(&self) -> Vec<RowField> {
        match self {
            Self::MissingField { fields } | Self::BadTimeFormat { fields } => fields.clone(),
            Self::InvertedInterval => vec![RowField::Start, RowField::End],
        }
    }
}

/// Every condition surfaced to the caller next to (or instead of) a result.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanProblem {
    #[error("{} {}: {error}", .collection.label(), .index + 1)]
    Row {
        collection: RowCollection,
        index: usize,
        error: RowError,
    },
    #[error("work window must be HH:MM with start before end")]
    InvalidGlobalWindow,
    #[error("minimum duration must be greater than 0")]
    InvalidMinimumDuration,
    #[error("week date {value:?} is not a valid YYYY-MM-DD date")]
    InvalidAnchorDate { value: String },
    #[error("{} work window is invalid, falling back to the global window", .weekday.label())]
    InvalidDayWindowOverride { weekday: Weekday },
    #[error("task duration must be greater than 0 minutes")]
    InvalidTaskDuration,
}

impl PlanProblem {
    /// Blocking problems stop the weekly computation entirely.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            Self::InvalidGlobalWindow | Self::InvalidMinimumDuration | Self::InvalidAnchorDate { .. }
        )
    }

    pub fn fields(&self) -> Vec<RowField> {
        match self {
            Self::Row { error, .. } => error.fields(),
            _ => Vec::new(),
        }
    }
}

fn join_fields(fields: &[RowField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
