use crate::domain::interval::Interval;
use crate::domain::models::{AppointmentRow, RowCollection, Weekday};
use crate::domain::problems::{PlanProblem, RowError, RowField};
use crate::domain::time::parse_time;
use crate::domain::work_window::WeekWindows;
use serde::Serialize;

/// A validated row before it is clamped to a work window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub weekday: Weekday,
    pub interval: Interval,
    pub label: String,
}

/// A row's share of busy time, already clamped to its day's work window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusyContribution {
    pub weekday: Weekday,
    pub interval: Interval,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowBatch {
    pub contributions: Vec<BusyContribution>,
    pub problems: Vec<PlanProblem>,
}

/// Checks presence, format and ordering. `Ok(None)` means the row is inactive or
/// blank and contributes nothing.
pub fn parse_row(row: &AppointmentRow) -> Result<Option<ParsedRow>, RowError> {
    if !row.active || row.is_blank() {
        return Ok(None);
    }

    let mut missing = Vec::new();
    if row.weekday.is_none() {
        missing.push(RowField::Weekday);
    }
    if row.start.trim().is_empty() {
        missing.push(RowField::Start);
    }
    if row.end.trim().is_empty() {
        missing.push(RowField::End);
    }
    let Some(weekday) = row.weekday else {
        return Err(RowError::MissingField { fields: missing });
    };
    if !missing.is_empty() {
        return Err(RowError::MissingField { fields: missing });
    }

    let start = parse_time(&row.start);
    let end = parse_time(&row.end);
    let (Some(start), Some(end)) = (start, end) else {
        let mut fields = Vec::new();
        if start.is_none() {
            fields.push(RowField::Start);
        }
        if end.is_none() {
            fields.push(RowField::End);
        }
        return Err(RowError::BadTimeFormat { fields });
    };

    let interval = Interval::new(start, end).ok_or(RowError::InvertedInterval)?;
    Ok(Some(ParsedRow {
        weekday,
        interval,
        label: row.label.trim().to_string(),
    }))
}

/// Validates one row and clamps it to `window`. A row lying entirely outside
/// the window is silently dropped.
pub fn validate_row(
    row: &AppointmentRow,
    window: &Interval,
) -> Result<Option<BusyContribution>, RowError> {
    Ok(parse_row(row)?.and_then(|parsed| clamp_parsed(parsed, window)))
}

/// Validates every row of a collection without stopping at the first failure.
/// Without `windows` only problems are collected.
pub fn validate_rows(
    collection: RowCollection,
    rows: &[AppointmentRow],
    windows: Option<&WeekWindows>,
) -> RowBatch {
    let mut batch = RowBatch::default();
    for (index, row) in rows.iter().enumerate() {
        match parse_row(row) {
            Ok(Some(parsed)) => {
                let Some(windows) = windows else {
                    continue;
                };
                let window = windows.get(parsed.weekday);
                if let Some(contribution) = clamp_parsed(parsed, &window) {
                    batch.contributions.push(contribution);
                }
            }
            Ok(None) => {}
            Err(error) => batch.problems.push(PlanProblem::Row {
                collection,
                index,
                error,
            }),
        }
    }
    batch
}

fn clamp_parsed(parsed: ParsedRow, window: &Interval) -> Option<BusyContribution> {
    let interval = parsed.interval.clamp_to(window)?;
    Some(BusyContribution {
        weekday: parsed.weekday,
        interval,
        label: parsed.label,
    })
}
