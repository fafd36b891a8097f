use crate::domain::models::Weekday;
use crate::domain::problems::PlanProblem;
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekDay {
    pub weekday: Weekday,
    pub date: NaiveDate,
}

/// A Monday-first week; `days[i]` belongs to `Weekday::ALL[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Week {
    pub monday: NaiveDate,
    pub days: Vec<WeekDay>,
}

impl Week {
    pub fn date_of(&self, weekday: Weekday) -> NaiveDate {
        self.days[weekday.index()].date
    }
}

/// Exactly `YYYY-MM-DD`: no padding, no single-digit months or days.
fn is_iso_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(position, byte)| match position {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// Resolves the week containing `anchor` (`YYYY-MM-DD`).
pub fn resolve_week(anchor: &str) -> Result<Week, PlanProblem> {
    let invalid = || PlanProblem::InvalidAnchorDate {
        value: anchor.to_string(),
    };
    if !is_iso_date_shape(anchor) {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(anchor, "%Y-%m-%d").map_err(|_| invalid())?;
    let offset = u64::from(date.weekday().num_days_from_monday());
    let monday = date.checked_sub_days(Days::new(offset)).ok_or_else(invalid)?;

    let days = Weekday::ALL
        .iter()
        .map(|&weekday| {
            monday
                .checked_add_days(Days::new(weekday.index() as u64))
                .map(|date| WeekDay { weekday, date })
                .ok_or_else(invalid)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Week { monday, days })
}
