use crate::domain::interval::Interval;
use crate::domain::time::TimeOfDay;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const RECURRING_ROW_COUNT: usize = 5;
pub const VARIABLE_ROW_COUNT: usize = 10;

/// Declaration order is ISO order (Monday first), which `Ord` relies on.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// ISO 8601 weekday number, Monday = 1 through Sunday = 7.
    pub fn iso_number(self) -> u32 {
        self.index() as u32 + 1
    }

    pub fn from_iso_number(number: u32) -> Option<Self> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        Self::ALL.get(index).copied()
    }

    /// Position in a Monday-first week.
    pub fn index(self) -> usize {
        match self {
            Self::Monday => 0,
            Self::Tuesday => 1,
            Self::Wednesday => 2,
            Self::Thursday => 3,
            Self::Friday => 4,
            Self::Saturday => 5,
            Self::Sunday => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Accepts English names, three-letter abbreviations and ISO numbers.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(number) = value.parse::<u32>() {
            return Self::from_iso_number(number);
        }
        match value.to_ascii_lowercase().as_str() {
            "monday" | "mon" => Some(Self::Monday),
            "tuesday" | "tue" => Some(Self::Tuesday),
            "wednesday" | "wed" => Some(Self::Wednesday),
            "thursday" | "thu" => Some(Self::Thursday),
            "friday" | "fri" => Some(Self::Friday),
            "saturday" | "sat" => Some(Self::Saturday),
            "sunday" | "sun" => Some(Self::Sunday),
            _ => None,
        }
    }
}

/// Weekdays on disk are either names (`"monday"`, `"Tue"`) or ISO numbers,
/// as text or as integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawWeekday {
    Text(String),
    Number(u32),
}

impl RawWeekday {
    fn resolve<E: serde::de::Error>(self) -> Result<Option<Weekday>, E> {
        match self {
            Self::Text(text) if text.trim().is_empty() => Ok(None),
            Self::Text(text) => Weekday::parse(&text)
                .map(Some)
                .ok_or_else(|| E::custom(format!("unknown weekday {text:?}"))),
            Self::Number(number) => Weekday::from_iso_number(number)
                .map(Some)
                .ok_or_else(|| E::custom(format!("weekday number {number} is not in 1..=7"))),
        }
    }
}

impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawWeekday::deserialize(deserializer)?
            .resolve::<D::Error>()?
            .ok_or_else(|| serde::de::Error::custom("weekday must not be empty"))
    }
}

/// `null`, a missing value and `""` all mean "no weekday chosen".
fn deserialize_optional_weekday<'de, D>(deserializer: D) -> Result<Option<Weekday>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawWeekday>::deserialize(deserializer)? {
        Some(raw) => raw.resolve(),
        None => Ok(None),
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(weekday: chrono::Weekday) -> Self {
        Self::ALL[weekday.num_days_from_monday() as usize]
    }
}

/// Which list an appointment row belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RowCollection {
    /// Repeats every week.
    Recurring,
    /// One-off, only for the resolved week.
    Variable,
}

impl RowCollection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Recurring => "Recurring appointment",
            Self::Variable => "One-off appointment",
        }
    }

    pub fn row_count(self) -> usize {
        match self {
            Self::Recurring => RECURRING_ROW_COUNT,
            Self::Variable => VARIABLE_ROW_COUNT,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppointmentRow {
    pub active: bool,
    #[serde(alias = "day", deserialize_with = "deserialize_optional_weekday")]
    pub weekday: Option<Weekday>,
    pub start: String,
    pub end: String,
    pub label: String,
}

impl AppointmentRow {
    pub fn new(weekday: Weekday, start: &str, end: &str) -> Self {
        Self {
            active: true,
            weekday: Some(weekday),
            start: start.to_string(),
            end: end.to_string(),
            label: String::new(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// True when nothing has been filled in at all.
    pub fn is_blank(&self) -> bool {
        self.weekday.is_none()
            && self.start.trim().is_empty()
            && self.end.trim().is_empty()
            && self.label.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Chronological,
    Length,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Any `YYYY-MM-DD` date inside the target week.
    pub week_date: String,
    pub work_start: String,
    pub work_end: String,
    pub min_duration_hours: f64,
    pub display_min_minutes: u32,
    pub sort_mode: SortMode,
    pub task_duration_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            week_date: Local::now().date_naive().to_string(),
            work_start: "07:00".to_string(),
            work_end: "18:00".to_string(),
            min_duration_hours: 1.0,
            display_min_minutes: 0,
            sort_mode: SortMode::Chronological,
            task_duration_minutes: 60,
        }
    }
}

impl Settings {
    /// Minimum reportable slot length, `None` when the configured hours do not
    /// round to a positive number of minutes.
    pub fn min_duration_minutes(&self) -> Option<u32> {
        let minutes = (self.min_duration_hours * 60.0).round();
        if !minutes.is_finite() || minutes <= 0.0 || minutes > f64::from(u32::MAX) {
            return None;
        }
        Some(minutes as u32)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct DayWindowOverride {
    pub active: bool,
    pub start: String,
    pub end: String,
}

/// Per-weekday work windows, gated by a single `enabled` switch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct DayWindows {
    pub enabled: bool,
    pub overrides: BTreeMap<Weekday, DayWindowOverride>,
}

/// Everything the user edits: settings, day windows and both row collections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerState {
    pub settings: Settings,
    pub day_windows: DayWindows,
    pub recurring: Vec<AppointmentRow>,
    pub variable: Vec<AppointmentRow>,
}

impl Default for PlannerState {
    fn default() -> Self {
        let mut recurring = vec![
            AppointmentRow::new(Weekday::Monday, "10:30", "12:30"),
            AppointmentRow::new(Weekday::Tuesday, "08:30", "10:30"),
            AppointmentRow::new(Weekday::Tuesday, "13:00", "15:00"),
        ];
        recurring.resize(RECURRING_ROW_COUNT, AppointmentRow::default());
        Self {
            settings: Settings::default(),
            day_windows: DayWindows::default(),
            recurring,
            variable: vec![AppointmentRow::default(); VARIABLE_ROW_COUNT],
        }
    }
}

impl PlannerState {
    pub fn rows(&self, collection: RowCollection) -> &[AppointmentRow] {
        match collection {
            RowCollection::Recurring => &self.recurring,
            RowCollection::Variable => &self.variable,
        }
    }

    pub fn rows_mut(&mut self, collection: RowCollection) -> &mut Vec<AppointmentRow> {
        match collection {
            RowCollection::Recurring => &mut self.recurring,
            RowCollection::Variable => &mut self.variable,
        }
    }

    /// Truncates or pads both collections with blank rows to their fixed lengths.
    pub fn normalize_rows(&mut self) {
        for collection in [RowCollection::Recurring, RowCollection::Variable] {
            self.rows_mut(collection)
                .resize(collection.row_count(), AppointmentRow::default());
        }
    }
}

/// Identifies a slot for highlighting: weekday plus start and end.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub weekday: Weekday,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FreeSlot {
    pub weekday: Weekday,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl FreeSlot {
    pub fn new(weekday: Weekday, date: NaiveDate, interval: Interval) -> Self {
        Self {
            weekday,
            date,
            start: interval.start,
            end: interval.end,
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.start.minutes_until(self.end)
    }

    pub fn key(&self) -> SlotKey {
        SlotKey {
            weekday: self.weekday,
            start: self.start,
            end: self.end,
        }
    }
}
