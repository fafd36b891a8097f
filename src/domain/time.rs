use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Minutes since midnight, always within `[0, 1440)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Minutes from `self` to `later`, zero when `later` is not after `self`.
    pub fn minutes_until(self, later: TimeOfDay) -> u32 {
        u32::from(later.0.saturating_sub(self.0))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_time(*self))
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_time(&raw).ok_or_else(|| D::Error::custom(format!("{raw:?} must be HH:MM")))
    }
}

/// Strict `HH:MM` parser. Anything that is not exactly two hour digits (00-23),
/// a colon and two minute digits (00-59) is rejected; nothing is coerced.
pub fn parse_time(text: &str) -> Option<TimeOfDay> {
    let &[h1, h2, b':', m1, m2] = text.as_bytes() else {
        return None;
    };
    if ![h1, h2, m1, m2].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let hour = u16::from(h1 - b'0') * 10 + u16::from(h2 - b'0');
    let minute = u16::from(m1 - b'0') * 10 + u16::from(m2 - b'0');
    TimeOfDay::from_hm(hour, minute)
}

pub fn format_time(time: TimeOfDay) -> String {
    time.to_string()
}

/// Renders a duration as `<H>h <MM>m`, e.g. `0h 05m` or `27h 30m`.
pub fn format_duration(minutes: u32) -> String {
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}
