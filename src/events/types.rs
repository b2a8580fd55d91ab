use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::error::{LedgerError, Result, parse_decimal};

/// Date-time layouts accepted after the plain `YYYY-MM-DD` form.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A single energy reading at a site, priced at a tariff.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Site the reading belongs to. Not checked against the registry.
    pub nmi: String,
    /// When the reading was taken.
    pub date: NaiveDateTime,
    /// Energy delivered.
    pub energy: f64,
    /// Price per unit of energy.
    pub tariff: f64,
}

impl Event {
    pub fn new(nmi: impl Into<String>, date: NaiveDateTime, energy: f64, tariff: f64) -> Self {
        Self {
            nmi: nmi.into(),
            date,
            energy,
            tariff,
        }
    }

    /// Builds an event from the raw text of an import row.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the date, energy, or tariff is malformed.
    pub fn parse(nmi: &str, date: &str, energy: &str, tariff: &str) -> Result<Self> {
        Ok(Self::new(
            nmi.trim(),
            parse_event_date(date)?,
            parse_decimal("energy", energy)?,
            parse_decimal("tariff", tariff)?,
        ))
    }

    /// Gross revenue earned by this reading.
    pub fn revenue(&self) -> f64 {
        self.energy * self.tariff
    }

    /// Returns `true` if the reading falls inside `month`.
    pub fn is_in(&self, month: YearMonth) -> bool {
        self.date.year() == month.year && self.date.month() == month.month
    }
}

/// Parses an ISO-8601 calendar date, with or without a time of day.
///
/// A bare date is taken to mean midnight.
pub fn parse_event_date(raw: &str) -> Result<NaiveDateTime> {
    let text = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .ok_or_else(|| LedgerError::parse("date", raw, "expected YYYY-MM-DD"))
}

/// A calendar month, parsed from zero-padded `YYYY-MM`.
///
/// Only the padded form is accepted, so `Display` reproduces the parsed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
}

impl YearMonth {
    /// Creates a month, returning `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }
}

impl FromStr for YearMonth {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| LedgerError::parse("year_month", s, reason);
        let (year, month) = s.split_once('-').ok_or_else(|| invalid("expected YYYY-MM"))?;
        let all_digits = |part: &str, len: usize| {
            part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !all_digits(year, 4) || !all_digits(month, 2) {
            return Err(invalid("expected YYYY-MM"));
        }
        let year = year
            .parse::<i32>()
            .map_err(|_| invalid("year is not an integer"))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| invalid("month is not an integer"))?;
        Self::new(year, month).ok_or_else(|| invalid("month must be between 1 and 12"))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
