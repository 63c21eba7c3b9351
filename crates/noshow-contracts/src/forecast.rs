//! Forecast card types — the serialized output of the forecast aggregator.
//!
//! Field names here are the wire contract consumed by the (out-of-scope)
//! conversational renderer. The card is pure data: no rendering vocabulary.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, EngineResult};
use crate::risk::RiskTier;

/// An inclusive calendar date range.
///
/// Serializes as `"YYYY-MM-DD"` for a single day and `"start/end"` (ISO 8601
/// interval notation) for multi-day ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range; fails with `InvalidArgument` if `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if end < start {
            return Err(EngineError::InvalidArgument {
                reason: format!("date range end {} precedes start {}", end, start),
            });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day.
    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// The week (7 days) starting at `start`.
    pub fn week_of(start: NaiveDate) -> Self {
        Self { start, end: start + chrono::Days::new(6) }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    /// True if `date` falls inside the range (inclusive on both ends).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterate every calendar day in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |d| {
            let next = *d + chrono::Days::new(1);
            (next <= end).then_some(next)
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_day() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}/{}", self.start, self.end)
        }
    }
}

impl FromStr for DateRange {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_day = |d: &str| {
            d.parse::<NaiveDate>().map_err(|_| EngineError::InvalidArgument {
                reason: format!("unparseable date '{}', expected YYYY-MM-DD", d),
            })
        };
        match s.split_once('/') {
            Some((a, b)) => Self::new(parse_day(a)?, parse_day(b)?),
            None => Ok(Self::single(parse_day(s)?)),
        }
    }
}

impl Serialize for DateRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Appointment counts per risk tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl TierCounts {
    /// Increment the count for `tier`.
    pub fn bump(&mut self, tier: RiskTier) {
        match tier {
            RiskTier::High => self.high += 1,
            RiskTier::Medium => self.medium += 1,
            RiskTier::Low => self.low += 1,
        }
    }

    /// Sum of all three tiers; must equal the total scheduled count.
    pub fn total(&self) -> u32 {
        self.high + self.medium + self.low
    }
}

/// Single-day breakdown inside a forecast card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayForecast {
    pub date: NaiveDate,
    pub total_scheduled: u32,
    pub tier_counts: TierCounts,
    /// Sum of no-show probabilities over the day's appointments.
    pub expected_no_shows: f64,
}

/// Discriminates single-day from multi-day payloads for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastKind {
    #[serde(rename = "dailyForecast")]
    Daily,
    #[serde(rename = "weeklyForecast")]
    Weekly,
}

/// Aggregated risk view over one or more days.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastCard {
    #[serde(rename = "$type")]
    pub kind: ForecastKind,
    pub date_range: DateRange,
    pub total_scheduled: u32,
    pub tier_counts: TierCounts,
    /// Sum of probabilities over all appointments in range.
    pub expected_no_shows: f64,
    /// Per-day breakdown; one entry per calendar day for multi-day ranges.
    pub days: Vec<DayForecast>,
    /// The day with the highest expected no-shows, ties to the earliest date.
    /// `None` for daily cards and for ranges with no scheduled appointments.
    pub highest_risk_date: Option<NaiveDate>,
}
