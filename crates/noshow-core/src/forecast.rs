//! Forecast aggregation: classified appointments → forecast cards.
//!
//! Pure data transformation. Input ordering does not affect the output:
//! per-day grouping uses a `BTreeMap` and the highest-risk day is selected
//! by a deterministic comparison, so concurrent upstream fetch order is
//! irrelevant.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use noshow_contracts::forecast::{DateRange, DayForecast, ForecastCard, ForecastKind, TierCounts};

use crate::engine::ScoredAppointment;

/// Roll classified appointments into a forecast card for `range`.
///
/// Daily cards (single-day range) carry no per-day breakdown. Multi-day
/// cards emit one `DayForecast` per calendar day in the range — zero-filled
/// for days without appointments — plus the range summary and the
/// highest-risk date (largest expected no-shows, ties to the earliest date).
pub fn build_forecast(range: DateRange, scored: &[ScoredAppointment]) -> ForecastCard {
    let mut per_day: BTreeMap<NaiveDate, DayForecast> = range
        .days()
        .map(|date| {
            (
                date,
                DayForecast {
                    date,
                    total_scheduled: 0,
                    tier_counts: TierCounts::default(),
                    expected_no_shows: 0.0,
                },
            )
        })
        .collect();

    let mut totals = TierCounts::default();
    let mut expected = 0.0;

    for entry in scored {
        let date = entry.record.appointment.date();
        debug_assert!(range.contains(date), "scored appointment outside range");
        let day = match per_day.get_mut(&date) {
            Some(day) => day,
            None => continue,
        };
        day.total_scheduled += 1;
        day.tier_counts.bump(entry.tier);
        day.expected_no_shows += entry.score.probability;

        totals.bump(entry.tier);
        expected += entry.score.probability;
    }

    let kind = if range.is_single_day() {
        ForecastKind::Daily
    } else {
        ForecastKind::Weekly
    };

    // Largest expected-no-show sum wins; BTreeMap iteration order makes the
    // strict `>` comparison resolve ties to the earliest date.
    let highest_risk_date = match kind {
        ForecastKind::Daily => None,
        ForecastKind::Weekly if scored.is_empty() => None,
        ForecastKind::Weekly => per_day
            .values()
            .fold(None::<&DayForecast>, |best, day| match best {
                Some(b) if day.expected_no_shows > b.expected_no_shows => Some(day),
                Some(b) => Some(b),
                None => Some(day),
            })
            .map(|day| day.date),
    };

    let days = match kind {
        ForecastKind::Daily => Vec::new(),
        ForecastKind::Weekly => per_day.into_values().collect(),
    };

    debug!(
        range = %range,
        total = totals.total(),
        expected_no_shows = expected,
        "forecast card built"
    );

    ForecastCard {
        kind,
        date_range: range,
        total_scheduled: totals.total(),
        tier_counts: totals,
        expected_no_shows: expected,
        days,
        highest_risk_date,
    }
}
