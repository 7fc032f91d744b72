//! Calendar-aware resolution of classified time expressions.
//!
//! Given a base instant and the offset/setting maps produced by the
//! tokenizer, [`resolve`] computes the final instant in three phases:
//! relative offsets first (calendar-aware for years and months, a plain
//! duration for everything finer), then absolute settings, then the
//! truncation cascade that zeroes every unit finer than the finest
//! explicitly-set one.
//!
//! Calendar edge cases never fail: an impossible date produced by a year or
//! month mutation is clamped (day 28 for leap-day landings, the month's
//! last day otherwise) or falls back to day 1. The only error paths are
//! genuinely out-of-range inputs — an hour setting of 99, a month setting
//! of 13, arithmetic that leaves the representable datetime range.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Result, TimeqError};
use crate::expr::{TimeExpr, Unit};

/// Resolve a base instant against classified offsets and settings.
///
/// # Arguments
///
/// * `base` — The reference instant, already in the caller's fixed local
///   offset (this module never consults a clock or a timezone database)
/// * `offsets` — Relative adjustments per unit, values ≤ 0
/// * `settings` — Absolute field values per unit, values ≥ 0
///
/// # Phases
///
/// 1. Offsets, coarse to fine: the year offset, then the month offset
///    (day clamped to the target month's length), then day/hour/minute/
///    second summed into one duration — a duration add rolls across month
///    and year boundaries by itself.
/// 2. Settings: each present field replaced outright, with the same clamp
///    rules on calendar invalidity. A unit present in both maps gets its
///    offset applied first, then overwritten by the setting.
/// 3. Truncation: if any settings exist, every unit finer than the finest
///    set unit that was not itself set is forced to its identity value
///    (month and day to 1, clock fields to 0).
///
/// # Errors
///
/// Returns [`TimeqError::FieldOutOfRange`] for month/hour/minute/second
/// settings outside their field's range, [`TimeqError::YearOutOfRange`]
/// when a year lands outside chrono's representable span, and
/// [`TimeqError::OffsetOverflow`] when the summed duration does. Malformed
/// expression *text* never reaches here — the tokenizer drops it.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use timeq_engine::{resolve, TimeExpr};
///
/// let base = NaiveDate::from_ymd_opt(2024, 3, 15)
///     .unwrap()
///     .and_hms_opt(10, 30, 45)
///     .unwrap();
/// let parts = TimeExpr::parse("-1d");
/// let resolved = resolve(base, &parts.offsets, &parts.settings).unwrap();
/// assert_eq!(resolved.to_string(), "2024-03-14 10:30:45");
/// ```
pub fn resolve(
    base: NaiveDateTime,
    offsets: &BTreeMap<Unit, i64>,
    settings: &BTreeMap<Unit, i64>,
) -> Result<NaiveDateTime> {
    let mut current = base;

    // Phase 1: offsets.
    if let Some(&years) = offsets.get(&Unit::Year) {
        let target = (current.year() as i64)
            .checked_add(years)
            .ok_or(TimeqError::OffsetOverflow)?;
        current = set_year(current, target)?;
    }

    if let Some(&months) = offsets.get(&Unit::Month) {
        current = shift_months(current, months)?;
    }

    let delta = linear_offset(offsets).ok_or(TimeqError::OffsetOverflow)?;
    current = current
        .checked_add_signed(delta)
        .ok_or(TimeqError::OffsetOverflow)?;

    // Phase 2: settings.
    if let Some(&year) = settings.get(&Unit::Year) {
        current = set_year(current, year)?;
    }

    if let Some(&month) = settings.get(&Unit::Month) {
        current = set_month(current, month)?;
    }

    for (&unit, &value) in settings {
        current = match unit {
            // Already applied above.
            Unit::Year | Unit::Month => current,
            Unit::Day => set_day_clamped(current, value),
            Unit::Hour | Unit::Minute | Unit::Second => set_clock_field(current, unit, value)?,
        };
    }

    // Phase 3: truncation cascade. The cutoff is the finest explicitly-set
    // unit; unset units coarser than it are deliberately left alone, so
    // e.g. settings {month, second} truncate nothing between them.
    if let Some(finest) = settings.keys().map(|unit| unit.rank()).max() {
        for &unit in &Unit::ORDER[finest + 1..] {
            if !settings.contains_key(&unit) {
                current = force_identity(current, unit);
            }
        }
    }

    Ok(current)
}

/// Tokenize, classify, and resolve an expression in one call.
///
/// An expression with no recognized tokens resolves to `base` unchanged.
pub fn resolve_expression(expr: &str, base: NaiveDateTime) -> Result<NaiveDateTime> {
    let parts = TimeExpr::parse(expr);
    resolve(base, &parts.offsets, &parts.settings)
}

// ── Field mutation helpers ──────────────────────────────────────────────────

/// Number of days in a month, via the last day before the next month's first.
fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Replace the year, clamping a leap-day landing to the 28th.
fn set_year(dt: NaiveDateTime, year: i64) -> Result<NaiveDateTime> {
    let year = i32::try_from(year).map_err(|_| TimeqError::YearOutOfRange(year))?;
    if let Some(replaced) = dt.with_year(year) {
        return Ok(replaced);
    }
    dt.with_day(28)
        .and_then(|clamped| clamped.with_year(year))
        .ok_or(TimeqError::YearOutOfRange(year as i64))
}

/// Shift by whole months, clamping the day to the target month's length and
/// falling back to day 1 if the clamp itself cannot be represented.
fn shift_months(dt: NaiveDateTime, months: i64) -> Result<NaiveDateTime> {
    let total = (dt.year() as i64 * 12 + dt.month() as i64 - 1)
        .checked_add(months)
        .ok_or(TimeqError::OffsetOverflow)?;
    let year = i32::try_from(total.div_euclid(12))
        .map_err(|_| TimeqError::YearOutOfRange(total.div_euclid(12)))?;
    let month = (total.rem_euclid(12) + 1) as u32;

    let day = dt.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 1))
        .map(|date| date.and_time(dt.time()))
        .ok_or(TimeqError::YearOutOfRange(year as i64))
}

/// Replace the month, with the same day clamp as [`shift_months`].
fn set_month(dt: NaiveDateTime, month: i64) -> Result<NaiveDateTime> {
    let month = match u32::try_from(month) {
        Ok(m @ 1..=12) => m,
        _ => {
            return Err(TimeqError::FieldOutOfRange {
                unit: Unit::Month,
                value: month,
            })
        }
    };

    let day = dt.day().min(days_in_month(dt.year(), month));
    NaiveDate::from_ymd_opt(dt.year(), month, day)
        .or_else(|| NaiveDate::from_ymd_opt(dt.year(), month, 1))
        .map(|date| date.and_time(dt.time()))
        .ok_or(TimeqError::FieldOutOfRange {
            unit: Unit::Month,
            value: month as i64,
        })
}

/// Replace the day, clamping any invalid value (0 or past the month's end)
/// to the current month's last day.
fn set_day_clamped(dt: NaiveDateTime, value: i64) -> NaiveDateTime {
    u32::try_from(value)
        .ok()
        .and_then(|day| dt.with_day(day))
        .or_else(|| dt.with_day(days_in_month(dt.year(), dt.month())))
        .unwrap_or(dt)
}

/// Replace an hour/minute/second field. Out-of-range values are a caller
/// error, not clamped.
fn set_clock_field(dt: NaiveDateTime, unit: Unit, value: i64) -> Result<NaiveDateTime> {
    let out_of_range = TimeqError::FieldOutOfRange { unit, value };
    let field = u32::try_from(value).map_err(|_| out_of_range.clone())?;
    let replaced = match unit {
        Unit::Hour => dt.with_hour(field),
        Unit::Minute => dt.with_minute(field),
        Unit::Second => dt.with_second(field),
        _ => None,
    };
    replaced.ok_or(out_of_range)
}

/// Force a unit to its identity value for the truncation cascade. Total:
/// the only fallible branch is day 1, handled by clamping to the month's
/// last day (unreachable in practice, day 1 is always valid).
fn force_identity(dt: NaiveDateTime, unit: Unit) -> NaiveDateTime {
    match unit {
        Unit::Year => dt,
        Unit::Month => dt.with_month(1).unwrap_or(dt),
        Unit::Day => dt
            .with_day(1)
            .or_else(|| dt.with_day(days_in_month(dt.year(), dt.month())))
            .unwrap_or(dt),
        Unit::Hour => dt.with_hour(0).unwrap_or(dt),
        Unit::Minute => dt.with_minute(0).unwrap_or(dt),
        Unit::Second => dt.with_second(0).unwrap_or(dt),
    }
}

/// Sum the day/hour/minute/second offsets into one duration.
fn linear_offset(offsets: &BTreeMap<Unit, i64>) -> Option<Duration> {
    let component = |unit: Unit| offsets.get(&unit).copied().unwrap_or(0);

    let mut delta = Duration::try_days(component(Unit::Day))?;
    delta = delta.checked_add(&Duration::try_hours(component(Unit::Hour))?)?;
    delta = delta.checked_add(&Duration::try_minutes(component(Unit::Minute))?)?;
    delta.checked_add(&Duration::try_seconds(component(Unit::Second))?)
}

// ── Tests ───────────────────────────────────────────────────────────────────
