//! The point/range query driver.
//!
//! Thin orchestration over the tokenizer and resolver: applies the fixed
//! local offset to the caller-supplied reference instant, resolves one or
//! two expressions, converts the results back to the universal (offset
//! zero) frame as seconds-since-epoch, and packages them with a safe
//! fallback window on any failure. The reference instant is always an
//! explicit parameter — no hidden wall-clock reads — so callers and tests
//! inject it.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::resolve::resolve_expression;

/// The fixed local offset, in hours east of the universal reference frame.
///
/// All expressions are resolved against the reference instant shifted into
/// this offset, and results are shifted back before being reported. This is
/// deliberately a single constant, not a timezone-database lookup.
pub const LOCAL_UTC_OFFSET_HOURS: i64 = 8;

/// A resolved query window, reported as seconds-since-epoch.
///
/// Point queries fill `time_sec`; range queries fill `start_sec`/`end_sec`.
/// Unused fields stay zero. On any failure all three carry the fallback
/// ("now, and the one-hour window ending now") and `error` describes why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryWindow {
    pub time_sec: i64,
    pub start_sec: i64,
    pub end_sec: i64,
    pub error: String,
}

/// Run a point or range query against an explicit reference instant.
///
/// # Arguments
///
/// * `kind` — `"point"` or `"range"` (trimmed and lowercased before
///   matching; anything else takes the fallback path)
/// * `time_expr` — The expression for a point query; must be non-empty
/// * `start_expr`, `end_expr` — The range boundaries; an empty expression
///   resolves to the reference instant itself
/// * `now` — The reference instant in the universal frame
///
/// For range queries the window is guaranteed non-inverted: if the resolved
/// end precedes the resolved start, end is forced to start + 1 second.
///
/// This function never fails. Unrecognized kinds, an empty point
/// expression, and resolver errors (out-of-range settings, overflowing
/// offsets) all degrade to the fallback window with a descriptive `error`
/// string, logged as a warning.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use timeq_engine::run_query;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 15, 2, 30, 0).unwrap();
/// let window = run_query("point", "-1h", "", "", now);
/// assert_eq!(window.time_sec, now.timestamp() - 3600);
/// assert!(window.error.is_empty());
/// ```
pub fn run_query(
    kind: &str,
    time_expr: &str,
    start_expr: &str,
    end_expr: &str,
    now: DateTime<Utc>,
) -> QueryWindow {
    let kind = kind.trim().to_ascii_lowercase();
    match resolve_query(
        &kind,
        time_expr.trim(),
        start_expr.trim(),
        end_expr.trim(),
        now,
    ) {
        Ok(window) => window,
        Err(reason) => fallback_window(now, reason),
    }
}

fn resolve_query(
    kind: &str,
    time_expr: &str,
    start_expr: &str,
    end_expr: &str,
    now: DateTime<Utc>,
) -> Result<QueryWindow, String> {
    let base = local_base(now);

    match kind {
        "point" if !time_expr.is_empty() => {
            let resolved = resolve_expression(time_expr, base).map_err(|e| e.to_string())?;
            Ok(QueryWindow {
                time_sec: to_utc_epoch(resolved),
                ..QueryWindow::default()
            })
        }
        "range" => {
            let start = resolve_expression(start_expr, base).map_err(|e| e.to_string())?;
            let mut end = resolve_expression(end_expr, base).map_err(|e| e.to_string())?;
            if end < start {
                end = start
                    .checked_add_signed(Duration::seconds(1))
                    .unwrap_or(start);
            }
            Ok(QueryWindow {
                start_sec: to_utc_epoch(start),
                end_sec: to_utc_epoch(end),
                ..QueryWindow::default()
            })
        }
        _ => Err(format!("unknown or invalid query kind: '{kind}'")),
    }
}

/// The reference instant shifted into the fixed local offset.
fn local_base(now: DateTime<Utc>) -> NaiveDateTime {
    (now + Duration::hours(LOCAL_UTC_OFFSET_HOURS)).naive_utc()
}

/// Shift a resolved local instant back to the universal frame.
fn to_utc_epoch(local: NaiveDateTime) -> i64 {
    (local - Duration::hours(LOCAL_UTC_OFFSET_HOURS))
        .and_utc()
        .timestamp()
}

/// The safe default: now, and the one-hour window ending now.
fn fallback_window(now: DateTime<Utc>, reason: String) -> QueryWindow {
    warn!(reason = %reason, "query fell back to the one-hour window ending now");
    let now_sec = now.timestamp();
    QueryWindow {
        time_sec: now_sec,
        start_sec: now_sec - 3600,
        end_sec: now_sec,
        error: reason,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
