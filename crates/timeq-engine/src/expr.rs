//! Tokenizer for compact time expressions.
//!
//! An expression is free-form text containing zero or more tokens of the
//! shape `-? digits unit-letter`, e.g. `-1d`, `-2h`, `30f`, `2024y`. The
//! scan is permissive: anything that does not match is skipped, never an
//! error. Tokens are then classified by sign into relative *offsets*
//! (leading `-`) and absolute *settings* (no sign), one map per bucket,
//! keyed by unit with last-token-wins semantics.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

// ── Units ───────────────────────────────────────────────────────────────────

/// A calendar/clock field addressable by a single-letter code.
///
/// The declaration order is the fixed coarse-to-fine order (year > month >
/// day > hour > minute > second) used by the truncation cascade. Note `f`
/// is minute and `m` is month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Unit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Unit {
    /// All units, coarsest first.
    pub const ORDER: [Unit; 6] = [
        Unit::Year,
        Unit::Month,
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
    ];

    /// The unit for a letter code, if recognized.
    pub fn from_letter(letter: char) -> Option<Unit> {
        match letter {
            'y' => Some(Unit::Year),
            'm' => Some(Unit::Month),
            'd' => Some(Unit::Day),
            'h' => Some(Unit::Hour),
            'f' => Some(Unit::Minute),
            's' => Some(Unit::Second),
            _ => None,
        }
    }

    /// The single-letter code for this unit.
    pub fn letter(self) -> char {
        match self {
            Unit::Year => 'y',
            Unit::Month => 'm',
            Unit::Day => 'd',
            Unit::Hour => 'h',
            Unit::Minute => 'f',
            Unit::Second => 's',
        }
    }

    /// Position in [`Unit::ORDER`] (0 = year, 5 = second).
    pub fn rank(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Unit::Year => "year",
            Unit::Month => "month",
            Unit::Day => "day",
            Unit::Hour => "hour",
            Unit::Minute => "minute",
            Unit::Second => "second",
        };
        f.write_str(name)
    }
}

// ── Tokens ──────────────────────────────────────────────────────────────────

/// One scanned `(integer, unit)` pair, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The signed value. Literals too large for `i64` saturate so that they
    /// still fail range checks downstream instead of vanishing here.
    pub value: i64,
    /// Whether the literal carried a leading `-`. Kept separately from the
    /// sign of `value` so that `-0d` classifies as an offset, not a setting.
    pub negative: bool,
    /// The unit letter that terminated the literal.
    pub unit: Unit,
}

/// Scan an expression for all `-? digits unit-letter` tokens.
///
/// Equivalent to a non-overlapping left-to-right regex scan: at each
/// position, the longest digit run immediately followed by a unit letter
/// produces a token; everything else (whitespace, stray signs, unknown
/// letters, digits with no unit) is skipped one character at a time.
/// An empty or non-matching input yields no tokens.
///
/// # Examples
///
/// ```
/// use timeq_engine::{tokenize, Unit};
///
/// let tokens = tokenize("start=-2h, end=30f");
/// assert_eq!(tokens.len(), 2);
/// assert_eq!((tokens[0].value, tokens[0].unit), (-2, Unit::Hour));
/// assert_eq!((tokens[1].value, tokens[1].unit), (30, Unit::Minute));
/// ```
pub fn tokenize(expr: &str) -> Vec<Token> {
    let bytes = expr.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let negative = bytes[i] == b'-';
        let digits_start = if negative { i + 1 } else { i };

        let mut j = digits_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }

        let unit = if j > digits_start {
            bytes.get(j).and_then(|&b| Unit::from_letter(b as char))
        } else {
            None
        };

        match unit {
            Some(unit) => {
                let literal = &expr[i..j];
                let value = literal.parse::<i64>().unwrap_or(if negative {
                    i64::MIN
                } else {
                    i64::MAX
                });
                tokens.push(Token {
                    value,
                    negative,
                    unit,
                });
                i = j + 1;
            }
            None => i += 1,
        }
    }

    tokens
}

// ── Classification ──────────────────────────────────────────────────────────

/// An expression split into its offset and setting buckets.
///
/// Offsets are relative adjustments (literal carried a `-`); settings pin a
/// field to an absolute value. A unit may appear in both buckets at once
/// (e.g. `-1d0h`: back one day, then hour pinned to 0).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeExpr {
    /// Relative adjustments per unit (values ≤ 0).
    pub offsets: BTreeMap<Unit, i64>,
    /// Absolute field values per unit (values ≥ 0).
    pub settings: BTreeMap<Unit, i64>,
}

impl TimeExpr {
    /// Tokenize and classify an expression in one pass.
    pub fn parse(expr: &str) -> TimeExpr {
        TimeExpr::from_tokens(tokenize(expr))
    }

    /// Classify a token stream. For repeated units within one bucket the
    /// last token wins.
    pub fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> TimeExpr {
        let mut parts = TimeExpr::default();
        for token in tokens {
            if token.negative {
                parts.offsets.insert(token.unit, token.value);
            } else {
                parts.settings.insert(token.unit, token.value);
            }
        }
        parts
    }

    /// True when no token matched at all.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty() && self.settings.is_empty()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
