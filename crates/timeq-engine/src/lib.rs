//! # timeq-engine
//!
//! Deterministic resolution of compact, human-typed time expressions
//! (`-1d`, `-2h30f`, `2024y1m1d0h`) into absolute Unix timestamps usable as
//! query boundaries for a log/metrics backend.
//!
//! All entry points take the reference "now" instant as an explicit
//! argument — no system clock access, no shared state — so every call is a
//! pure function of its inputs and safe to invoke concurrently.
//!
//! Expressions address six units by letter (`y` year, `m` month, `d` day,
//! `h` hour, `f` minute, `s` second). A number with a leading `-` is a
//! relative offset from the base instant; without one it pins that field to
//! an absolute value, and every unit finer than the finest pinned one is
//! truncated to its zero/identity value so that pinning a coarse unit
//! yields a clean boundary. The scan is permissive: text that matches no
//! token is ignored, never an error.
//!
//! ## Modules
//!
//! - [`expr`] — Unit letters, tokenizer, offset/setting classification
//! - [`resolve`] — Two-phase calendar-aware resolution + truncation cascade
//! - [`query`] — Point/range query driver with fixed-offset conversion
//! - [`error`] — Error types

pub mod error;
pub mod expr;
pub mod query;
pub mod resolve;

pub use error::{Result, TimeqError};
pub use expr::{tokenize, TimeExpr, Token, Unit};
pub use query::{run_query, QueryWindow, LOCAL_UTC_OFFSET_HOURS};
pub use resolve::{resolve, resolve_expression};
