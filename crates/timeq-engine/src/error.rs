//! Error types for timeq-engine operations.

use thiserror::Error;

use crate::expr::Unit;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeqError {
    #[error("{unit} setting out of range: {value}")]
    FieldOutOfRange { unit: Unit, value: i64 },

    #[error("year out of representable range: {0}")]
    YearOutOfRange(i64),

    #[error("offset exceeds the representable datetime range")]
    OffsetOverflow,
}

pub type Result<T> = std::result::Result<T, TimeqError>;
