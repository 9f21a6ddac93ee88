use thiserror::Error;

pub type CoreResult<T> = Result<T, ValidationError>;

/// Rejected parameter input. Raised before any evaluation is attempted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing value for {field}")]
    Missing { field: &'static str },

    #[error("Value for {field} is not a number: {text:?}")]
    Unparsable { field: &'static str, text: String },

    #[error("Non-finite numeric value for {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// Evaluator response that cannot be unpacked into a time series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Kernel returned an empty result")]
    EmptyResult,

    #[error("Malformed result: {what}")]
    Malformed { what: String },

    #[error("Row {index} has {len} columns, expected 3")]
    RowShape { index: usize, len: usize },

    #[error("Row {index} contains a non-numeric value")]
    NonNumeric { index: usize },

    #[error("Time column is not strictly increasing at row {index}")]
    NotIncreasing { index: usize },

    #[error("Column lengths differ (t={t}, x={x}, y={y})")]
    LengthMismatch { t: usize, x: usize, y: usize },
}
