//! Sampled solution of one evaluation.

use serde_json::Value;

use crate::error::SeriesError;

pub const T_START: f64 = 0.0;
pub const T_END: f64 = 50.0;
pub const T_STEP: f64 = 0.1;
/// Samples on the `[T_START, T_END]` grid at `T_STEP`, both ends included.
pub const SAMPLE_COUNT: usize = 501;

/// `(t, x, y)` columns of equal, non-zero length with `t` strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    t: Vec<f64>,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl TimeSeries {
    pub fn from_columns(t: Vec<f64>, x: Vec<f64>, y: Vec<f64>) -> Result<Self, SeriesError> {
        if t.len() != x.len() || t.len() != y.len() {
            return Err(SeriesError::LengthMismatch {
                t: t.len(),
                x: x.len(),
                y: y.len(),
            });
        }
        if t.is_empty() {
            return Err(SeriesError::EmptyResult);
        }
        if let Some(index) = (1..t.len()).find(|&i| t[i] <= t[i - 1]) {
            return Err(SeriesError::NotIncreasing { index });
        }
        Ok(Self { t, x, y })
    }

    pub fn from_rows(rows: &[[f64; 3]]) -> Result<Self, SeriesError> {
        let t = rows.iter().map(|r| r[0]).collect();
        let x = rows.iter().map(|r| r[1]).collect();
        let y = rows.iter().map(|r| r[2]).collect();
        Self::from_columns(t, x, y)
    }

    /// Unpack a kernel response: a non-empty JSON list of `[t, x, y]` rows.
    pub fn from_response(value: &Value) -> Result<Self, SeriesError> {
        let rows = match value {
            Value::Null => return Err(SeriesError::EmptyResult),
            Value::Array(rows) if rows.is_empty() => return Err(SeriesError::EmptyResult),
            Value::Array(rows) => rows,
            other => {
                return Err(SeriesError::Malformed {
                    what: format!("expected a list of rows, got {}", json_kind(other)),
                });
            }
        };

        let mut unpacked = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let cells = row.as_array().ok_or_else(|| SeriesError::Malformed {
                what: format!("row {} is {}, not a list", index, json_kind(row)),
            })?;
            if cells.len() != 3 {
                return Err(SeriesError::RowShape {
                    index,
                    len: cells.len(),
                });
            }
            let mut triple = [0.0; 3];
            for (slot, cell) in triple.iter_mut().zip(cells) {
                *slot = cell
                    .as_f64()
                    .filter(|v| v.is_finite())
                    .ok_or(SeriesError::NonNumeric { index })?;
            }
            unpacked.push(triple);
        }

        Self::from_rows(&unpacked)
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// Always false for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn t(&self) -> &[f64] {
        &self.t
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn sample(&self, index: usize) -> Option<(f64, f64, f64)> {
        Some((*self.t.get(index)?, self.x[index], self.y[index]))
    }

    /// `(min, max)` of the prey column.
    pub fn x_range(&self) -> (f64, f64) {
        min_max(&self.x)
    }

    /// `(min, max)` of the predator column.
    pub fn y_range(&self) -> (f64, f64) {
        min_max(&self.y)
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
