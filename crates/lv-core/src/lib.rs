//! lv-core: data model for the Lotka–Volterra workbench.
//!
//! Contains:
//! - params (model parameters + raw form input and its validation)
//! - series (the sampled `(t, x, y)` result and response unpacking)
//! - error (validation and series errors)

pub mod error;
pub mod params;
pub mod series;

pub use error::{CoreResult, SeriesError, ValidationError};
pub use params::{ModelParams, ParamField, ParamInput};
pub use series::{SAMPLE_COUNT, T_END, T_START, T_STEP, TimeSeries};
