//! Record data types.

use lv_core::{ModelParams, TimeSeries};
use serde::{Deserialize, Serialize};

use crate::{ResultsError, ResultsResult};

pub type RecordId = String;

pub const MODEL_NAME: &str = "Lotka-Volterra";

/// Snapshot of one calculation. Missing numeric fields decode as `0.0`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationRecord {
    pub id: RecordId,
    pub model_name: String,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub delta: f64,
    pub x0: f64,
    pub y0: f64,
    pub timestamp: String,
    pub t_data: Vec<f64>,
    pub x_data: Vec<f64>,
    pub y_data: Vec<f64>,
}

impl CalculationRecord {
    pub fn new(id: RecordId, timestamp: String, params: &ModelParams, series: &TimeSeries) -> Self {
        Self {
            id,
            model_name: MODEL_NAME.to_string(),
            alpha: params.alpha,
            beta: params.beta,
            gamma: params.gamma,
            delta: params.delta,
            x0: params.x0,
            y0: params.y0,
            timestamp,
            t_data: series.t().to_vec(),
            x_data: series.x().to_vec(),
            y_data: series.y().to_vec(),
        }
    }

    pub fn params(&self) -> ModelParams {
        ModelParams {
            alpha: self.alpha,
            beta: self.beta,
            gamma: self.gamma,
            delta: self.delta,
            x0: self.x0,
            y0: self.y0,
        }
    }

    /// Rebuild the stored series; fails if the columns were tampered with.
    pub fn series(&self) -> ResultsResult<TimeSeries> {
        TimeSeries::from_columns(
            self.t_data.clone(),
            self.x_data.clone(),
            self.y_data.clone(),
        )
        .map_err(|source| ResultsError::InvalidSeries {
            record_id: self.id.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_zero() {
        let record: CalculationRecord =
            serde_json::from_str(r#"{"id": "abc", "alpha": 0.5, "timestamp": "2026-01-01T00:00:00"}"#)
                .unwrap();
        assert_eq!(record.alpha, 0.5);
        assert_eq!(record.beta, 0.0);
        assert_eq!(record.y0, 0.0);
        assert!(record.t_data.is_empty());
    }

    #[test]
    fn empty_series_is_invalid() {
        let record = CalculationRecord {
            id: "r1".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            record.series(),
            Err(ResultsError::InvalidSeries { ref record_id, .. }) if record_id == "r1"
        ));
    }
}
