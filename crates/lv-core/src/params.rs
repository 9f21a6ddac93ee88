//! Model parameters and the raw text input they are parsed from.

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ValidationError};

/// The six scalars of the Lotka–Volterra system.
///
/// `x' = alpha*x - beta*x*y`, `y' = delta*x*y - gamma*y`, `x(0) = x0`,
/// `y(0) = y0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub delta: f64,
    pub x0: f64,
    pub y0: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            beta: 0.02,
            gamma: 0.3,
            delta: 0.01,
            x0: 10.0,
            y0: 5.0,
        }
    }
}

impl ModelParams {
    pub fn get(&self, field: ParamField) -> f64 {
        match field {
            ParamField::Alpha => self.alpha,
            ParamField::Beta => self.beta,
            ParamField::Gamma => self.gamma,
            ParamField::Delta => self.delta,
            ParamField::X0 => self.x0,
            ParamField::Y0 => self.y0,
        }
    }

    /// Right-hand side of the system at `(x, y)`.
    pub fn derivative(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.alpha * x - self.beta * x * y,
            self.delta * x * y - self.gamma * y,
        )
    }

    /// Form text reproducing these values.
    pub fn to_input(&self) -> ParamInput {
        let mut input = ParamInput::empty();
        for field in ParamField::ALL {
            *input.text_mut(field) = self.get(field).to_string();
        }
        input
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    Alpha,
    Beta,
    Gamma,
    Delta,
    X0,
    Y0,
}

impl ParamField {
    pub const ALL: [ParamField; 6] = [
        ParamField::Alpha,
        ParamField::Beta,
        ParamField::Gamma,
        ParamField::Delta,
        ParamField::X0,
        ParamField::Y0,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParamField::Alpha => "alpha",
            ParamField::Beta => "beta",
            ParamField::Gamma => "gamma",
            ParamField::Delta => "delta",
            ParamField::X0 => "x0",
            ParamField::Y0 => "y0",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParamField::Alpha => "α (prey growth rate)",
            ParamField::Beta => "β (predation rate)",
            ParamField::Gamma => "γ (predator death rate)",
            ParamField::Delta => "δ (predator growth rate)",
            ParamField::X0 => "x₀ (initial prey)",
            ParamField::Y0 => "y₀ (initial predators)",
        }
    }
}

/// Free-text parameter form, one string per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamInput {
    pub alpha: String,
    pub beta: String,
    pub gamma: String,
    pub delta: String,
    pub x0: String,
    pub y0: String,
}

impl Default for ParamInput {
    fn default() -> Self {
        ModelParams::default().to_input()
    }
}

impl ParamInput {
    pub fn empty() -> Self {
        Self {
            alpha: String::new(),
            beta: String::new(),
            gamma: String::new(),
            delta: String::new(),
            x0: String::new(),
            y0: String::new(),
        }
    }

    pub fn text(&self, field: ParamField) -> &str {
        match field {
            ParamField::Alpha => &self.alpha,
            ParamField::Beta => &self.beta,
            ParamField::Gamma => &self.gamma,
            ParamField::Delta => &self.delta,
            ParamField::X0 => &self.x0,
            ParamField::Y0 => &self.y0,
        }
    }

    pub fn text_mut(&mut self, field: ParamField) -> &mut String {
        match field {
            ParamField::Alpha => &mut self.alpha,
            ParamField::Beta => &mut self.beta,
            ParamField::Gamma => &mut self.gamma,
            ParamField::Delta => &mut self.delta,
            ParamField::X0 => &mut self.x0,
            ParamField::Y0 => &mut self.y0,
        }
    }

    /// Parse every field. Missing fields are reported before unparsable ones.
    pub fn parse(&self) -> CoreResult<ModelParams> {
        if let Some(field) = ParamField::ALL
            .into_iter()
            .find(|f| self.text(*f).trim().is_empty())
        {
            return Err(ValidationError::Missing {
                field: field.name(),
            });
        }

        Ok(ModelParams {
            alpha: parse_field(self, ParamField::Alpha)?,
            beta: parse_field(self, ParamField::Beta)?,
            gamma: parse_field(self, ParamField::Gamma)?,
            delta: parse_field(self, ParamField::Delta)?,
            x0: parse_field(self, ParamField::X0)?,
            y0: parse_field(self, ParamField::Y0)?,
        })
    }
}

fn parse_field(input: &ParamInput, field: ParamField) -> CoreResult<f64> {
    let text = input.text(field).trim();
    let value = text
        .parse::<f64>()
        .map_err(|_| ValidationError::Unparsable {
            field: field.name(),
            text: text.to_string(),
        })?;
    ensure_finite(value, field.name())
}

pub fn ensure_finite(v: f64, field: &'static str) -> CoreResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ValidationError::NonFinite { field, value: v })
    }
}
