//! Projection of a completed calculation into chart data.
//!
//! Everything here is pure: the frontend only draws what `render` returns.

use std::time::Duration;

use lv_core::{ModelParams, TimeSeries};

use crate::animation::AnimationState;
use crate::pipeline::CompletedCalc;

/// Points per axis of the vector field grid.
pub const GRID_SIZE: usize = 20;

const ARROW_FILL: f64 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub struct PopulationChart {
    pub prey: Vec<[f64; 2]>,
    pub predators: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhasePortrait {
    pub trajectory: Vec<[f64; 2]>,
}

/// Direction field of the system over the data's bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    pub origins: Vec<[f64; 2]>,
    /// Raw `(dx/dt, dy/dt)` at each origin.
    pub derivatives: Vec<[f64; 2]>,
    /// Arrow ends, scaled so the longest arrow spans about one grid cell.
    pub tips: Vec<[f64; 2]>,
    pub trajectory: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRun {
    pub params: ModelParams,
    pub series: TimeSeries,
    pub population: PopulationChart,
    pub phase: PhasePortrait,
    pub vector_field: VectorField,
    pub animation_bounds: PlotBounds,
    pub animation: AnimationState,
}

/// What every result tab currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultView {
    #[default]
    Placeholder,
    Rendered(Box<RenderedRun>),
    Error(String),
}

impl ResultView {
    pub fn rendered(&self) -> Option<&RenderedRun> {
        match self {
            ResultView::Rendered(run) => Some(run),
            _ => None,
        }
    }

    pub fn rendered_mut(&mut self) -> Option<&mut RenderedRun> {
        match self {
            ResultView::Rendered(run) => Some(run),
            _ => None,
        }
    }
}

pub fn render(calc: &CompletedCalc, interval: Duration) -> RenderedRun {
    let series = &calc.series;
    let trajectory = zip_points(series.x(), series.y());

    RenderedRun {
        params: calc.params,
        population: PopulationChart {
            prey: zip_points(series.t(), series.x()),
            predators: zip_points(series.t(), series.y()),
        },
        phase: PhasePortrait {
            trajectory: trajectory.clone(),
        },
        vector_field: vector_field(&calc.params, series, trajectory),
        animation_bounds: animation_bounds(series),
        animation: AnimationState::new(series.len(), interval),
        series: series.clone(),
    }
}

fn zip_points(a: &[f64], b: &[f64]) -> Vec<[f64; 2]> {
    a.iter().zip(b).map(|(&a, &b)| [a, b]).collect()
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

fn vector_field(
    params: &ModelParams,
    series: &TimeSeries,
    trajectory: Vec<[f64; 2]>,
) -> VectorField {
    let (x_min, x_max) = series.x_range();
    let (y_min, y_max) = series.y_range();
    let xs = linspace(x_min * 0.8, x_max * 1.2, GRID_SIZE);
    let ys = linspace(y_min * 0.8, y_max * 1.2, GRID_SIZE);

    let mut origins = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
    let mut derivatives = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
    for &y in &ys {
        for &x in &xs {
            let (u, v) = params.derivative(x, y);
            origins.push([x, y]);
            derivatives.push([u, v]);
        }
    }

    // Scale in axis-relative units so arrow directions survive the plot's
    // aspect ratio.
    let x_span = span(&xs);
    let y_span = span(&ys);
    let longest = derivatives
        .iter()
        .map(|[u, v]| (u / x_span).hypot(v / y_span))
        .filter(|n| n.is_finite())
        .fold(0.0_f64, f64::max);
    let cell = ARROW_FILL / (GRID_SIZE - 1) as f64;

    let tips = origins
        .iter()
        .zip(&derivatives)
        .map(|([x, y], [u, v])| {
            if longest > 0.0 {
                let k = cell / longest;
                [x + u * k, y + v * k]
            } else {
                [*x, *y]
            }
        })
        .collect();

    VectorField {
        origins,
        derivatives,
        tips,
        trajectory,
    }
}

fn span(values: &[f64]) -> f64 {
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let width = hi - lo;
    if width > 0.0 && width.is_finite() {
        width
    } else {
        1.0
    }
}

/// Data range plus a 10 % margin on each side.
fn animation_bounds(series: &TimeSeries) -> PlotBounds {
    let pad = |(lo, hi): (f64, f64)| {
        let margin = (hi - lo) * 0.1;
        (lo - margin, hi + margin)
    };
    PlotBounds {
        x: pad(series.x_range()),
        y: pad(series.y_range()),
    }
}
