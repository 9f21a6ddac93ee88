//! Shared application service layer for the Lotka–Volterra workbench.
//!
//! This crate provides a unified interface for both CLI and GUI frontends:
//! the calculation pipeline, the projection of results into charts and an
//! animation, record persistence and configuration.

pub mod animation;
pub mod config;
pub mod error;
pub mod history;
pub mod pipeline;
pub mod record_service;
pub mod render;
pub mod session;
pub mod worker;

// Re-export key types for convenience
pub use animation::{AnimationState, DEFAULT_INTERVAL, FrameView};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use history::{HistoryEntry, history};
pub use pipeline::{CalculationSlot, CompletedCalc, SlotEvent, SlotStatus, SubmitOutcome};
pub use record_service::{PersistOutcome, clear_history, load_record, persist};
pub use render::{
    GRID_SIZE, PhasePortrait, PlotBounds, PopulationChart, RenderedRun, ResultView, VectorField,
    render,
};
pub use session::LotkaVolterraSession;
