pub mod animation_view;
pub mod charts;
pub mod lotka_volterra;
pub mod params_view;

pub use lotka_volterra::LotkaVolterraTab;
