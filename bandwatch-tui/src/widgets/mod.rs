//! Reusable widget components.

pub mod band_chart;
pub mod readout;
pub mod selector;

pub use band_chart::BandChart;
pub use readout::Readout;
pub use selector::{CutoffSelector, SELECTOR_LABEL};
