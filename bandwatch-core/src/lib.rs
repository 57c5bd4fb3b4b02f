//! Bandwatch Core - threshold-driven render state
//!
//! Turns a stream of band-power samples and a user-selected cut-off into a
//! retained scene: one bar, one cut-off line with its label, and an alert
//! marker while the cut-off is reached. No terminal or drawing code lives
//! here; hosts read the scene back from a [`Surface`].

pub mod color;
pub mod config;
pub mod cutoff;
pub mod error;
pub mod sample;
pub mod scale;
pub mod scene;
pub mod surface;
pub mod transition;
pub mod vis;

pub use color::{Palette, Rgb};
pub use config::{SurfaceSize, VisConfig, DEFAULT_MARKER_TEXT};
pub use cutoff::{CutoffValue, CUTOFF_OPTIONS, DEFAULT_CUTOFF_INDEX};
pub use error::{ConfigError, ValidationError, VisError, VisResult};
pub use sample::{Category, Datum, MetricSample, DOMAIN_MAX, DOMAIN_MIN};
pub use scale::{Band, BandScale, LinearScale, ScaleManager};
pub use scene::{
    reconcile, Desired, Element, ElementKey, ElementKind, LineElement, Patch, PatchOp,
    RectElement, TextAnchor, TextElement,
};
pub use surface::{RetainedSurface, Surface};
pub use transition::{Easing, Lerp, Transition};
pub use vis::BandPowerVis;

/// Build a meter on an in-memory surface sized from the config.
pub fn retained_vis(config: VisConfig) -> VisResult<BandPowerVis<RetainedSurface>> {
    let surface = RetainedSurface::new(config.surface.width, config.surface.height);
    BandPowerVis::new(config, surface)
}
