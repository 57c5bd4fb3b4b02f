//! Bandwatch Test Utilities
//!
//! Shared test infrastructure for the Bandwatch workspace:
//! - Proptest generators for samples and cut-offs
//! - A recording surface that keeps every applied patch
//! - Fixtures for a ready-to-use meter
//! - Assertions over the retained scene

pub use bandwatch_core::{
    BandPowerVis, Category, CutoffValue, Element, ElementKey, ElementKind, MetricSample, Patch,
    PatchOp, RectElement, RetainedSurface, Surface, TextElement, VisConfig, VisResult,
    CUTOFF_OPTIONS,
};

use std::time::Instant;

// ============================================================================
// RECORDING SURFACE
// ============================================================================

/// A [`RetainedSurface`] that also logs every patch applied to it.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    inner: RetainedSurface,
    patches: Vec<Patch>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            inner: RetainedSurface::new(width, height),
            patches: Vec::new(),
        }
    }

    pub fn retained(&self) -> &RetainedSurface {
        &self.inner
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Drop the log, keeping the scene.
    pub fn clear_log(&mut self) {
        self.patches.clear();
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f64 {
        self.inner.width()
    }

    fn height(&self) -> f64 {
        self.inner.height()
    }

    fn target(&self, key: &ElementKey) -> Option<&Element> {
        self.inner.target(key)
    }

    fn keys(&self) -> Vec<ElementKey> {
        self.inner.keys()
    }

    fn apply(&mut self, patch: Patch, now: Instant) {
        self.patches.push(patch.clone());
        self.inner.apply(patch, now);
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for Bandwatch inputs.

    use super::*;
    use proptest::prelude::*;

    /// Any in-domain sample value.
    pub fn arb_beta() -> impl Strategy<Value = f64> {
        0.0f64..=100.0
    }

    /// Values strictly below `cutoff`.
    pub fn arb_beta_below(cutoff: CutoffValue) -> impl Strategy<Value = f64> {
        0.0f64..cutoff.as_f64()
    }

    /// Values at or above `cutoff`, up to the top of the domain.
    pub fn arb_beta_at_or_above(cutoff: CutoffValue) -> impl Strategy<Value = f64> {
        cutoff.as_f64()..=100.0
    }

    /// Values outside the domain on either side.
    pub fn arb_out_of_range_beta() -> impl Strategy<Value = f64> {
        prop_oneof![-1_000.0f64..-0.001, 100.001f64..1_000.0]
    }

    pub fn arb_sample() -> impl Strategy<Value = MetricSample> {
        arb_beta().prop_map(MetricSample::new)
    }

    /// One of the selectable cut-offs.
    pub fn arb_cutoff() -> impl Strategy<Value = CutoffValue> {
        (0..CUTOFF_OPTIONS.len()).prop_map(|idx| CutoffValue::from_index(idx).unwrap_or_default())
    }

    /// Integers that are not selectable cut-offs.
    pub fn arb_invalid_cutoff() -> impl Strategy<Value = i64> {
        (-50i64..150).prop_filter("must not be a selectable option", |v| {
            !CUTOFF_OPTIONS.iter().any(|option| i64::from(*option) == *v)
        })
    }

    pub fn arb_sample_sequence(max_len: usize) -> impl Strategy<Value = Vec<MetricSample>> {
        prop::collection::vec(arb_sample(), 1..=max_len.max(1))
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built meters for common scenarios.

    use super::*;

    /// A meter with default config on a recording surface.
    pub fn default_vis(now: Instant) -> BandPowerVis<RecordingSurface> {
        let config = VisConfig::default();
        let surface = RecordingSurface::new(config.surface.width, config.surface.height);
        match BandPowerVis::new_at(config, surface, now) {
            Ok(vis) => vis,
            Err(err) => panic!("default config must build: {}", err),
        }
    }

    /// A meter that has already applied `beta` under `cutoff`.
    pub fn vis_with(beta: f64, cutoff: CutoffValue, now: Instant) -> BandPowerVis<RecordingSurface> {
        let mut vis = default_vis(now);
        vis.set_cutoff_at(cutoff, now);
        if let Err(err) = vis.update_at(MetricSample::new(beta), now) {
            panic!("sample {} must apply: {}", beta, err);
        }
        vis
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over a meter's settled scene.

    use super::*;

    /// Settled bar for the single category.
    #[track_caller]
    pub fn settled_bar<S: Surface>(vis: &BandPowerVis<S>) -> RectElement {
        match vis.surface().target(&ElementKey::Bar(Category::Beta)) {
            Some(Element::Rect(rect)) => rect.clone(),
            other => panic!("Expected a bar, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn marker<S: Surface>(vis: &BandPowerVis<S>) -> Option<TextElement> {
        vis.surface()
            .target(&ElementKey::Marker(Category::Beta))
            .and_then(|el| el.as_text().cloned())
    }

    /// Count elements of `kind` on any surface.
    pub fn count_kind<S: Surface>(vis: &BandPowerVis<S>, kind: ElementKind) -> usize {
        vis.surface()
            .keys()
            .iter()
            .filter(|key| key.kind() == kind)
            .count()
    }

    #[track_caller]
    pub fn assert_single_bar<S: Surface>(vis: &BandPowerVis<S>) {
        let bars = count_kind(vis, ElementKind::Bar);
        assert_eq!(bars, 1, "Expected exactly one bar, found {}", bars);
    }

    /// Alert fill and exactly one marker centred above the bar.
    #[track_caller]
    pub fn assert_alert_state<S: Surface>(vis: &BandPowerVis<S>) {
        let bar = settled_bar(vis);
        assert_eq!(bar.fill, vis.config().palette.alert, "Expected alert fill");
        assert_eq!(count_kind(vis, ElementKind::Marker), 1, "Expected one marker");
        let marker = marker(vis).unwrap_or_else(|| panic!("Expected marker element"));
        let center = bar.x + bar.width / 2.0;
        assert!(
            (marker.x - center).abs() < 1e-9,
            "Marker x {} not centred on bar ({})",
            marker.x,
            center
        );
        assert!(marker.y < bar.y, "Marker must sit above the bar");
    }

    /// Normal fill and no marker.
    #[track_caller]
    pub fn assert_normal_state<S: Surface>(vis: &BandPowerVis<S>) {
        let bar = settled_bar(vis);
        assert_eq!(bar.fill, vis.config().palette.normal, "Expected normal fill");
        assert_eq!(count_kind(vis, ElementKind::Marker), 0, "Expected no marker");
    }
}

// ============================================================================
// TESTS
// ============================================================================
