//! Render state machine for the band-power meter.
//!
//! [`BandPowerVis`] owns the cut-off and the last applied sample. Every
//! mutation recomputes the desired elements and reconciles them onto the
//! surface in one step, so callers never observe a half-applied state.

use crate::config::VisConfig;
use crate::cutoff::CutoffValue;
use crate::error::{ValidationError, VisResult};
use crate::sample::{clamp_to_domain, Category, MetricSample};
use crate::scale::ScaleManager;
use crate::scene::{
    reconcile, Desired, Element, ElementKey, ElementKind, LineElement, Patch, RectElement,
    TextAnchor, TextElement,
};
use crate::surface::Surface;
use std::time::{Duration, Instant};

/// Gap between the cut-off line and its label.
pub const CUTOFF_LABEL_OFFSET: f64 = 5.0;
/// Gap between the top of the bar and the alert marker.
pub const MARKER_OFFSET: f64 = 10.0;
pub const CUTOFF_STROKE_WIDTH: f64 = 2.0;
pub const CUTOFF_DASH: (f64, f64) = (5.0, 5.0);

const SAMPLE_SCOPE: [ElementKind; 2] = [ElementKind::Bar, ElementKind::Marker];
const CUTOFF_SCOPE: [ElementKind; 2] = [ElementKind::CutoffLine, ElementKind::CutoffLabel];

pub struct BandPowerVis<S: Surface> {
    config: VisConfig,
    scales: ScaleManager,
    cutoff: CutoffValue,
    last_sample: Option<MetricSample>,
    surface: S,
}

impl<S: Surface> BandPowerVis<S> {
    /// Build the meter on `surface`, drawing the cut-off line at the default
    /// cut-off. The scales are sized from the surface once and never change.
    pub fn new(config: VisConfig, surface: S) -> VisResult<Self> {
        Self::new_at(config, surface, Instant::now())
    }

    pub fn new_at(config: VisConfig, surface: S, now: Instant) -> VisResult<Self> {
        config.validate()?;
        let dimensions = [
            ("surface.width", surface.width()),
            ("surface.height", surface.height()),
        ];
        for (field, value) in dimensions {
            if !(value.is_finite() && value > 0.0) {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("must be a finite number > 0, got {}", value),
                }
                .into());
            }
        }
        let scales = ScaleManager::new(surface.width(), surface.height());
        let mut vis = Self {
            config,
            scales,
            cutoff: CutoffValue::default(),
            last_sample: None,
            surface,
        };
        vis.redraw_cutoff_line_at(now);
        Ok(vis)
    }

    pub fn cutoff(&self) -> CutoffValue {
        self.cutoff
    }

    pub fn scales(&self) -> &ScaleManager {
        &self.scales
    }

    pub fn config(&self) -> &VisConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The last sample applied, after clamping.
    pub fn last_sample(&self) -> Option<MetricSample> {
        self.last_sample
    }

    /// Whether the last applied sample meets the current cut-off.
    pub fn is_alert(&self) -> bool {
        self.last_sample
            .map(|sample| self.cutoff.is_reached_by(sample.beta))
            .unwrap_or(false)
    }

    /// Validate a raw selector value and apply it as the new cut-off.
    pub fn try_set_cutoff(&mut self, value: i64) -> VisResult<()> {
        let cutoff = CutoffValue::try_from(value)?;
        self.set_cutoff(cutoff);
        Ok(())
    }

    pub fn set_cutoff(&mut self, cutoff: CutoffValue) {
        self.set_cutoff_at(cutoff, Instant::now());
    }

    /// Store a new cut-off and redraw the reference line.
    ///
    /// The current sample, if any, is re-applied so the bar color and the
    /// alert marker reflect the new threshold straight away.
    pub fn set_cutoff_at(&mut self, cutoff: CutoffValue, now: Instant) {
        let previous = self.cutoff;
        self.cutoff = cutoff;
        tracing::debug!(from = %previous, to = %cutoff, "cut-off changed");
        self.redraw_cutoff_line_at(now);
        if let Some(sample) = self.last_sample {
            self.apply_sample(sample, now);
        }
    }

    pub fn redraw_cutoff_line(&mut self) {
        self.redraw_cutoff_line_at(Instant::now());
    }

    /// Move the cut-off line and label to the current cut-off.
    pub fn redraw_cutoff_line_at(&mut self, now: Instant) {
        let duration = self.config.cutoff_transition();
        let desired = [
            Desired {
                key: ElementKey::CutoffLine,
                element: Element::Line(self.cutoff_line()),
                duration,
            },
            Desired {
                key: ElementKey::CutoffLabel,
                element: Element::Text(self.cutoff_label()),
                duration,
            },
        ];
        self.commit(&CUTOFF_SCOPE, &desired, now);
    }

    pub fn update(&mut self, sample: MetricSample) -> VisResult<()> {
        self.update_at(sample, Instant::now())
    }

    /// Apply a new sample: bar geometry, bar color and alert marker.
    ///
    /// Non-finite values are rejected and leave the scene untouched. Values
    /// outside the domain are clamped to it.
    pub fn update_at(&mut self, sample: MetricSample, now: Instant) -> VisResult<()> {
        if !sample.beta.is_finite() {
            return Err(ValidationError::NonFiniteSample { value: sample.beta }.into());
        }
        let clamped = clamp_to_domain(sample.beta);
        if clamped != sample.beta {
            tracing::warn!(beta = sample.beta, clamped, "sample outside 0..=100 clamped");
        }
        let sample = MetricSample::new(clamped);
        self.last_sample = Some(sample);
        self.apply_sample(sample, now);
        Ok(())
    }

    fn apply_sample(&mut self, sample: MetricSample, now: Instant) {
        let bar_duration = self.config.bar_transition();
        let mut desired = Vec::with_capacity(2);
        for datum in sample.dataset() {
            desired.push(Desired {
                key: ElementKey::Bar(datum.group),
                element: Element::Rect(self.bar(datum.group, datum.value)),
                duration: bar_duration,
            });
            if let Some(marker) = self.marker(datum.group, datum.value) {
                desired.push(Desired {
                    key: ElementKey::Marker(datum.group),
                    element: Element::Text(marker),
                    duration: Duration::ZERO,
                });
            }
        }
        self.commit(&SAMPLE_SCOPE, &desired, now);
    }

    fn commit(&mut self, scope: &[ElementKind], desired: &[Desired], now: Instant) {
        let patches: Vec<Patch> = reconcile(&self.surface, scope, desired);
        tracing::trace!(patches = patches.len(), ?scope, "reconciled");
        for patch in patches {
            self.surface.apply(patch, now);
        }
    }

    /// Bar geometry and fill for `value` under the current cut-off.
    pub fn bar(&self, category: Category, value: f64) -> RectElement {
        let band = self.scales.band(category);
        let y = self.scales.y(value);
        let palette = &self.config.palette;
        RectElement {
            x: band.offset,
            y,
            width: band.width,
            height: self.scales.height() - y,
            fill: if self.cutoff.is_reached_by(value) {
                palette.alert
            } else {
                palette.normal
            },
        }
    }

    /// Alert marker for `value`, present only when the cut-off is reached.
    pub fn marker(&self, category: Category, value: f64) -> Option<TextElement> {
        if !self.cutoff.is_reached_by(value) {
            return None;
        }
        let band = self.scales.band(category);
        Some(TextElement {
            x: band.center(),
            y: self.scales.y(value) - MARKER_OFFSET,
            anchor: TextAnchor::Middle,
            fill: self.config.palette.marker,
            content: self.config.marker_text.clone(),
        })
    }

    pub fn cutoff_line(&self) -> LineElement {
        let y = self.scales.y(self.cutoff.as_f64());
        LineElement {
            x1: 0.0,
            y1: y,
            x2: self.scales.width(),
            y2: y,
            stroke: self.config.palette.reference,
            stroke_width: CUTOFF_STROKE_WIDTH,
            dash: Some(CUTOFF_DASH),
        }
    }

    pub fn cutoff_label(&self) -> TextElement {
        TextElement {
            x: self.scales.width(),
            y: self.scales.y(self.cutoff.as_f64()) - CUTOFF_LABEL_OFFSET,
            anchor: TextAnchor::End,
            fill: self.config.palette.reference,
            content: format!("Cut-off: {}", self.cutoff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VisError;
    use crate::surface::RetainedSurface;

    fn vis() -> (BandPowerVis<RetainedSurface>, Instant) {
        let now = Instant::now();
        let config = VisConfig::default();
        let surface = RetainedSurface::new(config.surface.width, config.surface.height);
        (BandPowerVis::new_at(config, surface, now).unwrap(), now)
    }

    fn settled_bar(vis: &BandPowerVis<RetainedSurface>) -> RectElement {
        vis.surface()
            .target(&ElementKey::Bar(Category::Beta))
            .and_then(|el| el.as_rect().cloned())
            .expect("bar present")
    }

    #[test]
    fn test_rejects_degenerate_surface() {
        let sizes = [
            (0.0, 300.0),
            (400.0, -1.0),
            (f64::NAN, 300.0),
            (400.0, f64::INFINITY),
        ];
        for (width, height) in sizes {
            let surface = RetainedSurface::new(width, height);
            let result = BandPowerVis::new(VisConfig::default(), surface);
            assert!(matches!(
                result,
                Err(VisError::Validation(ValidationError::InvalidValue { .. }))
            ));
        }
    }

    #[test]
    fn test_construction_draws_cutoff_only() {
        let (vis, _) = vis();
        let surface = vis.surface();
        assert_eq!(surface.count(ElementKind::CutoffLine), 1);
        assert_eq!(surface.count(ElementKind::CutoffLabel), 1);
        assert_eq!(surface.count(ElementKind::Bar), 0);
        let label = surface.target(&ElementKey::CutoffLabel).unwrap();
        assert_eq!(label.as_text().unwrap().content, "Cut-off: 19");
    }

    #[test]
    fn test_bar_geometry() {
        let (mut vis, now) = vis();
        vis.update_at(MetricSample::new(25.0), now).unwrap();
        let bar = settled_bar(&vis);
        assert!((bar.y - 225.0).abs() < 1e-9);
        assert!((bar.height - 75.0).abs() < 1e-9);
        assert!((bar.x - 400.0 / 6.0).abs() < 1e-9);
        assert!((bar.width - 800.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_boundary_is_alert() {
        let (mut vis, now) = vis();
        vis.update_at(MetricSample::new(19.0), now).unwrap();
        assert_eq!(settled_bar(&vis).fill, vis.config().palette.alert);
        assert!(vis.is_alert());
        assert_eq!(vis.surface().count(ElementKind::Marker), 1);
    }

    #[test]
    fn test_cutoff_change_flips_state() {
        let (mut vis, now) = vis();
        vis.update_at(MetricSample::new(25.0), now).unwrap();
        assert!(vis.is_alert());

        vis.set_cutoff_at(CutoffValue::try_from(28).unwrap(), now);
        assert!(!vis.is_alert());
        assert_eq!(settled_bar(&vis).fill, vis.config().palette.normal);
        assert_eq!(vis.surface().count(ElementKind::Marker), 0);

        let line = vis.surface().target(&ElementKey::CutoffLine).unwrap();
        let expected = vis.scales().y(28.0);
        assert!((line.as_line().unwrap().y1 - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cutoff_line_animates_over_configured_duration() {
        let (mut vis, now) = vis();
        vis.set_cutoff_at(CutoffValue::try_from(34).unwrap(), now);
        let surface = vis.surface();
        assert!(surface.is_animating(now + Duration::from_millis(299)));
        assert!(!surface.is_animating(now + Duration::from_millis(300)));
    }

    #[test]
    fn test_try_set_cutoff_rejects_unknown_value() {
        let (mut vis, _) = vis();
        assert!(vis.try_set_cutoff(20).is_err());
        assert_eq!(vis.cutoff().get(), 19);
        assert!(vis.try_set_cutoff(31).is_ok());
        assert_eq!(vis.cutoff().get(), 31);
    }

    #[test]
    fn test_non_finite_sample_rejected_without_side_effects() {
        let (mut vis, now) = vis();
        vis.update_at(MetricSample::new(40.0), now).unwrap();
        assert!(vis.update_at(MetricSample::new(f64::NAN), now).is_err());
        assert_eq!(vis.last_sample(), Some(MetricSample::new(40.0)));
        assert!((settled_bar(&vis).height - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let (mut vis, now) = vis();
        vis.update_at(MetricSample::new(140.0), now).unwrap();
        let bar = settled_bar(&vis);
        assert_eq!(bar.y, 0.0);
        assert_eq!(bar.height, 300.0);

        vis.update_at(MetricSample::new(-3.0), now).unwrap();
        assert_eq!(settled_bar(&vis).height, 0.0);
        assert_eq!(vis.last_sample(), Some(MetricSample::new(0.0)));
    }

    #[test]
    fn test_marker_centered_above_bar() {
        let (mut vis, now) = vis();
        vis.update_at(MetricSample::new(50.0), now).unwrap();
        let marker = vis
            .surface()
            .target(&ElementKey::Marker(Category::Beta))
            .and_then(|el| el.as_text().cloned())
            .unwrap();
        let bar = settled_bar(&vis);
        assert!((marker.x - (bar.x + bar.width / 2.0)).abs() < 1e-9);
        assert!((marker.y - (bar.y - MARKER_OFFSET)).abs() < 1e-9);
        assert_eq!(marker.anchor, TextAnchor::Middle);
        assert_eq!(marker.content, "Great Job");
    }
}
