//! Configuration types for the meter.

use crate::color::Palette;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Text shown above the bar while the cut-off is reached.
pub const DEFAULT_MARKER_TEXT: &str = "Great Job";

/// Logical size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
        }
    }
}

/// Everything the render state machine needs besides its surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct VisConfig {
    pub surface: SurfaceSize,
    pub palette: Palette,
    /// Bar geometry and color transition, in milliseconds.
    pub bar_transition_ms: u64,
    /// Cut-off line and label transition, in milliseconds.
    pub cutoff_transition_ms: u64,
    pub marker_text: String,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceSize::default(),
            palette: Palette::default(),
            bar_transition_ms: 10,
            cutoff_transition_ms: 300,
            marker_text: DEFAULT_MARKER_TEXT.to_string(),
        }
    }
}

impl VisConfig {
    pub fn bar_transition(&self) -> Duration {
        Duration::from_millis(self.bar_transition_ms)
    }

    pub fn cutoff_transition(&self) -> Duration {
        Duration::from_millis(self.cutoff_transition_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "must be a finite number > 0".to_string(),
                })
            }
        };
        positive("surface.width", self.surface.width)?;
        positive("surface.height", self.surface.height)?;
        if self.cutoff_transition_ms < self.bar_transition_ms {
            return Err(ConfigError::InvalidValue {
                field: "cutoff_transition_ms".to_string(),
                value: self.cutoff_transition_ms.to_string(),
                reason: "must be >= bar_transition_ms".to_string(),
            });
        }
        if self.marker_text.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "marker_text".to_string(),
                value: String::new(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
