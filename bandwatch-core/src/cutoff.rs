//! Cut-off threshold values.
//!
//! A cut-off can only ever hold one of [`CUTOFF_OPTIONS`]. The default is
//! picked by index into that list so the two can never drift apart.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selectable cut-off values, in display order.
pub const CUTOFF_OPTIONS: [u8; 9] = [10, 13, 16, 19, 22, 25, 28, 31, 34];

/// Index into [`CUTOFF_OPTIONS`] used when nothing has been selected yet.
pub const DEFAULT_CUTOFF_INDEX: usize = 3;

/// A validated cut-off threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct CutoffValue(u8);

impl CutoffValue {
    pub fn options() -> impl Iterator<Item = CutoffValue> {
        CUTOFF_OPTIONS.iter().copied().map(CutoffValue)
    }

    pub fn from_index(index: usize) -> Option<CutoffValue> {
        CUTOFF_OPTIONS.get(index).copied().map(CutoffValue)
    }

    /// Position of this value in [`CUTOFF_OPTIONS`].
    pub fn index(&self) -> usize {
        CUTOFF_OPTIONS
            .iter()
            .position(|v| *v == self.0)
            .unwrap_or(DEFAULT_CUTOFF_INDEX)
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0)
    }

    /// Next option up, saturating at the last one.
    pub fn next(&self) -> CutoffValue {
        let idx = (self.index() + 1).min(CUTOFF_OPTIONS.len() - 1);
        CutoffValue(CUTOFF_OPTIONS[idx])
    }

    /// Next option down, saturating at the first one.
    pub fn previous(&self) -> CutoffValue {
        let idx = self.index().saturating_sub(1);
        CutoffValue(CUTOFF_OPTIONS[idx])
    }

    /// Whether a value meets or exceeds this cut-off.
    pub fn is_reached_by(&self, value: f64) -> bool {
        value >= self.as_f64()
    }

    /// Parse the text of a selector option.
    pub fn parse(text: &str) -> Result<CutoffValue, ValidationError> {
        let value: i64 = text.trim().parse().map_err(|_| ValidationError::InvalidValue {
            field: "cutoff".to_string(),
            reason: format!("'{}' is not an integer", text.trim()),
        })?;
        CutoffValue::try_from(value)
    }
}

impl Default for CutoffValue {
    fn default() -> Self {
        CutoffValue(CUTOFF_OPTIONS[DEFAULT_CUTOFF_INDEX])
    }
}

impl TryFrom<i64> for CutoffValue {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        CUTOFF_OPTIONS
            .iter()
            .copied()
            .find(|option| i64::from(*option) == value)
            .map(CutoffValue)
            .ok_or_else(|| ValidationError::CutoffNotInOptions {
                value,
                options: CUTOFF_OPTIONS.to_vec(),
            })
    }
}

impl From<CutoffValue> for i64 {
    fn from(value: CutoffValue) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Display for CutoffValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
