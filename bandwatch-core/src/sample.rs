//! Incoming samples and the fixed category domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of the band-power domain.
pub const DOMAIN_MIN: f64 = 0.0;
/// Upper bound of the band-power domain.
pub const DOMAIN_MAX: f64 = 100.0;

/// The categorical slot a metric occupies on the horizontal axis.
///
/// The meter tracks exactly one channel, so the domain has a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Beta,
}

impl Category {
    pub const ALL: [Category; 1] = [Category::Beta];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Beta => "Beta",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A snapshot of the monitored channel, supplied once per update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub beta: f64,
}

impl MetricSample {
    pub fn new(beta: f64) -> Self {
        Self { beta }
    }

    /// Decode one newline-delimited JSON record such as `{"beta": 23.5}`.
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }

    /// Project the sample into the one-element dataset bound to the chart.
    pub fn dataset(&self) -> [Datum; 1] {
        [Datum {
            group: Category::Beta,
            value: self.beta,
        }]
    }
}

/// One bound data point: a category and its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    pub group: Category,
    pub value: f64,
}

/// Clamp a value into the band-power domain.
pub fn clamp_to_domain(value: f64) -> f64 {
    value.clamp(DOMAIN_MIN, DOMAIN_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_category() {
        assert_eq!(Category::ALL.len(), 1);
        assert_eq!(Category::Beta.to_string(), "Beta");
    }

    #[test]
    fn test_sample_from_json() {
        let sample = MetricSample::from_json(" {\"beta\": 23.5}\n").unwrap();
        assert_eq!(sample.beta, 23.5);
        assert!(MetricSample::from_json("{\"alpha\": 1}").is_err());
    }

    #[test]
    fn test_dataset_projection() {
        let [datum] = MetricSample::new(42.0).dataset();
        assert_eq!(datum.group, Category::Beta);
        assert_eq!(datum.value, 42.0);
    }

    #[test]
    fn test_clamp_to_domain() {
        assert_eq!(clamp_to_domain(-5.0), 0.0);
        assert_eq!(clamp_to_domain(150.0), 100.0);
        assert_eq!(clamp_to_domain(37.5), 37.5);
    }
}
