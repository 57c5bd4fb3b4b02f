//! Scale Manager: domain-to-surface coordinate mapping.
//!
//! Both scales are built once from the surface dimensions and never change
//! afterwards. Surface coordinates follow the usual raster convention: `y`
//! grows downwards, so larger values map closer to the top.

use crate::sample::{Category, DOMAIN_MAX, DOMAIN_MIN};

/// Padding fraction applied between bands and at the outer edges.
pub const BAND_PADDING: f64 = 0.2;

/// Continuous linear mapping from a numeric domain to a numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a domain value to the range. Values outside the domain
    /// extrapolate linearly.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Map a range coordinate back into the domain.
    pub fn invert(&self, coordinate: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return (d0 + d1) / 2.0;
        }
        d0 + (coordinate - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Evenly spaced domain values from the lower bound up to and
    /// including the upper bound.
    pub fn ticks(&self, step: f64) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if step <= 0.0 || !step.is_finite() {
            return vec![lo, hi];
        }
        let count = ((hi - lo) / step).floor() as usize;
        (0..=count).map(|i| lo + step * i as f64).collect()
    }
}

/// Horizontal slot assigned to one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub offset: f64,
    pub width: f64,
}

impl Band {
    pub fn center(&self) -> f64 {
        self.offset + self.width / 2.0
    }
}

/// Ordinal scale that splits a range into equal, padded bands.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale<K> {
    domain: Vec<K>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
}

impl<K: PartialEq + Copy> BandScale<K> {
    /// Band scale with the same padding inside and outside, centred.
    pub fn new(domain: Vec<K>, range: (f64, f64), padding: f64) -> Self {
        let padding = padding.clamp(0.0, 1.0);
        Self {
            domain,
            range,
            padding_inner: padding,
            padding_outer: padding,
            align: 0.5,
        }
    }

    fn layout(&self) -> (f64, f64) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        let step = span / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        let start = r0 + (span - step * (n - self.padding_inner)) * self.align;
        (start, step)
    }

    pub fn step(&self) -> f64 {
        self.layout().1
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// The band for `key`, or `None` if the key is not in the domain.
    pub fn band(&self, key: K) -> Option<Band> {
        let index = self.domain.iter().position(|k| *k == key)?;
        let (start, step) = self.layout();
        Some(Band {
            offset: start + step * index as f64,
            width: step * (1.0 - self.padding_inner),
        })
    }

    pub fn domain(&self) -> &[K] {
        &self.domain
    }
}

/// Owns both scales for a fixed-size drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleManager {
    width: f64,
    height: f64,
    category: BandScale<Category>,
    value: LinearScale,
}

impl ScaleManager {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            category: BandScale::new(Category::ALL.to_vec(), (0.0, width), BAND_PADDING),
            value: LinearScale::new((DOMAIN_MIN, DOMAIN_MAX), (height, 0.0)),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn category_scale(&self) -> &BandScale<Category> {
        &self.category
    }

    pub fn value_scale(&self) -> &LinearScale {
        &self.value
    }

    /// Band occupied by `category`.
    ///
    /// Every [`Category`] is part of the domain, so the fallback to a band
    /// at the origin only exists to keep the signature total.
    pub fn band(&self, category: Category) -> Band {
        self.category.band(category).unwrap_or(Band {
            offset: 0.0,
            width: self.category.bandwidth(),
        })
    }

    /// Vertical surface coordinate for a domain value.
    pub fn y(&self, value: f64) -> f64 {
        self.value.apply(value)
    }
}
