//! Timed interpolation between two attribute states.

use crate::color::Rgb;
use std::time::{Duration, Instant};

/// Linear interpolation between two values of the same type.
pub trait Lerp: Clone {
    /// Value at `t` in `[0, 1]` between `self` (t = 0) and `to` (t = 1).
    fn lerp(&self, to: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Rgb {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        let channel = |a: u8, b: u8| f64::from(a).lerp(&f64::from(b), t).round().clamp(0.0, 255.0) as u8;
        Rgb::new(
            channel(self.r, to.r),
            channel(self.g, to.g),
            channel(self.b, to.b),
        )
    }
}

/// Easing curve applied to normalized transition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
}

impl Easing {
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// A value animating from `from` to `to` over `duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<T> {
    from: T,
    to: T,
    started_at: Instant,
    duration: Duration,
    easing: Easing,
}

impl<T: Lerp> Transition<T> {
    /// A transition that has already finished at `value`.
    pub fn settled(value: T, now: Instant) -> Self {
        Self {
            from: value.clone(),
            to: value,
            started_at: now,
            duration: Duration::ZERO,
            easing: Easing::default(),
        }
    }

    pub fn new(from: T, to: T, duration: Duration, now: Instant) -> Self {
        Self {
            from,
            to,
            started_at: now,
            duration,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn value_at(&self, now: Instant) -> T {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to.clone();
        }
        self.from.lerp(&self.to, self.easing.apply(t))
    }

    pub fn target(&self) -> &T {
        &self.to
    }

    /// Start towards a new target from wherever this transition is at `now`.
    pub fn retarget(&self, to: T, duration: Duration, now: Instant) -> Self {
        Self {
            from: self.value_at(now),
            to,
            started_at: now,
            duration,
            easing: self.easing,
        }
    }

    /// Jump straight to the target.
    pub fn finish(&mut self) {
        self.from = self.to.clone();
        self.duration = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::CubicInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_value_at_interpolates_and_settles() {
        let start = Instant::now();
        let tr = Transition::new(0.0, 100.0, Duration::from_millis(300), start)
            .with_easing(Easing::Linear);
        assert_eq!(tr.value_at(start), 0.0);
        let mid = tr.value_at(start + Duration::from_millis(150));
        assert!((mid - 50.0).abs() < 1e-6);
        assert_eq!(tr.value_at(start + Duration::from_secs(1)), 100.0);
        assert!(tr.is_finished(start + Duration::from_millis(300)));
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let now = Instant::now();
        let tr = Transition::new(1.0, 2.0, Duration::ZERO, now);
        assert_eq!(tr.value_at(now), 2.0);
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let start = Instant::now();
        let tr = Transition::new(0.0, 100.0, Duration::from_millis(100), start)
            .with_easing(Easing::Linear);
        let now = start + Duration::from_millis(50);
        let next = tr.retarget(0.0, Duration::from_millis(100), now);
        assert!((next.value_at(now) - 50.0).abs() < 1e-6);
        assert_eq!(next.value_at(now + Duration::from_millis(100)), 0.0);
    }

    #[test]
    fn test_rgb_lerp() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(255, 100, 10);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), Rgb::new(128, 50, 5));
    }
}
