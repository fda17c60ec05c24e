//! Easing curves for animated transitions
//!
//! Maps normalized transition time to normalized progress. All curves start at
//! 0.0 and end at 1.0; [`Easing::ElasticOut`] overshoots 1.0 in between, which
//! gives node entrances their springy pop.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Elastic amplitude (1.0 = no extra amplitude)
const ELASTIC_AMPLITUDE: f64 = 1.0;

/// Elastic oscillation period in normalized time
const ELASTIC_PERIOD: f64 = 0.3;

/// Easing curve types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    /// y = t
    Linear,

    /// Cubic ease-in-out: slow start, fast middle, slow finish.
    /// Default for position updates.
    CubicInOut,

    /// Decaying sine oscillation around the target (overshoot then settle)
    ElasticOut,
}

impl Easing {
    /// Progress at normalized time `t` (clamped to 0.0..=1.0)
    ///
    /// Endpoints are exact: 0.0 before the start, 1.0 from the end on.
    pub fn apply(&self, t: f64) -> f64 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
            Easing::ElasticOut => {
                let period = ELASTIC_PERIOD / TAU;
                let phase = (1.0 / ELASTIC_AMPLITUDE.max(1.0)).asin() * period;
                1.0 - ELASTIC_AMPLITUDE * tpmt(t) * ((t + phase) / period).sin()
            }
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Some(Easing::Linear),
            "cubic" | "cubic_in_out" | "cubicinout" => Some(Easing::CubicInOut),
            "elastic" | "elastic_out" | "elasticout" => Some(Easing::ElasticOut),
            _ => None,
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::CubicInOut
    }
}

/// Normalized `2^(-10t)` that is exactly 1 at t=0 and exactly 0 at t=1
fn tpmt(t: f64) -> f64 {
    ((-10.0 * t).exp2() - 0.000_976_562_5) * 1.000_977_517_106_549_4
}

/// Linear interpolation
pub fn lerp(from: f64, to: f64, progress: f64) -> f64 {
    from + (to - from) * progress
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_endpoints() {
        for easing in [Easing::Linear, Easing::CubicInOut, Easing::ElasticOut] {
            assert_eq!(easing.apply(0.0), 0.0, "{:?} at 0", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_clamping() {
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
    }

    #[test]
    fn test_cubic_is_symmetric() {
        let e = Easing::CubicInOut;
        assert!((e.apply(0.5) - 0.5).abs() < EPSILON);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < EPSILON);
        assert!(e.apply(0.25) < 0.25);
    }

    #[test]
    fn test_elastic_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::ElasticOut.apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0, "elastic should overshoot, peak = {}", peak);
        assert!(peak < 1.5);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
        assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
    }
}
