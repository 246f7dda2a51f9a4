//! Response curves mapping a normalized input to a normalized score.

use serde::{Deserialize, Serialize};

/// Shape applied to a consideration input.
///
/// Every curve clamps its input to [0, 1] and its output to [0, 1]. Non-finite
/// inputs read as 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ResponseCurve {
    /// `y = x`
    #[default]
    Linear,
    /// `y = x^exponent`
    Exponential { exponent: f32 },
    /// `y = 1 − x`
    Inverse,
    /// 1 at or above the threshold, 0 below.
    Step { threshold: f32 },
    /// Triangular peak: `max(0, 1 − |x − peak| / width)`.
    Bell { peak: f32, width: f32 },
}

impl ResponseCurve {
    pub const DEFAULT_EXPONENT: f32 = 2.0;
    pub const DEFAULT_THRESHOLD: f32 = 0.5;
    pub const DEFAULT_PEAK: f32 = 0.5;
    pub const DEFAULT_WIDTH: f32 = 0.5;

    pub const fn exponential() -> Self {
        ResponseCurve::Exponential {
            exponent: Self::DEFAULT_EXPONENT,
        }
    }

    pub const fn step() -> Self {
        ResponseCurve::Step {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    pub const fn bell() -> Self {
        ResponseCurve::Bell {
            peak: Self::DEFAULT_PEAK,
            width: Self::DEFAULT_WIDTH,
        }
    }

    pub fn evaluate(&self, input: f32) -> f32 {
        let x = if input.is_finite() {
            input.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let y = match *self {
            ResponseCurve::Linear => x,
            ResponseCurve::Exponential { exponent } => x.powf(exponent),
            ResponseCurve::Inverse => 1.0 - x,
            ResponseCurve::Step { threshold } => {
                if x >= threshold {
                    1.0
                } else {
                    0.0
                }
            }
            ResponseCurve::Bell { peak, width } => {
                if width <= 0.0 {
                    // Degenerate bell: a spike at the peak.
                    if (x - peak).abs() <= f32::EPSILON { 1.0 } else { 0.0 }
                } else {
                    1.0 - (x - peak).abs() / width
                }
            }
        };

        if y.is_nan() { 0.0 } else { y.clamp(0.0, 1.0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f32; 9] = [-3.0, -0.01, 0.0, 0.25, 0.5, 0.75, 1.0, 1.5, 42.0];

    fn all_curves() -> Vec<ResponseCurve> {
        vec![
            ResponseCurve::Linear,
            ResponseCurve::exponential(),
            ResponseCurve::Exponential { exponent: 0.5 },
            ResponseCurve::Exponential { exponent: -2.0 },
            ResponseCurve::Inverse,
            ResponseCurve::step(),
            ResponseCurve::bell(),
            ResponseCurve::Bell { peak: 0.3, width: 0.0 },
        ]
    }

    #[test]
    fn every_curve_stays_in_unit_range() {
        for curve in all_curves() {
            for x in SAMPLES.into_iter().chain([f32::NAN, f32::INFINITY]) {
                let y = curve.evaluate(x);
                assert!((0.0..=1.0).contains(&y), "{curve:?}({x}) = {y}");
            }
        }
    }

    #[test]
    fn inverse_mirrors_linear() {
        assert_eq!(ResponseCurve::Inverse.evaluate(0.2), 0.8);
        assert_eq!(ResponseCurve::Inverse.evaluate(-1.0), 1.0);
    }

    #[test]
    fn step_includes_threshold() {
        let curve = ResponseCurve::Step { threshold: 0.4 };
        assert_eq!(curve.evaluate(0.4), 1.0);
        assert_eq!(curve.evaluate(0.39), 0.0);
    }

    #[test]
    fn bell_peaks_at_center_and_falls_off() {
        let curve = ResponseCurve::Bell { peak: 0.3, width: 0.3 };
        assert_eq!(curve.evaluate(0.3), 1.0);
        assert!((curve.evaluate(0.45) - 0.5).abs() < 1e-6);
        assert_eq!(curve.evaluate(0.9), 0.0);
    }

    #[test]
    fn exponential_defaults_to_square() {
        assert!((ResponseCurve::exponential().evaluate(0.5) - 0.25).abs() < 1e-6);
    }
}
