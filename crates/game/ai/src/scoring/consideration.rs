use serde::{Deserialize, Serialize};

use super::curve::ResponseCurve;
use crate::context::{Input, UtilityContext};

/// One factor of an action score: an input shaped by a curve, raised to a
/// weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Consideration {
    pub input: Input,
    #[serde(default)]
    pub curve: ResponseCurve,
    #[serde(default = "Consideration::default_weight")]
    pub weight: f32,
}

impl Consideration {
    pub fn new(input: Input, curve: ResponseCurve) -> Self {
        Self {
            input,
            curve,
            weight: Self::default_weight(),
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    fn default_weight() -> f32 {
        1.0
    }

    /// `curve(input) ^ weight`. A zero weight makes the factor neutral (1.0).
    /// Negative weights count as zero and non-finite ones as 1.0, so the
    /// result stays in [0, 1].
    pub fn evaluate(&self, ctx: &UtilityContext) -> f32 {
        let shaped = self.curve.evaluate(ctx.get(&self.input));
        let weight = if self.weight.is_finite() {
            self.weight.max(0.0)
        } else {
            1.0
        };
        shaped.powf(weight).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_softens_or_sharpens_the_factor() {
        let ctx = UtilityContext {
            health_percent: 0.25,
            ..UtilityContext::default()
        };
        let base = Consideration::new(Input::HealthPercent, ResponseCurve::Linear);
        assert_eq!(base.evaluate(&ctx), 0.25);
        assert_eq!(base.clone().with_weight(0.5).evaluate(&ctx), 0.5);
        assert_eq!(base.clone().with_weight(0.0).evaluate(&ctx), 1.0);
        assert_eq!(base.with_weight(-4.0).evaluate(&ctx), 1.0);
    }

    #[test]
    fn unknown_named_inputs_read_as_zero() {
        let ctx = UtilityContext::default();
        let factor = Consideration::new(Input::Named("morale".into()), ResponseCurve::Inverse);
        assert_eq!(factor.evaluate(&ctx), 1.0);
    }
}
