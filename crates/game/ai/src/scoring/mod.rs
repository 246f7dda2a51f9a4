//! Utility scoring primitives.
//!
//! An action's score is `base × Π consideration(ctx)`, zeroed by any failing
//! precondition. Each consideration maps a context input through a
//! [`ResponseCurve`] and raises it to a weight, so every factor stays in
//! [0, 1] and the product never exceeds the base.

mod action;
mod consideration;
mod curve;
mod precondition;

pub use action::{ActionConfig, ActionId, UtilityAction};
pub use consideration::Consideration;
pub use curve::ResponseCurve;
pub use precondition::Precondition;

pub(crate) use action::raw_score;

use serde::Serialize;

/// One scored row of a decision, kept for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ActionScore {
    pub id: ActionId,
    pub score: f32,
    /// True for the row scoring the continuation of the active goal.
    pub continuation: bool,
}
