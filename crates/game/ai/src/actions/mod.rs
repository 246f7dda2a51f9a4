//! Built-in utility actions.
//!
//! | Action | Kind | Base | Gate |
//! |--------|------|------|------|
//! | Attack | atomic | 1.0 | target, hostile |
//! | Flee | goal | 1.0 | escape route, threat |
//! | Avoid | atomic | 0.6 | target, escape route |
//! | Watch | atomic | 0.3 | target |
//! | Patrol | goal | 0.35 | route, no threat |
//! | Wander | goal | 0.25 | no threat |
//! | Idle | atomic | 0.1 | none |

mod combat;
mod idle;
mod roaming;

pub use combat::{AttackAction, AvoidAction, FleeAction};
pub use idle::{IdleAction, WatchAction};
pub use roaming::{PatrolAction, WanderAction};
