//! Configuration errors raised while assembling agents.
//!
//! Steady-state decisions never fail; these errors only surface when static
//! data (routes, archetype names, tags) is malformed.

use game_core::{ErrorSeverity, GameError};

pub type Result<T> = std::result::Result<T, AiError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AiError {
    #[error("route needs at least {required} waypoints, got {provided}")]
    RouteTooShort { required: usize, provided: usize },

    #[error("unknown archetype '{0}'")]
    UnknownArchetype(String),

    #[error("unknown behavior tag '{0}'")]
    UnknownTag(String),

    #[error("archetype '{0}' declares no behavior tags")]
    EmptyArchetype(String),
}

impl GameError for AiError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            AiError::RouteTooShort { .. } => "AI_ROUTE_TOO_SHORT",
            AiError::UnknownArchetype(_) => "AI_UNKNOWN_ARCHETYPE",
            AiError::UnknownTag(_) => "AI_UNKNOWN_TAG",
            AiError::EmptyArchetype(_) => "AI_EMPTY_ARCHETYPE",
        }
    }
}
