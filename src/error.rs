//! Error types for the map surface.

use thiserror::Error;

use crate::types::{AuthState, EngineRunState};

/// A lifecycle operation was requested outside its valid state.
///
/// These are programming errors: the surface only issues commands whose
/// preconditions hold, so hosts log them rather than recover.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("engine operation requires authentication (auth state: {0})")]
    NotAuthenticated(AuthState),

    #[error("rendering requires a started engine (run state: {0})")]
    EngineNotStarted(EngineRunState),

    #[error("cannot stop the engine while authentication is in flight")]
    AuthenticationInFlight,

    #[error("authentication result arrived while {0}")]
    UnexpectedAuthResult(AuthState),

    #[error("invalid lifecycle combination: auth {auth} with run state {run}")]
    InvalidCombination { auth: AuthState, run: EngineRunState },
}

/// Failures reported by the map engine itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine already initialized")]
    AlreadyInitialized,

    #[error("engine not initialized")]
    NotInitialized,

    #[error("view already exists: {0}")]
    ViewAlreadyExists(String),

    #[error("view not found: {0}")]
    ViewNotFound(String),
}

/// Invalid configuration value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Umbrella error for surface operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for surface operations.
pub type Result<T> = std::result::Result<T, MapError>;
