//! Lifecycle State Machine - Authentication × engine run state
//!
//! Pure transition function over `(AuthState, EngineRunState)`. The
//! controller asks [`Lifecycle::apply`] before touching the engine and only
//! calls the engine when a transition actually happens.
//!
//! Invariant: `Rendering ⇒ Started ⇒ Authenticated`, i.e. any run state
//! other than `Stopped` requires `AuthState::Authenticated`. Fields are
//! private, so only [`Lifecycle::new`], [`Lifecycle::from_parts`] (validated)
//! and `apply` can produce a value.
//!
//! # Transitions
//!
//! ```text
//! Authenticate    Unauthenticated | Failed  → Authenticating
//!                 Authenticating | Authenticated → no-op
//! AuthSucceeded   Authenticating → Authenticated
//! AuthFailed      Authenticating → Failed(code, message)
//! StartEngine     Authenticated: Stopped → Started
//! StartRendering  Authenticated: Started → Rendering
//! StopRendering   Rendering → Started, otherwise no-op
//! StopEngine      Started | Rendering → Stopped (not while Authenticating)
//! ```

use crate::error::LifecycleError;
use crate::types::{AuthState, EngineRunState};

/// A request to move the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleCommand {
    Authenticate,
    AuthSucceeded,
    AuthFailed { code: i32, message: String },
    StartEngine,
    StartRendering,
    StopRendering,
    StopEngine,
}

impl LifecycleCommand {
    /// One of each command, for exhaustive checks.
    pub fn all() -> Vec<LifecycleCommand> {
        vec![
            LifecycleCommand::Authenticate,
            LifecycleCommand::AuthSucceeded,
            LifecycleCommand::AuthFailed { code: -1, message: "failed".to_string() },
            LifecycleCommand::StartEngine,
            LifecycleCommand::StartRendering,
            LifecycleCommand::StopRendering,
            LifecycleCommand::StopEngine,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lifecycle {
    auth: AuthState,
    run: EngineRunState,
}

impl Lifecycle {
    /// `{Unauthenticated, Stopped}`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from parts, rejecting combinations that break the invariant.
    pub fn from_parts(auth: AuthState, run: EngineRunState) -> Result<Self, LifecycleError> {
        if Self::is_consistent(&auth, run) {
            Ok(Self { auth, run })
        } else {
            Err(LifecycleError::InvalidCombination { auth, run })
        }
    }

    pub fn is_consistent(auth: &AuthState, run: EngineRunState) -> bool {
        run == EngineRunState::Stopped || auth.is_authenticated()
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn run(&self) -> EngineRunState {
        self.run
    }

    /// Compute the state after `command`.
    ///
    /// `Ok(None)` means the command is a no-op in this state. `Err` means
    /// the command's precondition does not hold.
    pub fn apply(&self, command: &LifecycleCommand) -> Result<Option<Lifecycle>, LifecycleError> {
        use EngineRunState::*;

        match command {
            LifecycleCommand::Authenticate => {
                if self.auth.can_authenticate() {
                    Ok(Some(self.with_auth(AuthState::Authenticating)))
                } else {
                    Ok(None)
                }
            }
            LifecycleCommand::AuthSucceeded => match self.auth {
                AuthState::Authenticating => Ok(Some(self.with_auth(AuthState::Authenticated))),
                _ => Err(LifecycleError::UnexpectedAuthResult(self.auth.clone())),
            },
            LifecycleCommand::AuthFailed { code, message } => match self.auth {
                AuthState::Authenticating => Ok(Some(self.with_auth(AuthState::Failed {
                    code: *code,
                    message: message.clone(),
                }))),
                _ => Err(LifecycleError::UnexpectedAuthResult(self.auth.clone())),
            },
            LifecycleCommand::StartEngine => {
                self.require_authenticated()?;
                match self.run {
                    Stopped => Ok(Some(self.with_run(Started))),
                    Started | Rendering => Ok(None),
                }
            }
            LifecycleCommand::StartRendering => {
                self.require_authenticated()?;
                match self.run {
                    Stopped => Err(LifecycleError::EngineNotStarted(self.run)),
                    Started => Ok(Some(self.with_run(Rendering))),
                    Rendering => Ok(None),
                }
            }
            LifecycleCommand::StopRendering => match self.run {
                Rendering => Ok(Some(self.with_run(Started))),
                Started | Stopped => Ok(None),
            },
            LifecycleCommand::StopEngine => {
                if self.auth == AuthState::Authenticating {
                    return Err(LifecycleError::AuthenticationInFlight);
                }
                match self.run {
                    Stopped => Ok(None),
                    Started | Rendering => Ok(Some(self.with_run(Stopped))),
                }
            }
        }
    }

    fn require_authenticated(&self) -> Result<(), LifecycleError> {
        if self.auth.is_authenticated() {
            Ok(())
        } else {
            Err(LifecycleError::NotAuthenticated(self.auth.clone()))
        }
    }

    fn with_auth(&self, auth: AuthState) -> Lifecycle {
        Lifecycle { auth, run: self.run }
    }

    fn with_run(&self, run: EngineRunState) -> Lifecycle {
        Lifecycle { auth: self.auth.clone(), run }
    }
}

// =============================================================================
// TESTS
// =============================================================================
