//! Engine Lifecycle Controller
//!
//! Owns the engine, the authentication/run state machine and the retry
//! timer. Every engine call goes through [`Lifecycle::apply`] first, so the
//! engine is only touched when a transition really happens.
//!
//! # Flow
//!
//! ```text
//! initialize → authenticate ──success──→ start_engine → start_rendering
//!                  ↑         └─failure──→ Failed ──(retry delay)──┐
//!                  └──────────────────────────────────────────────┘
//! ```
//!
//! Engine failures never escape: authentication errors become a `Failed`
//! state plus a scheduled retry, and precondition violations come back as
//! [`LifecycleError`] for the caller to log.

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::engine::{HandlerId, MapEngine, MapView, MapviewInfo};
use crate::error::{self, EngineError, LifecycleError, MapError};
use crate::events::EventSender;
use crate::state::{Lifecycle, LifecycleCommand, RetryTimer, Watch};
use crate::types::{AuthState, EngineRunState, Point, Rect, Size, Viewport};

/// Viewport currently shown by `view`.
pub fn viewport_of(view: &dyn MapView) -> Viewport {
    let rect = view.view_rect();
    let top_left = view.position_at(rect.origin);
    let bottom_right = view.position_at(Point::new(
        rect.origin.x + rect.size.width,
        rect.origin.y + rect.size.height,
    ));
    Viewport::new(top_left, bottom_right, view.zoom_level())
}

pub struct MapController<E: MapEngine> {
    engine: E,
    config: MapConfig,
    lifecycle: Lifecycle,
    auth_watch: Watch<AuthState>,
    run_watch: Watch<EngineRunState>,
    retry: RetryTimer,
    camera_handler: Option<HandlerId>,
    initialized: bool,
    torn_down: bool,
}

impl<E: MapEngine> MapController<E> {
    pub fn new(engine: E, config: MapConfig) -> Self {
        let retry = RetryTimer::new(config.retry_delay);
        Self {
            engine,
            config,
            lifecycle: Lifecycle::new(),
            auth_watch: Watch::new(AuthState::Unauthenticated),
            run_watch: Watch::new(EngineRunState::Stopped),
            retry,
            camera_handler: None,
            initialized: false,
            torn_down: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn auth_state(&self) -> AuthState {
        self.lifecycle.auth().clone()
    }

    pub fn run_state(&self) -> EngineRunState {
        self.lifecycle.run()
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Current auth state, then every change.
    pub fn watch_auth(&mut self) -> Receiver<AuthState> {
        self.auth_watch.subscribe()
    }

    /// Current run state, then every change.
    pub fn watch_run(&mut self) -> Receiver<EngineRunState> {
        self.run_watch.subscribe()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn retry(&self) -> &RetryTimer {
        &self.retry
    }

    pub fn has_camera_handler(&self) -> bool {
        self.camera_handler.is_some()
    }

    /// The map view, if the engine currently holds one.
    pub fn map_view_mut(&mut self) -> Option<&mut dyn MapView> {
        self.engine.view_mut(&self.config.view_name)
    }

    /// Viewport of the map view, if it exists.
    pub fn current_viewport(&self) -> Option<Viewport> {
        self.engine.view(&self.config.view_name).map(viewport_of)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn commit(&mut self, command: &LifecycleCommand, next: Lifecycle) {
        debug!(
            ?command,
            from_auth = %self.lifecycle.auth(),
            from_run = %self.lifecycle.run(),
            to_auth = %next.auth(),
            to_run = %next.run(),
            "lifecycle transition"
        );
        self.auth_watch.set(next.auth().clone());
        self.run_watch.set(next.run());
        self.lifecycle = next;
    }

    /// Bind the engine to its event queue. Must run once, before anything else.
    pub fn initialize(&mut self, events: EventSender) -> error::Result<()> {
        if self.initialized {
            return Err(EngineError::AlreadyInitialized.into());
        }
        self.engine.init_engine(events)?;
        self.initialized = true;
        info!("map engine initialized");
        Ok(())
    }

    /// Request authentication. Returns true if a request was issued.
    ///
    /// No-op while `Authenticating` or `Authenticated`.
    pub fn authenticate(&mut self) -> bool {
        if !self.initialized || self.torn_down {
            warn!(initialized = self.initialized, torn_down = self.torn_down, "authenticate ignored");
            return false;
        }
        let command = LifecycleCommand::Authenticate;
        match self.lifecycle.apply(&command) {
            Ok(Some(next)) => {
                self.commit(&command, next);
                info!("authenticating");
                self.engine.authenticate();
                true
            }
            Ok(None) => {
                debug!(auth = %self.lifecycle.auth(), "authenticate is a no-op");
                false
            }
            Err(e) => {
                warn!(error = %e, "authenticate rejected");
                false
            }
        }
    }

    /// Authentication succeeded: become `Authenticated`, then start.
    pub fn on_authentication_succeeded(&mut self) -> Result<(), LifecycleError> {
        let command = LifecycleCommand::AuthSucceeded;
        let next = self.lifecycle.apply(&command)?.ok_or_else(|| {
            LifecycleError::UnexpectedAuthResult(self.lifecycle.auth().clone())
        })?;
        self.commit(&command, next);
        info!("authentication succeeded");
        self.start()
    }

    /// Authentication failed: record the failure and schedule a retry.
    pub fn on_authentication_failed(&mut self, code: i32, message: &str, now: Instant) -> Result<(), LifecycleError> {
        let command = LifecycleCommand::AuthFailed { code, message: message.to_string() };
        let next = self.lifecycle.apply(&command)?.ok_or_else(|| {
            LifecycleError::UnexpectedAuthResult(self.lifecycle.auth().clone())
        })?;
        self.commit(&command, next);
        warn!(code, reason = message, "authentication failed");

        let pending = self.retry.schedule(now);
        info!(
            delay_ms = self.retry.delay().as_millis() as u64,
            generation = pending.generation,
            "authentication retry scheduled"
        );
        Ok(())
    }

    /// Fire the retry timer if it is due. Returns true if authentication was re-issued.
    pub fn poll_retry(&mut self, now: Instant) -> bool {
        let Some(pending) = self.retry.fire(now) else {
            return false;
        };
        if self.torn_down {
            debug!(generation = pending.generation, "retry fired after teardown");
            return false;
        }
        info!("retry auth...");
        self.authenticate()
    }

    /// Time left until the pending retry, if any.
    pub fn next_retry_deadline(&self, now: Instant) -> Option<Duration> {
        self.retry.next_deadline(now)
    }

    /// Start the engine and begin rendering. Requires `Authenticated`.
    pub fn start(&mut self) -> Result<(), LifecycleError> {
        self.start_engine()?;
        self.start_rendering()
    }

    pub fn start_engine(&mut self) -> Result<(), LifecycleError> {
        let command = LifecycleCommand::StartEngine;
        if let Some(next) = self.lifecycle.apply(&command)? {
            self.commit(&command, next);
            self.engine.start_engine();
        }
        Ok(())
    }

    pub fn start_rendering(&mut self) -> Result<(), LifecycleError> {
        let command = LifecycleCommand::StartRendering;
        if let Some(next) = self.lifecycle.apply(&command)? {
            self.commit(&command, next);
            self.engine.start_rendering();
        }
        Ok(())
    }

    /// `Rendering → Started`; no-op otherwise.
    pub fn stop_rendering(&mut self) {
        let command = LifecycleCommand::StopRendering;
        if let Ok(Some(next)) = self.lifecycle.apply(&command) {
            self.commit(&command, next);
            self.engine.stop_rendering();
        }
    }

    /// Tear the engine down to `Stopped`, releasing its views.
    pub fn stop_engine(&mut self) -> Result<(), LifecycleError> {
        let command = LifecycleCommand::StopEngine;
        if let Some(next) = self.lifecycle.apply(&command)? {
            self.remove_camera_handler();
            if self.lifecycle.run() == EngineRunState::Rendering {
                self.engine.stop_rendering();
            }
            self.commit(&command, next);
            self.engine.stop_engine();
        }
        Ok(())
    }

    /// Bring the engine back up after it was stopped by backgrounding.
    ///
    /// Does nothing until authenticated.
    pub fn ensure_running(&mut self) -> Result<(), LifecycleError> {
        if !self.lifecycle.auth().is_authenticated() {
            return Ok(());
        }
        if self.lifecycle.run() == EngineRunState::Stopped {
            self.start_engine()?;
        }
        if self.lifecycle.run() != EngineRunState::Rendering {
            self.start_rendering()?;
        }
        Ok(())
    }

    // =========================================================================
    // Engine callbacks
    // =========================================================================

    /// Create the map view, place the logo and listen for camera changes.
    pub fn on_add_views(&mut self) -> Result<(), EngineError> {
        let info = MapviewInfo {
            view_name: self.config.view_name.clone(),
            view_info_name: self.config.view_info_name.clone(),
            default_position: self.config.default_position,
            default_level: self.config.default_level,
        };
        self.engine.add_view(&info)?;
        info!(view = %info.view_name, "OK");

        let view = self
            .engine
            .view_mut(&info.view_name)
            .ok_or_else(|| EngineError::ViewNotFound(info.view_name.clone()))?;
        view.set_logo_position(self.config.logo_alignment, self.config.logo_offset);
        self.camera_handler = Some(view.add_camera_stopped_handler());
        Ok(())
    }

    /// Match the map view's drawing rectangle to the container.
    pub fn on_container_resized(&mut self, size: Size) {
        match self.engine.view_mut(&self.config.view_name) {
            Some(view) => {
                view.set_view_rect(Rect::from_size(size));
                debug!(width = size.width, height = size.height, "map view resized");
            }
            None => debug!("container resized before the map view exists"),
        }
    }

    pub fn on_view_will_be_destroyed(&mut self, view: &str) {
        if view == self.config.view_name {
            debug!(view, "map view will be destroyed");
            self.camera_handler = None;
        }
    }

    /// Viewport for a camera-stopped event, or `None` when not rendering.
    pub fn on_camera_stopped(&self, view: &str) -> Option<Viewport> {
        if self.lifecycle.run() != EngineRunState::Rendering || view != self.config.view_name {
            return None;
        }
        self.engine.view(view).map(viewport_of)
    }

    pub fn remove_camera_handler(&mut self) {
        let Some(id) = self.camera_handler.take() else {
            return;
        };
        if let Some(view) = self.engine.view_mut(&self.config.view_name) {
            view.remove_camera_stopped_handler(id);
        }
    }

    /// The hosting view is going away: cancel retries and stop everything.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.retry.invalidate();
        self.stop_rendering();
        if self.lifecycle.run() != EngineRunState::Stopped {
            if let Err(e) = self.stop_engine() {
                warn!(error = %e, "engine left running at teardown");
            }
        }
        info!("map controller torn down");
    }
}

// =============================================================================
// TESTS
// =============================================================================
