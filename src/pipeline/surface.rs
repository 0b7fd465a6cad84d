//! Map Surface - The host-facing composition
//!
//! Wires the controller, presenter and POI renderer together and exposes
//! the hooks a hosting application calls:
//!
//! - `load` - view loaded: initialize the engine and authenticate
//! - `handle` - one event from the main queue (engine callback or host hook)
//! - `on_timer` - the retry deadline elapsed
//!
//! # Host hooks
//!
//! | Hook | Effect |
//! |---|---|
//! | `BecomeVisible` | start observing app activity; first-appearance refresh once authenticated |
//! | `WillHide` | stop rendering |
//! | `DidHide` | stop observing, stop the engine |
//! | `WillResignActive` | stop rendering (while observing) |
//! | `DidBecomeActive` | start rendering (while observing) |
//! | `Teardown` | cancel retries, stop everything |

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::controller::MapController;
use super::poi::{PoiRenderer, RenderOutcome};
use super::presenter::{Presentable, Presenter};
use super::provider::DataProvider;
use crate::config::MapConfig;
use crate::engine::MapEngine;
use crate::error::Result;
use crate::events::{EngineEvent, EventSender, HostEvent, MapEvent};
use crate::state::HostFlags;
use crate::types::{AuthState, EngineRunState, Location};

// =============================================================================
// Render target
// =============================================================================

/// Presenter output sink: restarts the engine and draws markers.
struct RenderTarget<'a, E: MapEngine> {
    controller: &'a mut MapController<E>,
    renderer: &'a mut PoiRenderer,
}

impl<E: MapEngine> Presentable for RenderTarget<'_, E> {
    fn user_location_did_update(&mut self, location: Location) {
        debug!(%location, "location ready");
        if let Err(e) = self.controller.ensure_running() {
            warn!(error = %e, "could not resume the engine");
        }
    }

    fn users_location_did_change(&mut self, locations: &[Location]) {
        let Some(view) = self.controller.map_view_mut() else {
            debug!(count = locations.len(), "no map view; markers deferred");
            self.renderer.defer(locations);
            return;
        };
        if self.renderer.render(view, locations) == RenderOutcome::MissingLayer {
            debug!("markers not drawn");
        }
    }
}

// =============================================================================
// Surface
// =============================================================================

pub struct MapSurface<E: MapEngine, P: DataProvider> {
    controller: MapController<E>,
    presenter: Presenter<P>,
    renderer: PoiRenderer,
    flags: HostFlags,
}

impl<E: MapEngine, P: DataProvider> MapSurface<E, P> {
    pub fn new(engine: E, provider: P, config: MapConfig) -> Self {
        let presenter = Presenter::new(provider, config.home_location);
        let renderer = PoiRenderer::new(&config);
        Self {
            controller: MapController::new(engine, config),
            presenter,
            renderer,
            flags: HostFlags::NONE,
        }
    }

    pub fn controller(&self) -> &MapController<E> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut MapController<E> {
        &mut self.controller
    }

    pub fn engine(&self) -> &E {
        self.controller.engine()
    }

    pub fn engine_mut(&mut self) -> &mut E {
        self.controller.engine_mut()
    }

    pub fn presenter(&self) -> &Presenter<P> {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut Presenter<P> {
        &mut self.presenter
    }

    pub fn renderer(&self) -> &PoiRenderer {
        &self.renderer
    }

    pub fn flags(&self) -> HostFlags {
        self.flags
    }

    pub fn auth_state(&self) -> AuthState {
        self.controller.auth_state()
    }

    pub fn run_state(&self) -> EngineRunState {
        self.controller.run_state()
    }

    /// The hosting view loaded: bind the engine and start authenticating.
    pub fn load(&mut self, events: EventSender) -> Result<()> {
        self.controller.initialize(events)?;
        self.controller.authenticate();
        Ok(())
    }

    /// Handle one event from the main queue.
    pub fn handle(&mut self, event: MapEvent, now: Instant) {
        if self.flags.contains(HostFlags::TORN_DOWN) {
            debug!(?event, "surface torn down; event ignored");
            return;
        }
        match event {
            MapEvent::Engine(event) => self.handle_engine_event(event, now),
            MapEvent::Host(event) => self.handle_host_event(event),
        }
    }

    /// Fire the retry timer if due.
    pub fn on_timer(&mut self, now: Instant) -> bool {
        self.controller.poll_retry(now)
    }

    /// Time until the surface next needs `on_timer`.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.controller.next_retry_deadline(now)
    }

    fn handle_engine_event(&mut self, event: EngineEvent, now: Instant) {
        match event {
            EngineEvent::AuthenticationSucceeded => {
                if let Err(e) = self.controller.on_authentication_succeeded() {
                    warn!(error = %e, "authentication success ignored");
                }
            }
            EngineEvent::AuthenticationFailed { code, message } => {
                if let Err(e) = self.controller.on_authentication_failed(code, &message, now) {
                    warn!(error = %e, "authentication failure ignored");
                }
            }
            EngineEvent::AddViews => {
                if let Err(e) = self.controller.on_add_views() {
                    warn!(error = %e, "map view not added");
                    return;
                }
                self.on_views_ready();
            }
            EngineEvent::ContainerResized(size) => self.controller.on_container_resized(size),
            EngineEvent::ViewWillBeDestroyed { view } => {
                self.controller.on_view_will_be_destroyed(&view);
                // May arrive after a later BecomeVisible; a visible surface keeps observing
                if !self.flags.contains(HostFlags::VISIBLE) {
                    self.flags.remove(HostFlags::OBSERVING);
                }
                self.renderer.invalidate();
            }
            EngineEvent::CameraStopped { view } => {
                let Some(viewport) = self.controller.on_camera_stopped(&view) else {
                    return;
                };
                let mut target = RenderTarget {
                    controller: &mut self.controller,
                    renderer: &mut self.renderer,
                };
                self.presenter.on_camera_changed(&viewport, &mut target);
            }
        }
    }

    fn handle_host_event(&mut self, event: HostEvent) {
        debug!(?event, flags = ?self.flags, "host event");
        match event {
            HostEvent::BecomeVisible => {
                self.flags.insert(HostFlags::VISIBLE | HostFlags::OBSERVING);
                if self.controller.auth_state().is_authenticated() {
                    self.appear();
                }
            }
            HostEvent::WillHide => self.controller.stop_rendering(),
            HostEvent::DidHide => {
                self.flags.remove(HostFlags::VISIBLE | HostFlags::APPEARED | HostFlags::OBSERVING);
                self.controller.remove_camera_handler();
                if let Err(e) = self.controller.stop_engine() {
                    warn!(error = %e, "engine not stopped on hide");
                }
            }
            HostEvent::WillResignActive => {
                if self.flags.contains(HostFlags::OBSERVING) {
                    self.controller.stop_rendering();
                }
            }
            HostEvent::DidBecomeActive => {
                if self.flags.contains(HostFlags::OBSERVING) {
                    if let Err(e) = self.controller.start_rendering() {
                        warn!(error = %e, "rendering not resumed");
                    }
                }
            }
            HostEvent::Teardown => self.teardown(),
        }
    }

    /// Views were (re)created. Run the first appearance or restore markers.
    fn on_views_ready(&mut self) {
        if !self.flags.contains(HostFlags::VISIBLE) {
            return;
        }
        if !self.flags.contains(HostFlags::APPEARED) {
            self.appear();
            return;
        }
        if let Some(view) = self.controller.map_view_mut() {
            let outcome = self.renderer.redraw(view);
            debug!(?outcome, "markers restored into new view");
        }
    }

    fn appear(&mut self) {
        if self.flags.contains(HostFlags::APPEARED) {
            return;
        }
        self.flags.insert(HostFlags::APPEARED);
        info!("surface appeared");
        let mut target = RenderTarget {
            controller: &mut self.controller,
            renderer: &mut self.renderer,
        };
        self.presenter.on_appear(&mut target);
    }

    /// The hosting view is gone. Later events are ignored.
    pub fn teardown(&mut self) {
        if self.flags.contains(HostFlags::TORN_DOWN) {
            return;
        }
        self.flags.insert(HostFlags::TORN_DOWN);
        self.controller.teardown();
        self.renderer.invalidate();
    }
}

impl<E: MapEngine, P: DataProvider> Drop for MapSurface<E, P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

// =============================================================================
// TESTS
// =============================================================================
