//! Map Engine - Capability interfaces consumed from the native engine.
//!
//! The engine is opaque. The surface only needs:
//! - Lifecycle primitives: init, authenticate, start/stop engine, start/stop rendering
//! - Named views: add, look up, resize, screen-to-geo queries, camera handlers
//! - Labels: layers, POI styles, markers
//!
//! Asynchronous callbacks (authentication result, add-views, resize, camera
//! stopped, view teardown) are posted as [`crate::events::EngineEvent`]s
//! through the [`EventSender`] handed over in [`MapEngine::init_engine`].
//!
//! [`headless::HeadlessEngine`] is a complete in-memory implementation.

pub mod headless;
mod options;

pub use options::*;

use crate::error::EngineError;
use crate::events::EventSender;
use crate::types::{GuiAlignment, Location, Point, Rect};

// =============================================================================
// ENGINE
// =============================================================================

/// Lifecycle and view access of a native map engine.
pub trait MapEngine {
    /// Bind the engine to its surface. Callbacks are posted to `events`.
    fn init_engine(&mut self, events: EventSender) -> Result<(), EngineError>;

    /// Begin authentication. The outcome arrives as an engine event.
    fn authenticate(&mut self);

    /// Start the engine. Posts `AddViews` once the engine is ready.
    fn start_engine(&mut self);

    /// Stop the engine, destroying every view it holds.
    fn stop_engine(&mut self);

    fn start_rendering(&mut self);

    fn stop_rendering(&mut self);

    fn is_engine_started(&self) -> bool;

    fn is_rendering(&self) -> bool;

    fn add_view(&mut self, info: &MapviewInfo) -> Result<(), EngineError>;

    fn view(&self, name: &str) -> Option<&dyn MapView>;

    fn view_mut(&mut self, name: &str) -> Option<&mut dyn MapView>;
}

// =============================================================================
// VIEW
// =============================================================================

/// A named map view living inside the engine.
pub trait MapView {
    fn name(&self) -> &str;

    /// Drawing rectangle in surface coordinates.
    fn view_rect(&self) -> Rect;

    fn set_view_rect(&mut self, rect: Rect);

    fn zoom_level(&self) -> i32;

    /// Geographic position under a surface point.
    fn position_at(&self, point: Point) -> Location;

    fn set_logo_position(&mut self, alignment: GuiAlignment, offset: Point);

    /// Start posting `CameraStopped` events for this view.
    fn add_camera_stopped_handler(&mut self) -> HandlerId;

    fn remove_camera_stopped_handler(&mut self, id: HandlerId);

    fn label_manager(&mut self) -> &mut dyn LabelManager;
}

// =============================================================================
// LABELS
// =============================================================================

/// Owner of a view's label layers and POI styles.
pub trait LabelManager {
    /// Add a layer. Returns false (and changes nothing) if the id exists.
    fn add_label_layer(&mut self, options: &LabelLayerOptions) -> bool;

    /// Register a style, replacing any style with the same id.
    fn add_poi_style(&mut self, style: &PoiStyle);

    fn label_layer_mut(&mut self, layer_id: &str) -> Option<&mut dyn LabelLayer>;
}

/// A rendering bucket of POI markers.
pub trait LabelLayer {
    fn layer_id(&self) -> &str;

    /// Remove every marker in the layer.
    fn clear_all_items(&mut self);

    /// Place a hidden marker at `at`. Returns `None` if the engine refuses it.
    fn add_poi(&mut self, options: &PoiOptions, at: Location) -> Option<PoiHandle>;

    /// Make a marker visible. Returns false for unknown handles.
    fn show_poi(&mut self, poi: PoiHandle) -> bool;
}
