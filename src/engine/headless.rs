//! Headless Engine - In-memory map engine
//!
//! Implements every engine capability without a GPU or network:
//!
//! - Authentication resolves from a script of outcomes (success by default)
//! - `start_engine` posts `AddViews` once per engine lifetime
//! - `stop_engine` destroys all views, posting `ViewWillBeDestroyed` for each
//! - Views use a linear screen-to-geo projection around their camera center
//! - Label layers keep their markers in insertion order
//!
//! Used by the test suite and the terminal demo. Host-side drivers
//! (`pan`, `zoom_by`, `resize_container`) simulate user input and post the
//! same events a native engine would.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, trace};

use super::{
    HandlerId, LabelLayer, LabelLayerOptions, LabelManager, MapEngine, MapView, MapviewInfo,
    PoiHandle, PoiOptions, PoiStyle,
};
use crate::error::EngineError;
use crate::events::{EngineEvent, EventSender};
use crate::types::{GuiAlignment, Location, Point, Rect, Size};

pub const MIN_ZOOM_LEVEL: i32 = 1;
pub const MAX_ZOOM_LEVEL: i32 = 21;

/// World width in pixels at zoom level 0.
const TILE_SIZE: f64 = 256.0;

/// Degrees of longitude/latitude covered by one pixel at `zoom_level`.
pub fn degrees_per_pixel(zoom_level: i32) -> f64 {
    360.0 / (TILE_SIZE * 2f64.powi(zoom_level))
}

// =============================================================================
// CALL LOG
// =============================================================================

/// Engine entry points, recorded in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Init,
    Authenticate,
    StartEngine,
    StopEngine,
    StartRendering,
    StopRendering,
    AddView(String),
}

/// Scripted result of one `authenticate()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Succeed,
    Fail { code: i32, message: String },
}

// =============================================================================
// ENGINE
// =============================================================================

pub struct HeadlessEngine {
    events: Option<EventSender>,
    auth_script: VecDeque<AuthOutcome>,
    started: bool,
    rendering: bool,
    container_size: Size,
    views: HashMap<String, HeadlessView>,
    calls: Vec<EngineCall>,
}

impl HeadlessEngine {
    pub fn new(container_size: Size) -> Self {
        Self {
            events: None,
            auth_script: VecDeque::new(),
            started: false,
            rendering: false,
            container_size,
            views: HashMap::new(),
            calls: Vec::new(),
        }
    }

    /// Queue the outcome of a future `authenticate()` call.
    /// Calls beyond the script succeed.
    pub fn queue_auth_outcome(&mut self, outcome: AuthOutcome) {
        self.auth_script.push_back(outcome);
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn call_count(&self, call: &EngineCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn container_size(&self) -> Size {
        self.container_size
    }

    pub fn headless_view(&self, name: &str) -> Option<&HeadlessView> {
        self.views.get(name)
    }

    /// Simulate the host container changing size.
    pub fn resize_container(&mut self, size: Size) {
        self.container_size = size;
        self.post(EngineEvent::ContainerResized(size));
    }

    /// Simulate a user drag of `dx`/`dy` pixels on `view`.
    /// Returns false if the view does not exist.
    pub fn pan(&mut self, view: &str, dx: f64, dy: f64) -> bool {
        let Some(target) = self.views.get_mut(view) else {
            return false;
        };
        let dpp = degrees_per_pixel(target.zoom_level);
        target.center.longitude -= dx * dpp;
        target.center.latitude += dy * dpp;
        self.camera_stopped(view);
        true
    }

    /// Simulate a pinch zoom on `view`, clamped to the supported levels.
    pub fn zoom_by(&mut self, view: &str, delta: i32) -> bool {
        let Some(target) = self.views.get_mut(view) else {
            return false;
        };
        target.zoom_level = (target.zoom_level + delta).clamp(MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL);
        self.camera_stopped(view);
        true
    }

    fn camera_stopped(&mut self, view: &str) {
        let has_handler = self
            .views
            .get(view)
            .is_some_and(|v| !v.camera_handlers.is_empty());
        // Camera events only fire while frames are being drawn
        if self.rendering && has_handler {
            self.post(EngineEvent::CameraStopped { view: view.to_string() });
        }
    }

    fn post(&self, event: EngineEvent) {
        match &self.events {
            Some(events) => {
                trace!(?event, "headless engine posting event");
                if !events.send(event) {
                    debug!("headless engine event queue closed");
                }
            }
            None => debug!(?event, "headless engine not initialized; event dropped"),
        }
    }
}

impl MapEngine for HeadlessEngine {
    fn init_engine(&mut self, events: EventSender) -> Result<(), EngineError> {
        self.calls.push(EngineCall::Init);
        if self.events.is_some() {
            return Err(EngineError::AlreadyInitialized);
        }
        self.events = Some(events);
        Ok(())
    }

    fn authenticate(&mut self) {
        self.calls.push(EngineCall::Authenticate);
        let event = match self.auth_script.pop_front().unwrap_or(AuthOutcome::Succeed) {
            AuthOutcome::Succeed => EngineEvent::AuthenticationSucceeded,
            AuthOutcome::Fail { code, message } => EngineEvent::AuthenticationFailed { code, message },
        };
        self.post(event);
    }

    fn start_engine(&mut self) {
        self.calls.push(EngineCall::StartEngine);
        if self.started {
            return;
        }
        self.started = true;
        self.post(EngineEvent::AddViews);
    }

    fn stop_engine(&mut self) {
        self.calls.push(EngineCall::StopEngine);
        self.rendering = false;
        self.started = false;

        let mut names: Vec<String> = self.views.keys().cloned().collect();
        names.sort();
        for name in names {
            self.post(EngineEvent::ViewWillBeDestroyed { view: name });
        }
        self.views.clear();
    }

    fn start_rendering(&mut self) {
        self.calls.push(EngineCall::StartRendering);
        if self.started {
            self.rendering = true;
        }
    }

    fn stop_rendering(&mut self) {
        self.calls.push(EngineCall::StopRendering);
        self.rendering = false;
    }

    fn is_engine_started(&self) -> bool {
        self.started
    }

    fn is_rendering(&self) -> bool {
        self.rendering
    }

    fn add_view(&mut self, info: &MapviewInfo) -> Result<(), EngineError> {
        self.calls.push(EngineCall::AddView(info.view_name.clone()));
        if !self.started {
            return Err(EngineError::NotInitialized);
        }
        if self.views.contains_key(&info.view_name) {
            return Err(EngineError::ViewAlreadyExists(info.view_name.clone()));
        }
        let view = HeadlessView::new(info, Rect::from_size(self.container_size));
        self.views.insert(info.view_name.clone(), view);
        Ok(())
    }

    fn view(&self, name: &str) -> Option<&dyn MapView> {
        self.views.get(name).map(|v| v as &dyn MapView)
    }

    fn view_mut(&mut self, name: &str) -> Option<&mut dyn MapView> {
        self.views.get_mut(name).map(|v| v as &mut dyn MapView)
    }
}

// =============================================================================
// VIEW
// =============================================================================

pub struct HeadlessView {
    name: String,
    rect: Rect,
    center: Location,
    zoom_level: i32,
    logo: Option<(GuiAlignment, Point)>,
    camera_handlers: Vec<HandlerId>,
    next_handler: u64,
    labels: HeadlessLabelManager,
}

impl HeadlessView {
    fn new(info: &MapviewInfo, rect: Rect) -> Self {
        Self {
            name: info.view_name.clone(),
            rect,
            center: info.default_position,
            zoom_level: info.default_level,
            logo: None,
            camera_handlers: Vec::new(),
            next_handler: 0,
            labels: HeadlessLabelManager::default(),
        }
    }

    pub fn center(&self) -> Location {
        self.center
    }

    pub fn logo(&self) -> Option<(GuiAlignment, Point)> {
        self.logo
    }

    pub fn camera_handler_count(&self) -> usize {
        self.camera_handlers.len()
    }

    pub fn labels(&self) -> &HeadlessLabelManager {
        &self.labels
    }
}

impl MapView for HeadlessView {
    fn name(&self) -> &str {
        &self.name
    }

    fn view_rect(&self) -> Rect {
        self.rect
    }

    fn set_view_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    fn zoom_level(&self) -> i32 {
        self.zoom_level
    }

    fn position_at(&self, point: Point) -> Location {
        let dpp = degrees_per_pixel(self.zoom_level);
        let mid = self.rect.center();
        Location::new(
            self.center.longitude + (point.x - mid.x) * dpp,
            self.center.latitude - (point.y - mid.y) * dpp,
        )
    }

    fn set_logo_position(&mut self, alignment: GuiAlignment, offset: Point) {
        self.logo = Some((alignment, offset));
    }

    fn add_camera_stopped_handler(&mut self) -> HandlerId {
        let id = HandlerId(self.next_handler);
        self.next_handler += 1;
        self.camera_handlers.push(id);
        id
    }

    fn remove_camera_stopped_handler(&mut self, id: HandlerId) {
        self.camera_handlers.retain(|h| *h != id);
    }

    fn label_manager(&mut self) -> &mut dyn LabelManager {
        &mut self.labels
    }
}

// =============================================================================
// LABELS
// =============================================================================

#[derive(Default)]
pub struct HeadlessLabelManager {
    layers: Vec<HeadlessLayer>,
    styles: HashMap<String, PoiStyle>,
}

impl HeadlessLabelManager {
    pub fn layer(&self, layer_id: &str) -> Option<&HeadlessLayer> {
        self.layers.iter().find(|l| l.options.layer_id == layer_id)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn style(&self, style_id: &str) -> Option<&PoiStyle> {
        self.styles.get(style_id)
    }
}

impl LabelManager for HeadlessLabelManager {
    fn add_label_layer(&mut self, options: &LabelLayerOptions) -> bool {
        if self.layer(&options.layer_id).is_some() {
            return false;
        }
        self.layers.push(HeadlessLayer {
            options: options.clone(),
            pois: Vec::new(),
            next_poi: 0,
        });
        true
    }

    fn add_poi_style(&mut self, style: &PoiStyle) {
        self.styles.insert(style.style_id.clone(), style.clone());
    }

    fn label_layer_mut(&mut self, layer_id: &str) -> Option<&mut dyn LabelLayer> {
        self.layers
            .iter_mut()
            .find(|l| l.options.layer_id == layer_id)
            .map(|l| l as &mut dyn LabelLayer)
    }
}

/// A marker placed in a headless layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessPoi {
    pub handle: PoiHandle,
    pub position: Location,
    pub options: PoiOptions,
    pub visible: bool,
}

pub struct HeadlessLayer {
    options: LabelLayerOptions,
    pois: Vec<HeadlessPoi>,
    next_poi: u64,
}

impl HeadlessLayer {
    pub fn options(&self) -> &LabelLayerOptions {
        &self.options
    }

    pub fn pois(&self) -> &[HeadlessPoi] {
        &self.pois
    }

    /// Positions of the markers currently shown.
    pub fn visible_positions(&self) -> Vec<Location> {
        self.pois.iter().filter(|p| p.visible).map(|p| p.position).collect()
    }
}

impl LabelLayer for HeadlessLayer {
    fn layer_id(&self) -> &str {
        &self.options.layer_id
    }

    fn clear_all_items(&mut self) {
        self.pois.clear();
    }

    fn add_poi(&mut self, options: &PoiOptions, at: Location) -> Option<PoiHandle> {
        let handle = PoiHandle(self.next_poi);
        self.next_poi += 1;
        self.pois.push(HeadlessPoi {
            handle,
            position: at,
            options: options.clone(),
            visible: false,
        });
        Some(handle)
    }

    fn show_poi(&mut self, poi: PoiHandle) -> bool {
        match self.pois.iter_mut().find(|p| p.handle == poi) {
            Some(p) => {
                p.visible = true;
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{self, MapEvent};
    use std::sync::mpsc::Receiver;

    fn info() -> MapviewInfo {
        MapviewInfo {
            view_name: "mapview".into(),
            view_info_name: "map".into(),
            default_position: Location::new(127.108678, 37.402001),
            default_level: 14,
        }
    }

    fn setup() -> (HeadlessEngine, Receiver<MapEvent>) {
        let (sender, rx) = events::channel();
        let mut engine = HeadlessEngine::new(Size::new(400.0, 800.0));
        engine.init_engine(sender).unwrap();
        (engine, rx)
    }

    fn drain(rx: &Receiver<MapEvent>) -> Vec<MapEvent> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_init_twice_fails() {
        let (mut engine, _rx) = setup();
        let (sender, _rx2) = events::channel();
        assert_eq!(engine.init_engine(sender), Err(EngineError::AlreadyInitialized));
    }

    #[test]
    fn test_authenticate_follows_script() {
        let (mut engine, rx) = setup();
        engine.queue_auth_outcome(AuthOutcome::Fail { code: 401, message: "denied".into() });

        engine.authenticate();
        engine.authenticate();

        assert_eq!(
            drain(&rx),
            vec![
                MapEvent::Engine(EngineEvent::AuthenticationFailed { code: 401, message: "denied".into() }),
                MapEvent::Engine(EngineEvent::AuthenticationSucceeded),
            ]
        );
    }

    #[test]
    fn test_add_views_once_per_lifetime() {
        let (mut engine, rx) = setup();
        engine.start_engine();
        engine.start_engine();
        assert_eq!(drain(&rx), vec![MapEvent::Engine(EngineEvent::AddViews)]);

        engine.add_view(&info()).unwrap();
        engine.stop_engine();
        assert_eq!(
            drain(&rx),
            vec![MapEvent::Engine(EngineEvent::ViewWillBeDestroyed { view: "mapview".into() })]
        );
        assert!(engine.view("mapview").is_none());

        engine.start_engine();
        assert_eq!(drain(&rx), vec![MapEvent::Engine(EngineEvent::AddViews)]);
    }

    #[test]
    fn test_add_view_duplicate() {
        let (mut engine, _rx) = setup();
        engine.start_engine();
        engine.add_view(&info()).unwrap();
        assert_eq!(
            engine.add_view(&info()),
            Err(EngineError::ViewAlreadyExists("mapview".into()))
        );
    }

    #[test]
    fn test_rendering_requires_started() {
        let (mut engine, _rx) = setup();
        engine.start_rendering();
        assert!(!engine.is_rendering());

        engine.start_engine();
        engine.start_rendering();
        assert!(engine.is_rendering());

        engine.stop_rendering();
        assert!(!engine.is_rendering());
        assert!(engine.is_engine_started());
    }

    #[test]
    fn test_position_at_projection() {
        let (mut engine, _rx) = setup();
        engine.start_engine();
        engine.add_view(&info()).unwrap();

        let view = engine.view("mapview").unwrap();
        let center = view.position_at(Point::new(200.0, 400.0));
        assert_eq!(center, Location::new(127.108678, 37.402001));

        let top_left = view.position_at(Point::new(0.0, 0.0));
        assert!(top_left.longitude < center.longitude);
        assert!(top_left.latitude > center.latitude);
    }

    #[test]
    fn test_camera_events_need_handler_and_rendering() {
        let (mut engine, rx) = setup();
        engine.start_engine();
        engine.add_view(&info()).unwrap();
        drain(&rx);

        assert!(engine.pan("mapview", 10.0, 0.0));
        assert!(drain(&rx).is_empty());

        let id = engine.view_mut("mapview").unwrap().add_camera_stopped_handler();
        assert!(engine.pan("mapview", 10.0, 0.0));
        assert!(drain(&rx).is_empty(), "not rendering yet");

        engine.start_rendering();
        assert!(engine.zoom_by("mapview", 1));
        assert_eq!(
            drain(&rx),
            vec![MapEvent::Engine(EngineEvent::CameraStopped { view: "mapview".into() })]
        );

        engine.view_mut("mapview").unwrap().remove_camera_stopped_handler(id);
        assert!(engine.pan("mapview", 0.0, 5.0));
        assert!(drain(&rx).is_empty());

        assert!(!engine.pan("missing", 1.0, 1.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let (mut engine, _rx) = setup();
        engine.start_engine();
        engine.add_view(&info()).unwrap();

        engine.zoom_by("mapview", 100);
        assert_eq!(engine.view("mapview").unwrap().zoom_level(), MAX_ZOOM_LEVEL);
        engine.zoom_by("mapview", -100);
        assert_eq!(engine.view("mapview").unwrap().zoom_level(), MIN_ZOOM_LEVEL);
    }

    #[test]
    fn test_label_layer_is_idempotent() {
        let mut labels = HeadlessLabelManager::default();
        assert!(labels.add_label_layer(&LabelLayerOptions::new("PoiLayer")));
        assert!(!labels.add_label_layer(&LabelLayerOptions::new("PoiLayer")));
        assert_eq!(labels.layer_count(), 1);
    }

    #[test]
    fn test_layer_markers() {
        let mut labels = HeadlessLabelManager::default();
        labels.add_label_layer(&LabelLayerOptions::new("PoiLayer"));

        let layer = labels.label_layer_mut("PoiLayer").unwrap();
        let shown = layer.add_poi(&PoiOptions::new("PerLevelStyle"), Location::new(1.0, 2.0)).unwrap();
        let _hidden = layer.add_poi(&PoiOptions::new("PerLevelStyle"), Location::new(3.0, 4.0)).unwrap();
        assert!(layer.show_poi(shown));
        assert!(!layer.show_poi(PoiHandle(99)));

        let layer = labels.layer("PoiLayer").unwrap();
        assert_eq!(layer.pois().len(), 2);
        assert_eq!(layer.visible_positions(), vec![Location::new(1.0, 2.0)]);

        labels.label_layer_mut("PoiLayer").unwrap().clear_all_items();
        assert!(labels.layer("PoiLayer").unwrap().pois().is_empty());
    }

    #[test]
    fn test_resize_posts_event() {
        let (mut engine, rx) = setup();
        engine.resize_container(Size::new(640.0, 480.0));
        assert_eq!(engine.container_size(), Size::new(640.0, 480.0));
        assert_eq!(
            drain(&rx),
            vec![MapEvent::Engine(EngineEvent::ContainerResized(Size::new(640.0, 480.0)))]
        );
    }
}
