//! Core value types for the map surface.
//!
//! Geographic values (`Location`, `Viewport`), screen geometry (`Point`,
//! `Size`, `Rect`), and the small enums the lifecycle and presenter share
//! (`AuthState`, `EngineRunState`, `DataMode`).

use std::fmt;

// =============================================================================
// GEOGRAPHIC VALUES
// =============================================================================

/// A WGS84 coordinate. Equality is by coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
}

impl Location {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.longitude, self.latitude)
    }
}

/// The geographic rectangle currently on screen, plus zoom level.
///
/// Produced on every camera change; never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top_left: Location,
    pub bottom_right: Location,
    pub zoom_level: i32,
}

impl Viewport {
    pub fn new(top_left: Location, bottom_right: Location, zoom_level: i32) -> Self {
        Self { top_left, bottom_right, zoom_level }
    }
}

// =============================================================================
// SCREEN GEOMETRY
// =============================================================================

/// A point in surface coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A drawing rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Rectangle at `(0, 0)` covering `size`.
    pub const fn from_size(size: Size) -> Self {
        Self { origin: Point::new(0.0, 0.0), size }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }
}

/// Vertical alignment of an overlay inside the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    Middle,
    #[default]
    Bottom,
}

/// Horizontal alignment of an overlay inside the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Anchor for GUI overlays such as the engine logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuiAlignment {
    pub v_align: VAlign,
    pub h_align: HAlign,
}

impl GuiAlignment {
    pub const fn new(v_align: VAlign, h_align: HAlign) -> Self {
        Self { v_align, h_align }
    }
}

// =============================================================================
// LIFECYCLE STATES
// =============================================================================

/// Authentication state of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
    Failed { code: i32, message: String },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }

    /// Whether `authenticate()` may move this state to `Authenticating`.
    pub fn can_authenticate(&self) -> bool {
        matches!(self, AuthState::Unauthenticated | AuthState::Failed { .. })
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthState::Unauthenticated => write!(f, "unauthenticated"),
            AuthState::Authenticating => write!(f, "authenticating"),
            AuthState::Authenticated => write!(f, "authenticated"),
            AuthState::Failed { code, message } => write!(f, "failed({code}: {message})"),
        }
    }
}

/// Run state of the rendering engine.
///
/// Ordered: `Stopped < Started < Rendering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum EngineRunState {
    #[default]
    Stopped,
    Started,
    Rendering,
}

impl fmt::Display for EngineRunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineRunState::Stopped => "stopped",
            EngineRunState::Started => "started",
            EngineRunState::Rendering => "rendering",
        };
        f.write_str(name)
    }
}

/// Selector between the two stub datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    #[default]
    ModeA,
    ModeB,
}

impl DataMode {
    /// The other mode.
    pub fn toggle(self) -> Self {
        match self {
            DataMode::ModeA => DataMode::ModeB,
            DataMode::ModeB => DataMode::ModeA,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_equality_by_value() {
        assert_eq!(Location::new(127.0973, 37.39), Location::new(127.0973, 37.39));
        assert_ne!(Location::new(127.0973, 37.39), Location::new(127.0973, 37.391));
    }

    #[test]
    fn test_data_mode_toggle() {
        assert_eq!(DataMode::default(), DataMode::ModeA);
        assert_eq!(DataMode::ModeA.toggle(), DataMode::ModeB);
        assert_eq!(DataMode::ModeA.toggle().toggle(), DataMode::ModeA);
    }

    #[test]
    fn test_rect_from_size() {
        let rect = Rect::from_size(Size::new(400.0, 800.0));
        assert_eq!(rect.origin, Point::new(0.0, 0.0));
        assert_eq!(rect.center(), Point::new(200.0, 400.0));
    }

    #[test]
    fn test_auth_state_guards() {
        assert!(AuthState::Unauthenticated.can_authenticate());
        assert!(AuthState::Failed { code: 401, message: "denied".into() }.can_authenticate());
        assert!(!AuthState::Authenticating.can_authenticate());
        assert!(!AuthState::Authenticated.can_authenticate());
        assert!(AuthState::Authenticated.is_authenticated());
    }

    #[test]
    fn test_run_state_ordering() {
        assert!(EngineRunState::Stopped < EngineRunState::Started);
        assert!(EngineRunState::Started < EngineRunState::Rendering);
    }
}
