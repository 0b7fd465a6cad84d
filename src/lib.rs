//! # poi-map
//!
//! Map surface with an engine lifecycle state machine and a POI marker
//! pipeline.
//!
//! Lifecycle and data-mode state is observable through [`Watch`] channels.
//!
//! ## Architecture
//!
//! A [`MapSurface`] owns the engine (through [`MapController`]), a
//! [`Presenter`] and a [`PoiRenderer`]. Engine callbacks and host hooks are
//! serialized through one [`EventLoop`] queue:
//! ```text
//! authenticate → start engine → add views → appear → markers
//!       ↑ (retry after 5s on failure)          camera stopped → markers
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Location, Viewport, AuthState, EngineRunState, DataMode)
//! - [`engine`] - Engine capability traits and the in-memory headless engine
//! - [`state`] - Lifecycle state machine, retry timer, host flags, watches
//! - [`pipeline`] - Controller, presenter, POI renderer, surface, event loop
//! - [`renderer`] - Terminal marker canvas
//! - [`host`] - Terminal input as host commands

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::MapConfig;
pub use error::{ConfigError, EngineError, LifecycleError, MapError, Result};
pub use events::{EngineEvent, EventSender, HostEvent, MapEvent};

pub use engine::headless::{AuthOutcome, HeadlessEngine};
pub use engine::{LabelLayer, LabelManager, MapEngine, MapView};

pub use state::{HostFlags, Lifecycle, LifecycleCommand, RetryTimer, Watch};

pub use pipeline::{
    DataProvider, EventLoop, MapController, MapSurface, PoiRenderer, Presentable, Presenter,
    RenderOutcome, StubDataProvider,
};

pub use renderer::{MapRenderer, MarkerCanvas};

pub use host::HostCommand;
