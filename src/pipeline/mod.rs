//! Map Pipeline
//!
//! Connects engine callbacks and host hooks to marker output.
//!
//! # Pipeline Architecture
//!
//! ```text
//! MapEvent → EventLoop → MapSurface ─┬→ MapController (lifecycle, retry)
//!                                    └→ Presenter → DataProvider
//!                                          └→ PoiRenderer → LabelLayer
//! ```
//!
//! ## Key Design Principles
//!
//! - **One queue**: every callback is handled on the event loop thread, in order
//! - **Full replace**: each refresh clears the layer before adding markers
//! - **No back-references**: the presenter receives its render target per call

pub mod controller;
pub mod event_loop;
pub mod poi;
pub mod presenter;
pub mod provider;
pub mod surface;

// Re-exports
pub use controller::{viewport_of, MapController};
pub use event_loop::EventLoop;
pub use poi::{Marker, PoiRenderer, RenderOutcome};
pub use presenter::{Presentable, Presenter};
pub use provider::{DataProvider, StubDataProvider, STUB_DATA_A, STUB_DATA_B};
pub use surface::MapSurface;
