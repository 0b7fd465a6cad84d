//! State Module - Lifecycle state the surface tracks
//!
//! - **Lifecycle** - Pure auth × run state machine
//! - **Retry** - Cancellable authentication retry timer
//! - **Host** - Visibility/observer flags of the hosting view
//! - **Watch** - Observable values published to subscribers

mod host;
mod lifecycle;
mod retry;
mod watch;

pub use host::*;
pub use lifecycle::*;
pub use retry::*;
pub use watch::*;
