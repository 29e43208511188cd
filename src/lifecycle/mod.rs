//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Bind listener
//!     → Start watcher task → Begin serving
//!
//! Shutdown (shutdown.rs):
//!     SIGTERM/SIGINT (signals.rs) → broadcast trigger
//!     → server drains via graceful shutdown
//!     → background tasks exit on the same signal
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
