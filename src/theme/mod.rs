//! Theme resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Initialization:
//!     storage → cookie mirror → default (system)
//!     → ThemePreference
//!
//! Per change:
//!     set_preference / cycle / OS scheme event
//!     → resolve(preference, os scheme)   (pure)
//!     → persist (best effort)
//!     → notify subscribers synchronously
//!
//! At the edge, per request:
//!     hints.rs reads the theme cookie + Sec-CH-Prefers-Color-Scheme
//!     → resolve(...)
//!     → x-theme request header for the renderer
//! ```
//!
//! # Design Decisions
//! - The resolved theme is a pure function of (preference, OS scheme);
//!   nothing else feeds it
//! - Persistence failures degrade to in-memory operation, never an error
//! - The store is an explicit owner with synchronous publish/subscribe,
//!   not a global singleton; its lifetime is the hosting session's

pub mod hints;
pub mod persistence;
pub mod preference;
pub mod store;

pub use preference::{resolve, ColorScheme, ResolvedTheme, ThemePreference};
pub use store::ThemeStore;
