//! Public runtime API surface.
//!
//! Gathers the types exposed to consumers so the service modules can stay
//! focused on orchestration.

pub mod errors;

pub use errors::{Result, RuntimeError};
