//! Runtime orchestration for item activations.
//!
//! This crate wires loaded content, configured actors and the shared RNG into
//! services a simulation calls when an agent activates an item. Consumers
//! build an [`OracleManager`] from a data directory and drive everything
//! through [`ActivationService`].
//!
//! Modules are organized by responsibility:
//! - [`api`] exposes the error and result types clients bubble up
//! - [`oracle`] owns content snapshots, the actor catalog and the RNG
//! - [`services`] hosts activation dispatch and repair sessions
//! - [`scheduler`] resumes long first-aid treatments across ticks
//! - [`logging`] installs a `tracing` subscriber for binaries and tests
pub mod api;
pub mod logging;
pub mod oracle;
pub mod scheduler;
pub mod services;

pub use api::{Result, RuntimeError};
pub use oracle::OracleManager;
pub use scheduler::{HealCompletion, LongActionScheduler, PendingHeal, TickOutcome};
pub use services::{
    Activation, ActivationRequest, ActivationService, ItemRef, RepairReport, RepairSession,
    RepairStop,
};
