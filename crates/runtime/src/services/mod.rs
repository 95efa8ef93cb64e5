//! Services a simulation calls to activate items.
//!
//! - [`ActivationService`]: resolve → gate → dispatch → settle charges
//! - [`RepairSession`]: repeated repair attempts with one tool on one target
mod activation;
mod repair;

pub use activation::{Activation, ActivationRequest, ActivationService, ItemRef};
pub use repair::{RepairReport, RepairSession, RepairStop};

pub(crate) use activation::{inventory_source, restore_inventory_item, settle};
