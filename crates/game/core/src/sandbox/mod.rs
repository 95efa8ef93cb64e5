//! In-memory collaborators for driving actors without a simulation.
//!
//! [`SandboxCharacter`] and [`SandboxWorld`] implement the agent and world
//! traits over plain collections and record everything actors do to them.
//! Prompts are answered from scripted queues. [`ScriptedRng`] pins random
//! rolls to chosen values. [`fixtures::content`] provides a small, coherent
//! content set.
mod character;
pub mod fixtures;
mod rng;
mod world;

pub use character::SandboxCharacter;
pub use rng::ScriptedRng;
pub use world::{SandboxWorld, WorldEvent};
