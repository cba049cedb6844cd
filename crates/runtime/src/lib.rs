//! Frame-synchronous driver for the skill simulation.
//!
//! This crate wires skill content, input sources and HUD observers around the
//! pure `skill-core` simulation. Hosts construct a [`Simulation`], register
//! actors and casters, and call [`Simulation::tick`] once per frame.
//!
//! Modules are organized by responsibility:
//! - [`simulation`] owns world state and the per-tick order of operations
//! - [`input`] abstracts where player intent comes from
//! - [`observer`] receives slot state and events after every tick
//! - [`config`] reads harness settings from the environment
pub mod config;
pub mod error;
pub mod input;
pub mod observer;
pub mod simulation;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use input::{InputSource, ScriptedAction, ScriptedInput};
pub use observer::{HudLog, HudObserver, RecordingHud, TracingHud};
pub use simulation::{ActorSpec, Simulation};
