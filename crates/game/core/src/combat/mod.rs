//! Damage resolution.
//!
//! Hit-volumes and instant queries never touch vitals directly; they hand raw
//! damage to a [`DamageSink`], which mitigates it, mutates the target and
//! queues the notifications.
//!
//! # Core Pieces
//!
//! - `mitigate`: `raw · K / (K + Defense)`
//! - `EffectApplier`: one combatant's vitals and defense
//! - `Combatants`: registry implementing `DamageSink`
//! - `strike`: damage plus status hooks for one landed hit

pub mod applier;
pub mod damage;

pub use applier::{Combatants, DamageSink, EffectApplier, strike};
pub use damage::mitigate;
