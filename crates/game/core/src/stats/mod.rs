//! Stat system for casters and targets.
//!
//! # Architecture
//!
//! ```text
//! [ StatVector (raw points) ]
//!      ↓  + BASE_STAT
//! [ Totals ] ──→ formula resolution, requirement checks, mitigation
//!
//! [ Vitals (HP / MP meters) ] ──→ resource gate, damage sink
//! ```
//!
//! ## Principles
//!
//! 1. **SSOT**: Raw stat points are the only stored values; totals are derived
//! 2. **Explicit mutation**: Stats change only through [`StatSheet::allocate`]
//! 3. **Clamp on write**: Resource meters never leave `[0, max]`

pub mod resources;
pub mod vector;

pub use resources::{ResourceMeter, Vitals};
pub use vector::{AllocationError, BASE_STAT, StatKind, StatSheet, StatVector};
