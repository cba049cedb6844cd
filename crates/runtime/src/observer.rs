//! HUD-facing notifications.
//!
//! Observers see each caster's slot state and the events drained at the end
//! of every tick. They never feed back into the simulation.
use std::cell::RefCell;
use std::rc::Rc;

use skill_core::{EntityId, SimEvent, SlotView};

pub trait HudObserver {
    /// Slot cooldown/cast state of the observed caster after the tick.
    fn on_slots(&mut self, caster: EntityId, slots: &[SlotView]);

    /// Everything that happened during the tick, in order.
    fn on_events(&mut self, events: &[SimEvent]);
}

/// Logs events through `tracing`.
#[derive(Clone, Debug, Default)]
pub struct TracingHud;

impl HudObserver for TracingHud {
    fn on_slots(&mut self, caster: EntityId, slots: &[SlotView]) {
        for view in slots.iter().filter(|view| view.remaining > 0.0 || view.casting) {
            tracing::trace!(
                %caster,
                slot = view.slot,
                remaining = view.remaining,
                casting = view.casting,
                "slot"
            );
        }
    }

    fn on_events(&mut self, events: &[SimEvent]) {
        for event in events {
            match event {
                SimEvent::CastStarted { caster, skill, .. } => {
                    tracing::info!(%caster, %skill, "cast started");
                }
                SimEvent::CastResolved {
                    caster, skill, hits, ..
                } => {
                    tracing::info!(%caster, %skill, hits, "cast resolved");
                }
                SimEvent::DamageApplied {
                    target,
                    source,
                    amount,
                    remaining_hp,
                } => {
                    tracing::info!(%target, %source, amount, remaining_hp, "damage");
                }
                SimEvent::HitVolumeReleased { handle, reason, .. } => {
                    tracing::info!(%handle, %reason, "hit-volume released");
                }
                SimEvent::StatusHookTriggered { target, hook, .. } => {
                    tracing::info!(%target, effect = %hook.effect, duration = hook.duration, "status hook");
                }
                other => tracing::debug!(?other, "event"),
            }
        }
    }
}

/// Everything a [`RecordingHud`] saw.
#[derive(Clone, Debug, Default)]
pub struct HudLog {
    pub frames: Vec<Vec<SlotView>>,
    pub events: Vec<SimEvent>,
}

/// Records notifications into a shared [`HudLog`]; clone before handing it
/// to the simulation to keep read access.
#[derive(Clone, Debug, Default)]
pub struct RecordingHud {
    log: Rc<RefCell<HudLog>>,
}

impl RecordingHud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> HudLog {
        self.log.borrow().clone()
    }
}

impl HudObserver for RecordingHud {
    fn on_slots(&mut self, _caster: EntityId, slots: &[SlotView]) {
        self.log.borrow_mut().frames.push(slots.to_vec());
    }

    fn on_events(&mut self, events: &[SimEvent]) {
        self.log.borrow_mut().events.extend_from_slice(events);
    }
}
