//! Arena + free-list storage for hit-volumes.
//!
//! Handles are `(index, generation)` pairs; releasing a slot bumps its
//! generation so stale handles stop resolving. With pooling enabled a
//! released volume stays allocated on a free list keyed by its template and
//! is re-initialised on the next `acquire` of that template. With pooling
//! disabled the volume is dropped and only the slot index is recycled.

use std::collections::HashMap;
use std::fmt;

use crate::events::{EventQueue, SimEvent};
use crate::types::TemplateId;

use super::{HitContext, HitVolume, HitVolumeTemplate, TerminationReason, VolumeSpawn};

/// Stable reference to a volume in a [`HitVolumeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HitVolumeHandle {
    index: u32,
    generation: u32,
}

impl HitVolumeHandle {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for HitVolumeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hv{}v{}", self.index, self.generation)
    }
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    live: bool,
    volume: Option<HitVolume>,
}

#[derive(Clone, Debug, Default)]
pub struct HitVolumeArena {
    slots: Vec<Slot>,
    /// Released slots still holding a volume, by template.
    free: HashMap<TemplateId, Vec<u32>>,
    /// Released slots with no volume.
    vacant: Vec<u32>,
    pooling: bool,
    live: usize,
}

impl HitVolumeArena {
    pub fn new(pooling: bool) -> Self {
        Self {
            pooling,
            ..Self::default()
        }
    }

    pub fn pooling(&self) -> bool {
        self.pooling
    }

    /// Spawns a volume, reusing a pooled instance of the same template when
    /// one is available.
    pub fn acquire(
        &mut self,
        template: &HitVolumeTemplate,
        spawn: VolumeSpawn,
        events: &mut EventQueue,
    ) -> HitVolumeHandle {
        let owner = spawn.owner;
        let pooled = self
            .free
            .get_mut(&template.id)
            .and_then(|indices| indices.pop());

        let index = match pooled {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                match slot.volume.as_mut() {
                    Some(volume) => volume.init(template, spawn),
                    None => slot.volume = Some(HitVolume::new(template, spawn)),
                }
                index
            }
            None => {
                let volume = HitVolume::new(template, spawn);
                match self.vacant.pop() {
                    Some(index) => {
                        self.slots[index as usize].volume = Some(volume);
                        index
                    }
                    None => {
                        self.slots.push(Slot {
                            generation: 0,
                            live: false,
                            volume: Some(volume),
                        });
                        (self.slots.len() - 1) as u32
                    }
                }
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.live = true;
        self.live += 1;

        let handle = HitVolumeHandle {
            index,
            generation: slot.generation,
        };
        tracing::trace!(%handle, %owner, template = %template.id, reused = pooled.is_some(), "hit-volume acquired");
        events.push(SimEvent::HitVolumeSpawned {
            handle,
            owner,
            template: template.id,
            motion: template.motion,
        });
        handle
    }

    /// Returns a live volume to the pool. Stale handles are ignored.
    pub fn release(&mut self, handle: HitVolumeHandle, events: &mut EventQueue) -> bool {
        let pooling = self.pooling;
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            return false;
        };
        if !slot.live || slot.generation != handle.generation {
            return false;
        }

        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.live -= 1;

        let Some(volume) = slot.volume.as_mut() else {
            self.vacant.push(handle.index);
            return true;
        };
        let reason = volume.termination().unwrap_or(TerminationReason::Recalled);
        let owner = volume.owner();
        let template = volume.template();
        volume.mark_released();

        if pooling {
            self.free.entry(template).or_default().push(handle.index);
        } else {
            slot.volume = None;
            self.vacant.push(handle.index);
        }

        events.push(SimEvent::HitVolumeReleased {
            handle,
            owner,
            template,
            reason,
        });
        true
    }

    /// Steps every live volume, then releases the ones that terminated.
    pub fn tick(&mut self, dt: f32, ctx: &mut HitContext<'_>) {
        let mut finished = Vec::new();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            if !slot.live {
                continue;
            }
            let Some(volume) = slot.volume.as_mut() else {
                continue;
            };
            volume.update(dt, ctx);
            if !volume.phase().is_live() {
                finished.push(HitVolumeHandle {
                    index: index as u32,
                    generation: slot.generation,
                });
            }
        }

        for handle in finished {
            self.release(handle, ctx.events);
        }
    }

    pub fn get(&self, handle: HitVolumeHandle) -> Option<&HitVolume> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.live && slot.generation == handle.generation)
            .and_then(|slot| slot.volume.as_ref())
    }

    pub fn is_live(&self, handle: HitVolumeHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Released instances waiting for reuse.
    pub fn pooled_count(&self) -> usize {
        self.free.values().map(Vec::len).sum()
    }

    /// Total slots ever allocated.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn iter_live(&self) -> impl Iterator<Item = (HitVolumeHandle, &HitVolume)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let volume = slot.volume.as_ref().filter(|_| slot.live)?;
            Some((
                HitVolumeHandle {
                    index: index as u32,
                    generation: slot.generation,
                },
                volume,
            ))
        })
    }
}
