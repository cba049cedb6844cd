//! Shared collision resolution.
//!
//! Candidates are gathered from the tick's [`MotionStep`], ordered along the
//! path (entry fraction, angle, or distance), then walked in order:
//!
//! 1. obstacle: linear motion stops here; areas and cones pass through
//! 2. target: mask and layer must match, owner, history and defeated
//!    targets are skipped; the hit is applied through the sink and recorded
//! 3. a non-piercing volume stops after its first hit

use std::cmp::Ordering;

use crate::collision::geometry::{arc_overlap, circle_overlap, segment_circle_toi};
use crate::collision::Collider;
use crate::combat::strike;

use super::{HitContext, HitVolume, MotionStep, TerminationReason};

impl HitVolume {
    pub(super) fn resolve_hits(
        &mut self,
        step: MotionStep,
        ctx: &mut HitContext<'_>,
    ) -> Option<TerminationReason> {
        let candidates = self.candidates(step, ctx.colliders.colliders());

        for (order, collider) in candidates {
            if collider.is_obstacle(self.obstacle_mask) && self.motion.stops_at_obstacle() {
                if let MotionStep::Swept { from, to } = step {
                    self.position = from.lerp(to, order.clamp(0.0, 1.0));
                }
                return Some(TerminationReason::ObstacleTerminated);
            }

            if !collider.accepts(self.target_mask, self.target_layer)
                || ctx.sink.is_defeated(collider.owner)
                || !self.history.insert(collider.owner)
            {
                continue;
            }

            strike(
                &mut *ctx.sink,
                collider.owner,
                self.owner,
                self.damage,
                &self.on_hit,
                &mut *ctx.events,
            );

            if !self.piercing {
                return Some(TerminationReason::NonPiercingHit);
            }
        }
        None
    }

    fn candidates(&self, step: MotionStep, colliders: &[Collider]) -> Vec<(f32, Collider)> {
        let mut found: Vec<(f32, Collider)> = colliders
            .iter()
            .filter(|c| c.owner != self.owner)
            .filter(|c| {
                c.is_obstacle(self.obstacle_mask) || c.accepts(self.target_mask, self.target_layer)
            })
            .filter_map(|c| self.contact(step, c).map(|order| (order, *c)))
            .collect();

        found.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.owner.cmp(&b.1.owner))
        });
        found
    }

    fn contact(&self, step: MotionStep, collider: &Collider) -> Option<f32> {
        match step {
            MotionStep::Swept { from, to } => segment_circle_toi(
                from,
                to,
                collider.center,
                self.radius + collider.radius,
            ),
            MotionStep::Static => {
                circle_overlap(self.position, self.radius, collider.center, collider.radius)
            }
            MotionStep::Arc { from_angle, sweep } => arc_overlap(
                self.origin,
                self.reach,
                self.radius,
                from_angle,
                sweep,
                collider.center,
                collider.radius,
            ),
        }
    }
}
