//! Per-variant movement.
//!
//! Each tick a [`Motion`] advances the volume and reports the region covered
//! during that tick as a [`MotionStep`]; collision resolution only ever looks
//! at the step, never at the variant.

use glam::Vec2;

use crate::perspective::{logical_angle, visual_step};

use super::template::{MotionKind, Spin};

/// Remaining sweep below which a cone counts as finished.
const SWEEP_EPSILON: f32 = 1e-5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Fixed visual unit direction.
    Linear { direction: Vec2 },
    Area,
    /// Angles in logical radians. `swept` only grows, up to `total_sweep`.
    Cone {
        start_angle: f32,
        swept: f32,
        total_sweep: f32,
        spin_sign: f32,
    },
}

/// Region covered by one tick of movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionStep {
    /// Visual-space segment travelled this tick.
    Swept { from: Vec2, to: Vec2 },
    /// Current shape, unmoved.
    Static,
    /// Blade rotation this tick; `sweep` is signed.
    Arc { from_angle: f32, sweep: f32 },
}

impl Motion {
    pub fn linear(aim: Vec2) -> Self {
        Self::Linear {
            direction: aim.normalize_or(Vec2::X),
        }
    }

    /// Sweep centred on the aim; `cone_angle` in degrees.
    pub fn cone(aim: Vec2, cone_angle: f32, spin: Spin) -> Self {
        let total_sweep = cone_angle.max(0.0).to_radians();
        let spin_sign = spin.sign();
        Self::Cone {
            start_angle: logical_angle(aim) - spin_sign * total_sweep * 0.5,
            swept: 0.0,
            total_sweep,
            spin_sign,
        }
    }

    pub fn kind(&self) -> MotionKind {
        match self {
            Self::Linear { .. } => MotionKind::Linear,
            Self::Area => MotionKind::Area,
            Self::Cone { .. } => MotionKind::Cone,
        }
    }

    /// Whether touching an obstacle ends the volume. Areas and cones pass
    /// through obstacles that only block visually.
    pub fn stops_at_obstacle(&self) -> bool {
        matches!(self, Self::Linear { .. })
    }

    /// Logical facing at spawn.
    pub fn initial_facing(&self) -> f32 {
        match *self {
            Self::Linear { direction } => logical_angle(direction),
            Self::Area => 0.0,
            Self::Cone { start_angle, .. } => start_angle,
        }
    }

    pub fn sweep_complete(&self) -> bool {
        match *self {
            Self::Cone {
                swept, total_sweep, ..
            } => swept >= total_sweep,
            _ => false,
        }
    }

    /// Total rotation applied so far (radians); zero for non-rotating motion.
    pub fn rotation_applied(&self) -> f32 {
        match *self {
            Self::Cone { swept, .. } => swept,
            _ => 0.0,
        }
    }

    /// Moves by one tick.
    ///
    /// `speed` is logical units/s (linear) or degrees/s (cone). When
    /// `expiring`, a cone snaps whatever sweep is left so the full angle is
    /// always covered by the time the volume ends.
    pub fn advance(
        &mut self,
        position: &mut Vec2,
        facing: &mut f32,
        speed: f32,
        dt: f32,
        expiring: bool,
    ) -> MotionStep {
        match self {
            Self::Linear { direction } => {
                let from = *position;
                *position += visual_step(*direction, speed.max(0.0) * dt);
                *facing = logical_angle(*direction);
                MotionStep::Swept {
                    from,
                    to: *position,
                }
            }
            Self::Area => MotionStep::Static,
            Self::Cone {
                start_angle,
                swept,
                total_sweep,
                spin_sign,
            } => {
                let remaining = (*total_sweep - *swept).max(0.0);
                let mut step = (speed.max(0.0).to_radians() * dt).min(remaining);
                if expiring {
                    step = remaining;
                }

                let from_angle = *start_angle + *spin_sign * *swept;
                if remaining - step <= SWEEP_EPSILON {
                    step = remaining;
                    *swept = *total_sweep;
                } else {
                    *swept += step;
                }
                *facing = *start_angle + *spin_sign * *swept;

                MotionStep::Arc {
                    from_angle,
                    sweep: *spin_sign * step,
                }
            }
        }
    }
}
