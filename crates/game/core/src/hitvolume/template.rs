use crate::collision::CollisionMask;
use crate::types::TemplateId;

/// Motion variant a template spawns.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MotionKind {
    /// Straight line along the aim direction; stopped by obstacles.
    #[default]
    Linear,
    /// Stationary burst at the spawn point.
    Area,
    /// Blade rotating around the spawn point through the cone angle.
    Cone,
}

/// Rotation direction of a cone sweep in logical space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Spin {
    #[default]
    CounterClockwise,
    Clockwise,
}

impl Spin {
    pub const fn sign(self) -> f32 {
        match self {
            Self::CounterClockwise => 1.0,
            Self::Clockwise => -1.0,
        }
    }
}

/// Authoring data for a hit-volume.
///
/// `speed` is logical units per second for linear motion and degrees per
/// second for cones; area volumes ignore it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitVolumeTemplate {
    pub id: TemplateId,
    pub motion: MotionKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub speed: f32,
    pub max_duration: f32,
    /// Logical radius (linear/area) or blade half-thickness (cone).
    #[cfg_attr(feature = "serde", serde(default))]
    pub radius: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub piercing: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spin: Spin,
    #[cfg_attr(feature = "serde", serde(default = "default_obstacle_mask"))]
    pub obstacle_mask: CollisionMask,
}

#[cfg(feature = "serde")]
fn default_obstacle_mask() -> CollisionMask {
    CollisionMask::OBSTACLE
}

impl HitVolumeTemplate {
    pub fn new(id: TemplateId, motion: MotionKind, speed: f32, max_duration: f32) -> Self {
        Self {
            id,
            motion,
            speed,
            max_duration,
            radius: 0.0,
            piercing: false,
            spin: Spin::CounterClockwise,
            obstacle_mask: CollisionMask::OBSTACLE,
        }
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn piercing(mut self, piercing: bool) -> Self {
        self.piercing = piercing;
        self
    }

    #[must_use]
    pub fn with_spin(mut self, spin: Spin) -> Self {
        self.spin = spin;
        self
    }
}
