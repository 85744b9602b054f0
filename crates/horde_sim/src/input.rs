//! Per-tick input from the host

use horde_core::math::{Vec2, Vec3};

/// Everything the input collaborator hands the simulation for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Desired player heading on the xy plane. Zero stops the player;
    /// longer vectors are normalized.
    pub move_axis: Vec2,
    /// Fire one bullet in this direction.
    pub fire: Option<Vec3>,
    /// World-space tap points, already projected by the host.
    pub taps: Vec<Vec3>,
}

impl TickInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(axis: Vec2) -> Self {
        Self {
            move_axis: axis,
            ..Self::default()
        }
    }

    pub fn firing(direction: Vec3) -> Self {
        Self {
            fire: Some(direction),
            ..Self::default()
        }
    }

    /// Player facing derived from the move axis.
    pub fn heading(&self) -> Vec3 {
        self.move_axis.extend(0.0).normalize_or_zero()
    }
}
