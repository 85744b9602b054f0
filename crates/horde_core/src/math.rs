//! Math utilities
//!
//! Re-exports glam with the axis-aligned box used for containment and overlap.

pub use glam::*;

/// Axis-aligned bounding box stored as center + half extents.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub extents: Vec3,
}

impl Aabb {
    pub const fn new(center: Vec3, extents: Vec3) -> Self {
        Self { center, extents }
    }

    /// Box for a uniformly scaled unit cube: half extents are `scale * 0.5` on every axis.
    pub fn from_position_scale(position: Vec3, scale: f32) -> Self {
        Self {
            center: position,
            extents: Vec3::splat(scale * 0.5),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.extents
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.extents
    }

    /// Inclusive on every face.
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        let min = self.min();
        let max = self.max();
        point.cmpge(min).all() && point.cmple(max).all()
    }

    /// Touching boxes count as overlapping.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        (self.center - other.center)
            .abs()
            .cmple(self.extents + other.extents)
            .all()
    }
}

/// Unit direction from `from` to `to` in the xy plane, zero when the points coincide.
pub fn planar_direction(from: Vec3, to: Vec3) -> Vec3 {
    let delta = Vec3::new(to.x - from.x, to.y - from.y, 0.0);
    delta.normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn containment_is_inclusive_at_the_faces() {
        let aabb = Aabb::from_position_scale(Vec3::ZERO, 1.0);
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(aabb.contains_point(Vec3::new(-0.5, 0.0, 0.0)));
        assert!(!aabb.contains_point(Vec3::new(0.5 + 1e-4, 0.0, 0.0)));
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = Aabb::from_position_scale(Vec3::ZERO, 1.0);
        let b = Aabb::from_position_scale(Vec3::new(1.0, 0.0, 0.0), 1.0);
        let c = Aabb::from_position_scale(Vec3::new(1.01, 0.0, 0.0), 1.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn planar_direction_ignores_depth() {
        let dir = planar_direction(Vec3::new(0.0, 0.0, 5.0), Vec3::new(3.0, 4.0, -2.0));
        assert_relative_eq!(dir.x, 0.6, epsilon = 1e-6);
        assert_relative_eq!(dir.y, 0.8, epsilon = 1e-6);
        assert_eq!(dir.z, 0.0);
        assert_eq!(planar_direction(Vec3::ONE, Vec3::ONE), Vec3::ZERO);
    }
}
