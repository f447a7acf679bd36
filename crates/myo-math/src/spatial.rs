//! Rigid 3D pose (rotation + translation) with composition and inversion.
//!
//! Convention: `SpatialTransform { rot, pos }` maps a point expressed in the
//! local frame into the parent frame: `p_parent = rot * p_local + pos`.
//! Composition reads right-to-left: `a.compose(&b)` applies `b` first.

use crate::{Mat3, Vec3, skew};
use nalgebra as na;

/// A rigid body pose: rotation and translation of a frame in its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialTransform {
    /// Orientation of the frame expressed in the parent frame.
    pub rot: Mat3,
    /// Origin of the frame expressed in the parent frame.
    pub pos: Vec3,
}

impl SpatialTransform {
    /// Create from rotation matrix and translation.
    pub fn new(rot: Mat3, pos: Vec3) -> Self {
        Self { rot, pos }
    }

    /// Identity pose.
    pub fn identity() -> Self {
        Self {
            rot: Mat3::identity(),
            pos: Vec3::zeros(),
        }
    }

    /// Pure rotation about the X axis.
    pub fn rot_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            rot: Mat3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c),
            pos: Vec3::zeros(),
        }
    }

    /// Pure rotation about the Y axis.
    pub fn rot_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            rot: Mat3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c),
            pos: Vec3::zeros(),
        }
    }

    /// Pure rotation about the Z axis.
    pub fn rot_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            rot: Mat3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0),
            pos: Vec3::zeros(),
        }
    }

    /// Pure translation.
    pub fn translation(pos: Vec3) -> Self {
        Self {
            rot: Mat3::identity(),
            pos,
        }
    }

    /// Rotation about an arbitrary unit axis (Rodrigues formula).
    pub fn rot_axis(axis: &Vec3, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let ax = skew(axis);
        Self {
            rot: Mat3::identity() + ax * s + ax * ax * (1.0 - c),
            pos: Vec3::zeros(),
        }
    }

    /// Rotation about an arbitrary axis given as a nalgebra unit vector.
    pub fn rot_unit_axis(axis: &na::Unit<Vec3>, angle: f64) -> Self {
        let rot = na::Rotation3::from_axis_angle(axis, angle);
        Self {
            rot: *rot.matrix(),
            pos: Vec3::zeros(),
        }
    }

    /// Map a point from this frame into the parent frame.
    #[inline]
    pub fn apply_point(&self, p: &Vec3) -> Vec3 {
        self.rot * p + self.pos
    }

    /// Map a free vector (direction) from this frame into the parent frame.
    #[inline]
    pub fn apply_vector(&self, v: &Vec3) -> Vec3 {
        self.rot * v
    }

    /// Compose two poses: `self.compose(&other)` is "other, then self".
    ///
    /// If `self` is world←A and `other` is A←B, the result is world←B.
    pub fn compose(&self, other: &SpatialTransform) -> SpatialTransform {
        SpatialTransform {
            rot: self.rot * other.rot,
            pos: self.rot * other.pos + self.pos,
        }
    }

    /// Inverse of this pose.
    pub fn inverse(&self) -> SpatialTransform {
        let rt = self.rot.transpose();
        SpatialTransform {
            rot: rt,
            pos: -(rt * self.pos),
        }
    }

    /// Get the translation vector.
    pub fn translation_vector(&self) -> Vec3 {
        self.pos
    }

    /// Get the rotation matrix.
    pub fn rotation_matrix(&self) -> Mat3 {
        self.rot
    }
}

impl Default for SpatialTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_maps_points_unchanged() {
        let xf = SpatialTransform::identity();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(xf.apply_point(&p), p, epsilon = 1e-12);
    }

    #[test]
    fn test_rot_z_quarter_turn() {
        let xf = SpatialTransform::rot_z(std::f64::consts::FRAC_PI_2);
        let p = xf.apply_point(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_compose_translations() {
        let a = SpatialTransform::translation(Vec3::new(1.0, 0.0, 0.0));
        let b = SpatialTransform::translation(Vec3::new(0.0, 2.0, 0.0));
        let c = a.compose(&b);
        assert_relative_eq!(c.pos, Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_compose_rotation_then_translation() {
        // world←A rotates +90° about Z; A←B translates along A's x axis.
        let a = SpatialTransform::rot_z(std::f64::consts::FRAC_PI_2);
        let b = SpatialTransform::translation(Vec3::new(1.0, 0.0, 0.0));
        let c = a.compose(&b);
        assert_relative_eq!(c.pos, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let xf = SpatialTransform::new(
            *na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), 0.5).matrix(),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let p = Vec3::new(-0.3, 0.7, 1.1);
        let back = xf.inverse().apply_point(&xf.apply_point(&p));
        assert_relative_eq!(back, p, epsilon = 1e-12);
    }

    #[test]
    fn test_rot_axis_matches_rot_z() {
        let a = SpatialTransform::rot_axis(&Vec3::new(0.0, 0.0, 1.0), 0.37);
        let b = SpatialTransform::rot_z(0.37);
        assert_relative_eq!(a.rot, b.rot, epsilon = 1e-12);
    }
}
