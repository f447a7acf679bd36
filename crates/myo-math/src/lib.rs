//! Math primitives for the myo musculoskeletal library.
//!
//! Provides nalgebra type aliases and the rigid 3D pose type used to place
//! attached entities (markers, IMU frames, muscle points) in the world.

pub mod spatial;

pub use spatial::SpatialTransform;

use nalgebra as na;

/// 3D vector alias.
pub type Vec3 = na::Vector3<f64>;
/// 3x3 matrix alias.
pub type Mat3 = na::Matrix3<f64>;
/// Dynamic vector (generalized coordinates, forces, torques).
pub type DVec = na::DVector<f64>;
/// Dynamic matrix (Jacobians).
pub type DMat = na::DMatrix<f64>;

/// Cross-product matrix: [v]× such that [v]× w = v × w.
#[inline]
pub fn skew(v: &Vec3) -> Mat3 {
    Mat3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}
