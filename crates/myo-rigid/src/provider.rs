//! The delegated rigid-body engine surface.

use crate::Result;
use myo_math::{DMat, DVec, SpatialTransform, Vec3};

/// Kinematic services the attached-entity subsystems consume.
///
/// The provider owns one mutable kinematic cache per model:
/// [`update_kinematics`](KinematicsProvider::update_kinematics) refreshes it
/// for a given Q, and every subsequent read
/// ([`global_transform`](KinematicsProvider::global_transform), the Jacobian
/// routines with `update_kin = false`) is served from that cache. Callers
/// doing a batch of reads against the same Q are expected to push kinematics
/// exactly once — the update-once/read-many contract every collection API
/// threads through as an `update_kin` flag.
pub trait KinematicsProvider {
    /// Number of generalized coordinates.
    fn dof(&self) -> usize;

    /// Number of segments.
    fn nb_segments(&self) -> usize;

    /// Name of the segment at `id`.
    fn segment_name(&self, id: usize) -> Result<&str>;

    /// Index of the segment named `name`, if any.
    fn segment_id(&self, name: &str) -> Option<usize>;

    /// Recompute all global segment poses for coordinates `q`.
    ///
    /// Fails with `DofMismatch` if `q.len() != dof()`.
    fn update_kinematics(&mut self, q: &DVec) -> Result<()>;

    /// Global pose of segment `id`, valid for the Q of the most recent
    /// [`update_kinematics`](KinematicsProvider::update_kinematics) call.
    fn global_transform(&self, id: usize) -> Result<SpatialTransform>;

    /// 3×dof Jacobian of the world position of `local_point` (expressed in
    /// segment `id`'s frame) with respect to the generalized coordinates.
    ///
    /// When `update_kin` is true the kinematic cache is refreshed for `q`
    /// first; otherwise the current cache is used.
    fn point_jacobian(
        &mut self,
        q: &DVec,
        id: usize,
        local_point: &Vec3,
        update_kin: bool,
    ) -> Result<DMat>;

    /// 9×dof Jacobian of the world rotation of segment `id` with respect to
    /// the generalized coordinates. Rows are the column-major flattening of
    /// the 3×3 rotation matrix.
    fn frame_jacobian(&mut self, q: &DVec, id: usize, update_kin: bool) -> Result<DMat>;
}
