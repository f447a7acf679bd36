//! Cached muscle geometry: global points, Jacobians, length, velocity.
//!
//! Every cached quantity is valid only for the kinematic state of the last
//! update. Staleness is explicit: reads are gated by an [`UpdateStage`] tag
//! and fail with `NotComputed` instead of silently serving defaults.

use crate::error::MuscleError;
use crate::path::MusclePath;
use crate::Result;
use myo_math::{DMat, DVec, Vec3};
use myo_rigid::KinematicsProvider;

/// How far the cached geometry has been brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UpdateStage {
    /// Nothing computed yet (or invalidated).
    Stale,
    /// Global points and Jacobians are valid.
    Geometry,
    /// Length and lengthening velocity are also valid.
    Kinematics,
}

/// Per-muscle cached geometric quantities.
#[derive(Debug, Clone)]
pub struct MuscleGeometry {
    points_global: Vec<Vec3>,
    /// One 3×dof Jacobian per path point.
    point_jacobians: Vec<DMat>,
    /// ∂(path length)/∂q, length dof.
    length_jacobian: DVec,
    length: f64,
    velocity: f64,
    stage: UpdateStage,
}

impl Default for MuscleGeometry {
    fn default() -> Self {
        Self {
            points_global: Vec::new(),
            point_jacobians: Vec::new(),
            length_jacobian: DVec::zeros(0),
            length: 0.0,
            velocity: 0.0,
            stage: UpdateStage::Stale,
        }
    }
}

impl MuscleGeometry {
    /// Current update stage.
    pub fn stage(&self) -> UpdateStage {
        self.stage
    }

    /// Recompute global points and Jacobians for the provider's current
    /// kinematic state (the caller is responsible for the kinematics push).
    /// Path modifiers run on the points after the per-point Jacobians are
    /// taken; see [`PathModifier`](crate::path::PathModifier).
    pub fn update_geometry<P: KinematicsProvider>(
        &mut self,
        model: &mut P,
        q: &DVec,
        path: &MusclePath,
    ) -> Result<()> {
        let mut points = Vec::with_capacity(path.nb_points());
        let mut jacobians = Vec::with_capacity(path.nb_points());
        for node in path.points() {
            let id = node.segment_id(model)?;
            let global = model.global_transform(id)?;
            points.push(global.apply_point(&node.position));
            jacobians.push(model.point_jacobian(q, id, &node.position, false)?);
        }
        path.apply_modifiers(&mut points);
        self.set_geometry(points, jacobians);
        Ok(())
    }

    /// Install externally computed global points and their stacked Jacobian
    /// (3·nb_points rows × dof columns).
    pub fn update_from_points(&mut self, points: &[Vec3], jacobian: &DMat) -> Result<()> {
        if jacobian.nrows() != 3 * points.len() {
            return Err(MuscleError::SizeMismatch {
                what: "stacked point Jacobian rows",
                expected: 3 * points.len(),
                got: jacobian.nrows(),
            });
        }
        let jacobians = (0..points.len())
            .map(|i| jacobian.rows(3 * i, 3).into_owned())
            .collect();
        self.set_geometry(points.to_vec(), jacobians);
        Ok(())
    }

    fn set_geometry(&mut self, points: Vec<Vec3>, jacobians: Vec<DMat>) {
        let dof = jacobians.first().map_or(0, |j| j.ncols());

        // Reduce per-point Jacobians to the path-length Jacobian through the
        // path tangents: dL/dq = Σᵢ tᵢᵀ (Jᵢ₊₁ − Jᵢ).
        let mut lj = DVec::zeros(dof);
        for i in 0..points.len().saturating_sub(1) {
            let seg = points[i + 1] - points[i];
            let norm = seg.norm();
            if norm < 1e-12 {
                continue;
            }
            let t = seg / norm;
            for j in 0..dof {
                for r in 0..3 {
                    lj[j] += (jacobians[i + 1][(r, j)] - jacobians[i][(r, j)]) * t[r];
                }
            }
        }

        self.points_global = points;
        self.point_jacobians = jacobians;
        self.length_jacobian = lj;
        self.stage = UpdateStage::Geometry;
    }

    /// Compute length (and, if `qdot` is given, lengthening velocity) from
    /// the current geometry. Requires a prior geometry update.
    pub fn update_kinematics(&mut self, qdot: Option<&DVec>) -> Result<()> {
        if self.stage < UpdateStage::Geometry {
            return Err(MuscleError::NotComputed("muscle geometry"));
        }

        self.length = self
            .points_global
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .sum();

        self.velocity = match qdot {
            Some(qdot) => {
                if qdot.len() != self.length_jacobian.len() {
                    return Err(MuscleError::SizeMismatch {
                        what: "generalized velocities",
                        expected: self.length_jacobian.len(),
                        got: qdot.len(),
                    });
                }
                self.length_jacobian.dot(qdot)
            }
            None => 0.0,
        };

        self.stage = UpdateStage::Kinematics;
        Ok(())
    }

    /// Global path points of the last geometry update.
    pub fn points_global(&self) -> Result<&[Vec3]> {
        if self.stage < UpdateStage::Geometry {
            return Err(MuscleError::NotComputed("muscle geometry"));
        }
        Ok(&self.points_global)
    }

    /// Per-point 3×dof Jacobians of the last geometry update.
    pub fn point_jacobians(&self) -> Result<&[DMat]> {
        if self.stage < UpdateStage::Geometry {
            return Err(MuscleError::NotComputed("muscle geometry"));
        }
        Ok(&self.point_jacobians)
    }

    /// Path-length Jacobian row of the last geometry update.
    pub fn length_jacobian(&self) -> Result<&DVec> {
        if self.stage < UpdateStage::Geometry {
            return Err(MuscleError::NotComputed("muscle geometry"));
        }
        Ok(&self.length_jacobian)
    }

    /// Path length of the last kinematics update.
    pub fn length(&self) -> Result<f64> {
        if self.stage < UpdateStage::Kinematics {
            return Err(MuscleError::NotComputed("muscle length"));
        }
        Ok(self.length)
    }

    /// Lengthening velocity of the last kinematics update (zero when no
    /// generalized velocities were supplied).
    pub fn velocity(&self) -> Result<f64> {
        if self.stage < UpdateStage::Kinematics {
            return Err(MuscleError::NotComputed("muscle velocity"));
        }
        Ok(self.velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reads_before_update_fail() {
        let geo = MuscleGeometry::default();
        assert!(matches!(geo.length(), Err(MuscleError::NotComputed(_))));
        assert!(matches!(
            geo.length_jacobian(),
            Err(MuscleError::NotComputed(_))
        ));
        assert!(matches!(
            geo.points_global(),
            Err(MuscleError::NotComputed(_))
        ));
    }

    #[test]
    fn test_manual_points_length_and_jacobian() {
        let mut geo = MuscleGeometry::default();
        // Straight path along x: p0 = (q0, 0, 0), p1 = (q0 + 1, 0, 0).
        // Both points move identically with q0, so dL/dq0 = 0; p1 also moves
        // with q1, so dL/dq1 = 1.
        let points = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];
        let mut jac = DMat::zeros(6, 2);
        jac[(0, 0)] = 1.0; // p0 x wrt q0
        jac[(3, 0)] = 1.0; // p1 x wrt q0
        jac[(3, 1)] = 1.0; // p1 x wrt q1

        geo.update_from_points(&points, &jac).unwrap();
        geo.update_kinematics(None).unwrap();

        assert_relative_eq!(geo.length().unwrap(), 1.0, epsilon = 1e-12);
        let lj = geo.length_jacobian().unwrap();
        assert_relative_eq!(lj[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(lj[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_velocity_from_qdot() {
        let mut geo = MuscleGeometry::default();
        let points = [Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)];
        let mut jac = DMat::zeros(6, 1);
        jac[(3, 0)] = 1.0;
        geo.update_from_points(&points, &jac).unwrap();

        let qdot = DVec::from_vec(vec![2.5]);
        geo.update_kinematics(Some(&qdot)).unwrap();
        assert_relative_eq!(geo.velocity().unwrap(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_manual_jacobian_row_mismatch() {
        let mut geo = MuscleGeometry::default();
        let points = [Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)];
        let jac = DMat::zeros(3, 1); // should be 6 rows
        assert!(matches!(
            geo.update_from_points(&points, &jac),
            Err(MuscleError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_qdot_size_mismatch() {
        let mut geo = MuscleGeometry::default();
        let points = [Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)];
        let jac = DMat::zeros(6, 2);
        geo.update_from_points(&points, &jac).unwrap();
        let qdot = DVec::zeros(3);
        assert!(matches!(
            geo.update_kinematics(Some(&qdot)),
            Err(MuscleError::SizeMismatch { .. })
        ));
    }
}
