//! Concrete kinematic tree provider.

use std::collections::HashMap;

use crate::error::KinematicsError;
use crate::provider::KinematicsProvider;
use crate::segment::{Joint, JointType, Segment};
use crate::Result;
use myo_math::{skew, DMat, DVec, SpatialTransform, Vec3};

/// A kinematic tree of named segments, each carrying one single-dof joint.
///
/// The generalized-coordinate index of a segment equals its insertion index,
/// so `dof() == nb_segments()`. Global poses are cached by
/// [`update_kinematics`](KinematicsProvider::update_kinematics) and served to
/// every subsequent read.
#[derive(Debug, Clone)]
pub struct KinematicTree {
    segments: Vec<Segment>,
    name_to_id: HashMap<String, usize>,
    /// Global pose per segment, valid for the last updated Q.
    globals: Vec<SpatialTransform>,
    computed: bool,
}

impl KinematicTree {
    /// Start building a tree.
    pub fn builder() -> KinematicTreeBuilder {
        KinematicTreeBuilder::new()
    }

    /// The segments in insertion order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// World pose of the joint frame of segment `id` (parent pose composed
    /// with the constant joint offset), from the cached kinematic state.
    fn joint_world(&self, id: usize) -> SpatialTransform {
        let seg = &self.segments[id];
        let parent_global = if seg.parent < 0 {
            SpatialTransform::identity()
        } else {
            self.globals[seg.parent as usize]
        };
        parent_global.compose(&seg.joint.offset)
    }

    fn check_segment(&self, id: usize) -> Result<()> {
        if id >= self.segments.len() {
            return Err(KinematicsError::IndexOutOfRange {
                index: id,
                count: self.segments.len(),
            });
        }
        Ok(())
    }

    fn check_computed(&self) -> Result<()> {
        if !self.computed {
            return Err(KinematicsError::NotComputed);
        }
        Ok(())
    }
}

impl KinematicsProvider for KinematicTree {
    fn dof(&self) -> usize {
        self.segments.len()
    }

    fn nb_segments(&self) -> usize {
        self.segments.len()
    }

    fn segment_name(&self, id: usize) -> Result<&str> {
        self.check_segment(id)?;
        Ok(&self.segments[id].name)
    }

    fn segment_id(&self, name: &str) -> Option<usize> {
        self.name_to_id.get(name).copied()
    }

    fn update_kinematics(&mut self, q: &DVec) -> Result<()> {
        if q.len() != self.dof() {
            return Err(KinematicsError::DofMismatch {
                expected: self.dof(),
                got: q.len(),
            });
        }

        // Parents precede children by construction, one pass suffices.
        for i in 0..self.segments.len() {
            let seg = &self.segments[i];
            let parent_global = if seg.parent < 0 {
                SpatialTransform::identity()
            } else {
                self.globals[seg.parent as usize]
            };
            self.globals[i] = parent_global
                .compose(&seg.joint.offset)
                .compose(&seg.joint.motion(q[i]));
        }
        self.computed = true;
        Ok(())
    }

    fn global_transform(&self, id: usize) -> Result<SpatialTransform> {
        self.check_segment(id)?;
        self.check_computed()?;
        Ok(self.globals[id])
    }

    fn point_jacobian(
        &mut self,
        q: &DVec,
        id: usize,
        local_point: &Vec3,
        update_kin: bool,
    ) -> Result<DMat> {
        self.check_segment(id)?;
        if update_kin {
            self.update_kinematics(q)?;
        }
        self.check_computed()?;

        let pw = self.globals[id].apply_point(local_point);
        let mut jac = DMat::zeros(3, self.dof());

        let mut s = id as i32;
        while s >= 0 {
            let si = s as usize;
            let joint = &self.segments[si].joint;
            let jw = self.joint_world(si);
            let axis_w = jw.apply_vector(&joint.axis);
            let col = match joint.joint_type {
                JointType::Revolute => axis_w.cross(&(pw - jw.pos)),
                JointType::Prismatic => axis_w,
            };
            jac.fixed_view_mut::<3, 1>(0, si).copy_from(&col);
            s = self.segments[si].parent;
        }
        Ok(jac)
    }

    fn frame_jacobian(&mut self, q: &DVec, id: usize, update_kin: bool) -> Result<DMat> {
        self.check_segment(id)?;
        if update_kin {
            self.update_kinematics(q)?;
        }
        self.check_computed()?;

        let rot = self.globals[id].rot;
        let mut jac = DMat::zeros(9, self.dof());

        let mut s = id as i32;
        while s >= 0 {
            let si = s as usize;
            let joint = &self.segments[si].joint;
            if joint.joint_type == JointType::Revolute {
                let jw = self.joint_world(si);
                let axis_w = jw.apply_vector(&joint.axis);
                // dR/dq = [axis]× R for a revolute ancestor; prismatic joints
                // leave the rotation untouched.
                let drot = skew(&axis_w) * rot;
                for c in 0..3 {
                    for r in 0..3 {
                        jac[(c * 3 + r, si)] = drot[(r, c)];
                    }
                }
            }
            s = self.segments[si].parent;
        }
        Ok(jac)
    }
}

/// Builder for [`KinematicTree`].
pub struct KinematicTreeBuilder {
    segments: Vec<Segment>,
}

impl KinematicTreeBuilder {
    /// Start with an empty tree.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Add a segment with a revolute joint about `axis`.
    ///
    /// `parent` is the index of the parent segment, or -1 for the world, and
    /// must refer to an already-added segment.
    pub fn add_revolute_segment(
        mut self,
        name: &str,
        parent: i32,
        offset: SpatialTransform,
        axis: Vec3,
    ) -> Self {
        self.segments.push(Segment {
            name: name.to_string(),
            parent,
            joint: Joint::revolute(offset, axis),
        });
        self
    }

    /// Add a segment with a prismatic joint along `axis`.
    pub fn add_prismatic_segment(
        mut self,
        name: &str,
        parent: i32,
        offset: SpatialTransform,
        axis: Vec3,
    ) -> Self {
        self.segments.push(Segment {
            name: name.to_string(),
            parent,
            joint: Joint::prismatic(offset, axis),
        });
        self
    }

    /// Build the tree.
    ///
    /// # Panics
    ///
    /// Panics if any segment's parent index does not refer to an
    /// already-added segment (world parents, -1, excepted). Forward or
    /// out-of-range parents would otherwise read stale or missing poses
    /// during kinematic updates.
    pub fn build(self) -> KinematicTree {
        for (i, seg) in self.segments.iter().enumerate() {
            assert!(
                seg.parent < i as i32,
                "segment '{}' (index {}) has parent index {}; parents must be added first",
                seg.name,
                i,
                seg.parent,
            );
        }
        let name_to_id = self
            .segments
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();
        let n = self.segments.len();
        KinematicTree {
            segments: self.segments,
            name_to_id,
            globals: vec![SpatialTransform::identity(); n],
            computed: false,
        }
    }
}

impl Default for KinematicTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Two-link planar arm: both revolute about Z, link length 1 along X.
    fn two_link() -> KinematicTree {
        KinematicTree::builder()
            .add_revolute_segment(
                "upper",
                -1,
                SpatialTransform::identity(),
                Vec3::new(0.0, 0.0, 1.0),
            )
            .add_revolute_segment(
                "lower",
                0,
                SpatialTransform::translation(Vec3::new(1.0, 0.0, 0.0)),
                Vec3::new(0.0, 0.0, 1.0),
            )
            .build()
    }

    #[test]
    fn test_fk_straight_arm() {
        let mut tree = two_link();
        let q = DVec::zeros(2);
        tree.update_kinematics(&q).unwrap();

        let tip = tree
            .global_transform(1)
            .unwrap()
            .apply_point(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(tip, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_fk_bent_elbow() {
        let mut tree = two_link();
        let q = DVec::from_vec(vec![0.0, std::f64::consts::FRAC_PI_2]);
        tree.update_kinematics(&q).unwrap();

        let tip = tree
            .global_transform(1)
            .unwrap()
            .apply_point(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(tip, Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_global_transform_before_update_fails() {
        let tree = two_link();
        assert!(matches!(
            tree.global_transform(0),
            Err(KinematicsError::NotComputed)
        ));
    }

    #[test]
    fn test_dof_mismatch_rejected() {
        let mut tree = two_link();
        let q = DVec::zeros(3);
        assert!(matches!(
            tree.update_kinematics(&q),
            Err(KinematicsError::DofMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn test_segment_lookup() {
        let tree = two_link();
        assert_eq!(tree.segment_id("lower"), Some(1));
        assert_eq!(tree.segment_id("nope"), None);
        assert_eq!(tree.segment_name(0).unwrap(), "upper");
        assert!(tree.segment_name(2).is_err());
    }

    #[test]
    fn test_point_jacobian_matches_finite_difference() {
        let mut tree = two_link();
        let q = DVec::from_vec(vec![0.4, -0.7]);
        let local = Vec3::new(0.8, 0.1, 0.0);

        let jac = tree.point_jacobian(&q, 1, &local, true).unwrap();

        let eps = 1e-7;
        for j in 0..2 {
            let mut qp = q.clone();
            qp[j] += eps;
            tree.update_kinematics(&qp).unwrap();
            let pp = tree.global_transform(1).unwrap().apply_point(&local);

            let mut qm = q.clone();
            qm[j] -= eps;
            tree.update_kinematics(&qm).unwrap();
            let pm = tree.global_transform(1).unwrap().apply_point(&local);

            let fd = (pp - pm) / (2.0 * eps);
            for r in 0..3 {
                assert_relative_eq!(jac[(r, j)], fd[r], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_frame_jacobian_matches_finite_difference() {
        let mut tree = two_link();
        let q = DVec::from_vec(vec![0.3, 0.9]);

        let jac = tree.frame_jacobian(&q, 1, true).unwrap();

        let eps = 1e-7;
        for j in 0..2 {
            let mut qp = q.clone();
            qp[j] += eps;
            tree.update_kinematics(&qp).unwrap();
            let rp = tree.global_transform(1).unwrap().rot;

            let mut qm = q.clone();
            qm[j] -= eps;
            tree.update_kinematics(&qm).unwrap();
            let rm = tree.global_transform(1).unwrap().rot;

            let fd = (rp - rm) / (2.0 * eps);
            for c in 0..3 {
                for r in 0..3 {
                    assert_relative_eq!(jac[(c * 3 + r, j)], fd[(r, c)], epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "parents must be added first")]
    fn test_build_rejects_out_of_range_parent() {
        KinematicTree::builder()
            .add_revolute_segment(
                "orphan",
                5,
                SpatialTransform::identity(),
                Vec3::new(0.0, 0.0, 1.0),
            )
            .build();
    }

    #[test]
    #[should_panic(expected = "parents must be added first")]
    fn test_build_rejects_self_parent() {
        KinematicTree::builder()
            .add_revolute_segment(
                "loop",
                0,
                SpatialTransform::identity(),
                Vec3::new(0.0, 0.0, 1.0),
            )
            .build();
    }

    #[test]
    fn test_prismatic_point_jacobian() {
        let mut tree = KinematicTree::builder()
            .add_prismatic_segment(
                "slider",
                -1,
                SpatialTransform::identity(),
                Vec3::new(0.0, 1.0, 0.0),
            )
            .build();
        let q = DVec::from_vec(vec![0.5]);
        let jac = tree
            .point_jacobian(&q, 0, &Vec3::new(0.2, 0.0, 0.0), true)
            .unwrap();
        assert_relative_eq!(jac[(0, 0)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(jac[(1, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(jac[(2, 0)], 0.0, epsilon = 1e-12);
    }
}
