//! Ordered collections of attached nodes.
//!
//! Indices are stable for the collection's lifetime: nodes are appended,
//! never reordered or removed. Every kinematic read threads an `update_kin`
//! flag — when true the provider's kinematics are pushed exactly once before
//! the first node, and the remaining nodes reuse that state.

use crate::error::NodeError;
use crate::node::{FrameNode, PointNode};
use crate::Result;
use myo_math::{DMat, DVec, Mat3, Vec3};
use myo_rigid::KinematicsProvider;

/// Collection of point nodes (markers, contact points).
#[derive(Debug, Clone, Default)]
pub struct Markers {
    nodes: Vec<PointNode>,
}

impl Markers {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a marker. Never fails and invalidates no other entry.
    pub fn add(&mut self, node: PointNode) {
        self.nodes.push(node);
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The local node at `idx`.
    pub fn node(&self, idx: usize) -> Result<&PointNode> {
        self.nodes.get(idx).ok_or(NodeError::IndexOutOfRange {
            index: idx,
            count: self.nodes.len(),
        })
    }

    /// All local nodes in insertion order.
    pub fn nodes(&self) -> &[PointNode] {
        &self.nodes
    }

    /// All marker names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.name.clone()).collect()
    }

    /// Names of the technical markers.
    pub fn technical_names(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.is_technical)
            .map(|n| n.name.clone())
            .collect()
    }

    /// Names of the anatomical markers.
    pub fn anatomical_names(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.is_anatomical)
            .map(|n| n.name.clone())
            .collect()
    }

    /// Global position of the marker at `idx` for coordinates `q`.
    pub fn global_at<P: KinematicsProvider>(
        &self,
        model: &mut P,
        q: &DVec,
        idx: usize,
        update_kin: bool,
    ) -> Result<Vec3> {
        if update_kin {
            model.update_kinematics(q)?;
        }
        self.node(idx)?.global(model)
    }

    /// Global positions of all markers, insertion order preserved.
    pub fn globals<P: KinematicsProvider>(
        &self,
        model: &mut P,
        q: &DVec,
        update_kin: bool,
    ) -> Result<Vec<PointNode>> {
        if update_kin {
            model.update_kinematics(q)?;
        }
        self.nodes
            .iter()
            .map(|n| {
                let mut out = n.clone();
                out.position = n.global(model)?;
                Ok(out)
            })
            .collect()
    }

    /// Global positions of the markers attached to segment `segment_idx`,
    /// relative order preserved. Zero matches yields an empty vector.
    pub fn for_segment<P: KinematicsProvider>(
        &self,
        model: &mut P,
        q: &DVec,
        segment_idx: usize,
        update_kin: bool,
    ) -> Result<Vec<PointNode>> {
        if update_kin {
            model.update_kinematics(q)?;
        }
        let segment_name = model.segment_name(segment_idx)?.to_string();
        self.nodes
            .iter()
            .filter(|n| n.parent == segment_name)
            .map(|n| {
                let mut out = n.clone();
                out.position = n.global(model)?;
                Ok(out)
            })
            .collect()
    }

    /// 3×dof position Jacobian of every marker, insertion order preserved.
    pub fn jacobians<P: KinematicsProvider>(
        &self,
        model: &mut P,
        q: &DVec,
        update_kin: bool,
    ) -> Result<Vec<DMat>> {
        let mut update = update_kin;
        let mut out = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let id = node.segment_id(model)?;
            out.push(model.point_jacobian(q, id, &node.position, update)?);
            update = false;
        }
        Ok(out)
    }
}

/// Collection of full pose nodes (IMUs, named rigid-body transforms).
#[derive(Debug, Clone, Default)]
pub struct FrameNodes {
    nodes: Vec<FrameNode>,
}

impl FrameNodes {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame node. Never fails and invalidates no other entry.
    pub fn add(&mut self, node: FrameNode) {
        self.nodes.push(node);
    }

    /// Number of frame nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The local node at `idx`.
    pub fn node(&self, idx: usize) -> Result<&FrameNode> {
        self.nodes.get(idx).ok_or(NodeError::IndexOutOfRange {
            index: idx,
            count: self.nodes.len(),
        })
    }

    /// All local nodes in insertion order.
    pub fn nodes(&self) -> &[FrameNode] {
        &self.nodes
    }

    /// All node names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.name.clone()).collect()
    }

    /// Global pose of the node at `idx` for coordinates `q`.
    pub fn global_at<P: KinematicsProvider>(
        &self,
        model: &mut P,
        q: &DVec,
        idx: usize,
        update_kin: bool,
    ) -> Result<FrameNode> {
        if update_kin {
            model.update_kinematics(q)?;
        }
        let node = self.node(idx)?;
        let mut out = node.clone();
        out.rt = node.global(model)?;
        Ok(out)
    }

    /// Global poses of all nodes, insertion order preserved.
    pub fn globals<P: KinematicsProvider>(
        &self,
        model: &mut P,
        q: &DVec,
        update_kin: bool,
    ) -> Result<Vec<FrameNode>> {
        if update_kin {
            model.update_kinematics(q)?;
        }
        self.nodes
            .iter()
            .map(|n| {
                let mut out = n.clone();
                out.rt = n.global(model)?;
                Ok(out)
            })
            .collect()
    }

    /// Global poses of the nodes attached to segment `segment_idx`,
    /// relative order preserved. Zero matches yields an empty vector.
    pub fn for_segment<P: KinematicsProvider>(
        &self,
        model: &mut P,
        q: &DVec,
        segment_idx: usize,
        update_kin: bool,
    ) -> Result<Vec<FrameNode>> {
        if update_kin {
            model.update_kinematics(q)?;
        }
        let segment_name = model.segment_name(segment_idx)?.to_string();
        self.nodes
            .iter()
            .filter(|n| n.parent == segment_name)
            .map(|n| {
                let mut out = n.clone();
                out.rt = n.global(model)?;
                Ok(out)
            })
            .collect()
    }

    /// 9×dof rotation Jacobian of every node, insertion order preserved.
    ///
    /// Rows are the column-major flattening of the node's world rotation.
    /// The provider returns the parent segment's rotation Jacobian; each
    /// column is right-multiplied by the node's local rotation, since
    /// d(R_seg·R_node)/dq = (dR_seg/dq)·R_node.
    pub fn jacobians<P: KinematicsProvider>(
        &self,
        model: &mut P,
        q: &DVec,
        update_kin: bool,
    ) -> Result<Vec<DMat>> {
        let mut update = update_kin;
        let mut out = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let id = node.segment_id(model)?;
            let seg_jac = model.frame_jacobian(q, id, update)?;
            update = false;

            let dof = seg_jac.ncols();
            let mut jac = DMat::zeros(9, dof);
            for j in 0..dof {
                let mut dseg = Mat3::zeros();
                for c in 0..3 {
                    for r in 0..3 {
                        dseg[(r, c)] = seg_jac[(c * 3 + r, j)];
                    }
                }
                let dnode = dseg * node.rt.rot;
                for c in 0..3 {
                    for r in 0..3 {
                        jac[(c * 3 + r, j)] = dnode[(r, c)];
                    }
                }
            }
            out.push(jac);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use myo_math::SpatialTransform;
    use myo_rigid::KinematicTree;

    fn two_link() -> KinematicTree {
        KinematicTree::builder()
            .add_revolute_segment(
                "seg1",
                -1,
                SpatialTransform::identity(),
                Vec3::new(0.0, 0.0, 1.0),
            )
            .add_revolute_segment(
                "seg2",
                0,
                SpatialTransform::translation(Vec3::new(1.0, 0.0, 0.0)),
                Vec3::new(0.0, 0.0, 1.0),
            )
            .build()
    }

    #[test]
    fn test_marker_globals_follow_kinematics() {
        let mut tree = two_link();
        let mut markers = Markers::new();
        markers.add(PointNode::new("tip", "seg2", Vec3::new(1.0, 0.0, 0.0)));

        let q = DVec::zeros(2);
        let globals = markers.globals(&mut tree, &q, true).unwrap();
        assert_relative_eq!(globals[0].position, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-12);

        let q = DVec::from_vec(vec![std::f64::consts::FRAC_PI_2, 0.0]);
        let globals = markers.globals(&mut tree, &q, true).unwrap();
        assert_relative_eq!(globals[0].position, Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_marker_index_out_of_range() {
        let mut markers = Markers::new();
        markers.add(PointNode::new("m", "seg1", Vec3::zeros()));
        // Index equal to size must fail.
        assert!(matches!(
            markers.node(1),
            Err(NodeError::IndexOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_for_segment_filters_and_preserves_order() {
        let mut tree = two_link();
        let mut markers = Markers::new();
        markers.add(PointNode::new("a", "seg1", Vec3::zeros()));
        markers.add(PointNode::new("b", "seg2", Vec3::zeros()));
        markers.add(PointNode::new("c", "seg1", Vec3::new(0.5, 0.0, 0.0)));

        let q = DVec::zeros(2);
        let on_seg1 = markers.for_segment(&mut tree, &q, 0, true).unwrap();
        assert_eq!(on_seg1.len(), 2);
        assert_eq!(on_seg1[0].name, "a");
        assert_eq!(on_seg1[1].name, "c");
    }

    #[test]
    fn test_for_segment_no_match_is_empty() {
        let mut tree = two_link();
        let mut nodes = FrameNodes::new();
        nodes.add(FrameNode::new("imu", "seg1", SpatialTransform::identity()));

        let q = DVec::zeros(2);
        let on_seg2 = nodes.for_segment(&mut tree, &q, 1, true).unwrap();
        assert!(on_seg2.is_empty());
    }

    #[test]
    fn test_frame_global_composes_local_pose() {
        let mut tree = two_link();
        let mut nodes = FrameNodes::new();
        nodes.add(FrameNode::new(
            "imu",
            "seg2",
            SpatialTransform::translation(Vec3::new(0.5, 0.0, 0.0)),
        ));

        let q = DVec::from_vec(vec![0.0, std::f64::consts::FRAC_PI_2]);
        let globals = nodes.globals(&mut tree, &q, true).unwrap();
        // seg2 origin at (1,0,0), rotated +90° -> node sits at (1, 0.5, 0).
        assert_relative_eq!(globals[0].rt.pos, Vec3::new(1.0, 0.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_parent_segment() {
        let mut tree = two_link();
        let mut markers = Markers::new();
        markers.add(PointNode::new("m", "pelvis", Vec3::zeros()));

        let q = DVec::zeros(2);
        assert!(matches!(
            markers.globals(&mut tree, &q, true),
            Err(NodeError::ParentNotFound { .. })
        ));
    }

    #[test]
    fn test_jacobian_shapes() {
        let mut tree = two_link();
        let mut markers = Markers::new();
        markers.add(PointNode::new("m", "seg2", Vec3::new(0.3, 0.0, 0.0)));
        let mut frames = FrameNodes::new();
        frames.add(FrameNode::new("f", "seg1", SpatialTransform::identity()));

        let q = DVec::zeros(2);
        let mj = markers.jacobians(&mut tree, &q, true).unwrap();
        assert_eq!(mj.len(), 1);
        assert_eq!((mj[0].nrows(), mj[0].ncols()), (3, 2));

        let fj = frames.jacobians(&mut tree, &q, true).unwrap();
        assert_eq!(fj.len(), 1);
        assert_eq!((fj[0].nrows(), fj[0].ncols()), (9, 2));
    }

    #[test]
    fn test_frame_jacobian_accounts_for_local_rotation() {
        let mut tree = two_link();
        let mut frames = FrameNodes::new();
        frames.add(FrameNode::new(
            "imu",
            "seg2",
            SpatialTransform::rot_z(0.7),
        ));

        let q = DVec::from_vec(vec![0.3, -0.4]);
        let jac = frames.jacobians(&mut tree, &q, true).unwrap();

        let eps = 1e-7;
        for j in 0..2 {
            let mut qp = q.clone();
            qp[j] += eps;
            tree.update_kinematics(&qp).unwrap();
            let rp = frames.node(0).unwrap().global(&tree).unwrap().rot;

            let mut qm = q.clone();
            qm[j] -= eps;
            tree.update_kinematics(&qm).unwrap();
            let rm = frames.node(0).unwrap().global(&tree).unwrap().rot;

            let fd = (rp - rm) / (2.0 * eps);
            for c in 0..3 {
                for r in 0..3 {
                    assert_relative_eq!(jac[0][(c * 3 + r, j)], fd[(r, c)], epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_technical_anatomical_filters() {
        let mut markers = Markers::new();
        markers.add(PointNode::new("t", "seg1", Vec3::zeros()).with_anatomical(false));
        markers.add(PointNode::new("a", "seg1", Vec3::zeros()).with_technical(false));
        assert_eq!(markers.technical_names(), vec!["t".to_string()]);
        assert_eq!(markers.anatomical_names(), vec!["a".to_string()]);
    }
}
