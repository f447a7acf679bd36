//! myo — musculoskeletal modeling library.
//!
//! This is the umbrella crate: it provides the composite [`Model`] and
//! re-exports the core types of the sub-crates.
//!
//! A [`Model`] is a plain composition of independent components over one
//! kinematic tree: markers, attached frames and muscles all read the same
//! provider, and each component can also be used standalone against any
//! [`KinematicsProvider`] implementation.

pub use myo_math::{self, DMat, DVec, Mat3, SpatialTransform, Vec3};
pub use myo_muscle::{
    self, ActivationDynamics, Characteristics, ForceModel, Muscle, MuscleGroup, MusclePath,
    MuscleState, Muscles, PathModifier,
};
pub use myo_nodes::{self, FrameNode, FrameNodes, Markers, PointNode};
pub use myo_rigid::{self, KinematicTree, KinematicTreeBuilder, KinematicsProvider};

/// A complete musculoskeletal model: one kinematic tree plus the components
/// attached to it.
///
/// Every component is always present and empty by default; an empty component
/// answers size queries with zero and never errors on whole-collection reads.
#[derive(Debug, Clone)]
pub struct Model {
    /// The kinematic tree the components attach to.
    pub tree: KinematicTree,
    /// Point markers.
    pub markers: Markers,
    /// Attached frames (IMUs, named transforms).
    pub frames: FrameNodes,
    /// Muscle groups and the muscle update pipeline.
    pub muscles: Muscles,
}

impl Model {
    /// Create a model over `tree` with empty components.
    pub fn new(tree: KinematicTree) -> Self {
        Self {
            tree,
            markers: Markers::new(),
            frames: FrameNodes::new(),
            muscles: Muscles::new(),
        }
    }

    /// Number of generalized coordinates.
    pub fn dof(&self) -> usize {
        self.tree.dof()
    }

    /// Number of segments in the tree.
    pub fn nb_segments(&self) -> usize {
        self.tree.nb_segments()
    }

    /// Number of markers.
    pub fn nb_markers(&self) -> usize {
        self.markers.len()
    }

    /// Number of attached frames.
    pub fn nb_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of muscles across all groups.
    pub fn nb_muscles(&self) -> usize {
        self.muscles.nb_muscles()
    }

    /// Number of muscle groups.
    pub fn nb_muscle_groups(&self) -> usize {
        self.muscles.nb_muscle_groups()
    }

    /// Push the tree's kinematics for coordinates `q`.
    pub fn update_kinematics(&mut self, q: &DVec) -> myo_rigid::Result<()> {
        self.tree.update_kinematics(q)
    }

    /// Global positions of every marker.
    pub fn markers_global(&mut self, q: &DVec, update_kin: bool) -> myo_nodes::Result<Vec<PointNode>> {
        self.markers.globals(&mut self.tree, q, update_kin)
    }

    /// Global poses of every attached frame.
    pub fn frames_global(&mut self, q: &DVec, update_kin: bool) -> myo_nodes::Result<Vec<FrameNode>> {
        self.frames.globals(&mut self.tree, q, update_kin)
    }

    /// Update every muscle's geometry (and, with `qdot`, velocity) for `q`.
    pub fn update_muscles(
        &mut self,
        q: &DVec,
        qdot: Option<&DVec>,
        update_kin: bool,
    ) -> myo_muscle::Result<()> {
        self.muscles.update_muscles(&mut self.tree, q, qdot, update_kin)
    }

    /// The stacked muscle-length Jacobian from the last muscle update.
    pub fn muscles_length_jacobian(&self) -> myo_muscle::Result<DMat> {
        self.muscles.muscles_length_jacobian()
    }

    /// Generalized joint torque from per-muscle forces (cached geometry).
    pub fn muscular_joint_torque(&self, forces: &DVec) -> myo_muscle::Result<DVec> {
        self.muscles.muscular_joint_torque(forces)
    }

    /// Update muscles for (`q`, `qdot`), then project the forces produced by
    /// `states` into a generalized joint torque.
    pub fn muscular_joint_torque_from_states(
        &mut self,
        states: &[MuscleState],
        q: &DVec,
        qdot: Option<&DVec>,
    ) -> myo_muscle::Result<DVec> {
        self.muscles
            .muscular_joint_torque_from_states_at(&mut self.tree, states, q, qdot)
    }

    /// One default state per muscle, canonical order.
    pub fn state_set(&self) -> Vec<MuscleState> {
        self.muscles.state_set()
    }

    /// Drop every node's cached parent segment id (markers, frames and
    /// muscle path points), forcing re-resolution on the next lookup.
    pub fn reset_node_caches(&self) {
        for node in self.markers.nodes() {
            node.reset_parent_id();
        }
        for node in self.frames.nodes() {
            node.reset_parent_id();
        }
        for group in self.muscles.muscle_groups() {
            for muscle in group.muscles() {
                for node in muscle.path().points() {
                    node.reset_parent_id();
                }
            }
        }
    }
}
