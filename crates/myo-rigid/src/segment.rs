//! Segments and joints of the kinematic tree.

use myo_math::{SpatialTransform, Vec3};

/// Joint type enumeration. Every joint carries exactly one dof.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointType {
    /// Single rotational dof about the joint axis.
    Revolute,
    /// Single translational dof along the joint axis.
    Prismatic,
}

/// A single-dof joint placing a segment relative to its parent.
#[derive(Debug, Clone)]
pub struct Joint {
    /// Joint type.
    pub joint_type: JointType,
    /// Constant transform from the parent segment frame to the joint frame.
    pub offset: SpatialTransform,
    /// Joint axis in the joint frame (unit).
    pub axis: Vec3,
}

impl Joint {
    /// Create a revolute joint about `axis`, placed at `offset` in the parent.
    pub fn revolute(offset: SpatialTransform, axis: Vec3) -> Self {
        Self {
            joint_type: JointType::Revolute,
            offset,
            axis,
        }
    }

    /// Create a prismatic joint along `axis`, placed at `offset` in the parent.
    pub fn prismatic(offset: SpatialTransform, axis: Vec3) -> Self {
        Self {
            joint_type: JointType::Prismatic,
            offset,
            axis,
        }
    }

    /// The joint motion transform for coordinate value `q` (joint → segment).
    pub fn motion(&self, q: f64) -> SpatialTransform {
        match self.joint_type {
            JointType::Revolute => SpatialTransform::rot_axis(&self.axis, q),
            JointType::Prismatic => SpatialTransform::translation(self.axis * q),
        }
    }
}

/// A named rigid segment of the kinematic tree.
///
/// Each segment is connected to its parent (or the world, `parent == -1`)
/// through exactly one [`Joint`]; the segment's generalized-coordinate index
/// equals its position in the tree.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Segment name, unique within the tree.
    pub name: String,
    /// Index of the parent segment, or -1 for the world.
    pub parent: i32,
    /// The joint connecting this segment to its parent.
    pub joint: Joint,
}
