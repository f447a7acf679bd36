//! Rigid-body kinematics for the myo musculoskeletal library.
//!
//! The muscle and attached-node subsystems consume rigid-body kinematics
//! through the [`KinematicsProvider`] trait: one kinematics push per batch of
//! reads, cached global segment poses, and per-segment point/frame Jacobians.
//! [`KinematicTree`] is the built-in provider: a kinematic tree of named
//! segments with single-dof revolute and prismatic joints.
//!
//! Forward/inverse dynamics (mass matrix, bias forces) are deliberately not
//! part of this surface.

pub mod error;
pub mod provider;
pub mod segment;
pub mod tree;

pub use error::{KinematicsError, Result};
pub use provider::KinematicsProvider;
pub use segment::{Joint, JointType, Segment};
pub use tree::{KinematicTree, KinematicTreeBuilder};
