//! Attached-entity collections for the myo musculoskeletal library.
//!
//! Markers, IMU-style frames and muscle attachment points share one shape: a
//! named point or pose fixed in a parent segment's local frame, whose global
//! placement is recomputed against the kinematic state. [`Markers`] collects
//! point nodes, [`FrameNodes`] collects full pose nodes; both take the
//! [`KinematicsProvider`](myo_rigid::KinematicsProvider) as an explicit
//! argument on every kinematic read.

pub mod collection;
pub mod error;
pub mod node;

pub use collection::{FrameNodes, Markers};
pub use error::{NodeError, Result};
pub use node::{FrameNode, PointNode};
