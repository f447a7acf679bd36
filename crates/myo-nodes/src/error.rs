//! Error types for myo-nodes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("node index {index} out of range (collection has {count} nodes)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("parent segment not found for node {node}: {segment}")]
    ParentNotFound { node: String, segment: String },

    #[error(transparent)]
    Kinematics(#[from] myo_rigid::KinematicsError),
}

pub type Result<T> = std::result::Result<T, NodeError>;
