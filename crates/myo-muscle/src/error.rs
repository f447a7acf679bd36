//! Error types for myo-muscle.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MuscleError {
    #[error("index {index} out of range ({count} entries)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("muscle group not found: {0}")]
    GroupNotFound(String),

    #[error("{what}: expected {expected} entries, got {got}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{0} not computed yet; call an update first")]
    NotComputed(&'static str),

    #[error(transparent)]
    Node(#[from] myo_nodes::NodeError),

    #[error(transparent)]
    Kinematics(#[from] myo_rigid::KinematicsError),
}

pub type Result<T> = std::result::Result<T, MuscleError>;
