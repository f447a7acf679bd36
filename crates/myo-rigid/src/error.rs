//! Error types for myo-rigid.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KinematicsError {
    #[error("segment index {index} out of range (model has {count} segments)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("segment not found: {0}")]
    SegmentNotFound(String),

    #[error("generalized coordinates have {got} entries, model has {expected} dof")]
    DofMismatch { expected: usize, got: usize },

    #[error("kinematics were never updated; call update_kinematics first")]
    NotComputed,
}

pub type Result<T> = std::result::Result<T, KinematicsError>;
