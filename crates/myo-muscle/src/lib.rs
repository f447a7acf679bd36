//! Muscle modeling for the myo musculoskeletal library.
//!
//! A [`Muscle`] is a musculo-tendon actuator: a geometric path from an origin
//! point through optional via-points to an insertion point, a force model
//! mapping activation (and length/velocity) to tension, and cached geometric
//! quantities (global points, length Jacobian, length, lengthening velocity).
//! Muscles are grouped in [`MuscleGroup`]s by origin/insertion segment pair,
//! and the [`Muscles`] facade updates every muscle against a kinematic state,
//! stacks the per-muscle length Jacobians, and projects muscle forces into
//! generalized joint torques via virtual work (τ = −Jᵀ·F).
//!
//! The canonical muscle order for every muscle-indexed vector or matrix is
//! group-major: group 0's muscles in insertion order, then group 1's, and so
//! on.

pub mod characteristics;
pub mod error;
pub mod force;
pub mod geometry;
pub mod group;
pub mod muscle;
pub mod muscles;
pub mod path;
pub mod state;

pub use characteristics::Characteristics;
pub use error::{MuscleError, Result};
pub use force::ForceModel;
pub use geometry::{MuscleGeometry, UpdateStage};
pub use group::MuscleGroup;
pub use muscle::Muscle;
pub use muscles::Muscles;
pub use path::{MusclePath, PathModifier};
pub use state::{ActivationDynamics, MuscleState};
