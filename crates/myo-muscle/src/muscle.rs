//! A single musculo-tendon actuator.

use crate::characteristics::Characteristics;
use crate::force::ForceModel;
use crate::geometry::MuscleGeometry;
use crate::path::MusclePath;
use crate::state::MuscleState;
use crate::Result;
use myo_math::{DMat, DVec, Vec3};
use myo_rigid::KinematicsProvider;

/// A muscle: geometric path, force model, and cached geometry.
///
/// The cached quantities are valid only for the coordinates of the last
/// update call; reading them earlier fails with `NotComputed`.
#[derive(Debug, Clone)]
pub struct Muscle {
    /// Muscle name, unique within its group.
    pub name: String,
    path: MusclePath,
    characteristics: Characteristics,
    force_model: ForceModel,
    geometry: MuscleGeometry,
}

impl Muscle {
    /// Create a muscle from its path, characteristics and force model.
    pub fn new(
        name: &str,
        path: MusclePath,
        characteristics: Characteristics,
        force_model: ForceModel,
    ) -> Self {
        Self {
            name: name.to_string(),
            path,
            characteristics,
            force_model,
            geometry: MuscleGeometry::default(),
        }
    }

    /// The muscle path.
    pub fn path(&self) -> &MusclePath {
        &self.path
    }

    /// The static characteristics.
    pub fn characteristics(&self) -> &Characteristics {
        &self.characteristics
    }

    /// The force model.
    pub fn force_model(&self) -> ForceModel {
        self.force_model
    }

    /// The cached geometry.
    pub fn geometry(&self) -> &MuscleGeometry {
        &self.geometry
    }

    /// Number of path points.
    pub fn nb_points(&self) -> usize {
        self.path.nb_points()
    }

    /// A default (zero excitation, zero activation) state for this muscle.
    pub fn default_state(&self) -> MuscleState {
        MuscleState::default()
    }

    /// Recompute geometry against the provider's current kinematic state,
    /// then length and (with `qdot`) lengthening velocity.
    pub fn update<P: KinematicsProvider>(
        &mut self,
        model: &mut P,
        q: &DVec,
        qdot: Option<&DVec>,
    ) -> Result<()> {
        self.geometry.update_geometry(model, q, &self.path)?;
        self.geometry.update_kinematics(qdot)
    }

    /// Install externally computed global points and stacked point Jacobian,
    /// then recompute length and velocity.
    pub fn update_from_points(
        &mut self,
        points: &[Vec3],
        jacobian: &DMat,
        qdot: Option<&DVec>,
    ) -> Result<()> {
        self.geometry.update_from_points(points, jacobian)?;
        self.geometry.update_kinematics(qdot)
    }

    /// Path length of the last update.
    pub fn length(&self) -> Result<f64> {
        self.geometry.length()
    }

    /// Lengthening velocity of the last update.
    pub fn velocity(&self) -> Result<f64> {
        self.geometry.velocity()
    }

    /// Path-length Jacobian row of the last update.
    pub fn length_jacobian(&self) -> Result<&DVec> {
        self.geometry.length_jacobian()
    }

    /// Tension produced for `state`, using the cached length and velocity.
    ///
    /// The idealized model ignores geometry and never requires an update;
    /// length-dependent models fail with `NotComputed` if the muscle was not
    /// updated.
    pub fn force(&self, state: &MuscleState) -> Result<f64> {
        match self.force_model {
            ForceModel::Idealized => Ok(self.force_model.force(
                &self.characteristics,
                state.activation(),
                0.0,
                0.0,
            )),
            ForceModel::HillType => {
                let length = self.geometry.length()?;
                let velocity = self.geometry.velocity()?;
                Ok(self
                    .force_model
                    .force(&self.characteristics, state.activation(), length, velocity))
            }
        }
    }
}
