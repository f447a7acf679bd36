//! The muscle facade: update pipeline, stacked Jacobian, force and torque.

use crate::error::MuscleError;
use crate::group::MuscleGroup;
use crate::muscle::Muscle;
use crate::state::MuscleState;
use crate::Result;
use myo_math::{DMat, DVec, Vec3};
use myo_rigid::KinematicsProvider;

/// Owns every muscle group of a model and drives the whole pipeline:
/// kinematic update, stacked length Jacobian, force evaluation and the
/// virtual-work projection into generalized joint torques.
///
/// The canonical muscle order is group-major (group 0's muscles first, in
/// insertion order, then group 1's, …); it is the index space of every
/// muscle-indexed vector and of the Jacobian rows. Groups are appended,
/// never removed or reordered.
#[derive(Debug, Clone, Default)]
pub struct Muscles {
    groups: Vec<MuscleGroup>,
    /// Dof count seen by the last update; sizes empty-model outputs.
    last_dof: usize,
}

impl Muscles {
    /// Create an empty facade.
    pub fn new() -> Self {
        Self::default()
    }

    // ---- groups and indexing -------------------------------------------

    /// Append an empty muscle group.
    pub fn add_muscle_group(&mut self, name: &str, origin_segment: &str, insertion_segment: &str) {
        self.groups
            .push(MuscleGroup::new(name, origin_segment, insertion_segment));
    }

    /// Id of the group named `name`, or -1 if there is none.
    ///
    /// First match wins; the -1 sentinel is part of the public contract.
    pub fn muscle_group_id(&self, name: &str) -> i32 {
        self.groups
            .iter()
            .position(|g| g.name == name)
            .map_or(-1, |i| i as i32)
    }

    /// The group at `idx`.
    pub fn muscle_group(&self, idx: usize) -> Result<&MuscleGroup> {
        self.groups.get(idx).ok_or(MuscleError::IndexOutOfRange {
            index: idx,
            count: self.groups.len(),
        })
    }

    /// Mutable group at `idx`.
    pub fn muscle_group_mut(&mut self, idx: usize) -> Result<&mut MuscleGroup> {
        let count = self.groups.len();
        self.groups
            .get_mut(idx)
            .ok_or(MuscleError::IndexOutOfRange { index: idx, count })
    }

    /// The group named `name`.
    pub fn muscle_group_by_name(&self, name: &str) -> Result<&MuscleGroup> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| MuscleError::GroupNotFound(name.to_string()))
    }

    /// Mutable group named `name`.
    pub fn muscle_group_by_name_mut(&mut self, name: &str) -> Result<&mut MuscleGroup> {
        self.groups
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| MuscleError::GroupNotFound(name.to_string()))
    }

    /// All groups in insertion order.
    pub fn muscle_groups(&self) -> &[MuscleGroup] {
        &self.groups
    }

    /// Mutable view of the groups, insertion order.
    pub fn muscle_groups_mut(&mut self) -> &mut [MuscleGroup] {
        &mut self.groups
    }

    /// Number of muscle groups.
    pub fn nb_muscle_groups(&self) -> usize {
        self.groups.len()
    }

    /// Total number of muscles across all groups.
    pub fn nb_muscles(&self) -> usize {
        self.groups.iter().map(|g| g.nb_muscles()).sum()
    }

    /// All muscles in canonical (group-major) order.
    pub fn muscles(&self) -> Vec<&Muscle> {
        self.groups.iter().flat_map(|g| g.muscles()).collect()
    }

    /// The muscle at canonical index `idx`.
    pub fn muscle(&self, idx: usize) -> Result<&Muscle> {
        self.groups
            .iter()
            .flat_map(|g| g.muscles())
            .nth(idx)
            .ok_or(MuscleError::IndexOutOfRange {
                index: idx,
                count: self.nb_muscles(),
            })
    }

    /// All muscle names in canonical order.
    pub fn muscle_names(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|g| g.muscles())
            .map(|m| m.name.clone())
            .collect()
    }

    /// One default state per muscle, canonical order.
    pub fn state_set(&self) -> Vec<MuscleState> {
        self.groups
            .iter()
            .flat_map(|g| g.muscles())
            .map(|m| m.default_state())
            .collect()
    }

    // ---- update pipeline -----------------------------------------------

    /// Update every muscle's geometry (and, with `qdot`, length velocity)
    /// for coordinates `q`.
    ///
    /// With `update_kin` true, the provider's kinematics are pushed exactly
    /// once before the first muscle; with false, the provider's current
    /// cached state is reused and only the muscle caches are recomputed.
    pub fn update_muscles<P: KinematicsProvider>(
        &mut self,
        model: &mut P,
        q: &DVec,
        qdot: Option<&DVec>,
        update_kin: bool,
    ) -> Result<()> {
        if update_kin {
            model.update_kinematics(q)?;
        }
        self.last_dof = model.dof();
        for group in &mut self.groups {
            for muscle in group.muscles_mut() {
                muscle.update(model, q, qdot)?;
            }
        }
        Ok(())
    }

    /// Bypass the provider: install precomputed global points and stacked
    /// point Jacobians, one entry per muscle in canonical order.
    ///
    /// `jacobians[i]` is 3·nb_points(i) × dof. Fails with `SizeMismatch` if
    /// either slice disagrees with the muscle count or a muscle's point
    /// count.
    pub fn update_muscles_manual(
        &mut self,
        points: &[Vec<Vec3>],
        jacobians: &[DMat],
        qdot: Option<&DVec>,
    ) -> Result<()> {
        let n = self.nb_muscles();
        if points.len() != n {
            return Err(MuscleError::SizeMismatch {
                what: "muscle point sets",
                expected: n,
                got: points.len(),
            });
        }
        if jacobians.len() != n {
            return Err(MuscleError::SizeMismatch {
                what: "muscle point Jacobians",
                expected: n,
                got: jacobians.len(),
            });
        }

        let mut idx = 0;
        for group in &mut self.groups {
            for muscle in group.muscles_mut() {
                if points[idx].len() != muscle.nb_points() {
                    return Err(MuscleError::SizeMismatch {
                        what: "muscle path points",
                        expected: muscle.nb_points(),
                        got: points[idx].len(),
                    });
                }
                muscle.update_from_points(&points[idx], &jacobians[idx], qdot)?;
                idx += 1;
            }
        }
        if let Some(j) = jacobians.first() {
            self.last_dof = j.ncols();
        }
        Ok(())
    }

    // ---- Jacobian, forces, torque --------------------------------------

    /// The stacked muscle-length Jacobian (nb_muscles × dof) from the last
    /// update. Fails with `NotComputed` if any muscle was never updated.
    pub fn muscles_length_jacobian(&self) -> Result<DMat> {
        let n = self.nb_muscles();
        let dof = self.last_dof;
        let mut jac = DMat::zeros(n, dof);
        for (i, muscle) in self.groups.iter().flat_map(|g| g.muscles()).enumerate() {
            let row = muscle.length_jacobian()?;
            if row.len() != dof {
                return Err(MuscleError::SizeMismatch {
                    what: "length Jacobian columns",
                    expected: dof,
                    got: row.len(),
                });
            }
            for j in 0..dof {
                jac[(i, j)] = row[j];
            }
        }
        Ok(jac)
    }

    /// Push kinematics, update every muscle for `q`, then return the stacked
    /// length Jacobian.
    pub fn muscles_length_jacobian_at<P: KinematicsProvider>(
        &mut self,
        model: &mut P,
        q: &DVec,
    ) -> Result<DMat> {
        self.update_muscles(model, q, None, true)?;
        self.muscles_length_jacobian()
    }

    /// Per-muscle forces for `states` (canonical order), from the cached
    /// geometry. Fails with `SizeMismatch` unless `states.len()` equals the
    /// muscle count.
    pub fn muscle_forces(&self, states: &[MuscleState]) -> Result<DVec> {
        let n = self.nb_muscles();
        if states.len() != n {
            return Err(MuscleError::SizeMismatch {
                what: "muscle states",
                expected: n,
                got: states.len(),
            });
        }
        let mut forces = DVec::zeros(n);
        for (i, muscle) in self.groups.iter().flat_map(|g| g.muscles()).enumerate() {
            forces[i] = muscle.force(&states[i])?;
        }
        Ok(forces)
    }

    /// Update muscles for (`q`, `qdot`), then evaluate forces.
    pub fn muscle_forces_at<P: KinematicsProvider>(
        &mut self,
        model: &mut P,
        states: &[MuscleState],
        q: &DVec,
        qdot: Option<&DVec>,
    ) -> Result<DVec> {
        self.update_muscles(model, q, qdot, true)?;
        self.muscle_forces(states)
    }

    /// Generalized joint torque from per-muscle forces, by virtual work:
    /// τ = −Jᵀ·F with J the stacked length Jacobian.
    ///
    /// The negative sign encodes that muscle tension shortens the path.
    /// Requires muscles already updated for the current Q.
    pub fn muscular_joint_torque(&self, forces: &DVec) -> Result<DVec> {
        let n = self.nb_muscles();
        if forces.len() != n {
            return Err(MuscleError::SizeMismatch {
                what: "muscle forces",
                expected: n,
                got: forces.len(),
            });
        }
        let jac = self.muscles_length_jacobian()?;
        Ok(-(jac.transpose() * forces))
    }

    /// Update muscles for (`q`, `qdot`), then project `forces` into a
    /// generalized joint torque.
    pub fn muscular_joint_torque_at<P: KinematicsProvider>(
        &mut self,
        model: &mut P,
        forces: &DVec,
        q: &DVec,
        qdot: Option<&DVec>,
    ) -> Result<DVec> {
        self.update_muscles(model, q, qdot, true)?;
        self.muscular_joint_torque(forces)
    }

    /// Convert `states` to forces with the cached geometry, then project
    /// into a generalized joint torque.
    pub fn muscular_joint_torque_from_states(&self, states: &[MuscleState]) -> Result<DVec> {
        let forces = self.muscle_forces(states)?;
        self.muscular_joint_torque(&forces)
    }

    /// Update muscles for (`q`, `qdot`), convert `states` to forces, then
    /// project into a generalized joint torque.
    pub fn muscular_joint_torque_from_states_at<P: KinematicsProvider>(
        &mut self,
        model: &mut P,
        states: &[MuscleState],
        q: &DVec,
        qdot: Option<&DVec>,
    ) -> Result<DVec> {
        self.update_muscles(model, q, qdot, true)?;
        self.muscular_joint_torque_from_states(states)
    }

    /// Per-muscle activation derivatives, canonical order. Independent of
    /// geometry.
    pub fn activation_dot(&self, states: &[MuscleState], already_normalized: bool) -> Result<DVec> {
        let n = self.nb_muscles();
        if states.len() != n {
            return Err(MuscleError::SizeMismatch {
                what: "muscle states",
                expected: n,
                got: states.len(),
            });
        }
        Ok(DVec::from_iterator(
            n,
            states.iter().map(|s| s.activation_dot(already_normalized)),
        ))
    }
}
