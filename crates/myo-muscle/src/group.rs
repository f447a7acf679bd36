//! Muscle groups: named sets of muscles sharing an origin/insertion pair.

use crate::error::MuscleError;
use crate::muscle::Muscle;
use crate::Result;

/// A named group of muscles spanning the same origin/insertion segment pair.
///
/// The group does not re-validate that its muscles actually attach to those
/// segments; that is the model builder's contract.
#[derive(Debug, Clone)]
pub struct MuscleGroup {
    /// Group name, unique within the owning facade.
    pub name: String,
    /// Name of the origin segment.
    pub origin_segment: String,
    /// Name of the insertion segment.
    pub insertion_segment: String,
    muscles: Vec<Muscle>,
}

impl MuscleGroup {
    /// Create an empty group.
    pub fn new(name: &str, origin_segment: &str, insertion_segment: &str) -> Self {
        Self {
            name: name.to_string(),
            origin_segment: origin_segment.to_string(),
            insertion_segment: insertion_segment.to_string(),
            muscles: Vec::new(),
        }
    }

    /// Append a muscle. Muscles are never removed or reordered.
    pub fn add_muscle(&mut self, muscle: Muscle) {
        self.muscles.push(muscle);
    }

    /// Number of muscles in the group.
    pub fn nb_muscles(&self) -> usize {
        self.muscles.len()
    }

    /// The muscle at `idx`.
    pub fn muscle(&self, idx: usize) -> Result<&Muscle> {
        self.muscles.get(idx).ok_or(MuscleError::IndexOutOfRange {
            index: idx,
            count: self.muscles.len(),
        })
    }

    /// Mutable muscle at `idx`.
    pub fn muscle_mut(&mut self, idx: usize) -> Result<&mut Muscle> {
        let count = self.muscles.len();
        self.muscles
            .get_mut(idx)
            .ok_or(MuscleError::IndexOutOfRange { index: idx, count })
    }

    /// The muscles in insertion order.
    pub fn muscles(&self) -> &[Muscle] {
        &self.muscles
    }

    /// Mutable view of the muscles, insertion order.
    pub fn muscles_mut(&mut self) -> &mut [Muscle] {
        &mut self.muscles
    }

    /// Muscle names in insertion order.
    pub fn muscle_names(&self) -> Vec<String> {
        self.muscles.iter().map(|m| m.name.clone()).collect()
    }
}
