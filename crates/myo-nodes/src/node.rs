//! Named points and frames fixed in a parent segment.

use std::cell::Cell;

use crate::error::NodeError;
use crate::Result;
use myo_math::{SpatialTransform, Vec3};
use myo_rigid::KinematicsProvider;

/// A named 3D point fixed in a parent segment's local frame.
///
/// Used for markers, muscle origin/insertion/via-points and contact points.
/// The parent segment id is resolved lazily against the provider and cached;
/// it is only re-resolved after an explicit
/// [`reset_parent_id`](PointNode::reset_parent_id).
#[derive(Debug, Clone)]
pub struct PointNode {
    /// Node name, unique within its owning collection.
    pub name: String,
    /// Parent segment name.
    pub parent: String,
    /// Position in the parent segment frame.
    pub position: Vec3,
    /// Whether the node is used for kinematic fits.
    pub is_technical: bool,
    /// Whether the node is an anatomical landmark.
    pub is_anatomical: bool,
    /// Cached parent segment id, -1 while unresolved.
    parent_id: Cell<i32>,
}

impl PointNode {
    /// Create a technical + anatomical point node.
    pub fn new(name: &str, parent: &str, position: Vec3) -> Self {
        Self {
            name: name.to_string(),
            parent: parent.to_string(),
            position,
            is_technical: true,
            is_anatomical: true,
            parent_id: Cell::new(-1),
        }
    }

    /// Set the technical flag.
    pub fn with_technical(mut self, technical: bool) -> Self {
        self.is_technical = technical;
        self
    }

    /// Set the anatomical flag.
    pub fn with_anatomical(mut self, anatomical: bool) -> Self {
        self.is_anatomical = anatomical;
        self
    }

    /// Resolve (and cache) the parent segment id against `model`.
    pub fn segment_id(&self, model: &impl KinematicsProvider) -> Result<usize> {
        let cached = self.parent_id.get();
        if cached >= 0 {
            return Ok(cached as usize);
        }
        let id = model
            .segment_id(&self.parent)
            .ok_or_else(|| NodeError::ParentNotFound {
                node: self.name.clone(),
                segment: self.parent.clone(),
            })?;
        self.parent_id.set(id as i32);
        Ok(id)
    }

    /// Drop the cached parent id so the next lookup re-resolves it.
    pub fn reset_parent_id(&self) {
        self.parent_id.set(-1);
    }

    /// Global position of this node for the provider's current kinematic state.
    pub fn global(&self, model: &impl KinematicsProvider) -> Result<Vec3> {
        let id = self.segment_id(model)?;
        let global = model.global_transform(id)?;
        Ok(global.apply_point(&self.position))
    }
}

/// A named pose (rotation + translation) fixed in a parent segment's frame.
///
/// Used for IMUs and general named rigid-body transforms.
#[derive(Debug, Clone)]
pub struct FrameNode {
    /// Node name, unique within its owning collection.
    pub name: String,
    /// Parent segment name.
    pub parent: String,
    /// Pose in the parent segment frame.
    pub rt: SpatialTransform,
    /// Whether the node is used for kinematic fits.
    pub is_technical: bool,
    /// Whether the node is an anatomical landmark.
    pub is_anatomical: bool,
    parent_id: Cell<i32>,
}

impl FrameNode {
    /// Create a technical + anatomical frame node.
    pub fn new(name: &str, parent: &str, rt: SpatialTransform) -> Self {
        Self {
            name: name.to_string(),
            parent: parent.to_string(),
            rt,
            is_technical: true,
            is_anatomical: true,
            parent_id: Cell::new(-1),
        }
    }

    /// Set the technical flag.
    pub fn with_technical(mut self, technical: bool) -> Self {
        self.is_technical = technical;
        self
    }

    /// Set the anatomical flag.
    pub fn with_anatomical(mut self, anatomical: bool) -> Self {
        self.is_anatomical = anatomical;
        self
    }

    /// Resolve (and cache) the parent segment id against `model`.
    pub fn segment_id(&self, model: &impl KinematicsProvider) -> Result<usize> {
        let cached = self.parent_id.get();
        if cached >= 0 {
            return Ok(cached as usize);
        }
        let id = model
            .segment_id(&self.parent)
            .ok_or_else(|| NodeError::ParentNotFound {
                node: self.name.clone(),
                segment: self.parent.clone(),
            })?;
        self.parent_id.set(id as i32);
        Ok(id)
    }

    /// Drop the cached parent id so the next lookup re-resolves it.
    pub fn reset_parent_id(&self) {
        self.parent_id.set(-1);
    }

    /// Global pose of this node for the provider's current kinematic state.
    pub fn global(&self, model: &impl KinematicsProvider) -> Result<SpatialTransform> {
        let id = self.segment_id(model)?;
        let global = model.global_transform(id)?;
        Ok(global.compose(&self.rt))
    }
}
