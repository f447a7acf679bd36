//! Muscle path description: origin, via-points, insertion, wrap correction.

use std::fmt;
use std::sync::Arc;

use myo_math::Vec3;
use myo_nodes::PointNode;

/// Path-correction step applied to the global point sequence before length
/// and Jacobian reduction (e.g. wrapping around bone geometry).
///
/// Modifiers must adjust point positions only, never the point count, and
/// must be stateless (they are shared between clones of a muscle).
///
/// The per-point Jacobians are computed from the unmodified attachment
/// points: the length Jacobian reflects the corrected path tangents but not
/// the modifier's own dependence on the coordinates. Modifiers whose output
/// varies strongly with Q will make the Jacobian (and velocity) approximate.
pub trait PathModifier: fmt::Debug + Send + Sync {
    /// Adjust the global point positions in place.
    fn apply(&self, points: &mut [Vec3]);
}

/// The geometric path of a muscle: origin → via-points → insertion.
///
/// Each point is a [`PointNode`] fixed in its parent segment; the via-point
/// order is the path order.
#[derive(Debug, Clone)]
pub struct MusclePath {
    /// Attachment on the origin segment.
    pub origin: PointNode,
    /// Attachment on the insertion segment.
    pub insertion: PointNode,
    /// Intermediate points, in path order.
    pub via_points: Vec<PointNode>,
    modifiers: Vec<Arc<dyn PathModifier>>,
}

impl MusclePath {
    /// Create a straight origin → insertion path.
    pub fn new(origin: PointNode, insertion: PointNode) -> Self {
        Self {
            origin,
            insertion,
            via_points: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    /// Append a via-point (kept in insertion order along the path).
    pub fn with_via_point(mut self, node: PointNode) -> Self {
        self.via_points.push(node);
        self
    }

    /// Attach a path-correction step.
    pub fn with_modifier(mut self, modifier: Arc<dyn PathModifier>) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Total number of path points (origin + via-points + insertion).
    pub fn nb_points(&self) -> usize {
        2 + self.via_points.len()
    }

    /// The path points in order: origin, via-points, insertion.
    pub fn points(&self) -> impl Iterator<Item = &PointNode> {
        std::iter::once(&self.origin)
            .chain(self.via_points.iter())
            .chain(std::iter::once(&self.insertion))
    }

    /// Run every modifier over the global point positions, in order.
    pub fn apply_modifiers(&self, points: &mut [Vec3]) {
        for modifier in &self.modifiers {
            modifier.apply(points);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct LiftZ(f64);

    impl PathModifier for LiftZ {
        fn apply(&self, points: &mut [Vec3]) {
            for p in points.iter_mut() {
                p.z += self.0;
            }
        }
    }

    #[test]
    fn test_point_order_is_origin_vias_insertion() {
        let path = MusclePath::new(
            PointNode::new("ori", "seg1", Vec3::zeros()),
            PointNode::new("ins", "seg2", Vec3::zeros()),
        )
        .with_via_point(PointNode::new("via1", "seg1", Vec3::zeros()))
        .with_via_point(PointNode::new("via2", "seg2", Vec3::zeros()));

        let names: Vec<&str> = path.points().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["ori", "via1", "via2", "ins"]);
        assert_eq!(path.nb_points(), 4);
    }

    #[test]
    fn test_modifiers_run_in_order() {
        let path = MusclePath::new(
            PointNode::new("ori", "seg1", Vec3::zeros()),
            PointNode::new("ins", "seg2", Vec3::zeros()),
        )
        .with_modifier(Arc::new(LiftZ(0.1)))
        .with_modifier(Arc::new(LiftZ(0.2)));

        let mut pts = vec![Vec3::zeros(), Vec3::zeros()];
        path.apply_modifiers(&mut pts);
        assert!((pts[0].z - 0.3).abs() < 1e-12);
        assert!((pts[1].z - 0.3).abs() < 1e-12);
    }
}
