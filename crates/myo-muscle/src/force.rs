//! Force-generation models: activation (and geometry) → scalar tension.

use crate::characteristics::Characteristics;

/// Thelen-style passive force-length shape factor.
const KPE: f64 = 4.0;
/// Passive strain at maximal isometric force.
const E0: f64 = 0.6;
/// Force-velocity curvature.
const AF: f64 = 0.25;
/// Eccentric force plateau (multiple of isometric force).
const FLEN: f64 = 1.4;

/// A muscle's force-generation model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceModel {
    /// Pure force generator: F = activation · F_max. Ignores geometry.
    Idealized,
    /// Hill-type model with active force-length, passive force-length and
    /// force-velocity factors, normalized by the muscle characteristics.
    HillType,
}

impl ForceModel {
    /// Tension for the given activation and musculo-tendon length/velocity.
    ///
    /// `length` is the full path length; the Hill model subtracts the tendon
    /// slack length and de-pennates before normalizing by the optimal length.
    pub fn force(
        &self,
        ch: &Characteristics,
        activation: f64,
        length: f64,
        velocity: f64,
    ) -> f64 {
        match self {
            ForceModel::Idealized => activation * ch.max_isometric_force,
            ForceModel::HillType => {
                let cos_pen = ch.pennation_angle.cos();
                let fiber_length = (length - ch.tendon_slack_length) / cos_pen;
                let norm_l = fiber_length / ch.optimal_length;
                let norm_v = velocity / (ch.max_contraction_velocity * ch.optimal_length);

                let fl = active_force_length(norm_l);
                let fp = passive_force_length(norm_l);
                let fv = force_velocity(norm_v);

                ch.max_isometric_force * (activation * fl * fv + fp) * cos_pen
            }
        }
    }
}

/// Active force-length: Gaussian centered on the optimal length.
fn active_force_length(norm_l: f64) -> f64 {
    (-(norm_l - 1.0).powi(2) / 0.45).exp()
}

/// Passive force-length: exponential beyond the optimal length, zero below.
fn passive_force_length(norm_l: f64) -> f64 {
    if norm_l <= 1.0 {
        0.0
    } else {
        ((KPE * (norm_l - 1.0) / E0).exp() - 1.0) / (KPE.exp() - 1.0)
    }
}

/// Force-velocity: hyperbolic in shortening (negative velocity), saturating
/// at `FLEN` in lengthening.
fn force_velocity(norm_v: f64) -> f64 {
    if norm_v <= -1.0 {
        0.0
    } else if norm_v < 0.0 {
        (1.0 + norm_v) / (1.0 - norm_v / AF)
    } else {
        (1.0 + norm_v * FLEN / AF) / (1.0 + norm_v / AF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_idealized_is_linear_in_activation() {
        let ch = Characteristics::new(0.1, 500.0);
        let model = ForceModel::Idealized;
        assert_relative_eq!(model.force(&ch, 0.0, 0.1, 0.0), 0.0);
        assert_relative_eq!(model.force(&ch, 0.5, 0.1, 0.0), 250.0);
        assert_relative_eq!(model.force(&ch, 1.0, 0.1, 0.0), 500.0);
    }

    #[test]
    fn test_hill_isometric_at_optimal_length_is_fmax() {
        let ch = Characteristics::new(0.1, 500.0);
        let f = ForceModel::HillType.force(&ch, 1.0, 0.1, 0.0);
        assert_relative_eq!(f, 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hill_active_force_drops_away_from_optimal() {
        let ch = Characteristics::new(0.1, 500.0);
        let at_optimal = ForceModel::HillType.force(&ch, 1.0, 0.1, 0.0);
        let shortened = ForceModel::HillType.force(&ch, 1.0, 0.07, 0.0);
        assert!(shortened < at_optimal);
    }

    #[test]
    fn test_hill_passive_force_without_activation() {
        let ch = Characteristics::new(0.1, 500.0);
        // Stretched 30% beyond optimal, zero activation: passive only.
        let f = ForceModel::HillType.force(&ch, 0.0, 0.13, 0.0);
        assert!(f > 0.0);
        // Below optimal: no passive contribution.
        let f = ForceModel::HillType.force(&ch, 0.0, 0.09, 0.0);
        assert_relative_eq!(f, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hill_force_velocity_shape() {
        // Isometric reference.
        assert_relative_eq!(force_velocity(0.0), 1.0, epsilon = 1e-12);
        // Shortening at max velocity produces no force.
        assert_relative_eq!(force_velocity(-1.0), 0.0, epsilon = 1e-12);
        // Lengthening produces more than isometric force, below the plateau.
        let ecc = force_velocity(0.5);
        assert!(ecc > 1.0 && ecc < FLEN);
    }

    #[test]
    fn test_hill_tendon_slack_shifts_fiber_length() {
        let ch = Characteristics::new(0.1, 500.0).with_tendon_slack_length(0.05);
        // Path length 0.15 -> fiber length 0.1 = optimal.
        let f = ForceModel::HillType.force(&ch, 1.0, 0.15, 0.0);
        assert_relative_eq!(f, 500.0, epsilon = 1e-9);
    }
}
