//! Static muscle characteristics used by the force models.

/// Per-muscle constants of the force-generation models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Characteristics {
    /// Optimal fiber length (m).
    pub optimal_length: f64,
    /// Maximal isometric force (N).
    pub max_isometric_force: f64,
    /// Physiological cross-sectional area (cm²).
    pub pcsa: f64,
    /// Tendon slack length (m).
    pub tendon_slack_length: f64,
    /// Pennation angle at optimal length (rad).
    pub pennation_angle: f64,
    /// Maximal contraction velocity (optimal lengths per second).
    pub max_contraction_velocity: f64,
}

impl Default for Characteristics {
    fn default() -> Self {
        Self {
            optimal_length: 0.1,
            max_isometric_force: 100.0,
            pcsa: 0.0,
            tendon_slack_length: 0.0,
            pennation_angle: 0.0,
            max_contraction_velocity: 10.0,
        }
    }
}

impl Characteristics {
    /// Create characteristics from the two values every model needs.
    pub fn new(optimal_length: f64, max_isometric_force: f64) -> Self {
        Self {
            optimal_length,
            max_isometric_force,
            ..Self::default()
        }
    }

    /// Set the tendon slack length.
    pub fn with_tendon_slack_length(mut self, l: f64) -> Self {
        self.tendon_slack_length = l;
        self
    }

    /// Set the pennation angle.
    pub fn with_pennation_angle(mut self, angle: f64) -> Self {
        self.pennation_angle = angle;
        self
    }

    /// Set the physiological cross-sectional area.
    pub fn with_pcsa(mut self, pcsa: f64) -> Self {
        self.pcsa = pcsa;
        self
    }

    /// Set the maximal contraction velocity.
    pub fn with_max_contraction_velocity(mut self, v: f64) -> Self {
        self.max_contraction_velocity = v;
        self
    }
}
