//! Muscle excitation/activation state and first-order activation dynamics.

/// Parameters of the excitation → activation ODE.
///
/// Activation rises with time constant `tau_activation` and decays with
/// `tau_deactivation`; both are scaled by the usual (0.5 + 1.5·a) factor so
/// that a nearly-inactive muscle activates faster than it deactivates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationDynamics {
    /// Activation time constant (s).
    pub tau_activation: f64,
    /// Deactivation time constant (s).
    pub tau_deactivation: f64,
    /// Lower bound on activation, keeps the ODE well-conditioned.
    pub min_activation: f64,
}

impl Default for ActivationDynamics {
    fn default() -> Self {
        Self {
            tau_activation: 0.01,
            tau_deactivation: 0.04,
            min_activation: 0.01,
        }
    }
}

impl ActivationDynamics {
    /// Time-derivative of activation for a given (normalized) excitation.
    pub fn activation_dot(&self, excitation: f64, activation: f64) -> f64 {
        let a = activation.clamp(self.min_activation, 1.0);
        let num = excitation - a;
        let denom = if num > 0.0 {
            self.tau_activation * (0.5 + 1.5 * a)
        } else {
            self.tau_deactivation / (0.5 + 1.5 * a)
        };
        num / denom
    }
}

/// One muscle's time-varying excitation and activation.
///
/// Both values live in [0, 1]; setters clamp. The excitation is "normalized"
/// once mapped into that range — [`activation_dot`](MuscleState::activation_dot)
/// takes an `already_normalized` flag so raw excitations can be passed
/// directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuscleState {
    excitation: f64,
    activation: f64,
    dynamics: ActivationDynamics,
}

impl Default for MuscleState {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl MuscleState {
    /// Create a state with the given excitation and activation (clamped to
    /// [0, 1]).
    pub fn new(excitation: f64, activation: f64) -> Self {
        Self {
            excitation: excitation.clamp(0.0, 1.0),
            activation: activation.clamp(0.0, 1.0),
            dynamics: ActivationDynamics::default(),
        }
    }

    /// Override the activation-dynamics parameters.
    pub fn with_dynamics(mut self, dynamics: ActivationDynamics) -> Self {
        self.dynamics = dynamics;
        self
    }

    /// Current excitation.
    pub fn excitation(&self) -> f64 {
        self.excitation
    }

    /// Current activation.
    pub fn activation(&self) -> f64 {
        self.activation
    }

    /// Activation-dynamics parameters.
    pub fn dynamics(&self) -> &ActivationDynamics {
        &self.dynamics
    }

    /// Set the excitation, clamped to [0, 1].
    pub fn set_excitation(&mut self, excitation: f64) {
        self.excitation = excitation.clamp(0.0, 1.0);
    }

    /// Set the activation, clamped to [0, 1].
    pub fn set_activation(&mut self, activation: f64) {
        self.activation = activation.clamp(0.0, 1.0);
    }

    /// Time-derivative of activation toward the current excitation.
    ///
    /// With `already_normalized` false, the excitation is first clamped into
    /// the valid range.
    pub fn activation_dot(&self, already_normalized: bool) -> f64 {
        let e = if already_normalized {
            self.excitation
        } else {
            self.excitation.clamp(self.dynamics.min_activation, 1.0)
        };
        self.dynamics.activation_dot(e, self.activation)
    }
}
