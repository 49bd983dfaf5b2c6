// crates/ctmhd-core/src/config.rs

//! Runtime solver configuration. Every knob that would otherwise be a
//! build-time flag or module-level global — reconstruction order, limiter
//! choice, debug assertions, physical constants — is instead an explicit
//! field here, passed to every entry point rather than held as hidden state.

use crate::mask::OperationMasks;

/// Reconstruction order. `First` disables every second-order correction in
/// the edge electric field's Balsara terms and the reconstruction-coefficient
/// builder, falling back to plain first-order upwind values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Order {
    /// First-order upwind only.
    First,
    /// Second-order with Balsara corrections (default).
    #[default]
    Second,
}

/// Slope limiter selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LimiterKind {
    /// Minmod: most diffusive, most robust.
    MinMod,
    /// Monotonized central (default: best balance of sharpness and robustness).
    #[default]
    Mc,
    /// Van Leer.
    VanLeer,
}

/// Solver-wide configuration, passed explicitly to every entry point rather
/// than held as module-level state.
#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
    /// Reconstruction order for the edge electric field and reconstruction
    /// coefficients.
    pub order: Order,
    /// Slope limiter.
    pub limiter: LimiterKind,
    /// Enable the ρ>0 / finite-value assertions threaded through the solver.
    /// Defaults to `cfg!(debug_assertions)`.
    pub debug_checks: bool,
    /// Vacuum permeability μ₀ used by the wave-speed estimator.
    pub mu0: f64,
    /// Particle mass `m` used by the wave-speed estimator.
    pub particle_mass: f64,
    /// Per-operation neighbor-mask requirements, built once and reused by
    /// every pass rather than recomputed per cell.
    pub operation_masks: OperationMasks,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            order: Order::default(),
            limiter: LimiterKind::default(),
            debug_checks: cfg!(debug_assertions),
            mu0: 1.256_637_061_4e-6,
            particle_mass: 1.672_621_923_6e-27,
            operation_masks: OperationMasks::build(),
        }
    }
}
