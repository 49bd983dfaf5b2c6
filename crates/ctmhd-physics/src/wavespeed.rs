// crates/ctmhd-physics/src/wavespeed.rs

//! Fast magnetosonic wave-speed estimator, sampled at a quarter-offset point
//! in the plane transverse to a face-normal axis so the edge electric field
//! can build an upwinded Riemann-style flux from it.

use ctmhd_core::{Axis, CellParams, Derivatives, SolverConfig};

/// Fast magnetosonic speed estimate for the `alpha`-normal edge, sampled at
/// `beta_dir`/`gamma_dir` (each `+1.0` or `-1.0`) quarter-offsets into the
/// transverse plane.
///
/// `self_cp`/`self_derivs` belong to the cell the edge touches; `plus_cp`/
/// `plus_derivs` belong to its neighbor one cell in the `+alpha` direction.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn fast_ms_speed(
    alpha: Axis,
    self_cp: &CellParams,
    self_derivs: &Derivatives,
    plus_cp: &CellParams,
    plus_derivs: &Derivatives,
    beta_dir: f64,
    gamma_dir: f64,
    config: &SolverConfig,
) -> f64 {
    let beta = alpha.next();
    let gamma = beta.next();

    let self_b_total = self_cp.b_total();
    let plus_b_total = plus_cp.b_total();

    let a0 = 0.5 * (plus_b_total.get(alpha) + self_b_total.get(alpha));
    let ax = plus_b_total.get(alpha) - self_b_total.get(alpha);
    let ay = plus_derivs.db.cross(alpha, beta) + self_derivs.db.cross(alpha, beta);
    let axy = plus_derivs.db.cross(alpha, beta) - self_derivs.db.cross(alpha, beta);
    let az = plus_derivs.db.cross(alpha, gamma) + self_derivs.db.cross(alpha, gamma);
    let axz = plus_derivs.db.cross(alpha, gamma) - self_derivs.db.cross(alpha, gamma);

    let alpha2 = (a0 + beta_dir * 0.5 * ay + gamma_dir * 0.5 * az).powi(2)
        + (1.0 / 12.0) * (ax + beta_dir * 0.5 * axy + gamma_dir * 0.5 * axz).powi(2);

    let b_beta = self_b_total.get(beta);
    let beta2 = (b_beta + gamma_dir * 0.5 * self_derivs.db.cross(beta, gamma)).powi(2)
        + (1.0 / 12.0) * self_derivs.db.cross(beta, alpha).powi(2);

    let b_gamma = self_b_total.get(gamma);
    let gamma2 = (b_gamma + beta_dir * 0.5 * self_derivs.db.cross(gamma, beta)).powi(2)
        + (1.0 / 12.0) * self_derivs.db.cross(gamma, alpha).powi(2);

    let rho = config.particle_mass
        * (self_cp.rho + beta_dir * 0.5 * self_derivs.drho.get(beta) + gamma_dir * 0.5 * self_derivs.drho.get(gamma));

    ((alpha2 + beta2 + gamma2) / (config.mu0 * rho)).sqrt()
}
