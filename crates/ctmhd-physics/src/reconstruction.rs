// crates/ctmhd-physics/src/reconstruction.rs

//! Divergence-free reconstruction coefficients for one cell's face-averaged
//! B, used to evaluate B anywhere inside and on the boundary of the cell.

use ctmhd_core::{Axis, CellParams, Derivatives, Order};

/// The seven coefficients of the linear/quadratic reconstruction polynomial
/// for one face-normal axis: `B_alpha(alpha, beta, gamma) = c0 + c_alpha*alpha
/// + c_beta*beta + c_gamma*gamma + c_alpha2*alpha^2 + c_alpha_beta*alpha*beta
/// + c_alpha_gamma*alpha*gamma`, in cell-local coordinates centered on the
/// `-alpha` face.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisReconstruction {
    /// Constant term.
    pub c0: f64,
    /// Linear term along `alpha`.
    pub c_alpha: f64,
    /// Linear term along `beta`.
    pub c_beta: f64,
    /// Linear term along `gamma`.
    pub c_gamma: f64,
    /// Quadratic term along `alpha`, fixed by the divergence-free closure.
    pub c_alpha2: f64,
    /// Cross term `alpha*beta`.
    pub c_alpha_beta: f64,
    /// Cross term `alpha*gamma`.
    pub c_alpha_gamma: f64,
}

/// All three axes' reconstruction coefficients for one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReconstructionCoefficients {
    /// x-normal face reconstruction.
    pub x: AxisReconstruction,
    /// y-normal face reconstruction.
    pub y: AxisReconstruction,
    /// z-normal face reconstruction.
    pub z: AxisReconstruction,
}

impl ReconstructionCoefficients {
    fn get(&self, axis: Axis) -> &AxisReconstruction {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    fn get_mut(&mut self, axis: Axis) -> &mut AxisReconstruction {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

/// Build the reconstruction coefficients for `cp`/`derivs`, given the
/// `+alpha` neighbor's params/derivs for each of the three axes (`None` for
/// a missing neighbor is treated as all-zero, matching a zero-gradient
/// domain edge).
#[must_use]
pub fn reconstruction_coefficients(
    cp: &CellParams,
    derivs: &Derivatives,
    plus_x: Option<(&CellParams, &Derivatives)>,
    plus_y: Option<(&CellParams, &Derivatives)>,
    plus_z: Option<(&CellParams, &Derivatives)>,
    order: Order,
) -> ReconstructionCoefficients {
    let mut out = ReconstructionCoefficients::default();
    let neighbors = [plus_x, plus_y, plus_z];

    for &alpha in &Axis::ALL {
        let beta = alpha.next();
        let plus = neighbors[alpha.index()];
        let r = out.get_mut(alpha);

        let b_self = cp.b_total().get(alpha);
        let b_plus = plus.map_or(0.0, |(cp, _)| cp.b_total().get(alpha));
        r.c_alpha = b_plus - b_self;

        if matches!(order, Order::Second) {
            let d_self_beta = derivs.db.cross(alpha, beta);
            let d_plus_beta = plus.map_or(0.0, |(_, d)| d.db.cross(alpha, beta));
            r.c_alpha_beta = d_plus_beta - d_self_beta;
            r.c_beta = 0.5 * (d_plus_beta + d_self_beta);

            let gamma = beta.next();
            let d_self_gamma = derivs.db.cross(alpha, gamma);
            let d_plus_gamma = plus.map_or(0.0, |(_, d)| d.db.cross(alpha, gamma));
            r.c_alpha_gamma = d_plus_gamma - d_self_gamma;
            r.c_gamma = 0.5 * (d_plus_gamma + d_self_gamma);
        }
    }

    if matches!(order, Order::Second) {
        for &alpha in &Axis::ALL {
            let beta = alpha.next();
            let gamma = beta.next();
            let closure = -0.5 * (out.get(beta).c_alpha_gamma + out.get(gamma).c_alpha_beta);
            out.get_mut(alpha).c_alpha2 = closure;
        }
    }

    for &alpha in &Axis::ALL {
        let beta = alpha.next();
        let plus = neighbors[alpha.index()];
        let b_self = cp.b_total().get(alpha);
        let b_plus = plus.map_or(0.0, |(cp, _)| cp.b_total().get(alpha));
        let closure = out.get(alpha).c_alpha2;
        out.get_mut(alpha).c0 = 0.5 * (b_plus + b_self) - closure / 6.0;
        let _ = beta;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctmhd_core::Vector3;

    #[test]
    fn divergence_free_closure_holds() {
        let cp = CellParams { b: Vector3::new(1.0, 1.0, 1.0), dx: 1.0, dy: 1.0, dz: 1.0, ..CellParams::default() };
        let mut derivs = Derivatives::default();
        derivs.db.dbx_dy = 0.2;
        derivs.db.dbx_dz = 0.1;
        derivs.db.dby_dx = 0.3;
        derivs.db.dby_dz = 0.05;
        derivs.db.dbz_dx = 0.15;
        derivs.db.dbz_dy = 0.25;

        let coeffs = reconstruction_coefficients(&cp, &derivs, Some((&cp, &derivs)), Some((&cp, &derivs)), Some((&cp, &derivs)), Order::Second);

        assert!((coeffs.x.c_alpha2 + 0.5 * (coeffs.y.c_alpha_gamma + coeffs.z.c_alpha_beta)).abs() < 1e-12);
        assert!((coeffs.y.c_alpha2 + 0.5 * (coeffs.z.c_alpha_gamma + coeffs.x.c_alpha_beta)).abs() < 1e-12);
        assert!((coeffs.z.c_alpha2 + 0.5 * (coeffs.x.c_alpha_gamma + coeffs.y.c_alpha_beta)).abs() < 1e-12);
    }

    #[test]
    fn first_order_zeroes_every_second_order_term() {
        let cp = CellParams::default();
        let derivs = Derivatives::default();
        let coeffs = reconstruction_coefficients(&cp, &derivs, None, None, None, Order::First);
        for axis in [coeffs.x, coeffs.y, coeffs.z] {
            assert_eq!(axis.c_alpha2, 0.0);
            assert_eq!(axis.c_alpha_beta, 0.0);
            assert_eq!(axis.c_alpha_gamma, 0.0);
        }
    }
}
