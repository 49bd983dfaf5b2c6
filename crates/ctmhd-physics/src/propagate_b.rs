// crates/ctmhd-physics/src/propagate_b.rs

//! Face-B propagator: the discrete curl of the edge electric field,
//! advancing one face-averaged B component by `dt`.

use ctmhd_core::{Axis, BoundaryEdgeE, CellId, Grid, SolverConfig};

/// Advance the `alpha`-normal face B on `id` by one discrete curl-E step of
/// size `dt`.
///
/// `Balpha += dt/dbeta*(Egamma(+beta nbr) - Egamma(self)) - dt/dgamma*(Ebeta(+gamma nbr) - Ebeta(self))`,
/// the constrained-transport update that keeps the discrete divergence of
/// the face-averaged field numerically zero when every face started that way.
pub fn propagate_magnetic_field<G, Bnd>(grid: &mut G, id: CellId, alpha: Axis, dt: f64, boundary: &Bnd, config: &SolverConfig)
where
    G: Grid,
    Bnd: BoundaryEdgeE,
{
    let beta = alpha.next();
    let gamma = beta.next();

    let (di, dj, dk) = beta.offset(1);
    let plus_beta = grid.neighbor(id, di, dj, dk);
    let (di, dj, dk) = gamma.offset(1);
    let plus_gamma = grid.neighbor(id, di, dj, dk);

    let cell_mask = grid.neighbor_mask(id);
    let op_mask = config.operation_masks.propagate_b(alpha);
    assert!(
        !cell_mask.satisfies(op_mask) || (grid.params(plus_beta).is_some() && grid.params(plus_gamma).is_some()),
        "mask claims cell {id:?} satisfies face-B propagation along {alpha:?} but a required neighbor is missing"
    );

    let Some(self_cp) = grid.params(id) else { return };
    let dx = self_cp.d(beta);
    let dz = self_cp.d(gamma);
    let e_beta_self = self_cp.e.get(beta);
    let e_gamma_self = self_cp.e.get(gamma);

    let e_beta_plus_gamma = grid
        .params(plus_gamma)
        .map_or_else(|| boundary.boundary_edge_e(id, beta), |cp| cp.e.get(beta));
    let e_gamma_plus_beta = grid
        .params(plus_beta)
        .map_or_else(|| boundary.boundary_edge_e(id, gamma), |cp| cp.e.get(gamma));

    let delta = dt / dx * (e_gamma_plus_beta - e_gamma_self) - dt / dz * (e_beta_plus_gamma - e_beta_self);

    if let Some(cp) = grid.params_mut(id) {
        *cp.b.get_mut(alpha) += delta;
    }
}
