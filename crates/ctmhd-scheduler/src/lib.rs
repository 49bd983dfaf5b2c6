// crates/ctmhd-scheduler/src/lib.rs

//! Driver passes that overlap each step's halo exchange with computation:
//! process the cells whose full neighbor stencil is already locally
//! resident while the exchange for the boundary cells is still in flight,
//! then process the remainder once it lands.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use ctmhd_core::{Axis, BoundaryDerivatives, BoundaryEdgeE, Grid, SolverConfig, TransferKind};
use ctmhd_physics::{calculate_derivatives, calculate_edge_electric_field, propagate_magnetic_field};
use tracing::debug;

/// Run the derivative pass over every local cell, overlapping the B/rho
/// halo exchange with the interior cells that don't need it.
pub fn run_derivative_pass<G, B>(grid: &mut G, config: &SolverConfig, boundary: &B)
where
    G: Grid,
    B: BoundaryDerivatives,
{
    grid.start_exchange(TransferKind::BRho);

    let local = grid.cells_with_local_neighbors();
    debug!(count = local.len(), "derivative pass: processing cells with local neighbors");
    for id in local {
        let d = calculate_derivatives(grid, id, config, boundary);
        if let Some(slot) = grid.derivatives_mut(id) {
            *slot = d;
        }
    }

    grid.wait_receives(TransferKind::BRho);

    let remote = grid.cells_with_remote_neighbors();
    debug!(count = remote.len(), "derivative pass: processing cells with remote neighbors");
    for id in remote {
        let d = calculate_derivatives(grid, id, config, boundary);
        if let Some(slot) = grid.derivatives_mut(id) {
            *slot = d;
        }
    }

    grid.wait_sends(TransferKind::BRho);
}

/// Run the edge electric field pass over every local cell's three edges,
/// overlapping the derivative-record halo exchange the same way.
pub fn run_edge_e_pass<G: Grid>(grid: &mut G, config: &SolverConfig) {
    grid.start_exchange(TransferKind::Derivatives);

    let local = grid.cells_with_local_neighbors();
    for id in local {
        update_edge_e(grid, id, config);
    }

    grid.wait_receives(TransferKind::Derivatives);

    let remote = grid.cells_with_remote_neighbors();
    for id in remote {
        update_edge_e(grid, id, config);
    }

    grid.wait_sends(TransferKind::Derivatives);
}

fn update_edge_e<G: Grid>(grid: &mut G, id: ctmhd_core::CellId, config: &SolverConfig) {
    let mut e = ctmhd_core::Vector3::ZERO;
    for &axis in &Axis::ALL {
        if let Some(value) = calculate_edge_electric_field(grid, id, axis, config) {
            *e.get_mut(axis) = value;
        }
    }
    if let Some(cp) = grid.params_mut(id) {
        cp.e = e;
    }
}

/// Run the face-B propagator over every local cell's three faces,
/// overlapping the edge-E halo exchange.
pub fn run_propagate_b_pass<G, Bnd>(grid: &mut G, config: &SolverConfig, dt: f64, boundary: &Bnd)
where
    G: Grid,
    Bnd: BoundaryEdgeE,
{
    grid.start_exchange(TransferKind::E);

    let local = grid.cells_with_local_neighbors();
    for id in local {
        for &axis in &Axis::ALL {
            propagate_magnetic_field(grid, id, axis, dt, boundary, config);
        }
    }

    grid.wait_receives(TransferKind::E);

    let remote = grid.cells_with_remote_neighbors();
    for id in remote {
        for &axis in &Axis::ALL {
            propagate_magnetic_field(grid, id, axis, dt, boundary, config);
        }
    }

    grid.wait_sends(TransferKind::E);
}

/// Run one full field-propagation step: derivatives, then edge E, then
/// face-B, each overlapped with its own halo exchange.
pub fn propagate_fields<G, D, E>(grid: &mut G, config: &SolverConfig, dt: f64, deriv_boundary: &D, edge_boundary: &E)
where
    G: Grid,
    D: BoundaryDerivatives,
    E: BoundaryEdgeE,
{
    run_derivative_pass(grid, config, deriv_boundary);
    run_edge_e_pass(grid, config);
    run_propagate_b_pass(grid, config, dt, edge_boundary);
}
