// crates/ctmhd-solver/src/lib.rs

//! `FieldSolver`: the single entry point a driver loop calls each step,
//! tying together initialization, the overlapped pass pipeline, and the
//! volume-averaging pass a diagnostic or plotting pass reads from.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::{bail, Result};
use tracing::info;

use ctmhd_core::{BoundaryDerivatives, BoundaryEdgeE, Grid, SolverConfig, TransferKind};
use ctmhd_physics::{calculate_face_averaged_fields, calculate_volume_averaged_e, calculate_volume_averaged_fields, reconstruction_coefficients};
use ctmhd_scheduler::{propagate_fields, run_derivative_pass, run_edge_e_pass};

/// Runs the per-step field propagation pipeline and the derived
/// face/volume-averaging passes against a [`Grid`] and a pair of boundary
/// functors.
pub struct FieldSolver {
    config: SolverConfig,
    /// Whether [`FieldSolver::propagate_fields`] actually advances B.
    /// A construction-time parameter rather than module state, per the
    /// source's "fields are propagated" flag; set `false` for a read-only
    /// solver instance (e.g. one that only ever calls
    /// [`FieldSolver::calculate_volume_averaged_fields`] for visualization).
    propagate_fields_enabled: bool,
}

impl FieldSolver {
    /// Build a solver for the given configuration, with field propagation
    /// enabled.
    #[must_use]
    pub const fn new(config: SolverConfig) -> Self {
        Self { config, propagate_fields_enabled: true }
    }

    /// Build a solver with field propagation explicitly enabled or disabled.
    #[must_use]
    pub const fn with_propagation(config: SolverConfig, propagate_fields_enabled: bool) -> Self {
        Self { config, propagate_fields_enabled }
    }

    /// The configuration this solver was built with.
    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// First-time setup: builds the neighbor-mask table, runs the
    /// derivative and edge electric field passes from the grid's current
    /// state, exchanges the resulting E, and populates volume/face
    /// averages so the first diagnostic read sees a consistent state.
    pub fn initialize<G, D>(&self, grid: &mut G, deriv_boundary: &D) -> Result<()>
    where
        G: Grid,
        D: BoundaryDerivatives,
    {
        info!(cells = grid.local_cells().len(), "initializing field solver state");
        grid.rebuild_neighbor_masks();
        run_derivative_pass(grid, &self.config, deriv_boundary);
        run_edge_e_pass(grid, &self.config);
        grid.start_exchange(TransferKind::E);
        grid.wait_receives(TransferKind::E);
        grid.wait_sends(TransferKind::E);
        self.calculate_volume_averaged_fields(grid)
    }

    /// Rebuild the neighbor-mask table after the grid's cell ownership has
    /// changed (load rebalance, AMR refine/coarsen), then re-exchange E so
    /// every rank's halo is consistent with its new neighbor set.
    pub fn initialize_after_rebalance<G: Grid>(&self, grid: &mut G) -> Result<()> {
        grid.rebuild_neighbor_masks();
        grid.start_exchange(TransferKind::E);
        grid.wait_receives(TransferKind::E);
        grid.wait_sends(TransferKind::E);
        Ok(())
    }

    /// Advance B by one step of size `dt`: derivative pass, edge electric
    /// field, then the face-B curl-E update, each overlapped with its own
    /// halo exchange. A no-op when this solver was built with field
    /// propagation disabled.
    pub fn propagate_fields<G, D, E>(&self, grid: &mut G, dt: f64, deriv_boundary: &D, edge_boundary: &E) -> Result<()>
    where
        G: Grid,
        D: BoundaryDerivatives,
        E: BoundaryEdgeE,
    {
        if !self.propagate_fields_enabled {
            return Ok(());
        }
        if dt <= 0.0 {
            bail!("propagate_fields called with non-positive dt: {dt}");
        }
        propagate_fields(grid, &self.config, dt, deriv_boundary, edge_boundary);
        Ok(())
    }

    /// Recompute every local cell's face- and volume-averaged B and E from
    /// its current face-B/derivative state, for diagnostics or a downstream
    /// solver that reads volume-centered fields.
    pub fn calculate_volume_averaged_fields<G: Grid>(&self, grid: &mut G) -> Result<()> {
        let ids = grid.local_cells();
        for id in ids {
            let Some(cp) = grid.params(id).copied() else { continue };
            let Some(derivs) = grid.derivatives(id).copied() else { continue };

            let plus_x = grid.neighbor(id, 1, 0, 0);
            let plus_y = grid.neighbor(id, 0, 1, 0);
            let plus_z = grid.neighbor(id, 0, 0, 1);
            let nbr = |id: ctmhd_core::CellId, grid: &G| -> Option<(ctmhd_core::CellParams, ctmhd_core::Derivatives)> {
                Some((*grid.params(id)?, *grid.derivatives(id)?))
            };
            let px = nbr(plus_x, grid);
            let py = nbr(plus_y, grid);
            let pz = nbr(plus_z, grid);

            let coeffs = reconstruction_coefficients(
                &cp,
                &derivs,
                px.as_ref().map(|(c, d)| (c, d)),
                py.as_ref().map(|(c, d)| (c, d)),
                pz.as_ref().map(|(c, d)| (c, d)),
                self.config.order,
            );

            let minus_x = grid.neighbor(id, -1, 0, 0);
            let minus_y = grid.neighbor(id, 0, -1, 0);
            let minus_z = grid.neighbor(id, 0, 0, -1);
            let mx = nbr(minus_x, grid).map(|(c, d)| (c, reconstruction_coefficients(&c, &d, None, None, None, self.config.order)));
            let my = nbr(minus_y, grid).map(|(c, d)| (c, reconstruction_coefficients(&c, &d, None, None, None, self.config.order)));
            let mz = nbr(minus_z, grid).map(|(c, d)| (c, reconstruction_coefficients(&c, &d, None, None, None, self.config.order)));

            let faces = calculate_face_averaged_fields(
                &cp,
                &coeffs,
                mx.as_ref().map(|(c, co)| (c, co)),
                my.as_ref().map(|(c, co)| (c, co)),
                mz.as_ref().map(|(c, co)| (c, co)),
            );
            let vol_b = calculate_volume_averaged_fields(&cp, &coeffs);
            let edge_e = [cp.e.x, cp.e.y, cp.e.z].map(Some);
            let vol_e = calculate_volume_averaged_e(edge_e);

            if let Some(cp) = grid.params_mut(id) {
                cp.face_b = faces;
                cp.b_vol = vol_b;
                cp.e_vol = vol_e;
            }
        }
        Ok(())
    }

    /// Release any solver-owned resources. Kept for symmetry with
    /// `initialize`; there is nothing to free today since this solver holds
    /// no allocations beyond its own config.
    pub fn finalize(self) -> Result<()> {
        Ok(())
    }
}
