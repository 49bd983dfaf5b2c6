// crates/ctmhd-core/src/grid.rs

//! The external collaborator traits this crate is built against: a
//! distributed structured mesh, its halo-exchange machinery, and the
//! boundary-condition functors that stand in for a real physical boundary.

use crate::axis::Axis;
use crate::cell::{CellId, CellParams};
use crate::derivatives::Derivatives;
use crate::mask::NeighborMask;

/// Which per-cell fields a halo exchange carries, mirroring the distinct
/// "transfer types" a distributed mesh library lets you select so that only
/// the bytes a given pass actually needs cross the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransferKind {
    /// B, ρ, ρV — needed before the derivative pass.
    BRho,
    /// The derivative record — needed before the edge electric field.
    Derivatives,
    /// Edge-averaged E — needed before the face-B propagator.
    E,
}

/// A structured mesh of cells, queryable by [`CellId`] and relative offset.
///
/// Implementors may be a single-process in-memory box (see `ctmhd-grid-ref`)
/// or a distributed mesh fronting MPI; this crate only ever goes through
/// this trait, never a concrete mesh type.
pub trait Grid {
    /// Cell parameters for `id`, or `None` if `id` is invalid or not owned
    /// by this rank.
    fn params(&self, id: CellId) -> Option<&CellParams>;

    /// Mutable cell parameters for `id`.
    fn params_mut(&mut self, id: CellId) -> Option<&mut CellParams>;

    /// The most recently computed derivative record for `id`, or `None` if
    /// the derivative pass has not yet run for this cell this step.
    fn derivatives(&self, id: CellId) -> Option<&Derivatives>;

    /// Mutable access to `id`'s derivative record, for the derivative pass
    /// to write into.
    fn derivatives_mut(&mut self, id: CellId) -> Option<&mut Derivatives>;

    /// The neighbor of `id` offset by `(di, dj, dk)` cells along x/y/z, or
    /// `CellId::INVALID` if no such neighbor exists (domain edge, or a
    /// coarser/finer mesh boundary this crate's uniform-mesh scope excludes).
    fn neighbor(&self, id: CellId, di: i8, dj: i8, dk: i8) -> CellId;

    /// Every cell this rank owns.
    fn local_cells(&self) -> Vec<CellId>;

    /// The subset of `local_cells()` whose full face/edge/corner neighbor
    /// set is locally resident — safe to process before a halo exchange
    /// completes.
    fn cells_with_local_neighbors(&self) -> Vec<CellId>;

    /// The subset of `local_cells()` that borders a remote rank and must
    /// wait for the halo exchange before processing.
    fn cells_with_remote_neighbors(&self) -> Vec<CellId>;

    /// Begin an asynchronous halo exchange of `kind`. Returns immediately;
    /// pair with [`Grid::wait_receives`]/[`Grid::wait_sends`].
    fn start_exchange(&mut self, kind: TransferKind);

    /// Block until incoming halo data for the most recent [`Grid::start_exchange`]
    /// has arrived and been written into the local neighbor cache.
    fn wait_receives(&mut self, kind: TransferKind);

    /// Block until this rank's outgoing halo sends have completed, so the
    /// send buffers are safe to reuse for the next pass.
    fn wait_sends(&mut self, kind: TransferKind);

    /// The cached 27-bit neighbor-existence mask for `id`, as of the most
    /// recent [`Grid::rebuild_neighbor_masks`] call. `NeighborMask::default()`
    /// (no bits set, not even the self bit) if the table has never been built.
    fn neighbor_mask(&self, id: CellId) -> NeighborMask;

    /// (Re)build the neighbor-mask table for every local cell by probing
    /// [`Grid::neighbor`] for each of the 26 offsets around it. Called once at
    /// solver initialization and again after every load rebalance; never
    /// during a time-step.
    fn rebuild_neighbor_masks(&mut self);
}

/// Boundary-supplied derivative values for a cell with no real neighbor on
/// one side (domain edge, or a projectedges-style analytic boundary).
pub trait BoundaryDerivatives {
    /// Boundary-condition fallback for `calculate_derivatives` when the
    /// neighbor mask lacks the x-face pair.
    fn boundary_deriv_x(&self, id: CellId) -> Derivatives;
    /// Boundary-condition fallback for the y-face pair.
    fn boundary_deriv_y(&self, id: CellId) -> Derivatives;
    /// Boundary-condition fallback for the z-face pair.
    fn boundary_deriv_z(&self, id: CellId) -> Derivatives;
}

/// Boundary-supplied edge E fallback for the face-B propagator's curl
/// stencil when one of the two edge neighbors it needs is missing.
pub trait BoundaryEdgeE {
    /// Boundary-condition value for the edge E component along `axis`
    /// touching `id`.
    fn boundary_edge_e(&self, id: CellId, axis: Axis) -> f64;
}
