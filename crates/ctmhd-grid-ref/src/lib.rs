// crates/ctmhd-grid-ref/src/lib.rs

//! Single-process in-memory uniform cartesian implementation of the
//! [`Grid`] trait, for tests, demos, and the reference CLI. Not meant to
//! scale past a box that fits in one process's memory; a distributed mesh
//! would implement the same trait against its own partitioning and
//! halo-exchange machinery.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::collections::HashMap;

use ctmhd_core::{Axis, BoundaryDerivatives, BoundaryEdgeE, CellId, CellParams, Derivatives, Grid, NeighborMask, TransferKind};

/// Per-axis edge behavior for a [`UniformBox`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// Wrap around to the opposite face.
    Periodic,
    /// No neighbor past the domain edge; callers fall back to a boundary
    /// functor.
    Open,
}

/// A uniform `nx * ny * nz` box of cells, each offset `1` from its
/// neighbors along every axis. Exchange calls are no-ops: every cell is
/// always local, so there is nothing to wait for.
pub struct UniformBox {
    dims: (i32, i32, i32),
    boundary: [Boundary; 3],
    ids: HashMap<(i32, i32, i32), CellId>,
    coords: HashMap<CellId, (i32, i32, i32)>,
    params: HashMap<CellId, CellParams>,
    derivs: HashMap<CellId, Derivatives>,
    masks: HashMap<CellId, NeighborMask>,
}

impl UniformBox {
    /// Build an `nx * ny * nz` box with every cell defaulted and the given
    /// per-axis boundary behavior.
    #[must_use]
    pub fn new(nx: i32, ny: i32, nz: i32, boundary: [Boundary; 3]) -> Self {
        let mut ids = HashMap::new();
        let mut coords = HashMap::new();
        let mut params = HashMap::new();
        let mut derivs = HashMap::new();
        let mut next = 1_u64;
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let id = CellId(next);
                    next += 1;
                    ids.insert((i, j, k), id);
                    coords.insert(id, (i, j, k));
                    params.insert(id, CellParams { dx: 1.0, dy: 1.0, dz: 1.0, ..CellParams::default() });
                    derivs.insert(id, Derivatives::default());
                }
            }
        }
        Self { dims: (nx, ny, nz), boundary, ids, coords, params, derivs, masks: HashMap::new() }
    }

    /// The id at grid coordinate `(i, j, k)`, if in bounds.
    #[must_use]
    pub fn id_at(&self, i: i32, j: i32, k: i32) -> Option<CellId> {
        self.ids.get(&(i, j, k)).copied()
    }

    fn wrap(&self, axis_dim: i32, coord: i32, periodic: bool) -> Option<i32> {
        if coord >= 0 && coord < axis_dim {
            Some(coord)
        } else if periodic {
            Some(coord.rem_euclid(axis_dim))
        } else {
            None
        }
    }
}

impl Grid for UniformBox {
    fn params(&self, id: CellId) -> Option<&CellParams> {
        self.params.get(&id)
    }

    fn params_mut(&mut self, id: CellId) -> Option<&mut CellParams> {
        self.params.get_mut(&id)
    }

    fn derivatives(&self, id: CellId) -> Option<&Derivatives> {
        self.derivs.get(&id)
    }

    fn derivatives_mut(&mut self, id: CellId) -> Option<&mut Derivatives> {
        self.derivs.get_mut(&id)
    }

    fn neighbor(&self, id: CellId, di: i8, dj: i8, dk: i8) -> CellId {
        let Some(&(i, j, k)) = self.coords.get(&id) else {
            return CellId::INVALID;
        };
        let (nx, ny, nz) = self.dims;
        let periodic = |axis: Axis| self.boundary[axis.index()] == Boundary::Periodic;
        let Some(ni) = self.wrap(nx, i + i32::from(di), periodic(Axis::X)) else {
            return CellId::INVALID;
        };
        let Some(nj) = self.wrap(ny, j + i32::from(dj), periodic(Axis::Y)) else {
            return CellId::INVALID;
        };
        let Some(nk) = self.wrap(nz, k + i32::from(dk), periodic(Axis::Z)) else {
            return CellId::INVALID;
        };
        self.ids.get(&(ni, nj, nk)).copied().unwrap_or(CellId::INVALID)
    }

    fn local_cells(&self) -> Vec<CellId> {
        self.ids.values().copied().collect()
    }

    fn cells_with_local_neighbors(&self) -> Vec<CellId> {
        self.local_cells()
    }

    fn cells_with_remote_neighbors(&self) -> Vec<CellId> {
        Vec::new()
    }

    fn start_exchange(&mut self, _kind: TransferKind) {}
    fn wait_receives(&mut self, _kind: TransferKind) {}
    fn wait_sends(&mut self, _kind: TransferKind) {}

    fn neighbor_mask(&self, id: CellId) -> NeighborMask {
        self.masks.get(&id).copied().unwrap_or_default()
    }

    fn rebuild_neighbor_masks(&mut self) {
        let mut masks = HashMap::with_capacity(self.ids.len());
        for id in self.local_cells() {
            let mask = NeighborMask::build(|di, dj, dk| self.neighbor(id, di, dj, dk).is_valid());
            masks.insert(id, mask);
        }
        self.masks = masks;
    }
}

/// Zero-gradient boundary: a missing neighbor's derivative/edge-E is taken
/// to equal the asking cell's own current value, i.e. the field is assumed
/// flat across the domain edge.
pub struct ZeroGradientBoundary<'a> {
    grid: &'a UniformBox,
}

impl<'a> ZeroGradientBoundary<'a> {
    /// Build a zero-gradient boundary functor borrowing `grid`.
    #[must_use]
    pub const fn new(grid: &'a UniformBox) -> Self {
        Self { grid }
    }
}

impl BoundaryDerivatives for ZeroGradientBoundary<'_> {
    fn boundary_deriv_x(&self, id: CellId) -> Derivatives {
        self.grid.derivatives(id).copied().unwrap_or_default()
    }
    fn boundary_deriv_y(&self, id: CellId) -> Derivatives {
        self.grid.derivatives(id).copied().unwrap_or_default()
    }
    fn boundary_deriv_z(&self, id: CellId) -> Derivatives {
        self.grid.derivatives(id).copied().unwrap_or_default()
    }
}

impl BoundaryEdgeE for ZeroGradientBoundary<'_> {
    fn boundary_edge_e(&self, id: CellId, axis: Axis) -> f64 {
        self.grid.params(id).map_or(0.0, |cp| cp.e.get(axis))
    }
}
