// crates/ctmhd-core/src/derivatives.rs

//! Per-cell limited-derivative record, populated by the derivative pass in
//! `ctmhd-physics`.

use crate::axis::Axis;
use crate::cell::Vector3;

/// Cross-direction derivatives of the transverse B components.
///
/// Only cross-direction derivatives are ever stored: the same-direction
/// derivative of a face-normal B component is determined by the div-free
/// constraint instead, and is never materialized here.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransverseB {
    /// dBx/dy
    pub dbx_dy: f64,
    /// dBx/dz
    pub dbx_dz: f64,
    /// dBy/dx
    pub dby_dx: f64,
    /// dBy/dz
    pub dby_dz: f64,
    /// dBz/dx
    pub dbz_dx: f64,
    /// dBz/dy
    pub dbz_dy: f64,
}

impl TransverseB {
    /// Cross derivative of the `component` axis's B with respect to `wrt`.
    ///
    /// # Panics
    /// Panics if `component == wrt`: the same-direction derivative of a
    /// face-normal component is never stored here (see [`crate::derivatives::Derivatives`]).
    #[inline]
    #[must_use]
    pub const fn cross(&self, component: Axis, wrt: Axis) -> f64 {
        match (component, wrt) {
            (Axis::X, Axis::Y) => self.dbx_dy,
            (Axis::X, Axis::Z) => self.dbx_dz,
            (Axis::Y, Axis::X) => self.dby_dx,
            (Axis::Y, Axis::Z) => self.dby_dz,
            (Axis::Z, Axis::X) => self.dbz_dx,
            (Axis::Z, Axis::Y) => self.dbz_dy,
            _ => panic!("cross() called with component == wrt"),
        }
    }

    /// Mutable access to the same cross derivative addressed by [`TransverseB::cross`].
    #[inline]
    #[must_use]
    pub fn cross_mut(&mut self, component: Axis, wrt: Axis) -> &mut f64 {
        match (component, wrt) {
            (Axis::X, Axis::Y) => &mut self.dbx_dy,
            (Axis::X, Axis::Z) => &mut self.dbx_dz,
            (Axis::Y, Axis::X) => &mut self.dby_dx,
            (Axis::Y, Axis::Z) => &mut self.dby_dz,
            (Axis::Z, Axis::X) => &mut self.dbz_dx,
            (Axis::Z, Axis::Y) => &mut self.dbz_dy,
            _ => panic!("cross_mut() called with component == wrt"),
        }
    }
}

/// Limited first derivatives stored per cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Derivatives {
    /// dρ/dx, dρ/dy, dρ/dz
    pub drho: Vector3,
    /// Cross-direction derivatives of the transverse B components.
    pub db: TransverseB,
    /// dVx/d{x,y,z}, dVy/d{x,y,z}, dVz/d{x,y,z}, indexed 0=Vx,1=Vy,2=Vz.
    pub dv: [Vector3; 3],

    /// Whether every field above is finite. Populated by the derivative
    /// pass; a `false` here is only ever reached in
    /// `SolverConfig::debug_checks == false` builds, where the boundary
    /// fall-back is allowed to leave a coarse (but still finite) guess
    /// rather than abort.
    pub finite: bool,
}

impl Derivatives {
    /// Returns `true` iff every stored component is finite (used by the
    /// `DEBUG_SOLVERS`-equivalent assertion in the derivative pass).
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.drho.is_finite()
            && self.db.dbx_dy.is_finite()
            && self.db.dbx_dz.is_finite()
            && self.db.dby_dx.is_finite()
            && self.db.dby_dz.is_finite()
            && self.db.dbz_dx.is_finite()
            && self.db.dbz_dy.is_finite()
            && self.dv.iter().all(|v| v.is_finite())
    }
}
