// crates/ctmhd-core/src/cell.rs

//! Cell identifiers and the per-cell parameter record.

use crate::axis::Axis;

/// Opaque 64-bit cell identifier supplied by the external grid.
///
/// `CellId::INVALID` (the all-zero id) is the sentinel meaning "no such
/// neighbor"; the grid never hands out a valid id equal to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u64);

impl CellId {
    /// Sentinel id meaning "does not exist".
    pub const INVALID: CellId = CellId(0);

    /// Whether this id refers to a real cell.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// A generic three-component vector value (B, E, or velocity), stored as
/// plain `f64` fields rather than an enum-indexed array: every stencil
/// operation in this crate addresses a component by name, never by a
/// computed index, so named fields rule out component-aliasing bugs that a
/// raw flat array indexed by a computed offset would invite.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    /// x component
    pub x: f64,
    /// y component
    pub y: f64,
    /// z component
    pub z: f64,
}

impl Vector3 {
    /// The zero vector.
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    /// Construct from components.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component along `axis`.
    #[inline]
    #[must_use]
    pub const fn get(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Mutable access to the component along `axis`.
    #[inline]
    #[must_use]
    pub fn get_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Squared Euclidean norm.
    #[inline]
    #[must_use]
    pub fn norm_sq(self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Whether every component is finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Per-cell parameter record.
///
/// `b`/`b_background` hold the perturbation and background face-averaged
/// field on the cell's −x/−y/−z faces respectively; the solver only ever
/// evolves the perturbation, `b`, and adds `b_background` back in whenever a
/// "total field" is needed (derivative pass, wave speed, reconstruction).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellParams {
    /// Cell size.
    pub dx: f64,
    /// Cell size.
    pub dy: f64,
    /// Cell size.
    pub dz: f64,

    /// Mass density. Must stay strictly positive.
    pub rho: f64,
    /// Momentum density components (ρVx, ρVy, ρVz).
    pub rhov: Vector3,

    /// Perturbation face-averaged B on the −x/−y/−z faces.
    pub b: Vector3,
    /// Background face-averaged B on the matching faces.
    pub b_background: Vector3,

    /// Edge-averaged E on the three edges meeting the cell's −x,−y,−z corner.
    pub e: Vector3,

    /// Volume-averaged perturbation B.
    pub b_vol: Vector3,
    /// Volume-averaged background B.
    pub b_vol_background: Vector3,
    /// Volume-averaged E.
    pub e_vol: Vector3,

    /// Reconstructed face-centered B, one vector per face axis (X,Y,Z faces).
    pub face_b: [Vector3; 3],
    /// Reconstructed face-centered E, one vector per face axis (X,Y,Z faces).
    pub face_e: [Vector3; 3],
}

impl CellParams {
    /// Total (perturbation + background) face-averaged B.
    #[inline]
    #[must_use]
    pub fn b_total(&self) -> Vector3 {
        Vector3::new(
            self.b.x + self.b_background.x,
            self.b.y + self.b_background.y,
            self.b.z + self.b_background.z,
        )
    }

    /// Bulk velocity `ρV / ρ`.
    ///
    /// # Panics
    /// Debug-asserts `rho > 0` since this is only ever called after the
    /// density-positivity check has already run.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> Vector3 {
        debug_assert!(self.rho > 0.0, "velocity() called with non-positive rho");
        Vector3::new(self.rhov.x / self.rho, self.rhov.y / self.rho, self.rhov.z / self.rho)
    }

    /// Cell size along `axis`.
    #[inline]
    #[must_use]
    pub fn d(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.dx,
            Axis::Y => self.dy,
            Axis::Z => self.dz,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_sentinel_is_zero() {
        assert_eq!(CellId::INVALID, CellId(0));
        assert!(!CellId::INVALID.is_valid());
        assert!(CellId(42).is_valid());
    }

    #[test]
    fn b_total_adds_background() {
        let mut cp = CellParams::default();
        cp.b = Vector3::new(1.0, 2.0, 3.0);
        cp.b_background = Vector3::new(0.5, 0.5, 0.5);
        let t = cp.b_total();
        assert_eq!(t, Vector3::new(1.5, 2.5, 3.5));
    }
}
