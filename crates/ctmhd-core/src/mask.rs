// crates/ctmhd-core/src/mask.rs

//! Neighbor-existence bitmask and the per-operation masks derived from it.

/// Maps an offset `(i, j, k) in {0,1,2}^3` (1 meaning "no offset") to a bit
/// position in a 27-bit neighbor mask, `k*9 + j*3 + i`. The center cell
/// (`1,1,1`) always lands on bit 13.
#[inline]
#[must_use]
pub const fn nbr_bit(i: u8, j: u8, k: u8) -> u32 {
    (k as u32) * 9 + (j as u32) * 3 + (i as u32)
}

/// Which of a cell's 26 face/edge/corner neighbors exist, plus the cell
/// itself (always set).
///
/// Built once per cell from a [`crate::grid::Grid`] neighbor query; cached
/// and reused across every operation that masks against it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeighborMask(pub u32);

impl NeighborMask {
    /// The bit for the cell itself, always set by [`NeighborMask::build`].
    pub const SELF_BIT: u32 = 1 << 13;

    /// Build a mask by probing `exists(di, dj, dk)` for every offset in
    /// `{-1,0,1}^3`. `exists` receives the signed offset from the center
    /// cell (e.g. `(-1, 0, 0)` for the −x neighbor).
    #[must_use]
    pub fn build(mut exists: impl FnMut(i8, i8, i8) -> bool) -> Self {
        let mut bits = Self::SELF_BIT;
        for dk in -1_i8..=1 {
            for dj in -1_i8..=1 {
                for di in -1_i8..=1 {
                    if di == 0 && dj == 0 && dk == 0 {
                        continue;
                    }
                    if exists(di, dj, dk) {
                        let (i, j, k) = ((di + 1) as u8, (dj + 1) as u8, (dk + 1) as u8);
                        bits |= 1 << nbr_bit(i, j, k);
                    }
                }
            }
        }
        Self(bits)
    }

    /// Whether every bit set in `required` is also set here.
    #[inline]
    #[must_use]
    pub const fn satisfies(self, required: u32) -> bool {
        (self.0 & required) == required
    }

    /// Whether the cell itself is marked present.
    #[inline]
    #[must_use]
    pub const fn has_self(self) -> bool {
        (self.0 & Self::SELF_BIT) != 0
    }
}

/// Bit-pattern requirements for each per-cell operation, built once from
/// axis-aligned single-offset neighbor bits (never diagonals or corners).
#[derive(Clone, Copy, Debug)]
pub struct OperationMasks {
    /// Needs the −x and +x neighbors.
    pub calculate_dx: u32,
    /// Needs the −y and +y neighbors.
    pub calculate_dy: u32,
    /// Needs the −z and +z neighbors.
    pub calculate_dz: u32,
    /// Needs the −x, +x, −y, −z neighbors.
    pub calculate_ex: u32,
    /// Needs the −x, −y, +y, −z neighbors.
    pub calculate_ey: u32,
    /// Needs the −x, −y, −z, +z neighbors.
    pub calculate_ez: u32,
    /// Needs the −x, −y, +y, −z, +z neighbors.
    pub propagate_bx: u32,
    /// Needs the −x, +x, −y, −z, +z neighbors.
    pub propagate_by: u32,
    /// Needs the −x, +x, −y, −z, +y neighbors.
    pub propagate_bz: u32,
}

impl OperationMasks {
    /// The mask required before the derivative pass may run on axis `axis`.
    #[must_use]
    pub const fn calculate_d(self, axis: crate::axis::Axis) -> u32 {
        match axis {
            crate::axis::Axis::X => self.calculate_dx,
            crate::axis::Axis::Y => self.calculate_dy,
            crate::axis::Axis::Z => self.calculate_dz,
        }
    }

    /// The mask required before the edge-E pass may run the edge parallel to
    /// `axis`.
    #[must_use]
    pub const fn calculate_e(self, axis: crate::axis::Axis) -> u32 {
        match axis {
            crate::axis::Axis::X => self.calculate_ex,
            crate::axis::Axis::Y => self.calculate_ey,
            crate::axis::Axis::Z => self.calculate_ez,
        }
    }

    /// The mask required before face-B propagation may run on the
    /// `axis`-normal face.
    #[must_use]
    pub const fn propagate_b(self, axis: crate::axis::Axis) -> u32 {
        match axis {
            crate::axis::Axis::X => self.propagate_bx,
            crate::axis::Axis::Y => self.propagate_by,
            crate::axis::Axis::Z => self.propagate_bz,
        }
    }

    /// Construct the nine masks from the single-axis-offset neighbor bits.
    #[must_use]
    pub fn build() -> Self {
        let bit = |di: i8, dj: i8, dk: i8| -> u32 {
            let (i, j, k) = ((di + 1) as u8, (dj + 1) as u8, (dk + 1) as u8);
            1 << nbr_bit(i, j, k)
        };

        let minus_x = bit(-1, 0, 0);
        let plus_x = bit(1, 0, 0);
        let minus_y = bit(0, -1, 0);
        let plus_y = bit(0, 1, 0);
        let minus_z = bit(0, 0, -1);
        let plus_z = bit(0, 0, 1);

        Self {
            calculate_dx: minus_x | plus_x,
            calculate_dy: minus_y | plus_y,
            calculate_dz: minus_z | plus_z,

            calculate_ex: minus_y | minus_z | minus_x | plus_x,
            calculate_ey: minus_x | minus_z | minus_y | plus_y,
            calculate_ez: minus_x | minus_y | minus_z | plus_z,

            propagate_bx: minus_x | minus_y | plus_y | minus_z | plus_z,
            propagate_by: minus_y | minus_x | plus_x | minus_z | plus_z,
            propagate_bz: minus_z | minus_x | plus_x | minus_y | plus_y,
        }
    }
}

impl Default for OperationMasks {
    fn default() -> Self {
        Self::build()
    }
}
