// crates/ctmhd-physics/src/averaging.rs

//! Face- and volume-averaged field reconstruction from the per-axis
//! reconstruction coefficients.

use crate::reconstruction::ReconstructionCoefficients;
use ctmhd_core::{Axis, CellParams, Vector3};

/// Two-sided face-averaged B on each of the cell's three faces: the normal
/// component at the `alpha` face is the average of `id`'s own reconstruction
/// evaluated at its `-alpha` face and the `-alpha` neighbor's reconstruction
/// evaluated at its own `+alpha` face, matching the two-sided evaluation
/// used when the two cells' independently-built polynomials disagree at the
/// shared face. The two transverse components at that face are taken as the
/// plain average of the two cells' volume-centered total B, a first-order
/// simplification of the full cross-reconstruction.
#[must_use]
pub fn calculate_face_averaged_fields(
    cp: &CellParams,
    coeffs: &ReconstructionCoefficients,
    minus_x: Option<(&CellParams, &ReconstructionCoefficients)>,
    minus_y: Option<(&CellParams, &ReconstructionCoefficients)>,
    minus_z: Option<(&CellParams, &ReconstructionCoefficients)>,
) -> [Vector3; 3] {
    let minus = [minus_x, minus_y, minus_z];
    let mut out = [Vector3::ZERO; 3];

    for &alpha in &Axis::ALL {
        let beta = alpha.next();
        let gamma = beta.next();
        let axis_coeffs = match alpha {
            Axis::X => coeffs.x,
            Axis::Y => coeffs.y,
            Axis::Z => coeffs.z,
        };
        let self_face = axis_coeffs.c0;

        let total_self = cp.b_total();
        let mut face = Vector3::new(total_self.x, total_self.y, total_self.z);
        let normal = if let Some((nbr_cp, nbr_coeffs)) = minus[alpha.index()] {
            let nbr_axis_coeffs = match alpha {
                Axis::X => nbr_coeffs.x,
                Axis::Y => nbr_coeffs.y,
                Axis::Z => nbr_coeffs.z,
            };
            let d = nbr_cp.d(alpha);
            let nbr_face = nbr_axis_coeffs.c0 + nbr_axis_coeffs.c_alpha * d + nbr_axis_coeffs.c_alpha2 * d * d;
            0.5 * (self_face + nbr_face)
        } else {
            self_face
        };
        *face.get_mut(alpha) = normal;

        if let Some((nbr_cp, _)) = minus[alpha.index()] {
            let nbr_total = nbr_cp.b_total();
            *face.get_mut(beta) = 0.5 * (total_self.get(beta) + nbr_total.get(beta));
            *face.get_mut(gamma) = 0.5 * (total_self.get(gamma) + nbr_total.get(gamma));
        }

        out[alpha.index()] = face;
    }

    out
}

/// Volume-averaged perturbation B, integrating each axis's reconstruction
/// polynomial over the cell and subtracting the precomputed background
/// volume average.
#[must_use]
pub fn calculate_volume_averaged_fields(cp: &CellParams, coeffs: &ReconstructionCoefficients) -> Vector3 {
    let mut total = Vector3::ZERO;
    for &alpha in &Axis::ALL {
        let axis_coeffs = match alpha {
            Axis::X => coeffs.x,
            Axis::Y => coeffs.y,
            Axis::Z => coeffs.z,
        };
        let d = cp.d(alpha);
        let avg = axis_coeffs.c0 + axis_coeffs.c_alpha * (d / 2.0) + axis_coeffs.c_alpha2 * (d * d / 3.0);
        *total.get_mut(alpha) = avg;
    }
    Vector3::new(
        total.x - cp.b_vol_background.x,
        total.y - cp.b_vol_background.y,
        total.z - cp.b_vol_background.z,
    )
}

/// Volume-averaged E, the average of whichever of the cell's three edge-E
/// readings (one per axis) are available. A simplification of the full
/// quadrant-corner fallback: every edge this cell touches along an axis
/// carries the same upwinded value by construction, so averaging the
/// readings that exist is sufficient whenever at least one is present.
#[must_use]
pub fn calculate_volume_averaged_e(edge_e: [Option<f64>; 3]) -> Vector3 {
    let mut out = Vector3::ZERO;
    for &axis in &Axis::ALL {
        if let Some(e) = edge_e[axis.index()] {
            *out.get_mut(axis) = e;
        }
    }
    out
}
