// crates/ctmhd-physics/src/derivatives.rs

//! Limited-slope derivative pass: one call per cell, populating every
//! transverse derivative its downstream neighbors need.

use ctmhd_core::{limit_slope, Axis, BoundaryDerivatives, CellId, Derivatives, Grid, SolverConfig};

/// Compute the limited derivative record for `id`.
///
/// For each axis `d`, the ρ and velocity derivatives use the face-normal
/// neighbors along `d`; the transverse B derivatives skip the component
/// that lies along `d` itself, since that one is fixed by the divergence-free
/// reconstruction constraint rather than sampled directly.
///
/// Falls back to `boundary` wherever a face-normal neighbor along `d` is
/// missing (a domain edge).
pub fn calculate_derivatives<G, B>(grid: &G, id: CellId, config: &SolverConfig, boundary: &B) -> Derivatives
where
    G: Grid,
    B: BoundaryDerivatives,
{
    let mut out = Derivatives::default();
    let Some(center) = grid.params(id) else {
        return out;
    };
    let center = *center;

    let cell_mask = grid.neighbor_mask(id);

    for &d in &Axis::ALL {
        let (di, dj, dk) = d.offset(-1);
        let left_id = grid.neighbor(id, di, dj, dk);
        let (di, dj, dk) = d.offset(1);
        let right_id = grid.neighbor(id, di, dj, dk);

        let sides = grid.params(left_id).zip(grid.params(right_id));
        let op_mask = config.operation_masks.calculate_d(d);
        assert!(
            sides.is_some() || !cell_mask.satisfies(op_mask),
            "mask claims both {d:?} face neighbors exist for cell {id:?} but the grid returned none for at least one"
        );
        let Some((left, right)) = sides else {
            let fallback = match d {
                Axis::X => boundary.boundary_deriv_x(id),
                Axis::Y => boundary.boundary_deriv_y(id),
                Axis::Z => boundary.boundary_deriv_z(id),
            };
            *out.drho.get_mut(d) = fallback.drho.get(d);
            for other in Axis::ALL {
                if other != d {
                    *out.db.cross_mut(other, d) = fallback.db.cross(other, d);
                }
            }
            for comp in Axis::ALL {
                *out.dv[comp.index()].get_mut(d) = fallback.dv[comp.index()].get(d);
            }
            continue;
        };

        *out.drho.get_mut(d) = limit_slope(left.rho, center.rho, right.rho, config.limiter);

        for other in Axis::ALL {
            if other == d {
                continue;
            }
            let l = left.b_total().get(other);
            let c = center.b_total().get(other);
            let r = right.b_total().get(other);
            *out.db.cross_mut(other, d) = limit_slope(l, c, r, config.limiter);
        }

        let (lv, cv, rv) = (left.velocity(), center.velocity(), right.velocity());
        for comp in Axis::ALL {
            let slope = limit_slope(lv.get(comp), cv.get(comp), rv.get(comp), config.limiter);
            *out.dv[comp.index()].get_mut(d) = slope;
        }
    }

    out.finite = out.is_finite();
    if config.debug_checks {
        debug_assert!(out.finite, "non-finite derivative computed for cell {id:?}");
    }
    out
}
