// crates/ctmhd-core/src/limiter.rs

//! Monotone three-point slope limiter.

use crate::config::LimiterKind;

/// Limit the slope through three colinear samples `(left, center, right)`.
///
/// Returns `0.0` when `(center - left)` and `(right - center)` have opposite
/// signs (a local extremum); otherwise returns the selected limiter's
/// estimate of the slope. The result is always finite for finite inputs,
/// asserted in debug builds both here and at the call site in the
/// derivative pass.
#[inline]
#[must_use]
pub fn limit_slope(left: f64, center: f64, right: f64, kind: LimiterKind) -> f64 {
    let dl = center - left;
    let dr = right - center;

    let limited = if dl * dr <= 0.0 {
        0.0
    } else {
        match kind {
            LimiterKind::MinMod => minmod(dl, dr),
            LimiterKind::Mc => monotonized_central(dl, dr),
            LimiterKind::VanLeer => van_leer(dl, dr),
        }
    };

    debug_assert!(limited.is_finite(), "limiter produced a non-finite slope: {limited}");
    limited
}

/// minmod(dl, dr); only called once `dl*dr > 0`, so the sign is shared.
#[inline]
fn minmod(dl: f64, dr: f64) -> f64 {
    if dl.abs() < dr.abs() {
        dl
    } else {
        dr
    }
}

/// Monotonized-central limiter: the central-difference slope clamped to
/// `2*min(|dl|,|dr|)`.
#[inline]
fn monotonized_central(dl: f64, dr: f64) -> f64 {
    let central = 0.5 * (dl + dr);
    let bound = 2.0 * dl.abs().min(dr.abs());
    central.signum() * central.abs().min(bound)
}

/// Van Leer limiter: harmonic mean of the two one-sided slopes.
#[inline]
fn van_leer(dl: f64, dr: f64) -> f64 {
    2.0 * dl * dr / (dl + dr)
}
