// crates/ctmhd-physics/src/lib.rs

//! The per-cell numerical kernels of the constrained-transport field
//! solver: the derivative pass, the fast magnetosonic wave-speed estimate,
//! the upwinded edge electric field, the face-B propagator, the
//! divergence-free reconstruction, and face/volume averaging.
//!
//! Every kernel here is a pure function over [`ctmhd_core`] types and a
//! [`ctmhd_core::Grid`] borrow; none of them own mesh state.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod averaging;
pub mod derivatives;
pub mod edge_e;
pub mod propagate_b;
pub mod reconstruction;
pub mod wavespeed;

pub use averaging::{calculate_face_averaged_fields, calculate_volume_averaged_e, calculate_volume_averaged_fields};
pub use derivatives::calculate_derivatives;
pub use edge_e::calculate_edge_electric_field;
pub use propagate_b::propagate_magnetic_field;
pub use reconstruction::{reconstruction_coefficients, AxisReconstruction, ReconstructionCoefficients};
pub use wavespeed::fast_ms_speed;
