// crates/ctmhd-core/src/lib.rs

//! Core data types, neighbor-mask bookkeeping, and slope limiter for the
//! constrained-transport MHD field solver.
//!
//! This crate owns the per-cell record layout, the
//! `Grid`/boundary-functor traits that stand in for the external
//! collaborators, and the one numerical primitive (the slope limiter) small
//! enough to live alongside the data model. The heavier numerics (derivative
//! pass, edge-E, face-B propagation, reconstruction) live in `ctmhd-physics`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod axis;
pub mod cell;
pub mod config;
pub mod derivatives;
pub mod grid;
pub mod limiter;
pub mod mask;

pub use axis::Axis;
pub use cell::{CellId, CellParams, Vector3};
pub use config::{LimiterKind, Order, SolverConfig};
pub use derivatives::Derivatives;
pub use grid::{BoundaryDerivatives, BoundaryEdgeE, Grid, TransferKind};
pub use limiter::limit_slope;
pub use mask::{NeighborMask, OperationMasks};
