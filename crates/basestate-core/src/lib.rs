//! Multilevel radial base state and expansion-velocity solver.
//!
//! Geometry and chunk tables, level transfer (prolongation, restriction,
//! ghost fill), gravity, and the four w0 solution variants.

pub mod geometry;
pub mod gravity;
pub mod restrict;
pub mod uniform;
pub mod w0;

pub use geometry::{BaseStateGeometry, Chunk, CutoffCoords, TagArray};
pub use w0::{ExpansionVelocitySolver, W0Diagnostics, W0Inputs, W0Variant};
