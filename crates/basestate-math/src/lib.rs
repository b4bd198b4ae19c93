//! Numerical kernels for the radial base state.

pub mod tridiag;
