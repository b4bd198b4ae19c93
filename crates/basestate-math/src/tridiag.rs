// ─────────────────────────────────────────────────────────────────────
// Radial Base State — Tridiag
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Thomas algorithm for tridiagonal systems.
//!
//! Used by the spherical and varying-gravity w0 solves, where the
//! boundary rows are written so that the system is diagonally stable.
//! There is no pivoting.

use basestate_types::error::{BaseStateError, BaseStateResult};

/// Solve tridiagonal system Au = r using the Thomas algorithm.
///
/// - `a`: sub-diagonal \[n\] (a\[0\] unused)
/// - `b`: main diagonal \[n\]
/// - `c`: super-diagonal \[n\] (c\[n-1\] unused)
/// - `r`: right-hand side \[n\]
///
/// Returns: solution vector u \[n\]
///
/// Fails with [`BaseStateError::SingularPivot`] if b\[0\] == 0 or if any
/// later pivot is exactly zero.
pub fn thomas_solve(a: &[f64], b: &[f64], c: &[f64], r: &[f64]) -> BaseStateResult<Vec<f64>> {
    let n = r.len();
    if n == 0 {
        return Err(BaseStateError::ConfigError(
            "tridiagonal system size must be > 0".to_string(),
        ));
    }
    if a.len() != n || b.len() != n || c.len() != n {
        return Err(BaseStateError::ConfigError(format!(
            "tridiagonal band lengths ({}, {}, {}) do not match rhs length {n}",
            a.len(),
            b.len(),
            c.len()
        )));
    }

    if b[0] == 0.0 {
        return Err(BaseStateError::SingularPivot { row: 0 });
    }

    let mut gam = vec![0.0; n];
    let mut u = vec![0.0; n];

    // Forward sweep
    let mut bet = b[0];
    u[0] = r[0] / bet;
    for j in 1..n {
        gam[j] = c[j - 1] / bet;
        bet = b[j] - a[j] * gam[j];
        if bet == 0.0 {
            return Err(BaseStateError::SingularPivot { row: j });
        }
        u[j] = (r[j] - a[j] * u[j - 1]) / bet;
    }

    // Back substitution
    for j in (0..n - 1).rev() {
        u[j] -= gam[j + 1] * u[j + 1];
    }

    Ok(u)
}
