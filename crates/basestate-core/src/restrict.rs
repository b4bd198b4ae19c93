// ─────────────────────────────────────────────────────────────────────
// Radial Base State — Restriction and Ghost Fill
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Level synchronisation for multilevel radial arrays.
//!
//! [`restrict_base`] makes every coarse value underneath a fine chunk agree
//! with the fine data. [`fill_ghost_base`] then populates the positions
//! just outside each fine chunk, never touching valid data.

use crate::geometry::BaseStateGeometry;
use basestate_types::config::GhostFillPolicy;
use basestate_types::constants::{GHOST_WIDTH, REF_RATIO};
use basestate_types::state::{Centering, RadialArray};

/// Restrict finest to coarsest: cell averages, edge injection.
pub fn restrict_base(geom: &BaseStateGeometry, s0: &mut RadialArray) {
    for n in (1..=geom.finest_radial_level).rev() {
        for c in geom.chunks(n) {
            match s0.centering() {
                Centering::Cell => {
                    for j in (c.start..c.end).step_by(REF_RATIO) {
                        s0[(n - 1, j / REF_RATIO)] = 0.5 * (s0[(n, j)] + s0[(n, j + 1)]);
                    }
                }
                Centering::Edge => {
                    for j in (c.start..=c.end + 1).step_by(REF_RATIO) {
                        s0[(n - 1, j / REF_RATIO)] = s0[(n, j)];
                    }
                }
            }
        }
    }
}

/// Fill up to [`GHOST_WIDTH`] positions on each side of every chunk above
/// level 0. Levels are filled coarse to fine so a coarse ghost can feed
/// the interpolation one level up.
pub fn fill_ghost_base(geom: &BaseStateGeometry, s0: &mut RadialArray, policy: GhostFillPolicy) {
    let centering = s0.centering();
    for n in 1..=geom.finest_radial_level {
        let len = s0.level_len(n);
        for c in geom.chunks(n) {
            let (lo, hi) = match centering {
                Centering::Cell => (c.start, c.end),
                Centering::Edge => (c.start, c.end + 1),
            };
            for g in 1..=GHOST_WIDTH {
                if let Some(r) = lo.checked_sub(g) {
                    if !geom.is_valid(n, r, centering) {
                        s0[(n, r)] = ghost_value(s0, n, lo, r, policy);
                    }
                }
                let r = hi + g;
                if r < len && !geom.is_valid(n, r, centering) {
                    s0[(n, r)] = ghost_value(s0, n, hi, r, policy);
                }
            }
        }
    }
}

/// Value for ghost `r` of level `n`; `bound` is the nearest valid index.
fn ghost_value(s0: &RadialArray, n: usize, bound: usize, r: usize, policy: GhostFillPolicy) -> f64 {
    match policy {
        GhostFillPolicy::CopyNearest => s0[(n, bound)],
        GhostFillPolicy::Linear => {
            let coarse = s0.level_slice(n - 1);
            match s0.centering() {
                Centering::Cell => {
                    let rc = r / REF_RATIO;
                    let slope = limited_slope(coarse, rc);
                    // Upper half of a coarse cell sits at +1/4 of its width.
                    let sign = if r % REF_RATIO == 1 { 1.0 } else { -1.0 };
                    coarse[rc] + sign * 0.25 * slope
                }
                Centering::Edge => {
                    if r % REF_RATIO == 0 {
                        coarse[r / REF_RATIO]
                    } else {
                        let rc = r / REF_RATIO;
                        match coarse.get(rc + 1) {
                            Some(&up) => 0.5 * (coarse[rc] + up),
                            None => coarse[rc],
                        }
                    }
                }
            }
        }
    }
}

/// Monotonized-central slope of `c` at `i`; zero at the array ends or at
/// an extremum.
fn limited_slope(c: &[f64], i: usize) -> f64 {
    if i == 0 || i + 1 >= c.len() {
        return 0.0;
    }
    let dl = c[i] - c[i - 1];
    let dr = c[i + 1] - c[i];
    if dl * dr <= 0.0 {
        return 0.0;
    }
    let dc = 0.5 * (c[i + 1] - c[i - 1]);
    let lim = 2.0 * dl.abs().min(dr.abs());
    dc.signum() * dc.abs().min(lim)
}
