// ─────────────────────────────────────────────────────────────────────
// Radial Base State — Spherical w0
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Self-gravitating spherical w0 on the single base-state level.
//!
//! `w0 = u / r_edge² + w0_from_sbar` inside the cutoff, where `u` solves a
//! tridiagonal system. Above the cutoff `w0` falls off as `1/r²`. The
//! regular and irregular variants differ only in the local widths used
//! for the finite differences.

use super::{nph, W0Context, W0Inputs, W0Kernel};
use crate::geometry::BaseStateGeometry;
use crate::gravity::grav_edge_spherical;
use basestate_math::tridiag::thomas_solve;
use basestate_types::constants::G_CONST;
use basestate_types::error::{BaseStateError, BaseStateResult};
use basestate_types::state::BaseState;
use ndarray::{Array1, ArrayView1};
use rayon::prelude::*;
use std::f64::consts::PI;

pub(crate) struct Spherical;

pub(crate) struct SphericalIrregular;

impl W0Kernel for Spherical {
    fn compute_w0(
        &self,
        ctx: &W0Context<'_>,
        state: &mut BaseState,
        inputs: &W0Inputs<'_>,
    ) -> BaseStateResult<()> {
        let geom = ctx.geom;
        let spacing = Widths::Regular { dr: geom.dr(0) };
        let max_cutoff = geom.base_cutoff_density_coord(0).min(geom.nr(0) - 1);
        solve_spherical(ctx, state, inputs, spacing, max_cutoff)
    }
}

impl W0Kernel for SphericalIrregular {
    fn compute_w0(
        &self,
        ctx: &W0Context<'_>,
        state: &mut BaseState,
        inputs: &W0Inputs<'_>,
    ) -> BaseStateResult<()> {
        let geom = ctx.geom;
        let spacing = Widths::Irregular {
            r_edge: geom.r_edge_loc.level(0),
            r_cc: geom.r_cc_loc.level(0),
        };
        let coord = geom.base_cutoff_density_coord(0);
        let nr = geom.nr(0);
        if coord > nr - 1 {
            // No room for the outer boundary row.
            return Err(BaseStateError::CutoffOutOfRange { coord, nr });
        }
        solve_spherical(ctx, state, inputs, spacing, coord)
    }
}

/// Local grid widths around edge `r`.
#[derive(Clone, Copy)]
enum Widths<'a> {
    Regular { dr: f64 },
    Irregular { r_edge: ArrayView1<'a, f64>, r_cc: ArrayView1<'a, f64> },
}

impl Widths<'_> {
    /// Width of cell `r - 1`.
    fn below(&self, r: usize) -> f64 {
        match self {
            Widths::Regular { dr } => *dr,
            Widths::Irregular { r_edge, .. } => r_edge[r] - r_edge[r - 1],
        }
    }

    /// Width of cell `r`.
    fn above(&self, r: usize) -> f64 {
        match self {
            Widths::Regular { dr } => *dr,
            Widths::Irregular { r_edge, .. } => r_edge[r + 1] - r_edge[r],
        }
    }

    /// Distance between the centers of cells `r - 1` and `r`.
    fn centers(&self, r: usize) -> f64 {
        match self {
            Widths::Regular { dr } => *dr,
            Widths::Irregular { r_cc, .. } => r_cc[r] - r_cc[r - 1],
        }
    }
}

fn solve_spherical(
    ctx: &W0Context<'_>,
    state: &mut BaseState,
    inputs: &W0Inputs<'_>,
    widths: Widths<'_>,
    max_cutoff: usize,
) -> BaseStateResult<()> {
    let geom: &BaseStateGeometry = ctx.geom;
    let cfg = ctx.config;
    let nr = geom.nr(0);
    let dt = inputs.dt;
    let r_cc = geom.r_cc_loc.level(0);
    let r_edge = geom.r_edge_loc.level(0);

    let p0_nph = nph(inputs.old.p0.level(0), inputs.new.p0.level(0));
    let rho0_nph = nph(inputs.old.rho0.level(0), inputs.new.rho0.level(0));
    let g1_nph = nph(inputs.old.gamma1bar.level(0), inputs.new.gamma1bar.level(0));
    let g1p0_nph = &g1_nph * &p0_nph;

    // r² w0 integrated from the source and the volume discrepancy.
    let mut w0_from_sbar = Array1::<f64>::zeros(nr + 1);
    for r in 1..=nr {
        let k = r - 1;
        let dr = widths.below(r);
        let volume_discrepancy = if inputs.old.rho0[(0, k)] > cfg.cutoffs.base_cutoff_density {
            cfg.dpdt_factor * inputs.p0_minus_peosbar[(0, k)] / dt
        } else {
            0.0
        };
        let rcc2 = r_cc[k] * r_cc[k];
        let mut w = w0_from_sbar[k] + dr * inputs.sbar[(0, k)] * rcc2;
        if volume_discrepancy != 0.0 {
            w -= dr * volume_discrepancy * rcc2 / g1p0_nph[k];
        }
        w0_from_sbar[r] = w;
    }
    for r in 1..=nr {
        w0_from_sbar[r] /= r_edge[r] * r_edge[r];
    }

    let grav_edge = grav_edge_spherical(geom, rho0_nph.view());
    let eta_cc = state.etarho_cc.level(0);
    let eta_ec = state.etarho_ec.level(0);

    let nrows = max_cutoff + 2;
    let mut a = vec![0.0; nrows];
    let mut b = vec![0.0; nrows];
    let mut c = vec![0.0; nrows];
    let mut f = vec![0.0; nrows];

    let interior: Vec<(f64, f64, f64, f64)> = (1..=max_cutoff)
        .into_par_iter()
        .map(|r| {
            let dr1 = widths.below(r);
            let dr2 = widths.above(r);
            let dr3 = widths.centers(r);
            let re = r_edge[r];
            let lo = g1p0_nph[r - 1] / (r_cc[r - 1] * r_cc[r - 1]);
            let hi = g1p0_nph[r] / (r_cc[r] * r_cc[r]);
            let dpdr = (p0_nph[r] - p0_nph[r - 1]) / dr3;

            let ai = lo / (dr1 * dr3);
            let bi = -(lo / dr1 + hi / dr2) / dr3 - 4.0 * dpdr / (re * re * re);
            let ci = hi / (dr2 * dr3);
            let fi = 4.0 * dpdr * w0_from_sbar[r] / re
                - grav_edge[r]
                    * (r_cc[r] * r_cc[r] * eta_cc[r] - r_cc[r - 1] * r_cc[r - 1] * eta_cc[r - 1])
                    / (dr3 * re * re)
                - 4.0 * PI * G_CONST * 0.5 * (rho0_nph[r] + rho0_nph[r - 1]) * eta_ec[r];
            (ai, bi, ci, fi)
        })
        .collect();
    for (k, (ai, bi, ci, fi)) in interior.into_iter().enumerate() {
        let r = k + 1;
        a[r] = ai;
        b[r] = bi;
        c[r] = ci;
        f[r] = fi;
    }
    b[0] = 1.0;
    a[nrows - 1] = -1.0;
    b[nrows - 1] = 1.0;

    let u = thomas_solve(&a, &b, &c, &f)?;

    let w0 = state.w0.level_slice_mut(0);
    w0[0] = w0_from_sbar[0];
    for r in 1..=max_cutoff + 1 {
        w0[r] = u[r] / (r_edge[r] * r_edge[r]) + w0_from_sbar[r];
    }
    let anchor = max_cutoff + 1;
    for r in anchor + 1..=nr {
        w0[r] = w0[anchor] * r_edge[anchor] * r_edge[anchor] / (r_edge[r] * r_edge[r]);
    }
    Ok(())
}
