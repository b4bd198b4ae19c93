// ─────────────────────────────────────────────────────────────────────
// Radial Base State — Planar w0 with Varying Gravity
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Planar w0 when gravity varies with height.
//!
//! The solve runs once on the uniform finest grid. `w0 = w0bar + deltaw0`,
//! where `w0bar` integrates the source and volume-discrepancy terms and
//! `deltaw0` solves a tridiagonal system carrying the gravity response.
//! The result is then injected back onto every coarser level.

use super::{nph, zero_unpopulated, W0Context, W0Inputs, W0Kernel};
use crate::gravity::grav_edge_uniform;
use crate::uniform::{prolong_base_to_uniform, scatter_uniform_edges};
use basestate_math::tridiag::thomas_solve;
use basestate_types::error::BaseStateResult;
use basestate_types::state::{BaseState, RadialArray};
use ndarray::Array1;
use rayon::prelude::*;

pub(crate) struct PlanarVaryingGravity;

impl W0Kernel for PlanarVaryingGravity {
    fn compute_w0(
        &self,
        ctx: &W0Context<'_>,
        state: &mut BaseState,
        inputs: &W0Inputs<'_>,
    ) -> BaseStateResult<()> {
        let geom = ctx.geom;
        let cfg = ctx.config;
        let finest = geom.finest_radial_level;
        let nr = geom.nr(finest);
        let dr = geom.dr(finest);
        let dt = inputs.dt;
        let cutoff = geom.base_cutoff_density_coord(finest);

        let prolong = |a: &RadialArray| prolong_base_to_uniform(geom, a);
        let p0_old = prolong(&inputs.old.p0)?;
        let p0_new = prolong(&inputs.new.p0)?;
        let rho0_old = prolong(&inputs.old.rho0)?;
        let rho0_new = prolong(&inputs.new.rho0)?;
        let g1_old = prolong(&inputs.old.gamma1bar)?;
        let g1_new = prolong(&inputs.new.gamma1bar)?;
        let pmp = prolong(inputs.p0_minus_peosbar)?;
        let etarho = prolong(&state.etarho_cc)?;
        let sbar = prolong(inputs.sbar)?;

        let p0_nph = nph(p0_old.view(), p0_new.view());
        let rho0_nph = nph(rho0_old.view(), rho0_new.view());
        let g1_nph = nph(g1_old.view(), g1_new.view());
        let g1p0_nph = &g1_nph * &p0_nph;

        // Source and volume-discrepancy contribution.
        let mut w0bar = Array1::<f64>::zeros(nr + 1);
        for r in 1..=nr {
            let mut w = w0bar[r - 1] + sbar[r - 1] * dr;
            if r - 1 < cutoff && cfg.dpdt_factor != 0.0 {
                let volume_discrepancy = cfg.dpdt_factor * pmp[r - 1] / dt;
                w -= volume_discrepancy / g1p0_nph[r - 1] * dr;
            }
            w0bar[r] = w;
        }

        let grav_edge = grav_edge_uniform(geom, cfg, rho0_nph.view())?;
        let r_edge = geom.r_edge_loc.level(finest);

        // Rows 0..=max_cutoff+1; the last row imposes zero gradient.
        let max_cutoff = cutoff.min(nr - 1);
        let nrows = max_cutoff + 2;
        let mut a = vec![0.0; nrows];
        let mut b = vec![0.0; nrows];
        let mut c = vec![0.0; nrows];
        let mut f = vec![0.0; nrows];

        let interior: Vec<(f64, f64, f64, f64)> = (1..=max_cutoff)
            .into_par_iter()
            .map(|r| {
                let dpdr = (p0_nph[r] - p0_nph[r - 1]) / dr;
                let ai = g1p0_nph[r - 1] / (dr * dr);
                let bi = -(g1p0_nph[r - 1] + g1p0_nph[r]) / (dr * dr) - 2.0 * dpdr / r_edge[r];
                let ci = g1p0_nph[r] / (dr * dr);
                let fi = 2.0 * dpdr * w0bar[r] / r_edge[r]
                    - grav_edge[r] * (etarho[r] - etarho[r - 1]) / dr;
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

        let mut deltaw0 = Array1::<f64>::zeros(nr + 1);
        for r in 1..=max_cutoff + 1 {
            deltaw0[r] = u[r];
        }
        for r in max_cutoff + 2..=nr {
            deltaw0[r] = deltaw0[max_cutoff + 1];
        }

        let w0_fine = &w0bar + &deltaw0;
        state.w0.fill(0.0);
        scatter_uniform_edges(geom, &w0_fine, &mut state.w0)?;
        zero_unpopulated(geom, &mut state.w0);
        Ok(())
    }
}
