// ─────────────────────────────────────────────────────────────────────
// Radial Base State — Planar w0
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Constant-gravity planar w0: explicit outward integration, chunk by
//! chunk, coarse to fine.

use super::{zero_unpopulated, W0Context, W0Inputs, W0Kernel};
use basestate_types::constants::REF_RATIO;
use basestate_types::error::BaseStateResult;
use basestate_types::state::BaseState;

pub(crate) struct Planar;

impl W0Kernel for Planar {
    fn compute_w0(
        &self,
        ctx: &W0Context<'_>,
        state: &mut BaseState,
        inputs: &W0Inputs<'_>,
    ) -> BaseStateResult<()> {
        let geom = ctx.geom;
        let grav = ctx.config.grav_const.abs();
        let dpdt_factor = ctx.config.dpdt_factor;
        let (old, new) = (inputs.old, inputs.new);
        let BaseState { w0, etarho_cc, .. } = state;
        w0.fill(0.0);

        for n in 0..=geom.finest_radial_level {
            let dr = geom.dr(n);
            let cutoff = geom.base_cutoff_density_coord(n);
            let mut psi = vec![0.0; geom.nr(n)];

            for c in geom.chunks(n) {
                // Seed from the coarser level, which is already final.
                w0[(n, c.start)] = if n == 0 { 0.0 } else { w0[(n - 1, c.start / REF_RATIO)] };

                for r in (c.start..=c.end).filter(|&r| r < cutoff) {
                    psi[r] = etarho_cc[(n, r)] * grav;
                }

                for r in c.start + 1..=c.end + 1 {
                    let k = r - 1;
                    let gamma1bar_p0_avg = (old.gamma1bar[(n, k)] + new.gamma1bar[(n, k)])
                        * (old.p0[(n, k)] + new.p0[(n, k)])
                        / 4.0;

                    let delta_chi = if r < cutoff && dpdt_factor != 0.0 {
                        let thermo = if inputs.is_predictor { old } else { new };
                        dpdt_factor * inputs.p0_minus_peosbar[(n, k)]
                            / (thermo.gamma1bar[(n, k)] * thermo.p0[(n, k)] * inputs.dt)
                    } else {
                        0.0
                    };

                    let mut w = w0[(n, k)] + inputs.sbar[(n, k)] * dr - delta_chi * dr;
                    if psi[k] != 0.0 {
                        w -= psi[k] / gamma1bar_p0_avg * dr;
                    }
                    w0[(n, r)] = w;
                }

                if n > 0 {
                    // Shift every coarser level above this chunk so w0 stays
                    // continuous across the fine/coarse boundary.
                    let top = c.end + 1;
                    let offset = w0[(n, top)] - w0[(n - 1, top / REF_RATIO)];
                    for i in (0..n).rev() {
                        let refrat = REF_RATIO.pow((n - i) as u32);
                        for r in (c.start..=top).filter(|r| r % refrat == 0) {
                            w0[(i, r / refrat)] = w0[(n, r)];
                        }
                        for r in top / refrat + 1..=geom.nr(i) {
                            w0[(i, r)] += offset;
                        }
                    }
                }
            }
        }

        zero_unpopulated(geom, w0);
        Ok(())
    }
}
