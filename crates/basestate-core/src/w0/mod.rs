// ─────────────────────────────────────────────────────────────────────
// Radial Base State — Expansion Velocity Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Base-state expansion velocity `w0` and its forcing term.
//!
//! One of four variants is chosen from the configuration when the solver
//! is built. Every solve then runs the same sequence:
//!
//! 1. zero `w0_force`
//! 2. variant-specific integration or tridiagonal solve for `w0`
//! 3. restrict `w0` and fill its ghosts
//! 4. build `w0_force` from the old and new `w0`, restrict, fill ghosts
//! 5. report per-level maxima and CFL numbers

mod planar;
mod planar_varg;
mod spherical;

use crate::geometry::BaseStateGeometry;
use crate::restrict::{fill_ghost_base, restrict_base};
use basestate_types::config::{BaseStateConfig, GravityMode, Spacing};
use basestate_types::error::{BaseStateError, BaseStateResult};
use basestate_types::state::{BaseState, RadialArray, ThermoProfile};
use log::{debug, info};
use ndarray::{Array1, ArrayView1};
use rayon::prelude::*;

/// Solution strategy, fixed for the lifetime of a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum W0Variant {
    /// Constant gravity, explicit outward integration per chunk.
    Planar,
    /// Radially varying gravity, tridiagonal solve on the finest level.
    PlanarVaryingGravity,
    /// Self-gravitating sphere, regular spacing.
    Spherical,
    /// Self-gravitating sphere with explicit edge locations.
    SphericalIrregular,
}

impl W0Variant {
    pub fn select(cfg: &BaseStateConfig) -> BaseStateResult<Self> {
        let g = &cfg.geometry;
        let variant = match (g.spherical, g.spacing, cfg.gravity) {
            (true, Spacing::Regular, _) => W0Variant::Spherical,
            (true, Spacing::Irregular, _) => W0Variant::SphericalIrregular,
            (false, _, GravityMode::Uniform) => W0Variant::Planar,
            (false, Spacing::Regular, _) => W0Variant::PlanarVaryingGravity,
            (false, Spacing::Irregular, _) => {
                return Err(BaseStateError::ConfigError(
                    "varying planar gravity is not implemented for irregular spacing".to_string(),
                ))
            }
        };
        Ok(variant)
    }

    fn kernel(self) -> &'static dyn W0Kernel {
        match self {
            W0Variant::Planar => &planar::Planar,
            W0Variant::PlanarVaryingGravity => &planar_varg::PlanarVaryingGravity,
            W0Variant::Spherical => &spherical::Spherical,
            W0Variant::SphericalIrregular => &spherical::SphericalIrregular,
        }
    }
}

/// Read-only inputs of one w0 solve.
#[derive(Debug, Clone, Copy)]
pub struct W0Inputs<'a> {
    /// `w0` from the previous solve (edge-centered).
    pub w0_old: &'a RadialArray,
    /// Average expansion source term (cell-centered).
    pub sbar: &'a RadialArray,
    /// Thermodynamic state at the start of the step.
    pub old: &'a ThermoProfile,
    /// Thermodynamic state at the end of the step.
    pub new: &'a ThermoProfile,
    /// Discrepancy between `p0` and the EOS pressure (cell-centered).
    pub p0_minus_peosbar: &'a RadialArray,
    pub dt: f64,
    pub dtold: f64,
    /// Predictor stage uses the old state in the volume-discrepancy term.
    pub is_predictor: bool,
}

/// Shared context passed to each variant.
pub(crate) struct W0Context<'a> {
    pub geom: &'a BaseStateGeometry,
    pub config: &'a BaseStateConfig,
}

/// One strategy for computing `w0` on the valid region.
///
/// Implementations write `w0` only; restriction, ghost fill and the forcing
/// term are applied by the solver afterwards.
pub(crate) trait W0Kernel: Sync {
    fn compute_w0(
        &self,
        ctx: &W0Context<'_>,
        state: &mut BaseState,
        inputs: &W0Inputs<'_>,
    ) -> BaseStateResult<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelDiagnostics {
    pub level: usize,
    pub max_abs_w0: f64,
    /// `max_abs_w0 * dt / dr(level)`.
    pub cfl: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct W0Diagnostics {
    pub variant: W0Variant,
    pub levels: Vec<LevelDiagnostics>,
}

impl W0Diagnostics {
    pub fn max_cfl(&self) -> f64 {
        self.levels.iter().map(|l| l.cfl).fold(0.0, f64::max)
    }
}

/// Computes `w0` and `w0_force` for a fixed configuration.
#[derive(Debug, Clone)]
pub struct ExpansionVelocitySolver {
    config: BaseStateConfig,
    variant: W0Variant,
}

impl ExpansionVelocitySolver {
    pub fn new(config: BaseStateConfig) -> BaseStateResult<Self> {
        config.validate()?;
        let variant = W0Variant::select(&config)?;
        debug!("w0 solver variant: {variant:?}");
        Ok(ExpansionVelocitySolver { config, variant })
    }

    pub fn variant(&self) -> W0Variant {
        self.variant
    }

    pub fn config(&self) -> &BaseStateConfig {
        &self.config
    }

    /// Overwrite `state.w0` and `state.w0_force` for one time step.
    ///
    /// `state.etarho_cc` and `state.etarho_ec` are read, never written.
    pub fn solve(
        &self,
        geom: &BaseStateGeometry,
        state: &mut BaseState,
        inputs: &W0Inputs<'_>,
    ) -> BaseStateResult<W0Diagnostics> {
        self.check_inputs(geom, state, inputs)?;
        state.w0_force.fill(0.0);

        let ctx = W0Context {
            geom,
            config: &self.config,
        };
        self.variant.kernel().compute_w0(&ctx, state, inputs)?;

        restrict_base(geom, &mut state.w0);
        fill_ghost_base(geom, &mut state.w0, self.config.ghost_fill);

        make_w0_force(geom, inputs.w0_old, &state.w0, inputs.dt, inputs.dtold, &mut state.w0_force);
        restrict_base(geom, &mut state.w0_force);
        fill_ghost_base(geom, &mut state.w0_force, self.config.ghost_fill);

        let diag = W0Diagnostics {
            variant: self.variant,
            levels: level_diagnostics(geom, &state.w0, inputs.dt),
        };
        if self.config.verbose >= 2 {
            for l in &diag.levels {
                info!(
                    "level {}: max |w0| = {:.6e}, CFL of w0 = {:.6e}",
                    l.level, l.max_abs_w0, l.cfl
                );
            }
        }
        Ok(diag)
    }

    fn check_inputs(
        &self,
        geom: &BaseStateGeometry,
        state: &BaseState,
        inputs: &W0Inputs<'_>,
    ) -> BaseStateResult<()> {
        let g = &self.config.geometry;
        if geom.spherical != g.spherical || geom.spacing != g.spacing {
            return Err(BaseStateError::ConfigError(
                "geometry does not match the solver configuration".to_string(),
            ));
        }
        let positive = |t: f64| t.is_finite() && t > 0.0;
        if !(positive(inputs.dt) && positive(inputs.dtold)) {
            return Err(BaseStateError::ConfigError(format!(
                "time steps must be finite and > 0, got dt = {}, dtold = {}",
                inputs.dt, inputs.dtold
            )));
        }
        let cell = geom.cell_array();
        let edge = geom.edge_array();
        let cells = [
            ("sbar", inputs.sbar),
            ("p0_minus_peosbar", inputs.p0_minus_peosbar),
            ("rho0_old", &inputs.old.rho0),
            ("p0_old", &inputs.old.p0),
            ("gamma1bar_old", &inputs.old.gamma1bar),
            ("rho0_new", &inputs.new.rho0),
            ("p0_new", &inputs.new.p0),
            ("gamma1bar_new", &inputs.new.gamma1bar),
            ("etarho_cc", &state.etarho_cc),
            ("w0_force", &state.w0_force),
        ];
        let edges = [
            ("w0_old", inputs.w0_old),
            ("w0", &state.w0),
            ("etarho_ec", &state.etarho_ec),
        ];
        for (name, arr) in cells {
            if !arr.same_shape(&cell) {
                return Err(BaseStateError::ConfigError(format!(
                    "{name} must be cell-centered with the geometry's level sizes"
                )));
            }
        }
        for (name, arr) in edges {
            if !arr.same_shape(&edge) {
                return Err(BaseStateError::ConfigError(format!(
                    "{name} must be edge-centered with the geometry's level sizes"
                )));
            }
        }
        Ok(())
    }
}

/// Time-centered forcing term for the `w0` advection equation.
///
/// Written on every chunk cell of every level; uses the local cell width so
/// irregular spacing is handled the same way as regular.
pub fn make_w0_force(
    geom: &BaseStateGeometry,
    w0_old: &RadialArray,
    w0: &RadialArray,
    dt: f64,
    dtold: f64,
    w0_force: &mut RadialArray,
) {
    let dt_avg = 0.5 * (dt + dtold);
    for n in 0..=geom.finest_radial_level {
        let old = w0_old.level_slice(n);
        let new = w0.level_slice(n);
        for c in geom.chunks(n) {
            w0_force.level_slice_mut(n)[c.start..=c.end]
                .par_iter_mut()
                .enumerate()
                .for_each(|(k, f)| {
                    let r = c.start + k;
                    let w0_old_cen = 0.5 * (old[r] + old[r + 1]);
                    let w0_new_cen = 0.5 * (new[r] + new[r + 1]);
                    let w0_avg = 0.5 * (dt * w0_old_cen + dtold * w0_new_cen) / dt_avg;
                    let div_avg =
                        0.5 * (dt * (old[r + 1] - old[r]) + dtold * (new[r + 1] - new[r])) / dt_avg;
                    let width = geom.cell_width(n, r);
                    *f = (w0_new_cen - w0_old_cen) / dt_avg + w0_avg * div_avg / width;
                });
        }
    }
}

/// Zero `w0` on every position of levels above 0 that no chunk owns.
pub(crate) fn zero_unpopulated(geom: &BaseStateGeometry, w0: &mut RadialArray) {
    for n in 1..=geom.finest_radial_level {
        let chunks = geom.chunks(n);
        let top = geom.nr(n);
        let lev = w0.level_slice_mut(n);
        match chunks.first() {
            Some(first) => lev[..first.start].iter_mut().for_each(|v| *v = 0.0),
            None => lev.iter_mut().for_each(|v| *v = 0.0),
        }
        for (i, c) in chunks.iter().enumerate() {
            let lo = c.end + 2;
            let hi = chunks.get(i + 1).map_or(top, |next| next.start - 1);
            if lo <= hi {
                lev[lo..=hi].iter_mut().for_each(|v| *v = 0.0);
            }
        }
    }
}

fn level_diagnostics(geom: &BaseStateGeometry, w0: &RadialArray, dt: f64) -> Vec<LevelDiagnostics> {
    (0..=geom.finest_radial_level)
        .map(|n| {
            let lev = w0.level_slice(n);
            let max_abs_w0 = geom
                .chunks(n)
                .iter()
                .flat_map(|c| lev[c.start..=c.end + 1].iter())
                .fold(0.0_f64, |m, v| m.max(v.abs()));
            LevelDiagnostics {
                level: n,
                max_abs_w0,
                cfl: max_abs_w0 * dt / geom.dr(n),
            }
        })
        .collect()
}

/// Time-centered average `0.5 * (old + new)`.
pub(crate) fn nph(old: ArrayView1<f64>, new: ArrayView1<f64>) -> Array1<f64> {
    (&old + &new) * 0.5
}
