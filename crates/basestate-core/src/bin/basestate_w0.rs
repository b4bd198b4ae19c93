// ─────────────────────────────────────────────────────────────────────
// Radial Base State — w0 Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One predictor w0 solve on an isothermal, heated atmosphere.
//!
//! Usage: `basestate-w0 [config.json]`. Without an argument the default
//! configuration is used. Set `RUST_LOG=debug` for chunk and cutoff details.

use basestate_core::{BaseStateGeometry, ExpansionVelocitySolver, TagArray, W0Inputs};
use basestate_types::config::BaseStateConfig;
use basestate_types::error::BaseStateResult;
use basestate_types::state::{BaseState, RadialArray, ThermoProfile};
use log::{error, info};
use std::process::ExitCode;

const RHO_BASE: f64 = 1.0e8;
const GAMMA1: f64 = 5.0 / 3.0;
const HEATING: f64 = 1.0e-4;
const DT: f64 = 1.0e-2;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> BaseStateResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("loading configuration from {path}");
            BaseStateConfig::from_file(&path)?
        }
        None => BaseStateConfig::default(),
    };

    let mut geom = BaseStateGeometry::init(&config.geometry)?;
    if geom.max_radial_level > 0 {
        // Refine the inner half of every level.
        let extents: Vec<Vec<(usize, usize)>> = (1..=geom.max_radial_level)
            .map(|n| vec![(0, geom.nr(n) / 2 - 1)])
            .collect();
        let tags = TagArray::from_fine_extents(&geom, &extents)?;
        geom.init_multilevel(geom.max_radial_level, &tags)?;
    }

    let thermo = isothermal_profile(&geom, &config);
    geom.compute_cutoff_coords(&thermo.rho0, &config.cutoffs)?;

    let mut sbar = geom.cell_array();
    let top = geom.r_edge_loc[(0, geom.nr(0))];
    fill_cells(&geom, &mut sbar, |r| {
        let x = (r - 0.25 * top) / (0.05 * top);
        HEATING * (-x * x).exp()
    });

    let solver = ExpansionVelocitySolver::new(config)?;
    info!(
        "{:?} solve: {} levels, nr_fine = {}, base cutoff at fine index {}",
        solver.variant(),
        geom.finest_radial_level + 1,
        geom.nr_fine,
        geom.base_cutoff_density_coord(geom.finest_radial_level)
    );

    let mut state: BaseState = geom.base_state();
    let w0_old = geom.edge_array();
    let p0_minus_peosbar = geom.cell_array();
    let inputs = W0Inputs {
        w0_old: &w0_old,
        sbar: &sbar,
        old: &thermo,
        new: &thermo,
        p0_minus_peosbar: &p0_minus_peosbar,
        dt: DT,
        dtold: DT,
        is_predictor: true,
    };
    let diag = solver.solve(&geom, &mut state, &inputs)?;

    for l in &diag.levels {
        info!(
            "level {}: max |w0| = {:.6e} cm/s, CFL = {:.6e}",
            l.level, l.max_abs_w0, l.cfl
        );
    }
    let finest = geom.finest_radial_level;
    let nr = geom.nr(finest);
    info!(
        "w0 at finest level: inner {:.6e}, middle {:.6e}, outer {:.6e}",
        state.w0[(finest, 0)],
        state.w0[(finest, nr / 2)],
        state.w0[(finest, nr)]
    );
    Ok(())
}

/// Exponential density with scale height `H = domain / 8` in hydrostatic
/// balance against the configured gravity.
fn isothermal_profile(geom: &BaseStateGeometry, config: &BaseStateConfig) -> ThermoProfile {
    let top = geom.r_edge_loc[(0, geom.nr(0))];
    let h = top / 8.0;
    let cs2 = h * config.grav_const.abs();
    let mut thermo = geom.thermo_profile();
    fill_cells(geom, &mut thermo.rho0, |r| RHO_BASE * (-r / h).exp());
    fill_cells(geom, &mut thermo.p0, |r| RHO_BASE * cs2 * (-r / h).exp());
    thermo.gamma1bar.fill(GAMMA1);
    thermo
}

fn fill_cells(geom: &BaseStateGeometry, arr: &mut RadialArray, f: impl Fn(f64) -> f64) {
    for n in 0..=geom.max_radial_level {
        for r in 0..geom.nr(n) {
            arr[(n, r)] = f(geom.r_cc_loc[(n, r)]);
        }
    }
}
