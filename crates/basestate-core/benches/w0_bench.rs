// ─────────────────────────────────────────────────────────────────────
// Radial Base State — w0 Solver Benchmarks
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use basestate_core::{BaseStateGeometry, ExpansionVelocitySolver, W0Inputs};
use basestate_types::config::{BaseStateConfig, GeometryConfig, GravityMode, Spacing};
use basestate_types::state::{BaseState, RadialArray, ThermoProfile};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

struct Case {
    geom: BaseStateGeometry,
    solver: ExpansionVelocitySolver,
    thermo: ThermoProfile,
    sbar: RadialArray,
    pmp: RadialArray,
    w0_old: RadialArray,
    state: BaseState,
}

fn case(spherical: bool, spacing: Spacing, gravity: GravityMode, nr_fine: usize) -> Case {
    // Irregular edges stretch outward by 0.1% per cell.
    let r_edge_loc = (spacing == Spacing::Irregular).then(|| {
        let mut edges = vec![0.0];
        for i in 0..nr_fine {
            edges.push(edges[i] + 1.0e6 * 1.001f64.powi(i as i32));
        }
        edges
    });
    let config = BaseStateConfig {
        geometry: GeometryConfig {
            spherical,
            spacing,
            max_radial_level: 0,
            nr_fine,
            dr_fine: 1.0e6,
            prob_lo: 0.0,
            r_edge_loc,
        },
        gravity,
        planar_invsq_mass: 2.0e33,
        ..BaseStateConfig::default()
    };
    let mut geom = BaseStateGeometry::init(&config.geometry).unwrap();
    let h = nr_fine as f64 * 1.0e6 / 8.0;
    let mut thermo = geom.thermo_profile();
    let mut sbar = geom.cell_array();
    for r in 0..nr_fine {
        let x = geom.r_cc_loc[(0, r)] / h;
        thermo.rho0[(0, r)] = 1.0e7 * (-x).exp();
        thermo.p0[(0, r)] = 1.0e24 * (-x).exp();
        sbar[(0, r)] = 1.0e-4 * (-x * x).exp();
    }
    thermo.gamma1bar.fill(5.0 / 3.0);
    geom.compute_cutoff_coords(&thermo.rho0, &config.cutoffs).unwrap();
    Case {
        solver: ExpansionVelocitySolver::new(config).unwrap(),
        pmp: geom.cell_array(),
        w0_old: geom.edge_array(),
        state: geom.base_state(),
        thermo,
        sbar,
        geom,
    }
}

fn run(c: &mut Criterion, name: &str, mut k: Case) {
    c.bench_function(name, |bch| {
        bch.iter(|| {
            let inputs = W0Inputs {
                w0_old: &k.w0_old,
                sbar: &k.sbar,
                old: &k.thermo,
                new: &k.thermo,
                p0_minus_peosbar: &k.pmp,
                dt: 1.0e-2,
                dtold: 1.0e-2,
                is_predictor: true,
            };
            black_box(k.solver.solve(&k.geom, &mut k.state, &inputs))
        })
    });
}

fn bench_planar_1024(c: &mut Criterion) {
    run(c, "w0_planar_1024", case(false, Spacing::Regular, GravityMode::Uniform, 1024));
}

fn bench_planar_varg_1024(c: &mut Criterion) {
    run(
        c,
        "w0_planar_varg_1024",
        case(false, Spacing::Regular, GravityMode::InverseSquare, 1024),
    );
}

fn bench_spherical_1024(c: &mut Criterion) {
    run(c, "w0_spherical_1024", case(true, Spacing::Regular, GravityMode::Uniform, 1024));
}

fn bench_spherical_irregular_1024(c: &mut Criterion) {
    run(
        c,
        "w0_spherical_irregular_1024",
        case(true, Spacing::Irregular, GravityMode::Uniform, 1024),
    );
}

criterion_group!(
    benches,
    bench_planar_1024,
    bench_planar_varg_1024,
    bench_spherical_1024,
    bench_spherical_irregular_1024
);
criterion_main!(benches);
