// ─────────────────────────────────────────────────────────────────────
// Radial Base State — Property-Based Tests (proptest) for basestate-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for basestate-core using proptest.
//!
//! Covers: chunk tables built from random refinement patterns,
//! prolongation completeness, ghost fill leaving valid data alone,
//! coarse/fine agreement after a planar solve, cutoff coordinates.

use basestate_core::restrict::fill_ghost_base;
use basestate_core::uniform::prolong_base_to_uniform;
use basestate_core::{BaseStateGeometry, ExpansionVelocitySolver, TagArray, W0Inputs};
use basestate_types::config::{
    BaseStateConfig, CutoffDensities, GeometryConfig, GhostFillPolicy, GravityMode, Spacing,
};
use basestate_types::state::Centering;
use proptest::prelude::*;

const MAX_LEV: usize = 2;

fn planar_config(nr_fine: usize, dr_fine: f64) -> BaseStateConfig {
    BaseStateConfig {
        geometry: GeometryConfig {
            spherical: false,
            spacing: Spacing::Regular,
            max_radial_level: MAX_LEV,
            nr_fine,
            dr_fine,
            prob_lo: 0.0,
            r_edge_loc: None,
        },
        ..BaseStateConfig::default()
    }
}

/// Three-level planar geometry; level 1 tags are masked so they nest.
fn build(nr0: usize, t0: &[bool], t1: &[bool]) -> BaseStateGeometry {
    let cfg = planar_config(4 * nr0, 1.0);
    let mut geom = BaseStateGeometry::init(&cfg.geometry).unwrap();
    let mut tags = TagArray::new(&geom);
    for r in 0..t0.len() {
        if t0[r] {
            tags.tag(0, r, r).unwrap();
        }
    }
    for r in 0..t1.len() {
        if t1[r] && t0[r / 2] {
            tags.tag(1, r, r).unwrap();
        }
    }
    geom.init_multilevel(MAX_LEV, &tags).unwrap();
    geom
}

fn tag_pattern() -> impl Strategy<Value = (usize, Vec<bool>, Vec<bool>)> {
    (2usize..12).prop_flat_map(|nr0| {
        (
            Just(nr0),
            prop::collection::vec(any::<bool>(), nr0),
            prop::collection::vec(any::<bool>(), 2 * nr0),
        )
    })
}

// ── Chunk Tables ─────────────────────────────────────────────────────

proptest! {
    /// Chunks are ordered, separated, aligned to the refinement ratio and
    /// sit on tagged coarse cells.
    #[test]
    fn chunks_are_disjoint_and_nested((nr0, t0, t1) in tag_pattern()) {
        let geom = build(nr0, &t0, &t1);
        prop_assert_eq!(geom.numdisjointchunks(0), 1);
        prop_assert_eq!(geom.r_end_coord(0, 0), nr0 - 1);

        for n in 1..=MAX_LEV {
            let chunks = geom.chunks(n);
            for c in chunks {
                prop_assert!(c.start % 2 == 0 && c.end % 2 == 1);
                prop_assert!(c.end < geom.nr(n));
                for r in c.start / 2..=c.end / 2 {
                    prop_assert!(geom.is_valid(n - 1, r, Centering::Cell));
                }
            }
            for pair in chunks.windows(2) {
                prop_assert!(pair[1].start > pair[0].end + 1);
            }
        }
    }

    /// Every fine cell is filled from the finest level that covers it.
    #[test]
    fn prolongation_takes_finest_covering_value((nr0, t0, t1) in tag_pattern()) {
        let geom = build(nr0, &t0, &t1);
        let mut arr = geom.cell_array();
        for n in 0..=MAX_LEV {
            for r in 0..geom.nr(n) {
                arr[(n, r)] = (1000 * n + r) as f64;
            }
        }
        let fine = prolong_base_to_uniform(&geom, &arr).unwrap();
        prop_assert_eq!(fine.len(), geom.nr(MAX_LEV));

        for i in 0..fine.len() {
            let n = (0..=MAX_LEV)
                .rev()
                .find(|&n| geom.is_valid(n, i >> (MAX_LEV - n), Centering::Cell))
                .unwrap();
            prop_assert_eq!(fine[i], arr[(n, i >> (MAX_LEV - n))]);
        }
    }

    /// Ghost fill writes only outside the chunks.
    #[test]
    fn ghost_fill_preserves_valid_data(
        (nr0, t0, t1) in tag_pattern(),
        seed in 0.0f64..10.0,
        linear in any::<bool>(),
    ) {
        let geom = build(nr0, &t0, &t1);
        let policy = if linear { GhostFillPolicy::Linear } else { GhostFillPolicy::CopyNearest };
        for mut arr in [geom.cell_array(), geom.edge_array()] {
            let centering = arr.centering();
            for n in 0..=MAX_LEV {
                for r in 0..arr.level_len(n) {
                    arr[(n, r)] = (seed + r as f64 * 0.37 + n as f64).sin();
                }
            }
            let before = arr.clone();
            fill_ghost_base(&geom, &mut arr, policy);
            for n in 0..=MAX_LEV {
                for r in 0..arr.level_len(n) {
                    if n == 0 || geom.is_valid(n, r, centering) {
                        prop_assert_eq!(arr[(n, r)], before[(n, r)]);
                    }
                }
            }
        }
    }
}

// ── Planar Solve ─────────────────────────────────────────────────────

proptest! {
    /// After a planar solve every coarse edge under a fine chunk equals the
    /// fine edge it coincides with.
    #[test]
    fn planar_w0_agrees_across_levels(
        (nr0, t0, t1) in tag_pattern(),
        s in prop::collection::vec(-1.0f64..1.0, 3),
    ) {
        let geom = build(nr0, &t0, &t1);
        let solver = ExpansionVelocitySolver::new(planar_config(4 * nr0, 1.0)).unwrap();
        let mut thermo = geom.thermo_profile();
        thermo.p0.fill(1.0);
        thermo.gamma1bar.fill(1.0);
        let mut sbar = geom.cell_array();
        for n in 0..=MAX_LEV {
            for r in 0..geom.nr(n) {
                sbar[(n, r)] = s[n] + 0.1 * r as f64;
            }
        }
        let w0_old = geom.edge_array();
        let pmp = geom.cell_array();
        let mut state = geom.base_state();
        let inputs = W0Inputs {
            w0_old: &w0_old,
            sbar: &sbar,
            old: &thermo,
            new: &thermo,
            p0_minus_peosbar: &pmp,
            dt: 1.0,
            dtold: 1.0,
            is_predictor: true,
        };
        solver.solve(&geom, &mut state, &inputs).unwrap();

        prop_assert_eq!(state.w0[(0, 0)], 0.0);
        for n in 1..=MAX_LEV {
            for c in geom.chunks(n) {
                for j in (c.start..=c.end + 1).step_by(2) {
                    prop_assert_eq!(state.w0[(n - 1, j / 2)], state.w0[(n, j)]);
                }
            }
        }
        prop_assert!(state.w0.as_flat().iter().all(|v| v.is_finite()));
        prop_assert!(state.w0_force.as_flat().iter().all(|v| v.is_finite()));
    }

    /// Constant source on one level integrates to `w0 = sbar * r_edge`.
    #[test]
    fn planar_constant_source_is_linear(nr in 1usize..64, dr in 0.1f64..10.0, s in -3.0f64..3.0) {
        let mut cfg = planar_config(nr, dr);
        cfg.geometry.max_radial_level = 0;
        let geom = BaseStateGeometry::init(&cfg.geometry).unwrap();
        let solver = ExpansionVelocitySolver::new(cfg).unwrap();
        let mut thermo = geom.thermo_profile();
        thermo.p0.fill(1.0);
        thermo.gamma1bar.fill(1.4);
        let mut sbar = geom.cell_array();
        sbar.fill(s);
        let zero_c = geom.cell_array();
        let zero_e = geom.edge_array();
        let mut state = geom.base_state();
        let inputs = W0Inputs {
            w0_old: &zero_e,
            sbar: &sbar,
            old: &thermo,
            new: &thermo,
            p0_minus_peosbar: &zero_c,
            dt: 0.5,
            dtold: 0.5,
            is_predictor: false,
        };
        let diag = solver.solve(&geom, &mut state, &inputs).unwrap();
        for r in 0..=nr {
            let expect = s * r as f64 * dr;
            prop_assert!((state.w0[(0, r)] - expect).abs() <= 1e-9 * (1.0 + expect.abs()));
        }
        let max = (s * nr as f64 * dr).abs();
        prop_assert!((diag.levels[0].max_abs_w0 - max).abs() <= 1e-9 * (1.0 + max));
    }
}

proptest! {
    /// With no source, no discrepancy and no eta flux, every variant
    /// returns `w0 = 0` and `w0_force = 0` whatever the stratification.
    #[test]
    fn zero_source_is_idempotent(
        nr in 4usize..48,
        spherical in any::<bool>(),
        octant in any::<bool>(),
        scale in 0.5f64..4.0,
    ) {
        let mut cfg = planar_config(nr, 1.0e6);
        cfg.geometry.max_radial_level = 0;
        cfg.geometry.spherical = spherical;
        if octant {
            cfg.gravity = GravityMode::PlanarOctant;
        }
        let mut geom = BaseStateGeometry::init(&cfg.geometry).unwrap();
        let mut thermo = geom.thermo_profile();
        let h = scale * nr as f64 * 1.0e6 / 4.0;
        for r in 0..nr {
            let x = geom.r_cc_loc[(0, r)] / h;
            thermo.rho0[(0, r)] = 1.0e7 * (-x).exp();
            thermo.p0[(0, r)] = 1.0e23 * (-x).exp();
        }
        thermo.gamma1bar.fill(5.0 / 3.0);
        geom.compute_cutoff_coords(&thermo.rho0, &cfg.cutoffs).unwrap();

        let solver = ExpansionVelocitySolver::new(cfg).unwrap();
        let zero_c = geom.cell_array();
        let zero_e = geom.edge_array();
        let mut state = geom.base_state();
        let inputs = W0Inputs {
            w0_old: &zero_e,
            sbar: &zero_c,
            old: &thermo,
            new: &thermo,
            p0_minus_peosbar: &zero_c,
            dt: 1.0e-2,
            dtold: 1.0e-2,
            is_predictor: true,
        };
        solver.solve(&geom, &mut state, &inputs).unwrap();
        prop_assert!(state.w0.as_flat().iter().all(|&v| v == 0.0));
        prop_assert!(state.w0_force.as_flat().iter().all(|&v| v == 0.0));
    }
}

// ── Cutoff Coordinates ───────────────────────────────────────────────

proptest! {
    /// For a decreasing density the base cutoff is the first level-0 cell
    /// at or below the threshold, and finer levels follow `2c + 1`.
    #[test]
    fn cutoff_coords_follow_first_crossing(nr0 in 2usize..32, frac in 0.0f64..1.2) {
        let cfg = planar_config(4 * nr0, 1.0);
        let mut geom = BaseStateGeometry::init(&cfg.geometry).unwrap();
        let mut rho0 = geom.cell_array();
        let top = 4.0 * nr0 as f64;
        for n in 0..=MAX_LEV {
            for r in 0..geom.nr(n) {
                rho0[(n, r)] = 1.0 - geom.r_cc_loc[(n, r)] / top;
            }
        }
        let threshold = 1.0 - frac;
        let densities = CutoffDensities {
            base_cutoff_density: threshold,
            ..CutoffDensities::default()
        };
        geom.compute_cutoff_coords(&rho0, &densities).unwrap();

        let expect = (0..nr0).find(|&r| rho0[(0, r)] <= threshold);
        match expect {
            Some(c) => {
                prop_assert_eq!(geom.cutoff(0).base, c);
                prop_assert_eq!(geom.cutoff(1).base, 2 * c + 1);
                prop_assert_eq!(geom.cutoff(2).base, 4 * c + 3);
            }
            None => {
                for n in 0..=MAX_LEV {
                    prop_assert_eq!(geom.cutoff(n).base, geom.nr(n));
                }
            }
        }
    }
}
