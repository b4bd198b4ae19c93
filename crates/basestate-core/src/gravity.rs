// ─────────────────────────────────────────────────────────────────────
// Radial Base State — Gravity
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Radial gravitational acceleration (negative = inward).

use crate::geometry::BaseStateGeometry;
use basestate_types::config::{BaseStateConfig, GravityMode, Spacing};
use basestate_types::constants::{FOUR_THIRDS_PI, G_CONST};
use basestate_types::error::{BaseStateError, BaseStateResult};
use basestate_types::state::RadialArray;
use ndarray::{Array1, ArrayView1};

/// Enclosed-mass gravity at each edge of `edges`, from cell densities `rho`.
///
/// The mass inside `edges[0]` is taken as zero.
pub fn enclosed_mass_gravity(edges: ArrayView1<f64>, rho: ArrayView1<f64>) -> Array1<f64> {
    let mut g = Array1::<f64>::zeros(edges.len());
    let mut mencl = 0.0;
    for r in 1..edges.len() {
        mencl += FOUR_THIRDS_PI * (edges[r].powi(3) - edges[r - 1].powi(3)) * rho[r - 1];
        g[r] = -G_CONST * mencl / (edges[r] * edges[r]);
    }
    g
}

/// Edge gravity on level 0 of a spherical geometry.
pub fn grav_edge_spherical(geom: &BaseStateGeometry, rho0: ArrayView1<f64>) -> Array1<f64> {
    enclosed_mass_gravity(geom.r_edge_loc.level(0), rho0)
}

/// Edge gravity on every level of the multilevel grid.
///
/// Spherical geometry fills level 0 only. Planar octant gravity integrates
/// each level's own density, so unpopulated cells must hold sensible values.
pub fn grav_edge(
    geom: &BaseStateGeometry,
    cfg: &BaseStateConfig,
    rho0: &RadialArray,
) -> BaseStateResult<RadialArray> {
    if !rho0.same_shape(&geom.cell_array()) {
        return Err(BaseStateError::ConfigError(
            "rho0 does not match the geometry's cell layout".to_string(),
        ));
    }
    let mut g = geom.edge_array();
    let levels = if geom.spherical { 0..=0 } else { 0..=geom.max_radial_level };
    for n in levels {
        let edges = geom.r_edge_loc.level(n);
        let vals = match (geom.spherical, cfg.gravity) {
            (true, _) | (false, GravityMode::PlanarOctant) => {
                enclosed_mass_gravity(edges, rho0.level(n))
            }
            (false, GravityMode::Uniform) => Array1::from_elem(edges.len(), cfg.grav_const),
            (false, GravityMode::InverseSquare) => {
                edges.mapv(|r| inverse_square(cfg.planar_invsq_mass, r))
            }
        };
        g.level_mut(n).assign(&vals);
    }
    Ok(g)
}

/// Edge gravity on the uniform finest grid for planar geometry.
///
/// `rho0` is the density prolonged to the finest level. Only regular
/// spacing is supported.
pub fn grav_edge_uniform(
    geom: &BaseStateGeometry,
    cfg: &BaseStateConfig,
    rho0: ArrayView1<f64>,
) -> BaseStateResult<Array1<f64>> {
    if geom.spacing == Spacing::Irregular {
        return Err(BaseStateError::ConfigError(
            "uniform-grid edge gravity is not implemented for irregular spacing".to_string(),
        ));
    }
    let finest = geom.finest_radial_level;
    let edges = geom.r_edge_loc.level(finest);
    if rho0.len() + 1 != edges.len() {
        return Err(BaseStateError::ConfigError(format!(
            "density has {} cells, finest level has {}",
            rho0.len(),
            edges.len() - 1
        )));
    }
    let g = match cfg.gravity {
        GravityMode::Uniform => Array1::from_elem(edges.len(), cfg.grav_const),
        GravityMode::InverseSquare => edges.mapv(|r| inverse_square(cfg.planar_invsq_mass, r)),
        GravityMode::PlanarOctant => enclosed_mass_gravity(edges, rho0),
    };
    Ok(g)
}

/// Cell-centered gravity on level 0 (spherical) or on every level (planar).
pub fn grav_cell(
    geom: &BaseStateGeometry,
    cfg: &BaseStateConfig,
    rho0: &RadialArray,
) -> BaseStateResult<RadialArray> {
    if !rho0.same_shape(&geom.cell_array()) {
        return Err(BaseStateError::ConfigError(
            "rho0 does not match the geometry's cell layout".to_string(),
        ));
    }
    let mut g = geom.cell_array();
    let levels = if geom.spherical { 0..=0 } else { 0..=geom.max_radial_level };
    for n in levels {
        let centers = geom.r_cc_loc.level(n);
        let vals = match (geom.spherical, cfg.gravity) {
            (true, _) | (false, GravityMode::PlanarOctant) => {
                enclosed_mass_gravity_cc(geom.r_edge_loc.level(n), centers, rho0.level(n))
            }
            (false, GravityMode::Uniform) => Array1::from_elem(centers.len(), cfg.grav_const),
            (false, GravityMode::InverseSquare) => {
                centers.mapv(|r| inverse_square(cfg.planar_invsq_mass, r))
            }
        };
        g.level_mut(n).assign(&vals);
    }
    Ok(g)
}

/// Enclosed-mass gravity at cell centers: the mass inside edge `r` plus
/// the inner part of cell `r`.
fn enclosed_mass_gravity_cc(
    edges: ArrayView1<f64>,
    centers: ArrayView1<f64>,
    rho: ArrayView1<f64>,
) -> Array1<f64> {
    let mut g = Array1::<f64>::zeros(centers.len());
    let mut mencl = 0.0;
    for r in 0..centers.len() {
        let rc = centers[r];
        let m = mencl + FOUR_THIRDS_PI * (rc.powi(3) - edges[r].powi(3)) * rho[r];
        g[r] = -G_CONST * m / (rc * rc);
        mencl += FOUR_THIRDS_PI * (edges[r + 1].powi(3) - edges[r].powi(3)) * rho[r];
    }
    g
}

fn inverse_square(mass: f64, r: f64) -> f64 {
    if r > 0.0 {
        -G_CONST * mass / (r * r)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basestate_types::config::GeometryConfig;

    fn spherical_geom(nr: usize, dr: f64) -> BaseStateGeometry {
        BaseStateGeometry::init(&GeometryConfig {
            spherical: true,
            spacing: Spacing::Regular,
            max_radial_level: 0,
            nr_fine: nr,
            dr_fine: dr,
            prob_lo: 0.0,
            r_edge_loc: None,
        })
        .unwrap()
    }

    #[test]
    fn test_uniform_sphere_gravity_is_linear_in_radius() {
        let geom = spherical_geom(16, 1.0e7);
        let rho = Array1::from_elem(16, 1.0e5);
        let g = grav_edge_spherical(&geom, rho.view());
        assert_eq!(g[0], 0.0);
        for r in 1..=16 {
            let re = geom.r_edge_loc[(0, r)];
            let expect = -G_CONST * FOUR_THIRDS_PI * 1.0e5 * re;
            assert!(((g[r] - expect) / expect).abs() < 1e-12);
        }
    }

    #[test]
    fn test_grav_cell_between_edges_for_uniform_sphere() {
        let geom = spherical_geom(8, 1.0e7);
        let mut rho = geom.cell_array();
        rho.fill(2.0e5);
        let g = grav_cell(&geom, &BaseStateConfig::default(), &rho).unwrap();
        for r in 0..8 {
            let rc = geom.r_cc_loc[(0, r)];
            let expect = -G_CONST * FOUR_THIRDS_PI * 2.0e5 * rc;
            assert!(((g[(0, r)] - expect) / expect).abs() < 1e-10);
        }
    }

    #[test]
    fn test_multilevel_edge_gravity_agrees_with_uniform_grid() {
        let geom = BaseStateGeometry::init(&GeometryConfig {
            spherical: false,
            spacing: Spacing::Regular,
            max_radial_level: 1,
            nr_fine: 8,
            dr_fine: 1.0e6,
            prob_lo: 0.0,
            r_edge_loc: None,
        })
        .unwrap();
        let mut cfg = BaseStateConfig::default();
        cfg.gravity = GravityMode::PlanarOctant;
        let mut rho = geom.cell_array();
        rho.fill(3.0e4);
        let g = grav_edge(&geom, &cfg, &rho).unwrap();
        let fine = grav_edge_uniform(&geom, &cfg, rho.level(1)).unwrap();
        for r in 0..=4 {
            // Coarse edge r coincides with fine edge 2r.
            let (a, b) = (g[(0, r)], fine[2 * r]);
            assert!((a - b).abs() <= 1e-12 * b.abs());
        }
        assert_eq!(g.level_slice(1), fine.as_slice().unwrap());

        let spherical = spherical_geom(4, 1.0);
        assert!(grav_edge(&spherical, &cfg, &geom.cell_array()).is_err());
    }

    #[test]
    fn test_planar_uniform_and_inverse_square() {
        let geom = BaseStateGeometry::init(&GeometryConfig {
            spherical: false,
            spacing: Spacing::Regular,
            max_radial_level: 0,
            nr_fine: 4,
            dr_fine: 1.0,
            prob_lo: 1.0,
            r_edge_loc: None,
        })
        .unwrap();
        let rho = Array1::from_elem(4, 1.0);
        let mut cfg = BaseStateConfig::default();
        let g = grav_edge_uniform(&geom, &cfg, rho.view()).unwrap();
        assert!(g.iter().all(|&v| v == cfg.grav_const));

        cfg.gravity = GravityMode::InverseSquare;
        cfg.planar_invsq_mass = 1.0e33;
        let g = grav_edge_uniform(&geom, &cfg, rho.view()).unwrap();
        assert!((g[1] - (-G_CONST * 1.0e33 / 4.0)).abs() < 1e-6 * g[1].abs());

        let short = Array1::from_elem(3, 1.0);
        assert!(grav_edge_uniform(&geom, &cfg, short.view()).is_err());
    }
}
