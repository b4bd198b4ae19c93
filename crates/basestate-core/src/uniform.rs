// ─────────────────────────────────────────────────────────────────────
// Radial Base State — Uniform Grid Transfer
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Transfer between the multilevel layout and a single array at the
//! finest resolution.

use crate::geometry::BaseStateGeometry;
use basestate_types::constants::REF_RATIO;
use basestate_types::error::{BaseStateError, BaseStateResult};
use basestate_types::state::{Centering, RadialArray};
use ndarray::Array1;

/// Piecewise-constant prolongation of a cell-centered multilevel array to
/// `nr(finest_radial_level)` cells.
///
/// Each fine cell takes the value from the finest level whose chunk covers
/// it. Levels are walked finest first; coarse data never overwrites finer.
pub fn prolong_base_to_uniform(
    geom: &BaseStateGeometry,
    base_ml: &RadialArray,
) -> BaseStateResult<Array1<f64>> {
    if base_ml.centering() != Centering::Cell || !base_ml.same_shape(&geom.cell_array()) {
        return Err(BaseStateError::ConfigError(
            "prolongation expects a cell-centered array shaped like the geometry".to_string(),
        ));
    }
    let finest = geom.finest_radial_level;
    let nr_f = geom.nr(finest);
    let mut fine = Array1::<f64>::zeros(nr_f);
    let mut filled = vec![false; nr_f];

    for n in (0..=finest).rev() {
        let block = REF_RATIO.pow((finest - n) as u32);
        for c in geom.chunks(n) {
            for r in c.start..=c.end {
                let lo = r * block;
                let hi = ((r + 1) * block).min(nr_f);
                for i in lo..hi {
                    if !filled[i] {
                        fine[i] = base_ml[(n, r)];
                        filled[i] = true;
                    }
                }
            }
        }
    }

    let count = filled.iter().filter(|&&f| !f).count();
    if count > 0 {
        let first = filled.iter().position(|&f| !f).unwrap_or(0);
        return Err(BaseStateError::UnfilledCells { count, first });
    }
    Ok(fine)
}

/// Write an edge-centered finest-resolution profile into the multilevel
/// array: the finest level verbatim, coarser levels by injection from
/// every second edge.
pub fn scatter_uniform_edges(
    geom: &BaseStateGeometry,
    fine: &Array1<f64>,
    s0: &mut RadialArray,
) -> BaseStateResult<()> {
    let finest = geom.finest_radial_level;
    if s0.centering() != Centering::Edge || fine.len() != geom.nr(finest) + 1 {
        return Err(BaseStateError::ConfigError(format!(
            "expected {} fine edge values for an edge-centered target, got {}",
            geom.nr(finest) + 1,
            fine.len()
        )));
    }
    s0.level_mut(finest).assign(fine);
    for n in (1..=finest).rev() {
        for r in (0..=geom.nr(n)).step_by(REF_RATIO) {
            s0[(n - 1, r / REF_RATIO)] = s0[(n, r)];
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Chunk, TagArray};
    use basestate_types::config::{GeometryConfig, Spacing};

    fn geom(max_lev: usize, nr_fine: usize) -> BaseStateGeometry {
        BaseStateGeometry::init(&GeometryConfig {
            spherical: false,
            spacing: Spacing::Regular,
            max_radial_level: max_lev,
            nr_fine,
            dr_fine: 1.0,
            prob_lo: 0.0,
            r_edge_loc: None,
        })
        .unwrap()
    }

    #[test]
    fn test_single_level_prolongation_is_identity() {
        let g = geom(0, 6);
        let arr = RadialArray::from_levels(Centering::Cell, &[vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]]);
        let fine = prolong_base_to_uniform(&g, &arr).unwrap();
        assert_eq!(fine.to_vec(), arr.level_slice(0).to_vec());
    }

    #[test]
    fn test_finer_level_wins_where_refined() {
        let mut g = geom(1, 8);
        let mut tags = TagArray::new(&g);
        tags.tag(0, 1, 2).unwrap();
        g.init_multilevel(1, &tags).unwrap();

        let mut arr = g.cell_array();
        arr.level_slice_mut(0).copy_from_slice(&[10.0, 20.0, 30.0, 40.0]);
        for r in 2..=5 {
            arr[(1, r)] = r as f64;
        }
        let fine = prolong_base_to_uniform(&g, &arr).unwrap();
        assert_eq!(fine.to_vec(), vec![10.0, 10.0, 2.0, 3.0, 4.0, 5.0, 40.0, 40.0]);
    }

    #[test]
    fn test_gap_in_coverage_is_unfilled() {
        let mut g = geom(1, 8);
        // Level 0 misses coarse cells 1 and 2; level 1 covers only fine cell 2.
        g.replace_chunks(0, vec![Chunk { start: 0, end: 0 }, Chunk { start: 3, end: 3 }]);
        g.replace_chunks(1, vec![Chunk { start: 2, end: 2 }]);
        match prolong_base_to_uniform(&g, &g.cell_array()) {
            Err(BaseStateError::UnfilledCells { count, first }) => {
                assert_eq!(count, 3);
                assert_eq!(first, 3);
            }
            other => panic!("expected UnfilledCells, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_edge_input() {
        let g = geom(0, 4);
        assert!(prolong_base_to_uniform(&g, &g.edge_array()).is_err());
    }

    #[test]
    fn test_scatter_injects_even_edges() {
        let g = geom(1, 4);
        let fine = Array1::from(vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        let mut w0 = g.edge_array();
        scatter_uniform_edges(&g, &fine, &mut w0).unwrap();
        assert_eq!(w0.level_slice(1), &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(w0.level_slice(0), &[0.0, 2.0, 4.0]);
    }
}
