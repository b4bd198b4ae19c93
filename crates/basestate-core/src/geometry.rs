// ─────────────────────────────────────────────────────────────────────
// Radial Base State — Geometry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Multilevel radial geometry: per-level resolution, cell/edge radii,
//! cutoff coordinates and the disjoint-chunk tables.
//!
//! Level `n` has `nr(n) = nr_fine / 2^(max_radial_level - n)` cells. A level
//! above 0 is populated only on the chunks that mirror the refined region of
//! the full-dimensional mesh; everything outside them is ghost or zero.

use basestate_types::config::{CutoffDensities, GeometryConfig, Spacing};
use basestate_types::constants::REF_RATIO;
use basestate_types::error::{BaseStateError, BaseStateResult};
use basestate_types::state::{BaseState, Centering, RadialArray, ThermoProfile};
use log::debug;

/// Contiguous run of populated cells `start..=end` on one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
}

impl Chunk {
    pub fn contains_cell(&self, r: usize) -> bool {
        r >= self.start && r <= self.end
    }

    /// Edges `start..=end+1` bound the chunk's cells.
    pub fn contains_edge(&self, r: usize) -> bool {
        r >= self.start && r <= self.end + 1
    }
}

/// Per-level chunk lists, rebuilt wholesale at regrid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkTable {
    levels: Vec<Vec<Chunk>>,
}

impl ChunkTable {
    fn new(num_levels: usize) -> Self {
        ChunkTable {
            levels: vec![Vec::new(); num_levels],
        }
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn chunks(&self, level: usize) -> &[Chunk] {
        &self.levels[level]
    }

    fn set_level(&mut self, level: usize, chunks: Vec<Chunk>) {
        self.levels[level] = chunks;
    }
}

/// Radial indices where the density first drops to each threshold.
///
/// A value of `nr(level)` means the threshold is never reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CutoffCoords {
    pub base: usize,
    pub anelastic: usize,
    pub burning_lo: usize,
    pub burning_hi: usize,
}

/// Which coarse cells at each level are covered by the next finer level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagArray {
    levels: Vec<Vec<bool>>,
}

impl TagArray {
    /// Untagged array shaped like `geom` (one entry per cell, per level).
    pub fn new(geom: &BaseStateGeometry) -> Self {
        TagArray {
            levels: geom.nr.iter().map(|&n| vec![false; n]).collect(),
        }
    }

    /// Mark cells `lo..=hi` of `level` as covered by `level + 1`.
    pub fn tag(&mut self, level: usize, lo: usize, hi: usize) -> BaseStateResult<()> {
        let cells = self
            .levels
            .get_mut(level)
            .ok_or(BaseStateError::GridOutOfBounds { level, index: lo })?;
        if lo > hi || hi >= cells.len() {
            return Err(BaseStateError::GridOutOfBounds { level, index: hi });
        }
        cells[lo..=hi].iter_mut().for_each(|t| *t = true);
        Ok(())
    }

    /// Build tags from the radial extents of refined boxes.
    ///
    /// `extents[k]` holds inclusive cell ranges in level `k + 1` indices;
    /// each marks the underlying cells of level `k`.
    pub fn from_fine_extents(
        geom: &BaseStateGeometry,
        extents: &[Vec<(usize, usize)>],
    ) -> BaseStateResult<Self> {
        let mut tags = TagArray::new(geom);
        for (k, boxes) in extents.iter().enumerate() {
            for &(lo, hi) in boxes {
                tags.tag(k, lo / REF_RATIO, hi / REF_RATIO)?;
            }
        }
        Ok(tags)
    }

    pub fn is_tagged(&self, level: usize, r: usize) -> bool {
        self.levels
            .get(level)
            .and_then(|l| l.get(r))
            .copied()
            .unwrap_or(false)
    }

    pub fn level(&self, level: usize) -> &[bool] {
        &self.levels[level]
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }
}

/// Radial geometry shared read-only by every base-state operation.
#[derive(Debug, Clone)]
pub struct BaseStateGeometry {
    pub max_radial_level: usize,
    pub finest_radial_level: usize,
    pub nr_fine: usize,
    pub dr_fine: f64,
    pub spherical: bool,
    pub spacing: Spacing,
    nr: Vec<usize>,
    dr: Vec<f64>,
    pub r_cc_loc: RadialArray,
    pub r_edge_loc: RadialArray,
    cutoffs: Vec<CutoffCoords>,
    chunks: ChunkTable,
}

impl BaseStateGeometry {
    /// Build resolution, locations and a fully populated chunk table.
    ///
    /// Every level starts as one chunk spanning the whole level and
    /// `finest_radial_level = max_radial_level`; call
    /// [`init_multilevel`](Self::init_multilevel) to apply a refinement pattern.
    pub fn init(cfg: &GeometryConfig) -> BaseStateResult<Self> {
        if cfg.nr_fine == 0 || !cfg.dr_fine.is_finite() || cfg.dr_fine <= 0.0 {
            return Err(BaseStateError::ConfigError(
                "geometry needs nr_fine >= 1 and finite dr_fine > 0".to_string(),
            ));
        }
        if cfg.spherical && cfg.max_radial_level != 0 {
            return Err(BaseStateError::ConfigError(
                "spherical base state supports a single radial level".to_string(),
            ));
        }
        if !cfg.spherical && cfg.spacing == Spacing::Irregular {
            return Err(BaseStateError::ConfigError(
                "irregular spacing is only supported in spherical geometry".to_string(),
            ));
        }
        let max_lev = cfg.max_radial_level;
        let nlevs = max_lev + 1;
        let coarsening = 1usize
            .checked_shl(max_lev as u32)
            .filter(|&f| f > 0 && cfg.nr_fine % f == 0)
            .ok_or_else(|| {
                BaseStateError::ConfigError(format!(
                    "nr_fine = {} cannot be coarsened {} times by a factor of 2",
                    cfg.nr_fine, max_lev
                ))
            })?;

        let mut nr = Vec::with_capacity(nlevs);
        let mut dr = Vec::with_capacity(nlevs);
        for n in 0..nlevs {
            let factor = coarsening >> n;
            nr.push(cfg.nr_fine / factor);
            dr.push(cfg.dr_fine * factor as f64);
        }

        let mut r_cc_loc = RadialArray::cell(&nr);
        let mut r_edge_loc = RadialArray::edge(&nr);
        match cfg.spacing {
            Spacing::Regular => {
                for n in 0..nlevs {
                    for (i, v) in r_cc_loc.level_slice_mut(n).iter_mut().enumerate() {
                        *v = cfg.prob_lo + (i as f64 + 0.5) * dr[n];
                    }
                    for (i, v) in r_edge_loc.level_slice_mut(n).iter_mut().enumerate() {
                        *v = cfg.prob_lo + i as f64 * dr[n];
                    }
                }
            }
            Spacing::Irregular => {
                let edges = cfg.r_edge_loc.as_ref().ok_or_else(|| {
                    BaseStateError::ConfigError(
                        "irregular spacing requires explicit r_edge_loc".to_string(),
                    )
                })?;
                if edges.len() != cfg.nr_fine + 1 || edges.windows(2).any(|w| w[1] <= w[0]) {
                    return Err(BaseStateError::ConfigError(
                        "r_edge_loc must hold nr_fine + 1 strictly increasing radii".to_string(),
                    ));
                }
                // Spherical rows divide by r_cc², so every center must sit above the origin.
                if edges[0] < 0.0 || edges.windows(2).any(|w| 0.5 * (w[0] + w[1]) <= 0.0) {
                    return Err(BaseStateError::ConfigError(format!(
                        "r_edge_loc must start at a radius >= 0, got {}",
                        edges[0]
                    )));
                }
                r_edge_loc.level_slice_mut(0).copy_from_slice(edges);
                for (i, v) in r_cc_loc.level_slice_mut(0).iter_mut().enumerate() {
                    *v = 0.5 * (edges[i] + edges[i + 1]);
                }
            }
        }

        let mut chunks = ChunkTable::new(nlevs);
        for (n, &nr_lev) in nr.iter().enumerate() {
            chunks.set_level(
                n,
                vec![Chunk {
                    start: 0,
                    end: nr_lev - 1,
                }],
            );
        }
        let cutoffs = nr
            .iter()
            .map(|&n| CutoffCoords {
                base: n,
                anelastic: n,
                burning_lo: n,
                burning_hi: n,
            })
            .collect();

        Ok(BaseStateGeometry {
            max_radial_level: max_lev,
            finest_radial_level: max_lev,
            nr_fine: cfg.nr_fine,
            dr_fine: cfg.dr_fine,
            spherical: cfg.spherical,
            spacing: cfg.spacing,
            nr,
            dr,
            r_cc_loc,
            r_edge_loc,
            cutoffs,
            chunks,
        })
    }

    /// Rebuild the chunk table from a refinement pattern.
    ///
    /// Level 0 is always a single chunk. Level `n` chunks are the maximal
    /// tagged runs of level `n - 1`, scaled by the refinement ratio.
    pub fn init_multilevel(
        &mut self,
        finest_radial_level: usize,
        tags: &TagArray,
    ) -> BaseStateResult<()> {
        if finest_radial_level > self.max_radial_level {
            return Err(BaseStateError::ConfigError(format!(
                "finest_radial_level = {} exceeds max_radial_level = {}",
                finest_radial_level, self.max_radial_level
            )));
        }
        if tags.num_levels() < finest_radial_level {
            return Err(BaseStateError::ConfigError(format!(
                "tag array has {} levels, {} needed",
                tags.num_levels(),
                finest_radial_level
            )));
        }

        let mut table = ChunkTable::new(self.max_radial_level + 1);
        table.set_level(
            0,
            vec![Chunk {
                start: 0,
                end: self.nr[0] - 1,
            }],
        );

        for n in 1..=finest_radial_level {
            let coarse = tags.level(n - 1);
            if coarse.len() != self.nr[n - 1] {
                return Err(BaseStateError::ConfigError(format!(
                    "tag array level {} has {} cells, expected {}",
                    n - 1,
                    coarse.len(),
                    self.nr[n - 1]
                )));
            }
            let mut chunks = Vec::new();
            let mut run_start: Option<usize> = None;
            for r in 0..=coarse.len() {
                let tagged = r < coarse.len() && coarse[r];
                match (tagged, run_start) {
                    (true, None) => run_start = Some(r),
                    (false, Some(lo)) => {
                        chunks.push(Chunk {
                            start: REF_RATIO * lo,
                            end: REF_RATIO * r - 1,
                        });
                        run_start = None;
                    }
                    _ => {}
                }
            }
            // Refined cells of level n must sit inside populated cells of level n-1.
            for c in &chunks {
                for r in (c.start / REF_RATIO)..=(c.end / REF_RATIO) {
                    if !table.chunks(n - 1).iter().any(|pc| pc.contains_cell(r)) {
                        return Err(BaseStateError::ConfigError(format!(
                            "level {n} chunk {}..={} is not nested in level {}",
                            c.start,
                            c.end,
                            n - 1
                        )));
                    }
                }
            }
            table.set_level(n, chunks);
        }

        self.finest_radial_level = finest_radial_level;
        self.chunks = table;
        debug!(
            "init_multilevel: finest_radial_level = {}, chunks per level = {:?}",
            self.finest_radial_level,
            (0..=self.finest_radial_level)
                .map(|n| self.numdisjointchunks(n))
                .collect::<Vec<_>>()
        );
        Ok(())
    }

    /// Recompute the four cutoff coordinates from the current density.
    ///
    /// Levels are searched coarse to fine, chunks in order. The first index
    /// with `rho0 <= threshold` fixes the coordinate on its level; finer
    /// levels get `2c + 1` and coarser levels `c / 2`.
    pub fn compute_cutoff_coords(
        &mut self,
        rho0: &RadialArray,
        densities: &CutoffDensities,
    ) -> BaseStateResult<()> {
        if !rho0.same_shape(&self.cell_array()) {
            return Err(BaseStateError::ConfigError(
                "rho0 does not match the geometry's cell layout".to_string(),
            ));
        }
        let base = self.locate_cutoff(rho0, densities.base_cutoff_density);
        let anelastic = self.locate_cutoff(rho0, densities.anelastic_cutoff_density);
        let burning_lo = self.locate_cutoff(rho0, densities.burning_cutoff_density_lo);
        let burning_hi = self.locate_cutoff(rho0, densities.burning_cutoff_density_hi);
        self.cutoffs = (0..=self.max_radial_level)
            .map(|n| CutoffCoords {
                base: base[n],
                anelastic: anelastic[n],
                burning_lo: burning_lo[n],
                burning_hi: burning_hi[n],
            })
            .collect();
        debug!("cutoff coords: {:?}", self.cutoffs);
        Ok(())
    }

    fn locate_cutoff(&self, rho0: &RadialArray, threshold: f64) -> Vec<usize> {
        let mut found: Option<(usize, usize)> = None;
        'levels: for n in 0..=self.finest_radial_level {
            for c in self.chunks(n) {
                for r in c.start..=c.end {
                    if rho0[(n, r)] <= threshold {
                        found = Some((n, r));
                        break 'levels;
                    }
                }
            }
        }

        let mut coords = self.nr.clone();
        if let Some((which, coord)) = found {
            coords[which] = coord;
            for n in which + 1..=self.max_radial_level {
                coords[n] = REF_RATIO * coords[n - 1] + 1;
            }
            for n in (0..which).rev() {
                coords[n] = coords[n + 1] / REF_RATIO;
            }
        }
        coords
    }

    /// Override the cutoff coordinates (one entry per level).
    pub fn set_cutoff_coords(&mut self, coords: Vec<CutoffCoords>) -> BaseStateResult<()> {
        if coords.len() != self.max_radial_level + 1 {
            return Err(BaseStateError::ConfigError(format!(
                "expected {} cutoff entries, got {}",
                self.max_radial_level + 1,
                coords.len()
            )));
        }
        for (n, c) in coords.iter().enumerate() {
            let top = self.nr[n];
            if c.base > top || c.anelastic > top || c.burning_lo > top || c.burning_hi > top {
                return Err(BaseStateError::GridOutOfBounds {
                    level: n,
                    index: c.base.max(c.anelastic).max(c.burning_lo).max(c.burning_hi),
                });
            }
        }
        self.cutoffs = coords;
        Ok(())
    }

    /// Replace one level's chunks without the nesting checks of a regrid.
    #[cfg(test)]
    pub(crate) fn replace_chunks(&mut self, level: usize, chunks: Vec<Chunk>) {
        self.chunks.set_level(level, chunks);
    }

    pub fn nr(&self, level: usize) -> usize {
        self.nr[level]
    }

    pub fn dr(&self, level: usize) -> f64 {
        self.dr[level]
    }

    /// `nr` for every level, in order; the shape of a cell-centered array.
    pub fn nr_levels(&self) -> &[usize] {
        &self.nr
    }

    /// Width of cell `r` on `level`, from the edge table when irregular.
    pub fn cell_width(&self, level: usize, r: usize) -> f64 {
        match self.spacing {
            Spacing::Regular => self.dr[level],
            Spacing::Irregular => self.r_edge_loc[(level, r + 1)] - self.r_edge_loc[(level, r)],
        }
    }

    pub fn cutoff(&self, level: usize) -> CutoffCoords {
        self.cutoffs[level]
    }

    pub fn base_cutoff_density_coord(&self, level: usize) -> usize {
        self.cutoffs[level].base
    }

    pub fn chunks(&self, level: usize) -> &[Chunk] {
        self.chunks.chunks(level)
    }

    pub fn chunk_table(&self) -> &ChunkTable {
        &self.chunks
    }

    pub fn numdisjointchunks(&self, level: usize) -> usize {
        self.chunks.chunks(level).len()
    }

    pub fn r_start_coord(&self, level: usize, chunk: usize) -> usize {
        self.chunks.chunks(level)[chunk].start
    }

    pub fn r_end_coord(&self, level: usize, chunk: usize) -> usize {
        self.chunks.chunks(level)[chunk].end
    }

    /// Whether `(level, r)` is populated for the given centering.
    pub fn is_valid(&self, level: usize, r: usize, centering: Centering) -> bool {
        self.chunks(level).iter().any(|c| match centering {
            Centering::Cell => c.contains_cell(r),
            Centering::Edge => c.contains_edge(r),
        })
    }

    pub fn cell_array(&self) -> RadialArray {
        RadialArray::cell(&self.nr)
    }

    pub fn edge_array(&self) -> RadialArray {
        RadialArray::edge(&self.nr)
    }

    pub fn base_state(&self) -> BaseState {
        BaseState::new(&self.nr)
    }

    pub fn thermo_profile(&self) -> ThermoProfile {
        ThermoProfile::new(&self.nr)
    }
}
