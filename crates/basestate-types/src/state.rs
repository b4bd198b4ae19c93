// ─────────────────────────────────────────────────────────────────────
// Radial Base State — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{ArrayView1, ArrayViewMut1};
use std::ops::{Index, IndexMut};

/// Where a radial quantity lives on a level: `nr` cell centers or `nr + 1` edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Centering {
    Cell,
    Edge,
}

impl Centering {
    pub fn len_for(self, nr: usize) -> usize {
        match self {
            Centering::Cell => nr,
            Centering::Edge => nr + 1,
        }
    }
}

/// Multilevel 1D radial field indexed by `(level, radial_index)`.
///
/// All levels share one flat buffer; `offsets[level]` is the start of that
/// level's run and `lens[level]` its length. Radial index increases outward.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialArray {
    data: Vec<f64>,
    offsets: Vec<usize>,
    lens: Vec<usize>,
    centering: Centering,
}

impl RadialArray {
    /// Zero-initialised array with `nr[level]` cells per level.
    pub fn zeros(nr: &[usize], centering: Centering) -> Self {
        let lens: Vec<usize> = nr.iter().map(|&n| centering.len_for(n)).collect();
        let mut offsets = Vec::with_capacity(lens.len());
        let mut total = 0usize;
        for &len in &lens {
            offsets.push(total);
            total += len;
        }
        RadialArray {
            data: vec![0.0; total],
            offsets,
            lens,
            centering,
        }
    }

    pub fn cell(nr: &[usize]) -> Self {
        Self::zeros(nr, Centering::Cell)
    }

    pub fn edge(nr: &[usize]) -> Self {
        Self::zeros(nr, Centering::Edge)
    }

    /// Build from explicit per-level values. Level lengths are taken as given.
    pub fn from_levels(centering: Centering, levels: &[Vec<f64>]) -> Self {
        let mut offsets = Vec::with_capacity(levels.len());
        let mut lens = Vec::with_capacity(levels.len());
        let mut data = Vec::new();
        for lev in levels {
            offsets.push(data.len());
            lens.push(lev.len());
            data.extend_from_slice(lev);
        }
        RadialArray {
            data,
            offsets,
            lens,
            centering,
        }
    }

    /// Same shape and centering as `self`, every value set to `value`.
    pub fn like(&self, value: f64) -> Self {
        RadialArray {
            data: vec![value; self.data.len()],
            offsets: self.offsets.clone(),
            lens: self.lens.clone(),
            centering: self.centering,
        }
    }

    pub fn centering(&self) -> Centering {
        self.centering
    }

    pub fn num_levels(&self) -> usize {
        self.lens.len()
    }

    pub fn level_len(&self, level: usize) -> usize {
        self.lens[level]
    }

    pub fn level_slice(&self, level: usize) -> &[f64] {
        let start = self.offsets[level];
        &self.data[start..start + self.lens[level]]
    }

    pub fn level_slice_mut(&mut self, level: usize) -> &mut [f64] {
        let start = self.offsets[level];
        let len = self.lens[level];
        &mut self.data[start..start + len]
    }

    pub fn level(&self, level: usize) -> ArrayView1<'_, f64> {
        ArrayView1::from(self.level_slice(level))
    }

    pub fn level_mut(&mut self, level: usize) -> ArrayViewMut1<'_, f64> {
        ArrayViewMut1::from(self.level_slice_mut(level))
    }

    pub fn get(&self, level: usize, r: usize) -> Option<f64> {
        if level >= self.lens.len() || r >= self.lens[level] {
            return None;
        }
        Some(self.data[self.offsets[level] + r])
    }

    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|v| *v = value);
    }

    /// True when both arrays have identical level lengths and centering.
    pub fn same_shape(&self, other: &RadialArray) -> bool {
        self.centering == other.centering && self.lens == other.lens
    }

    /// Flat backing store, level 0 first.
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }
}

impl Index<(usize, usize)> for RadialArray {
    type Output = f64;

    fn index(&self, (level, r): (usize, usize)) -> &f64 {
        &self.level_slice(level)[r]
    }
}

impl IndexMut<(usize, usize)> for RadialArray {
    fn index_mut(&mut self, (level, r): (usize, usize)) -> &mut f64 {
        &mut self.level_slice_mut(level)[r]
    }
}

/// Cell-centered thermodynamic base state at one time level.
#[derive(Debug, Clone)]
pub struct ThermoProfile {
    pub rho0: RadialArray,
    pub p0: RadialArray,
    pub gamma1bar: RadialArray,
}

impl ThermoProfile {
    pub fn new(nr: &[usize]) -> Self {
        ThermoProfile {
            rho0: RadialArray::cell(nr),
            p0: RadialArray::cell(nr),
            gamma1bar: RadialArray::cell(nr),
        }
    }
}

/// Fields owned by the caller of the w0 solve.
///
/// `w0` and `etarho_ec` are edge-centered, `w0_force` and `etarho_cc`
/// cell-centered. The solver overwrites `w0` and `w0_force`.
#[derive(Debug, Clone)]
pub struct BaseState {
    pub w0: RadialArray,
    pub w0_force: RadialArray,
    pub etarho_cc: RadialArray,
    pub etarho_ec: RadialArray,
}

impl BaseState {
    pub fn new(nr: &[usize]) -> Self {
        BaseState {
            w0: RadialArray::edge(nr),
            w0_force: RadialArray::cell(nr),
            etarho_cc: RadialArray::cell(nr),
            etarho_ec: RadialArray::edge(nr),
        }
    }
}
