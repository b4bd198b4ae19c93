// ─────────────────────────────────────────────────────────────────────
// Radial Base State — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::DEFAULT_GRAV_CONST;
use crate::error::{BaseStateError, BaseStateResult};
use serde::{Deserialize, Serialize};

/// Radial spacing of the base-state grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    Regular,
    /// Edges supplied explicitly, cell centers at their midpoints.
    Irregular,
}

/// How gravity varies with radius in planar geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GravityMode {
    /// Constant `grav_const`.
    Uniform,
    /// `-G M / r²` with `M = planar_invsq_mass`.
    InverseSquare,
    /// Enclosed-mass gravity on a planar octant domain.
    PlanarOctant,
}

/// Policy for values outside a level's populated chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostFillPolicy {
    /// Repeat the nearest valid value of the chunk.
    CopyNearest,
    /// Interpolate from the underlying coarser level.
    Linear,
}

/// Geometry section of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryConfig {
    pub spherical: bool,
    #[serde(default = "default_spacing")]
    pub spacing: Spacing,
    #[serde(default)]
    pub max_radial_level: usize,
    pub nr_fine: usize,
    pub dr_fine: f64,
    /// Radius of the innermost edge.
    #[serde(default)]
    pub prob_lo: f64,
    /// Explicit edge radii (`nr_fine + 1` values) for irregular spacing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_edge_loc: Option<Vec<f64>>,
}

/// Density thresholds that define the cutoff coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoffDensities {
    #[serde(default = "default_base_cutoff_density")]
    pub base_cutoff_density: f64,
    #[serde(default = "default_anelastic_cutoff_density")]
    pub anelastic_cutoff_density: f64,
    #[serde(default = "default_burning_cutoff_density_lo")]
    pub burning_cutoff_density_lo: f64,
    #[serde(default = "default_burning_cutoff_density_hi")]
    pub burning_cutoff_density_hi: f64,
}

fn default_spacing() -> Spacing {
    Spacing::Regular
}
fn default_base_cutoff_density() -> f64 {
    3.0e6
}
fn default_anelastic_cutoff_density() -> f64 {
    3.0e6
}
fn default_burning_cutoff_density_lo() -> f64 {
    3.0e6
}
fn default_burning_cutoff_density_hi() -> f64 {
    1.0e12
}
fn default_gravity() -> GravityMode {
    GravityMode::Uniform
}
fn default_grav_const() -> f64 {
    DEFAULT_GRAV_CONST
}
fn default_ghost_fill() -> GhostFillPolicy {
    GhostFillPolicy::Linear
}
fn default_verbose() -> u32 {
    1
}

impl Default for CutoffDensities {
    fn default() -> Self {
        CutoffDensities {
            base_cutoff_density: default_base_cutoff_density(),
            anelastic_cutoff_density: default_anelastic_cutoff_density(),
            burning_cutoff_density_lo: default_burning_cutoff_density_lo(),
            burning_cutoff_density_hi: default_burning_cutoff_density_hi(),
        }
    }
}

/// Top-level base-state configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseStateConfig {
    pub geometry: GeometryConfig,
    #[serde(default = "default_gravity")]
    pub gravity: GravityMode,
    #[serde(default = "default_grav_const")]
    pub grav_const: f64,
    /// Point mass below the domain for inverse-square planar gravity.
    #[serde(default)]
    pub planar_invsq_mass: f64,
    #[serde(default)]
    pub cutoffs: CutoffDensities,
    /// Weight of the volume-discrepancy correction (0 disables it).
    #[serde(default)]
    pub dpdt_factor: f64,
    #[serde(default = "default_ghost_fill")]
    pub ghost_fill: GhostFillPolicy,
    #[serde(default = "default_verbose")]
    pub verbose: u32,
}

impl Default for BaseStateConfig {
    fn default() -> Self {
        BaseStateConfig {
            geometry: GeometryConfig {
                spherical: false,
                spacing: Spacing::Regular,
                max_radial_level: 0,
                nr_fine: 256,
                dr_fine: 1.0e5,
                prob_lo: 0.0,
                r_edge_loc: None,
            },
            gravity: default_gravity(),
            grav_const: default_grav_const(),
            planar_invsq_mass: 0.0,
            cutoffs: CutoffDensities::default(),
            dpdt_factor: 0.0,
            ghost_fill: default_ghost_fill(),
            verbose: default_verbose(),
        }
    }
}

impl BaseStateConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> BaseStateResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BaseStateResult<()> {
        let g = &self.geometry;
        if g.nr_fine == 0 {
            return Err(BaseStateError::ConfigError(
                "nr_fine must be >= 1".to_string(),
            ));
        }
        if !g.dr_fine.is_finite() || g.dr_fine <= 0.0 {
            return Err(BaseStateError::ConfigError(
                "dr_fine must be finite and > 0".to_string(),
            ));
        }
        if !g.prob_lo.is_finite() || g.prob_lo < 0.0 {
            return Err(BaseStateError::ConfigError(
                "prob_lo must be finite and >= 0".to_string(),
            ));
        }
        if g.max_radial_level >= 30 {
            return Err(BaseStateError::ConfigError(format!(
                "max_radial_level = {} is out of range",
                g.max_radial_level
            )));
        }
        if g.spherical {
            if g.max_radial_level != 0 {
                return Err(BaseStateError::ConfigError(format!(
                    "spherical base state is single-level, got max_radial_level = {}",
                    g.max_radial_level
                )));
            }
        } else if g.nr_fine % (1usize << g.max_radial_level) != 0 {
            return Err(BaseStateError::ConfigError(format!(
                "nr_fine = {} is not divisible by 2^max_radial_level = {}",
                g.nr_fine,
                1usize << g.max_radial_level
            )));
        }
        if g.spacing == Spacing::Irregular {
            let edges = g.r_edge_loc.as_ref().ok_or_else(|| {
                BaseStateError::ConfigError(
                    "irregular spacing requires explicit r_edge_loc".to_string(),
                )
            })?;
            if edges.len() != g.nr_fine + 1 {
                return Err(BaseStateError::ConfigError(format!(
                    "r_edge_loc must have nr_fine + 1 = {} entries, got {}",
                    g.nr_fine + 1,
                    edges.len()
                )));
            }
            if edges.iter().any(|v| !v.is_finite()) || edges.windows(2).any(|w| w[1] <= w[0]) {
                return Err(BaseStateError::ConfigError(
                    "r_edge_loc must be finite and strictly increasing".to_string(),
                ));
            }
            if edges[0] < 0.0 {
                return Err(BaseStateError::ConfigError(format!(
                    "r_edge_loc[0] = {} must be >= 0",
                    edges[0]
                )));
            }
            if let Some(i) = edges.windows(2).position(|w| 0.5 * (w[0] + w[1]) <= 0.0) {
                return Err(BaseStateError::ConfigError(format!(
                    "cell center {i} of r_edge_loc is not > 0"
                )));
            }
        }
        if !self.grav_const.is_finite() || !self.planar_invsq_mass.is_finite() {
            return Err(BaseStateError::ConfigError(
                "gravity parameters must be finite".to_string(),
            ));
        }
        if !self.dpdt_factor.is_finite() {
            return Err(BaseStateError::ConfigError(
                "dpdt_factor must be finite".to_string(),
            ));
        }
        let c = &self.cutoffs;
        for (name, v) in [
            ("base_cutoff_density", c.base_cutoff_density),
            ("anelastic_cutoff_density", c.anelastic_cutoff_density),
            ("burning_cutoff_density_lo", c.burning_cutoff_density_lo),
            ("burning_cutoff_density_hi", c.burning_cutoff_density_hi),
        ] {
            if v.is_nan() {
                return Err(BaseStateError::ConfigError(format!("{name} must not be NaN")));
            }
        }
        if c.burning_cutoff_density_lo > c.burning_cutoff_density_hi {
            return Err(BaseStateError::ConfigError(
                "burning_cutoff_density_lo must not exceed burning_cutoff_density_hi".to_string(),
            ));
        }
        Ok(())
    }
}
