// ─────────────────────────────────────────────────────────────────────
// Radial Base State — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Newtonian gravitational constant (cgs, cm³ g⁻¹ s⁻²).
pub const G_CONST: f64 = 6.67428e-8;

/// 4π/3, used for shell volumes in the enclosed-mass integral.
pub const FOUR_THIRDS_PI: f64 = 4.0 * std::f64::consts::PI / 3.0;

/// Radial refinement ratio between consecutive base-state levels.
pub const REF_RATIO: usize = 2;

/// Ghost cells filled on each side of a chunk.
pub const GHOST_WIDTH: usize = 2;

/// Default uniform gravitational acceleration (cm/s², pointing inward).
pub const DEFAULT_GRAV_CONST: f64 = -1.5e10;
