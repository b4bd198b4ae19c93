// ─────────────────────────────────────────────────────────────────────
// Radial Base State — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BaseStateError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Tridiagonal solve failed: zero pivot at row {row}")]
    SingularPivot { row: usize },

    #[error("Prolongation left {count} fine cells unfilled, first at index {first}")]
    UnfilledCells { count: usize, first: usize },

    #[error("Cutoff coordinate {coord} leaves no boundary row on a grid of {nr} cells")]
    CutoffOutOfRange { coord: usize, nr: usize },

    #[error("Radial array out of bounds: level={level}, index={index}")]
    GridOutOfBounds { level: usize, index: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type BaseStateResult<T> = Result<T, BaseStateError>;
