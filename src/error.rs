// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxdumpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("species list '{}' is empty", .0.display())]
    EmptySpeciesList(PathBuf),

    #[error("no taxa could be found for any species in the list")]
    NoTaxaFound,

    #[error("resolver failed for '{name}': {message}")]
    Resolver { name: String, message: String },

    #[error("invalid rank table '{}': {message}", .path.display())]
    InvalidRankTable { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, TaxdumpError>;
