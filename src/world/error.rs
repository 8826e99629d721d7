use std::io;

use thiserror::Error;

use super::validator::ValidationError;

/// Everything that can go wrong while turning a world file into a `World`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read world file: {0}")]
    Io(#[from] io::Error),

    #[error("world file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Malformed(String),

    #[error("world failed validation:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e.message))
        .collect::<Vec<_>>()
        .join("\n")
}
