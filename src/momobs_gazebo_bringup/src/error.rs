//! Error types for the bringup sequencer

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while assembling the launch sequence.
///
/// Any of these aborts `LaunchSequencer::build` before a single action is
/// produced.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Package '{0}' not found. Ensure the package is installed and sourced.")]
    ResourceNotFound(String),

    #[error("Failed to process description template {}: {message}", .path.display())]
    TemplateProcessing { path: PathBuf, message: String },
}

#[derive(Error, Debug)]
pub enum SubstitutionError {
    #[error("Undefined variable: '{0}'. Did you forget to declare it as a launch argument?")]
    UndefinedVariable(String),
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Substitution error: {0}")]
    Substitution(#[from] SubstitutionError),

    #[error("Process action has an empty command line")]
    EmptyCommand,

    #[error("Parameter file error: {0}")]
    ParamFile(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LaunchError>;
