//! Error types for the action generator.

use thiserror::Error;

use crate::fetch::FetchError;
use crate::output::RenderError;
use crate::synthesize::SynthesisError;

/// Errors that can occur while generating actions.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The schema could not be retrieved from the NetBox host
    #[error("Failed to fetch schema: {0}")]
    Fetch(#[from] FetchError),

    /// The schema could not be turned into actions
    #[error("Action synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    /// The action template failed to load or render
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Failed to remove a previously generated file
    #[error("Failed to remove stale action '{path}': {source}")]
    RemoveError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to list or create the output directory
    #[error("Output directory '{path}' is not usable: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
