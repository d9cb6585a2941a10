//! Renderer error types

use crate::backend::BackendError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort renderer initialization or resizing.
///
/// None of these are recoverable; the renderer does not retry or fall
/// back when a resource cannot be created.
#[derive(Error, Debug)]
pub enum RendererError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("Failed to load texture {path}: {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid renderer configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type RendererResult<T> = Result<T, RendererError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_display_through() {
        let err: RendererError = BackendError::FramebufferCreationFailed("incomplete".into()).into();
        assert_eq!(err.to_string(), "Failed to create framebuffer: incomplete");
    }
}
