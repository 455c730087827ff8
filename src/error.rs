//! Setup errors
//!
//! Everything that can go wrong while the viewer is being created. Once
//! setup succeeds the frame loop has no fallible operations.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while preparing the environment, the GPU or the scene.
///
/// Any of these aborts window construction: the viewer is reported as
/// "not created" and no partial scene is shown.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("shader search root is not set (WIREMESH_PATH) and no shader directory was configured")]
    ShaderRootMissing,

    #[error("cannot find file {name}")]
    ShaderNotFound { name: String },

    #[error("failed to read shader {path:?}")]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create program from {path:?}: {message}")]
    ProgramCreation { path: PathBuf, message: String },

    #[error("failed to create surface: {0}")]
    Surface(String),

    #[error("no compatible graphics adapter found")]
    Adapter,

    #[error("failed to request device: {0}")]
    Device(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_file() {
        let err = SetupError::ShaderNotFound {
            name: "wire_mesh.wgsl".to_string(),
        };
        assert_eq!(err.to_string(), "cannot find file wire_mesh.wgsl");
    }

    #[test]
    fn read_errors_keep_their_source() {
        let err = SetupError::ShaderRead {
            path: PathBuf::from("shaders/wire_mesh.wgsl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
