//! Shader file lookup.

use std::path::{Path, PathBuf};

use crate::error::SetupError;

/// Environment variable naming an extra data root; `<root>/shaders` is
/// searched after the configured directories.
pub const PATH_VARIABLE: &str = "WIREMESH_PATH";

/// Ordered list of directories searched for data files.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    directories: Vec<PathBuf>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the search list from `directories` followed by the
    /// `WIREMESH_PATH` root, if set. Fails when the list ends up empty.
    pub fn from_directories(directories: &[PathBuf]) -> Result<Self, SetupError> {
        let mut environment = Self::new();
        for directory in directories {
            environment.insert(directory);
        }
        if let Some(root) = std::env::var_os(PATH_VARIABLE) {
            environment.insert(Path::new(&root).join("shaders"));
        }

        if environment.directories.is_empty() {
            log::error!("No shader directories configured and {PATH_VARIABLE} is not set");
            return Err(SetupError::ShaderRootMissing);
        }
        Ok(environment)
    }

    /// Appends `directory` to the search list, ignoring duplicates.
    pub fn insert(&mut self, directory: impl Into<PathBuf>) {
        let directory = directory.into();
        if !self.directories.contains(&directory) {
            self.directories.push(directory);
        }
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// First existing file called `name` in the search list.
    pub fn get_path(&self, name: &str) -> Option<PathBuf> {
        self.directories
            .iter()
            .map(|directory| directory.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Like [`Environment::get_path`], logging and returning an error when
    /// the file is missing.
    pub fn require(&self, name: &str) -> Result<PathBuf, SetupError> {
        self.get_path(name).ok_or_else(|| {
            log::error!("Cannot find file {name}");
            SetupError::ShaderNotFound {
                name: name.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crate_shaders() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders")
    }

    #[test]
    fn finds_files_in_order() {
        let mut environment = Environment::new();
        environment.insert(Path::new(env!("CARGO_MANIFEST_DIR")).join("missing"));
        environment.insert(crate_shaders());
        let path = environment.get_path("wire_mesh.wgsl").unwrap();
        assert_eq!(path, crate_shaders().join("wire_mesh.wgsl"));
    }

    #[test]
    fn missing_files_are_reported() {
        let mut environment = Environment::new();
        environment.insert(crate_shaders());
        assert!(environment.get_path("nope.wgsl").is_none());
        assert!(matches!(
            environment.require("nope.wgsl"),
            Err(SetupError::ShaderNotFound { name }) if name == "nope.wgsl"
        ));
    }

    #[test]
    fn duplicates_are_ignored() {
        let mut environment = Environment::new();
        environment.insert(crate_shaders());
        environment.insert(crate_shaders());
        assert_eq!(environment.directories().len(), 1);
    }
}
