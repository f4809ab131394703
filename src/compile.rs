use std::{
    path::{Path, PathBuf},
    process::Command,
};

use tracing::{debug, info};

use crate::error::{FuriganaError, Result};

/// External program that turns a written source file into a rendered
/// document next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiler {
    pub program: String,
    /// arguments placed before the source file name
    pub args: Vec<String>,
    /// extension of the artifact the program leaves beside the source
    pub artifact_extension: String,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new("lualatex")
    }
}

impl Compiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![
                "-interaction=nonstopmode".to_string(),
                "-halt-on-error".to_string(),
            ],
            artifact_extension: "pdf".to_string(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn artifact_path(&self, source: &Path) -> PathBuf {
        source.with_extension(&self.artifact_extension)
    }

    /// Compile `source` from within its own directory. Failures are not
    /// retried; they usually mean the content needs fixing.
    pub fn compile(&self, source: &Path) -> Result<PathBuf> {
        let dir = source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = source.file_name().unwrap_or(source.as_os_str());

        info!("Compiling {:?} with {}...", source, self.program);

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(file_name)
            .current_dir(dir)
            .status()
            .map_err(|source| FuriganaError::CompilerSpawn {
                program: self.program.clone(),
                source,
            })?;

        debug!("{} exited with {}", self.program, status);

        if !status.success() {
            return Err(FuriganaError::CompilerFailed {
                source_path: source.to_path_buf(),
                status,
            });
        }

        let artifact = self.artifact_path(source);

        if !artifact.is_file() {
            return Err(FuriganaError::MissingArtifact { artifact });
        }

        info!("Rendered {:?}", artifact);

        Ok(artifact)
    }
}
