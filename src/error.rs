use std::{io, path::PathBuf, process::ExitStatus};

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T, E = FuriganaError> = std::result::Result<T, E>;

#[derive(Debug, Error, Diagnostic)]
pub enum FuriganaError {
    #[error("Failed to access {path:?}")]
    #[diagnostic(code(furiganize::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Tokenizer failed on paragraph {paragraph}")]
    #[diagnostic(code(furiganize::tokenizer))]
    Tokenizer {
        paragraph: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Template is missing the {placeholder} placeholder")]
    #[diagnostic(
        code(furiganize::template::missing_placeholder),
        help("Add {placeholder} where the value should be substituted")
    )]
    MissingPlaceholder { placeholder: &'static str },

    #[error("Failed to start document compiler `{program}`")]
    #[diagnostic(code(furiganize::compile::spawn))]
    CompilerSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Document compiler exited with {status} while compiling {source_path:?}")]
    #[diagnostic(
        code(furiganize::compile::failed),
        help("See the compiler log next to the source file")
    )]
    CompilerFailed {
        source_path: PathBuf,
        status: ExitStatus,
    },

    #[error("Document compiler produced no {artifact:?}")]
    #[diagnostic(code(furiganize::compile::missing_artifact))]
    MissingArtifact { artifact: PathBuf },
}

impl FuriganaError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| FuriganaError::Io { path, source }
    }
}
