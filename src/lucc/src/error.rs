//! Command errors and process exit codes

use lucc_core::{ExportError, PackageError, WalkError};
use thiserror::Error;

pub const ERR_BAD_ARGS: u8 = 1;
pub const ERR_MISSING_PKG: u8 = 2;
pub const ERR_MISSING_CLASS: u8 = 3;
pub const ERR_BAD_OBJECT: u8 = 4;
pub const ERR_UNKNOWN_CMD: u8 = 5;
pub const ERR_INIT: u8 = 6;
pub const ERR_BAD_PATH: u8 = 7;
pub const ERR_EXPORT_FAILED: u8 = 8;

#[derive(Error, Debug)]
pub enum LuccError {
    /// Argument parsing failed, or help/version output was requested
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("{0}")]
    BadArgs(String),

    #[error("failed to open package '{name}'")]
    MissingPackage {
        name: String,
        #[source]
        source: PackageError,
    },

    #[error("object '{object}' is a '{actual}', not a '{expected}'")]
    MissingClass {
        object: String,
        expected: String,
        actual: String,
    },

    #[error("failed to load object '{object}'")]
    BadObject {
        object: String,
        #[source]
        source: PackageError,
    },

    #[error("object '{0}' not found")]
    ObjectNotFound(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("initialization failed: {0:#}")]
    Init(anyhow::Error),

    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("could not export object '{object}'")]
    Export {
        object: String,
        #[source]
        source: ExportError,
    },
}

impl LuccError {
    pub fn exit_code(&self) -> u8 {
        match self {
            // Help and version output are not failures
            LuccError::Usage(e) if !e.use_stderr() => 0,
            LuccError::Usage(_) | LuccError::BadArgs(_) => ERR_BAD_ARGS,
            LuccError::MissingPackage { .. } => ERR_MISSING_PKG,
            LuccError::MissingClass { .. } => ERR_MISSING_CLASS,
            LuccError::BadObject { .. } | LuccError::ObjectNotFound(_) => ERR_BAD_OBJECT,
            LuccError::UnknownCommand(_) => ERR_UNKNOWN_CMD,
            LuccError::Init(_) => ERR_INIT,
            LuccError::Walk(WalkError::Path { .. }) => ERR_BAD_PATH,
            LuccError::Walk(WalkError::Package(_)) => ERR_BAD_OBJECT,
            LuccError::Export { .. } => ERR_EXPORT_FAILED,
        }
    }

    /// The error and its sources, joined with ": "
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let missing = LuccError::MissingPackage {
            name: "Foo".to_string(),
            source: PackageError::NotFound {
                name: "Foo".to_string(),
                searched: Vec::new(),
            },
        };
        assert_eq!(missing.exit_code(), ERR_MISSING_PKG);

        let path = LuccError::Walk(WalkError::Path {
            path: PathBuf::from("/out"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(path.exit_code(), ERR_BAD_PATH);

        assert_eq!(LuccError::UnknownCommand("x".to_string()).exit_code(), ERR_UNKNOWN_CMD);
        assert_eq!(LuccError::BadArgs("x".to_string()).exit_code(), ERR_BAD_ARGS);
        assert_eq!(LuccError::ObjectNotFound("x".to_string()).exit_code(), ERR_BAD_OBJECT);
        assert_eq!(
            LuccError::Init(anyhow::anyhow!("broken config")).exit_code(),
            ERR_INIT
        );
    }

    #[test]
    fn test_chain_includes_sources() {
        let err = LuccError::BadObject {
            object: "Pkg.Tex".to_string(),
            source: PackageError::NameIndex(12),
        };
        assert_eq!(
            err.chain(),
            "failed to load object 'Pkg.Tex': name index 12 out of range"
        );
    }

    #[test]
    fn test_transparent_walk_error_message() {
        let err = LuccError::Walk(WalkError::Path {
            path: PathBuf::from("/out"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert!(err.to_string().starts_with("could not create output folder '/out'"));
    }
}
