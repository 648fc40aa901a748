//! Error types for the converter
//!
//! Every failure is fatal for the run it happens in. The three variants map to
//! the three places a conversion can go wrong: option validation (before any
//! source file is touched), module resolution and file system access.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Invalid or missing option, detected before any source file I/O
    #[error("{0}")]
    Configuration(String),

    /// A dependency specifier could not be mapped to a file
    #[error("Can't resolve module \"{specifier}\" from \"{}\"", .from.display())]
    Resolution { specifier: String, from: PathBuf },

    /// Reading a source, creating a directory or writing an output failed
    #[error("Can't {action} \"{}\". {}", .path.display(), io_code(.source))]
    Io {
        action: IoAction,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The file system operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAction {
    Read,
    CreateDir,
    Write,
}

impl std::fmt::Display for IoAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read file"),
            Self::CreateDir => write!(f, "create dir"),
            Self::Write => write!(f, "write file"),
        }
    }
}

impl ConvertError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn io(action: IoAction, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Short diagnostic code for an I/O error, e.g. `ENOENT`
fn io_code(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "ENOENT".to_owned(),
        io::ErrorKind::PermissionDenied => "EACCES".to_owned(),
        io::ErrorKind::AlreadyExists => "EEXIST".to_owned(),
        io::ErrorKind::IsADirectory => "EISDIR".to_owned(),
        io::ErrorKind::NotADirectory => "ENOTDIR".to_owned(),
        kind => format!("{kind:?}"),
    }
}
