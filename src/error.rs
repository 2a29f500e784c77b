use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Custom error type for the ScopeSrt application
#[derive(Debug, Error)]
pub enum Error {
    /// IO operations errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Source directory missing or unreadable
    #[error("Cannot access directory {}: {source}", path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Invalid file or directory path
    #[error("Invalid path: {}", .0.display())]
    InvalidPath(PathBuf),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
    /// An image could not be placed on its slide
    #[error("Cannot place {channel} image for sample '{sample}' ({}): {reason}", path.display())]
    Render {
        sample: String,
        channel: String,
        path: PathBuf,
        reason: String,
    },
    /// Presentation package (zip) errors
    #[error("Presentation packaging error: {0}")]
    Package(#[from] zip::result::ZipError),
    /// XML writer errors
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Batch processing errors
    #[error("Batch processing error: {0}")]
    Batch(String),
}

impl Error {
    /// Wrap an io error raised while reading `path` as a directory
    pub fn directory(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::DirectoryAccess {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for ScopeSrt operations
pub type Result<T> = std::result::Result<T, Error>;
