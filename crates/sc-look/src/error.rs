use core::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ImageError {
    /// The file could not be opened or decoded.
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    /// Decoded pixels did not fit an image buffer.
    Buffer { path: PathBuf, source: sc_core::Error },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { path, source } => {
                write!(f, "cannot decode image {}: {source}", path.display())
            }
            Self::Buffer { path, source } => {
                write!(f, "invalid pixel buffer for {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            Self::Buffer { source, .. } => Some(source),
        }
    }
}

/// Metadata read/write failure. Distinct from a missing key, which is `Ok(None)`.
#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    /// The metadata exists but cannot be understood.
    Corrupt { path: PathBuf, reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "metadata i/o on {}: {source}", path.display()),
            Self::Corrupt { path, reason } => {
                write!(f, "corrupt metadata in {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt { .. } => None,
        }
    }
}
