use core::fmt;

/// Errors raised while wrapping pixel buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Buffer length does not match the requested dimensions.
    SizeMismatch { expected: usize, actual: usize },
    /// `width * height` does not fit in `usize`.
    DimensionsOverflow { width: usize, height: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "pixel buffer holds {actual} elements, expected {expected}")
            }
            Self::DimensionsOverflow { width, height } => {
                write!(f, "image dimensions {width}x{height} overflow")
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn display_mentions_sizes() {
        let msg = Error::SizeMismatch {
            expected: 4,
            actual: 3,
        }
        .to_string();
        assert!(msg.contains('4') && msg.contains('3'));

        let msg = Error::DimensionsOverflow {
            width: usize::MAX,
            height: 2,
        }
        .to_string();
        assert!(msg.contains("overflow"));
    }
}
