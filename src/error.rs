use std::fmt;

/// Represents the possible errors that can occur during steganography operations.
#[derive(Debug)]
pub enum StegError {
    /// Error originating from the underlying image processing library.
    ImageProcessing(image::ImageError),
    /// Error indicating that the image format is not supported for output.
    UnsupportedFormat(String),
    /// Error indicating the carrier image has too few pixels to hold a seed header.
    ImageTooSmall(String),
    /// Error indicating the carrier image cannot hold the header plus the payload.
    CapacityExceeded(String),
    /// Error due to a numeric calculation overflow.
    CalculationOverflow(String),
    /// Error indicating the end-of-payload delimiter was never found while scanning.
    DelimiterNotFound,
    /// Error indicating the extracted bitstream did not end on a byte boundary.
    CorruptStream(String),
    /// Error indicating a malformed or unreadable archive blob.
    ArchiveCorrupt(String),
    /// Error indicating an archive entry attempted to escape the extraction directory.
    UnsafeArchivePath(String),
    /// General I/O error.
    Io(std::io::Error),
}

impl fmt::Display for StegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StegError::ImageProcessing(err) => write!(f, "Image processing error: {}", err),
            StegError::UnsupportedFormat(msg) => write!(f, "Unsupported image format: {}", msg),
            StegError::ImageTooSmall(msg) => write!(f, "Carrier image too small: {}", msg),
            StegError::CapacityExceeded(msg) => {
                write!(f, "Insufficient container capacity: {}", msg)
            }
            StegError::CalculationOverflow(msg) => {
                write!(f, "Numeric calculation overflow: {}", msg)
            }
            StegError::DelimiterNotFound => {
                write!(f, "End-of-payload delimiter not found in carrier image")
            }
            StegError::CorruptStream(msg) => write!(f, "Corrupt extracted bitstream: {}", msg),
            StegError::ArchiveCorrupt(msg) => write!(f, "Archive is corrupt: {}", msg),
            StegError::UnsafeArchivePath(msg) => {
                write!(f, "Archive contains an unsafe path: {}", msg)
            }
            StegError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for StegError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StegError::ImageProcessing(err) => Some(err),
            StegError::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Converts an `image::ImageError` into a `StegError::ImageProcessing` variant.
impl From<image::ImageError> for StegError {
    fn from(err: image::ImageError) -> Self {
        StegError::ImageProcessing(err)
    }
}

/// Converts a `std::io::Error` into a `StegError::Io` variant.
impl From<std::io::Error> for StegError {
    fn from(err: std::io::Error) -> Self {
        StegError::Io(err)
    }
}

/// Converts a `zip::result::ZipError` into a `StegError::ArchiveCorrupt` variant.
impl From<zip::result::ZipError> for StegError {
    fn from(err: zip::result::ZipError) -> Self {
        StegError::ArchiveCorrupt(err.to_string())
    }
}

/// A type alias for `Result<T, StegError>`, used for functions that can return a `StegError`.
pub type StegResult<T> = Result<T, StegError>;
