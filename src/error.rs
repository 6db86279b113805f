// SPDX-License-Identifier: MPL-2.0
use std::fmt;

/// Every failure the raster pipeline can report.
///
/// All variants are recoverable at the tool boundary: callers turn them into a
/// transient [`Notification`](crate::notifications::Notification) and keep going.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The input's declared MIME type is not in the `image/*` category.
    UnsupportedType { mime: String },

    /// The bytes could not be decoded as an image.
    DecodeFailure(String),

    /// A drawing surface could not be allocated (zero or oversized dimensions).
    ContextUnavailable(String),

    /// Serializing the surface to an encoded artifact failed.
    EncodeFailure(String),

    /// The enhancement gateway was unreachable or answered with a non-success status.
    NetworkFailure(String),

    /// A parameter was rejected (e.g. removing one of the last two gradient stops).
    InvalidParameter(String),

    /// Key/value storage could not be read or written.
    Storage(String),

    Io(String),
    Config(String),
}

impl Error {
    /// Returns the message key used when this error is surfaced as a notification.
    pub fn notification_key(&self) -> &'static str {
        match self {
            Error::UnsupportedType { .. } => "error-unsupported-type",
            Error::DecodeFailure(_) => "error-decode-failure",
            Error::ContextUnavailable(_) => "error-context-unavailable",
            Error::EncodeFailure(_) => "error-encode-failure",
            Error::NetworkFailure(_) => "error-network-failure",
            Error::InvalidParameter(_) => "error-invalid-parameter",
            Error::Storage(_) => "error-storage",
            Error::Io(_) => "error-io",
            Error::Config(_) => "error-config",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedType { mime } => {
                write!(f, "Unsupported file type: {mime} (expected image/*)")
            }
            Error::DecodeFailure(e) => write!(f, "Decode Error: {}", e),
            Error::ContextUnavailable(e) => write!(f, "Drawing Surface Error: {}", e),
            Error::EncodeFailure(e) => write!(f, "Encode Error: {}", e),
            Error::NetworkFailure(e) => write!(f, "Network Error: {}", e),
            Error::InvalidParameter(e) => write!(f, "Invalid Parameter: {}", e),
            Error::Storage(e) => write!(f, "Storage Error: {}", e),
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        match err {
            image_rs::ImageError::Encoding(e) => Error::EncodeFailure(e.to_string()),
            image_rs::ImageError::IoError(e) => Error::Io(e.to_string()),
            other => Error::DecodeFailure(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkFailure(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
