//! Error types for the ovfkit core library.

use std::path::PathBuf;

/// The main error type for OVF decode and encode operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error with optional path context.
    #[error("I/O error{}: {source}", path.as_ref().map(|p| format!(" at '{}'", p.display())).unwrap_or_default())]
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },

    /// The document is not well-formed XML.
    #[error("XML error{}: {source}", position.map(|p| format!(" at byte {p}")).unwrap_or_default())]
    Xml {
        source: quick_xml::Error,
        position: Option<u64>,
    },

    /// The document is well-formed but does not fit the envelope model.
    #[error("OVF decode error: {message}")]
    Decode { message: String },

    /// The envelope could not be written as a descriptor.
    #[error("OVF encode error: {message}")]
    Encode { message: String },
}

/// A specialized Result type for ovfkit operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an I/O error with path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
        }
    }

    /// Create an I/O error without path context.
    pub fn io_simple(source: std::io::Error) -> Self {
        Self::Io { source, path: None }
    }

    /// Create an XML error at a byte offset of the input.
    pub fn xml_at(source: quick_xml::Error, position: u64) -> Self {
        Self::Xml {
            source,
            position: Some(position),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an encode error.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::io_simple(source)
    }
}

impl From<quick_xml::Error> for Error {
    fn from(source: quick_xml::Error) -> Self {
        Self::Xml {
            source,
            position: None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(source: quick_xml::events::attributes::AttrError) -> Self {
        Self::from(quick_xml::Error::from(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io(io_err, "/path/to/appliance.ovf");
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("/path/to/appliance.ovf"));
    }

    #[test]
    fn test_io_error_without_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io_simple(io_err);
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(!msg.contains("at '"));
    }

    #[test]
    fn test_decode_error() {
        let err = Error::decode("<rasd:Limit> is not a number");
        assert!(err.to_string().contains("OVF decode error"));
        assert!(err.to_string().contains("Limit"));
    }

    #[test]
    fn test_encode_error() {
        let err = Error::encode("writer closed");
        assert!(err.to_string().contains("OVF encode error"));
    }

    #[test]
    fn test_xml_error_position() {
        let xml_err = quick_xml::Error::from(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "truncated",
        ));
        let err = Error::xml_at(xml_err, 42);
        assert!(err.to_string().contains("at byte 42"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io { path: None, .. }));
    }
}
