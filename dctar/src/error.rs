use crate::compression::Format;
use std::collections::TryReserveError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Error, Debug)]
pub enum CodecError {
    /// The input does not start with a header of the expected format.
    #[error("not a valid {format} stream: {reason}")]
    Format { format: Format, reason: String },

    #[error("input is neither a gzip nor a zlib stream")]
    UnknownFormat,

    /// The header is right but the stream is truncated, malformed, or fails
    /// its checksum.
    #[error("corrupt {format} stream: {reason}")]
    Corruption { format: Format, reason: String },

    #[error("codec resource failure: {0}")]
    Resource(String),

    #[error("decompressed output exceeds the limit of {limit} bytes")]
    SizeLimit { limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Corruption,
    Resource,
    SizeLimit,
}

impl CodecError {
    pub(crate) fn format(format: Format, reason: impl Into<String>) -> Self {
        CodecError::Format {
            format,
            reason: reason.into(),
        }
    }

    pub(crate) fn corruption(format: Format, reason: impl Into<String>) -> Self {
        CodecError::Corruption {
            format,
            reason: reason.into(),
        }
    }

    pub(crate) fn truncated(format: Format) -> Self {
        Self::corruption(format, "unexpected end of input")
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Format { .. } | CodecError::UnknownFormat => ErrorKind::Format,
            CodecError::Corruption { .. } => ErrorKind::Corruption,
            CodecError::Resource(_) => ErrorKind::Resource,
            CodecError::SizeLimit { .. } => ErrorKind::SizeLimit,
        }
    }
}

impl From<TryReserveError> for CodecError {
    fn from(err: TryReserveError) -> Self {
        CodecError::Resource(err.to_string())
    }
}

#[test]
fn test_error_kinds() {
    assert_eq!(
        CodecError::truncated(Format::Gzip).kind(),
        ErrorKind::Corruption
    );
    assert_eq!(
        CodecError::format(Format::Zlib, "bad method").kind(),
        ErrorKind::Format
    );
    assert_eq!(
        CodecError::SizeLimit { limit: 10 }.to_string(),
        "decompressed output exceeds the limit of 10 bytes"
    );
    assert_eq!(
        CodecError::truncated(Format::Zlib).to_string(),
        "corrupt zlib stream: unexpected end of input"
    );
}
