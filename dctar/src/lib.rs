//! In-memory gzip and zlib compression.
//!
//! Every operation takes a whole buffer and returns a newly allocated one.
//! For payloads that do not comfortably fit in memory, use a streaming
//! encoder instead; nothing here reads or writes incrementally.

pub mod codec;
pub mod compression;
pub mod config;
pub mod error;
mod util;

pub use codec::Codec;
pub use compression::Format;
pub use config::Limits;
pub use error::{CodecError, ErrorKind, Result};

/// Gzip-compress `data` with the default codec settings.
pub fn gzip_compress(data: &[u8]) -> Result<Vec<u8>> {
    Codec::default().gzip_compress(data)
}

/// Decompress a gzip stream, enforcing the default [`Limits`].
pub fn gzip_decompress(data: &[u8]) -> Result<Vec<u8>> {
    Codec::default().gzip_decompress(data)
}

/// Zlib-compress `data` with the default codec settings.
pub fn zlib_compress(data: &[u8]) -> Result<Vec<u8>> {
    Codec::default().zlib_compress(data)
}

/// Decompress a zlib stream, enforcing the default [`Limits`].
pub fn zlib_decompress(data: &[u8]) -> Result<Vec<u8>> {
    Codec::default().zlib_decompress(data)
}

/// Decompress either format, picking the decoder from the leading magic bytes.
pub fn decompress(data: &[u8]) -> Result<(Format, Vec<u8>)> {
    Codec::default().decompress(data)
}
