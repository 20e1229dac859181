use crate::compression::{self, Format};
use crate::config::Limits;
use crate::error::Result;
use tracing::debug;

/// Whole-buffer gzip and zlib codec.
///
/// A `Codec` only carries its [`Limits`]; it can be copied freely and shared
/// between threads. Each call allocates its own output and returns it, or
/// returns an error and no output at all.
///
/// ```
/// use dctar::Codec;
///
/// let codec = Codec::default();
/// let packed = codec.gzip_compress(b"abc").unwrap();
/// assert_eq!(codec.gzip_decompress(&packed).unwrap(), b"abc");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    limits: Limits,
}

impl Codec {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Produces a gzip stream with a zeroed mtime and no optional header
    /// fields. Only fails if memory for the output cannot be allocated.
    pub fn gzip_compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.compress(Format::Gzip, data)
    }

    /// Decodes one or more concatenated gzip members.
    pub fn gzip_decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.decompress_as(Format::Gzip, data)
    }

    pub fn zlib_compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.compress(Format::Zlib, data)
    }

    pub fn zlib_decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.decompress_as(Format::Zlib, data)
    }

    pub fn compress(&self, format: Format, data: &[u8]) -> Result<Vec<u8>> {
        format.compressor().compress(data)
    }

    pub fn decompress_as(&self, format: Format, data: &[u8]) -> Result<Vec<u8>> {
        let res = format.decompressor().decompress(data, &self.limits);
        if let Err(err) = &res {
            debug!(%format, input_len = data.len(), error = %err, "rejected input");
        }
        res
    }

    /// Detects the format from the leading bytes, then decompresses.
    pub fn decompress(&self, data: &[u8]) -> Result<(Format, Vec<u8>)> {
        let dc = compression::guess_decompressor(data)?;
        let format = dc.format();
        let out = self.decompress_as(format, data)?;
        Ok((format, out))
    }
}
