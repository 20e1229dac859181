use super::{deflate, Compressor, Decompressor, Format};
use crate::config::Limits;
use crate::error::{CodecError, Result};
use tracing::debug;

const CM_DEFLATE: u8 = 8;
const MAX_CINFO: u8 = 7;
const FDICT: u8 = 0x20;

pub struct ZlibCompressor {}

impl ZlibCompressor {
    pub fn new() -> Self {
        Self {}
    }
}

impl Compressor for ZlibCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        deflate::compress_into(data, true, &mut out)?;

        debug!(input_len = data.len(), output_len = out.len(), "zlib compressed");
        Ok(out)
    }

    fn format(&self) -> Format {
        Format::Zlib
    }
}

pub struct ZlibDecompressor {}

impl ZlibDecompressor {
    pub fn new() -> Self {
        Self {}
    }
}

impl Decompressor for ZlibDecompressor {
    fn decompress(&self, data: &[u8], limits: &Limits) -> Result<Vec<u8>> {
        check_header(data)?;

        let mut out = Vec::new();
        let consumed =
            deflate::decompress_into(data, true, Format::Zlib, &mut out, limits.max_output_len)?;
        if consumed != data.len() {
            return Err(CodecError::corruption(
                Format::Zlib,
                format!("{} bytes of trailing data", data.len() - consumed),
            ));
        }

        debug!(input_len = data.len(), output_len = out.len(), "zlib decompressed");
        Ok(out)
    }

    fn format(&self) -> Format {
        Format::Zlib
    }

    fn matches(&self, data: &[u8]) -> bool {
        data.len() >= 2 && check_header(data).is_ok()
    }
}

// RFC 1950 CMF/FLG pair. The check is split so that a lone CMF byte that
// could still start a valid stream reads as truncation.
fn check_header(data: &[u8]) -> Result<()> {
    let cmf = match data.first() {
        Some(&cmf) => cmf,
        None => return Err(CodecError::truncated(Format::Zlib)),
    };

    if cmf & 0x0f != CM_DEFLATE {
        return Err(CodecError::format(
            Format::Zlib,
            format!("unsupported compression method {}", cmf & 0x0f),
        ));
    }

    if cmf >> 4 > MAX_CINFO {
        return Err(CodecError::format(
            Format::Zlib,
            format!("invalid window size {}", cmf >> 4),
        ));
    }

    let flg = match data.get(1) {
        Some(&flg) => flg,
        None => return Err(CodecError::truncated(Format::Zlib)),
    };

    if (u16::from(cmf) << 8 | u16::from(flg)) % 31 != 0 {
        return Err(CodecError::format(Format::Zlib, "header check bits do not match"));
    }

    if flg & FDICT != 0 {
        return Err(CodecError::format(
            Format::Zlib,
            "preset dictionaries are not supported",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_check_header() {
        for hdr in [[0x78, 0x01], [0x78, 0x5e], [0x78, 0x9c], [0x78, 0xda], [0x08, 0x1d]] {
            assert!(check_header(&hdr).is_ok(), "{:02x?}", hdr);
        }
    }

    #[test]
    fn test_check_header_rejects() {
        let kind = |data: &[u8]| check_header(data).unwrap_err().kind();

        assert_eq!(kind(&[]), ErrorKind::Corruption);
        assert_eq!(kind(&[0x78]), ErrorKind::Corruption);
        assert_eq!(kind(&[0x1f, 0x8b]), ErrorKind::Format);
        assert_eq!(kind(&[0x88, 0x98]), ErrorKind::Format);
        assert_eq!(kind(&[0x78, 0x9d]), ErrorKind::Format);
        // 0x78 0xbb passes the check bits but sets FDICT.
        assert_eq!(kind(&[0x78, 0xbb]), ErrorKind::Format);
    }
}
