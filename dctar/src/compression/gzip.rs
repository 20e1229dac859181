use super::{deflate, Compressor, Decompressor, Format};
use crate::config::Limits;
use crate::error::{CodecError, Result};
use crate::util;
use flate2::Crc;
use tracing::debug;

const MAGIC: &[u8] = &[0x1f, 0x8b];
const CM_DEFLATE: u8 = 8;

const FHCRC: u8 = 0x02;
const FEXTRA: u8 = 0x04;
const FNAME: u8 = 0x08;
const FCOMMENT: u8 = 0x10;
const FRESERVED: u8 = 0xe0;

const OS_UNKNOWN: u8 = 0xff;

// No flags, no mtime, so output only depends on the input bytes.
const HEADER: [u8; 10] = [0x1f, 0x8b, CM_DEFLATE, 0, 0, 0, 0, 0, 0, OS_UNKNOWN];
const HEADER_LEN: usize = 10;
const TRAILER_LEN: usize = 8;

pub struct GzipCompressor {}

impl GzipCompressor {
    pub fn new() -> Self {
        Self {}
    }
}

impl Compressor for GzipCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.try_reserve(HEADER_LEN + util::compress_bound(data.len()) + TRAILER_LEN)?;
        out.extend_from_slice(&HEADER);

        deflate::compress_into(data, false, &mut out)?;

        let mut crc = Crc::new();
        crc.update(data);
        out.extend_from_slice(&crc.sum().to_le_bytes());
        out.extend_from_slice(&crc.amount().to_le_bytes());

        debug!(input_len = data.len(), output_len = out.len(), "gzip compressed");
        Ok(out)
    }

    fn format(&self) -> Format {
        Format::Gzip
    }
}

pub struct GzipDecompressor {}

impl GzipDecompressor {
    pub fn new() -> Self {
        Self {}
    }
}

impl Decompressor for GzipDecompressor {
    fn decompress(&self, data: &[u8], limits: &Limits) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut rest = data;
        let mut members = 0usize;

        loop {
            let header_len = match parse_header(rest) {
                Err(CodecError::Format { .. }) if members > 0 => {
                    return Err(CodecError::corruption(
                        Format::Gzip,
                        "trailing data after gzip member",
                    ))
                }
                res => res?,
            };

            let body = &rest[header_len..];
            let member_start = out.len();
            let consumed = deflate::decompress_into(
                body,
                false,
                Format::Gzip,
                &mut out,
                limits.max_output_len,
            )?;

            let trailer = body
                .get(consumed..consumed + TRAILER_LEN)
                .ok_or_else(|| CodecError::truncated(Format::Gzip))?;
            verify_trailer(trailer, &out[member_start..])?;

            members += 1;
            rest = &body[consumed + TRAILER_LEN..];
            if rest.is_empty() {
                break;
            }
        }

        debug!(
            input_len = data.len(),
            output_len = out.len(),
            members,
            "gzip decompressed"
        );
        Ok(out)
    }

    fn format(&self) -> Format {
        Format::Gzip
    }

    fn matches(&self, data: &[u8]) -> bool {
        data.len() > MAGIC.len() && data.starts_with(MAGIC) && data[2] == CM_DEFLATE
    }
}

/// Validates a gzip member header and returns its length in bytes.
fn parse_header(data: &[u8]) -> Result<usize> {
    if !data.starts_with(MAGIC) {
        if MAGIC.starts_with(data) {
            return Err(CodecError::truncated(Format::Gzip));
        }
        return Err(CodecError::format(Format::Gzip, "missing gzip magic bytes"));
    }

    if let Some(&cm) = data.get(2) {
        if cm != CM_DEFLATE {
            return Err(CodecError::format(
                Format::Gzip,
                format!("unsupported compression method {}", cm),
            ));
        }
    }

    if let Some(&flags) = data.get(3) {
        if flags & FRESERVED != 0 {
            return Err(CodecError::format(
                Format::Gzip,
                format!("reserved header flags set ({:#04x})", flags),
            ));
        }
    }

    if data.len() < HEADER_LEN {
        return Err(CodecError::truncated(Format::Gzip));
    }

    let flags = data[3];
    let mut pos = HEADER_LEN;

    if flags & FEXTRA != 0 {
        let xlen = data
            .get(pos..pos + 2)
            .ok_or_else(|| CodecError::truncated(Format::Gzip))?;
        pos += 2 + u16::from_le_bytes([xlen[0], xlen[1]]) as usize;
        if pos > data.len() {
            return Err(CodecError::truncated(Format::Gzip));
        }
    }

    if flags & FNAME != 0 {
        pos = skip_zero_terminated(data, pos)?;
    }

    if flags & FCOMMENT != 0 {
        pos = skip_zero_terminated(data, pos)?;
    }

    if flags & FHCRC != 0 {
        let stored = data
            .get(pos..pos + 2)
            .ok_or_else(|| CodecError::truncated(Format::Gzip))?;
        let mut crc = Crc::new();
        crc.update(&data[..pos]);
        if crc.sum() as u16 != u16::from_le_bytes([stored[0], stored[1]]) {
            return Err(CodecError::corruption(Format::Gzip, "header checksum mismatch"));
        }
        pos += 2;
    }

    Ok(pos)
}

fn skip_zero_terminated(data: &[u8], pos: usize) -> Result<usize> {
    data[pos..]
        .iter()
        .position(|&ch| ch == 0)
        .map(|idx| pos + idx + 1)
        .ok_or_else(|| CodecError::truncated(Format::Gzip))
}

fn verify_trailer(trailer: &[u8], member: &[u8]) -> Result<()> {
    let (expected_crc, expected_len) = match (
        util::read_u32_le(trailer),
        util::read_u32_le(&trailer[4..]),
    ) {
        (Some(crc), Some(len)) => (crc, len),
        _ => return Err(CodecError::truncated(Format::Gzip)),
    };

    let mut crc = Crc::new();
    crc.update(member);

    if crc.sum() != expected_crc {
        return Err(CodecError::corruption(
            Format::Gzip,
            format!("CRC32 mismatch: expected {:#010x}, got {:#010x}", expected_crc, crc.sum()),
        ));
    }

    if crc.amount() != expected_len {
        return Err(CodecError::corruption(
            Format::Gzip,
            format!("length mismatch: expected {}, got {}", expected_len, crc.amount()),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn kind_of(data: &[u8]) -> ErrorKind {
        parse_header(data).unwrap_err().kind()
    }

    #[test]
    fn test_parse_plain_header() {
        assert_eq!(parse_header(&HEADER).unwrap(), HEADER_LEN);
    }

    #[test]
    fn test_parse_header_with_optional_fields() {
        let mut hdr = HEADER.to_vec();
        hdr[3] = FEXTRA | FNAME | FCOMMENT;
        hdr.extend_from_slice(&[3, 0, b'a', b'b', b'c']);
        hdr.extend_from_slice(b"file.txt\0");
        hdr.extend_from_slice(b"a comment\0");
        let expected = hdr.len();
        hdr.extend_from_slice(&[0x03, 0x00]);

        assert_eq!(parse_header(&hdr).unwrap(), expected);
    }

    #[test]
    fn test_parse_header_crc() {
        let mut hdr = HEADER.to_vec();
        hdr[3] = FHCRC;
        let mut crc = Crc::new();
        crc.update(&hdr);
        hdr.extend_from_slice(&(crc.sum() as u16).to_le_bytes());
        assert_eq!(parse_header(&hdr).unwrap(), HEADER_LEN + 2);

        hdr[HEADER_LEN] ^= 0xff;
        assert_eq!(kind_of(&hdr), ErrorKind::Corruption);
    }

    #[test]
    fn test_parse_header_rejects_wrong_format() {
        assert_eq!(kind_of(&[0x78, 0x9c, 0x03, 0x00]), ErrorKind::Format);
        assert_eq!(kind_of(b"hello world"), ErrorKind::Format);
        assert_eq!(kind_of(&[0x1f, 0x8b, 0x07]), ErrorKind::Format);
        assert_eq!(kind_of(&[0x1f, 0x8b, 0x08, 0x20]), ErrorKind::Format);
    }

    #[test]
    fn test_parse_header_truncated() {
        for len in 0..HEADER_LEN {
            assert_eq!(kind_of(&HEADER[..len]), ErrorKind::Corruption);
        }

        let mut hdr = HEADER.to_vec();
        hdr[3] = FNAME;
        hdr.extend_from_slice(b"no-terminator");
        assert_eq!(kind_of(&hdr), ErrorKind::Corruption);

        let mut hdr = HEADER.to_vec();
        hdr[3] = FEXTRA;
        hdr.extend_from_slice(&[10, 0, 1, 2]);
        assert_eq!(kind_of(&hdr), ErrorKind::Corruption);
    }
}
