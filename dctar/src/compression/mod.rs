use crate::config::Limits;
use crate::error::{CodecError, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

mod deflate;

pub mod gzip;
pub use self::gzip::{GzipCompressor, GzipDecompressor};

pub mod zlib;
pub use self::zlib::{ZlibCompressor, ZlibDecompressor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[serde(alias = "gz")]
    Gzip,
    Zlib,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::Gzip => "gzip",
            Format::Zlib => "zlib",
        }
    }

    pub fn compressor(&self) -> Box<dyn Compressor> {
        match self {
            Format::Gzip => Box::new(GzipCompressor::new()),
            Format::Zlib => Box::new(ZlibCompressor::new()),
        }
    }

    pub fn decompressor(&self) -> Box<dyn Decompressor> {
        match self {
            Format::Gzip => Box::new(GzipDecompressor::new()),
            Format::Zlib => Box::new(ZlibDecompressor::new()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gzip" | "gz" => Ok(Format::Gzip),
            "zlib" => Ok(Format::Zlib),
            _ => Err(format!("unknown format '{}' (expected gzip or zlib)", s)),
        }
    }
}

pub trait Compressor: Send + Sync {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;
    fn format(&self) -> Format;
}

pub trait Decompressor: Send + Sync {
    fn decompress(&self, data: &[u8], limits: &Limits) -> Result<Vec<u8>>;
    fn format(&self) -> Format;

    /// Whether `data` starts with a header this decompressor accepts.
    fn matches(&self, data: &[u8]) -> bool;
}

pub fn guess_decompressor(data: &[u8]) -> Result<Box<dyn Decompressor>> {
    let dc = GzipDecompressor::new();
    if dc.matches(data) {
        return Ok(Box::new(dc));
    }

    let dc = ZlibDecompressor::new();
    if dc.matches(data) {
        return Ok(Box::new(dc));
    }

    Err(CodecError::UnknownFormat)
}

pub fn detect_format(data: &[u8]) -> Option<Format> {
    guess_decompressor(data).ok().map(|dc| dc.format())
}

#[test]
fn test_format_from_str() {
    assert_eq!("gzip".parse::<Format>(), Ok(Format::Gzip));
    assert_eq!("GZ".parse::<Format>(), Ok(Format::Gzip));
    assert_eq!("zlib".parse::<Format>(), Ok(Format::Zlib));
    assert!("xz".parse::<Format>().is_err());
}

#[test]
fn test_detect_format() {
    assert_eq!(detect_format(&[0x1f, 0x8b, 0x08, 0x00]), Some(Format::Gzip));
    assert_eq!(detect_format(&[0x78, 0x9c]), Some(Format::Zlib));
    assert_eq!(detect_format(&[0x78, 0x01]), Some(Format::Zlib));
    assert_eq!(detect_format(b"plain text"), None);
    assert_eq!(detect_format(&[]), None);
}
