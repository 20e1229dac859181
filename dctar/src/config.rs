use serde::Deserialize;

/// Default ceiling for decompressed output (256 MiB).
pub const DEFAULT_MAX_OUTPUT_LEN: usize = 256 * 1024 * 1024;

/// Bounds applied while decompressing.
///
/// The ceiling guards against inputs that expand without bound; a stream that
/// would produce more than `max_output_len` bytes is rejected with
/// [`CodecError::SizeLimit`](crate::CodecError::SizeLimit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_output_len: usize,
}

impl Limits {
    pub fn new(max_output_len: usize) -> Self {
        Self { max_output_len }
    }

    pub fn unlimited() -> Self {
        Self {
            max_output_len: usize::MAX,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_output_len: DEFAULT_MAX_OUTPUT_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_from_toml() {
        let limits: Limits = toml::from_str("max_output_len = 4096").unwrap();
        assert_eq!(limits, Limits::new(4096));

        let limits: Limits = toml::from_str("").unwrap();
        assert_eq!(limits, Limits::default());
    }
}
