use anyhow::{Context, Result};
use dctar::{Format, Limits};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings read from the optional TOML config file.
///
/// ```toml
/// format = "zlib"
///
/// [limits]
/// max_output_len = 1048576
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub format: Option<Format>,
    pub limits: Limits,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => return Ok(Self::default()),
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings = toml::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings() {
        let s: Settings = toml::from_str(
            "format = \"zlib\"\n\
             [limits]\n\
             max_output_len = 1024\n",
        )
        .unwrap();
        assert_eq!(s.format, Some(Format::Zlib));
        assert_eq!(s.limits, Limits::new(1024));

        let s: Settings = toml::from_str("").unwrap();
        assert_eq!(s.format, None);
        assert_eq!(s.limits, Limits::default());

        assert!(toml::from_str::<Settings>("level = 9").is_err());
        assert!(toml::from_str::<Settings>("format = \"xz\"").is_err());
    }
}
