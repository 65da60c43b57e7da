// flowcollect-config/src/input.rs
//! Raw record source configuration.
//!
//! The collector reads packed records either from a file (a capture dump or
//! a named pipe fed by the probe) or from standard input.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Raw record input configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct InputConfig {
    /// File or pipe to read; standard input when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Stop after this many records (0 = read until end of stream).
    #[serde(default)]
    pub max_records: u64,

    /// Read buffer size in bytes.
    #[validate(range(min = 4096, max = 67108864))]
    #[serde(default = "default_read_buffer_size", deserialize_with = "deserialize_size")]
    pub read_buffer_size: usize,
}

fn default_read_buffer_size() -> usize {
    65536
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Num(usize),
    Str(String),
}

/// Custom deserializer to allow human‑friendly sizes (e.g. "64KiB") or direct numbers.
fn deserialize_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    match SizeValue::deserialize(deserializer)? {
        SizeValue::Num(n) => Ok(n),
        SizeValue::Str(s) => parse_size(&s).map_err(serde::de::Error::custom),
    }
}

fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (num_part, unit_part) = s.split_at(split);
    let number: f64 = num_part
        .parse()
        .map_err(|_| format!("invalid size: {s}"))?;
    let multiplier = match unit_part.trim().to_lowercase().as_str() {
        "" | "b" => 1.0,
        "kb" | "kib" => 1024.0,
        "mb" | "mib" => 1024.0 * 1024.0,
        "gb" | "gib" => 1024.0 * 1024.0 * 1024.0,
        other => return Err(format!("unknown size unit: {other}")),
    };
    Ok((number * multiplier) as usize)
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_records: 0,
            read_buffer_size: default_read_buffer_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_human_sizes() {
        assert_eq!(parse_size("4096"), Ok(4096));
        assert_eq!(parse_size("64KiB"), Ok(65536));
        assert_eq!(parse_size(" 1.5 mb "), Ok(1572864));
        assert!(parse_size("12 parsecs").is_err());
        assert!(parse_size("MiB").is_err());
    }

    #[test]
    fn buffer_size_bounds() {
        let config = InputConfig {
            read_buffer_size: 16,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(InputConfig::default().validate().is_ok());
    }
}
