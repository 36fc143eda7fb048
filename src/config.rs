use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::logging::LogLevel;

/// Application options that can be set via CLI or config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub log_level: LogLevel,
    /// Leading indent for chunk descriptions
    pub indent: usize,
    /// Replace an existing output file when transcoding
    pub overwrite: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warning,
            indent: 0,
            overwrite: false,
        }
    }
}

/// Load options from a `key = value` file, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<Options> {
    let Some(path) = path else {
        return Ok(Options::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_options(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Apply each recognised property over the defaults.
pub fn parse_options(content: &str) -> Result<Options> {
    let mut opts = Options::default();
    for (key, value) in parse_properties(content) {
        match key.as_str() {
            "log_level" => opts.log_level = parse_log_level(&value)?,
            "indent" => opts.indent = value.parse().context("Invalid indent value")?,
            "overwrite" => opts.overwrite = parse_bool(&value),
            other => log::warn!("Ignoring unknown config key '{}'", other),
        }
    }
    Ok(opts)
}

/// Split property text into trimmed `(key, value)` pairs.
///
/// `#` starts a comment that runs to the end of the line. Lines without `=`
/// are skipped with a warning.
pub fn parse_properties(data: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for (lineno, raw) in data.lines().enumerate() {
        let line = match raw.find('#') {
            Some(idx) => &raw[..idx],
            None => raw,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            log::warn!("Key without value on line {}", lineno + 1);
            continue;
        };
        entries.push((key.trim().to_string(), value.trim().to_string()));
    }
    entries
}

/// Parse a log level name
pub fn parse_log_level(s: &str) -> Result<LogLevel> {
    s.parse::<LogLevel>()
        .map_err(|e| anyhow::anyhow!("Invalid log level: {}", e))
}

/// Case-insensitive "true" is true, everything else false
pub fn parse_bool(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("true")
}
