use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use cross_xdg::BaseDirs;

use crate::error::{BrainfuckError, Result};
use crate::output::Radix;
use crate::tape::DEFAULT_TAPE_SIZE;

/// Interpreter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of cells on the tape.
    pub tape_size: usize,
    /// Radix for non-printable output cells.
    pub radix: Radix,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            radix: Radix::Decimal,
        }
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub tape_size: Option<usize>,
    pub radix: Option<Radix>,
}

impl Config {
    /// Resolve settings: flags -> environment -> `bf.toml` -> defaults.
    ///
    /// Bad values in flags or environment are errors; bad values in the
    /// config file are ignored.
    pub fn resolve(overrides: Overrides) -> Result<Config> {
        let file = load_from_toml().unwrap_or_default();
        Self::resolve_with(overrides, |key| env::var(key).ok(), file)
    }

    fn resolve_with(
        overrides: Overrides,
        env_var: impl Fn(&str) -> Option<String>,
        file: FileValues,
    ) -> Result<Config> {
        let defaults = Config::default();

        let tape_size = match overrides.tape_size {
            Some(n) => validate_tape_size("--tape-size", &n.to_string())?,
            None => match env_var("BF_TAPE_SIZE") {
                Some(v) => validate_tape_size("BF_TAPE_SIZE", &v)?,
                None => file.tape_size.unwrap_or(defaults.tape_size),
            },
        };

        let radix = match overrides.radix {
            Some(r) => r,
            None => match env_var("BF_RADIX") {
                Some(v) => v.parse().map_err(|_| BrainfuckError::InvalidConfig {
                    key: "BF_RADIX",
                    value: v.clone(),
                })?,
                None => file.radix.unwrap_or(defaults.radix),
            },
        };

        Ok(Config { tape_size, radix })
    }
}

fn validate_tape_size(key: &'static str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(BrainfuckError::InvalidConfig {
            key,
            value: value.to_string(),
        }),
    }
}

/// Settings found in the config file; either may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileValues {
    pub tape_size: Option<usize>,
    pub radix: Option<Radix>,
}

fn config_path() -> Option<PathBuf> {
    let base_dirs = BaseDirs::new().ok()?;

    // $XDG_CONFIG_HOME, or ~/.config on every platform
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

fn load_from_toml() -> Option<FileValues> {
    let content = fs::read_to_string(config_path()?).ok()?;
    Some(parse_config(&content))
}

/// Parse the `[interpreter]` section of a `bf.toml`.
///
/// Only flat `key = value` pairs are understood; values may be quoted.
pub fn parse_config(content: &str) -> FileValues {
    let mut in_section = false;
    let mut map: HashMap<String, String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            in_section = &line[1..line.len() - 1] == "interpreter";
            continue;
        }
        if !in_section { continue; }
        if let Some(eq) = line.find('=') {
            let key = line[..eq].trim().to_string();
            let val_raw = line[eq + 1..].trim();
            let val = if val_raw.starts_with('"') && val_raw.ends_with('"') && val_raw.len() >= 2 {
                val_raw[1..val_raw.len() - 1].to_string()
            } else { val_raw.to_string() };
            map.insert(key, val);
        }
    }

    FileValues {
        tape_size: map
            .get("tape_size")
            .and_then(|v| v.replace('_', "").parse::<usize>().ok())
            .filter(|&n| n > 0),
        radix: map.get("radix").and_then(|v| v.parse().ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_any_source() {
        let cfg = Config::resolve_with(Overrides::default(), no_env, FileValues::default()).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.tape_size, 30_000);
        assert_eq!(cfg.radix, Radix::Decimal);
    }

    #[test]
    fn file_section_is_parsed() {
        let content = r#"
# other tools may share this file
[colors]
tape_size = 5

[interpreter]
tape_size = 18_000
radix = "hex"
"#;
        let values = parse_config(content);
        assert_eq!(values.tape_size, Some(18_000));
        assert_eq!(values.radix, Some(Radix::Hex));
    }

    #[test]
    fn invalid_file_values_are_ignored() {
        let values = parse_config("[interpreter]\ntape_size = 0\nradix = octal\n");
        assert_eq!(values, FileValues::default());
    }

    #[test]
    fn flags_beat_env_and_env_beats_file() {
        let file = FileValues { tape_size: Some(100), radix: Some(Radix::Hex) };
        let env = |key: &str| match key {
            "BF_TAPE_SIZE" => Some("200".to_string()),
            "BF_RADIX" => Some("dec".to_string()),
            _ => None,
        };

        let cfg = Config::resolve_with(Overrides::default(), env, file).unwrap();
        assert_eq!(cfg.tape_size, 200);
        assert_eq!(cfg.radix, Radix::Decimal);

        let flags = Overrides { tape_size: Some(300), radix: Some(Radix::Hex) };
        let cfg = Config::resolve_with(flags, env, file).unwrap();
        assert_eq!(cfg.tape_size, 300);
        assert_eq!(cfg.radix, Radix::Hex);
    }

    #[test]
    fn bad_env_value_is_an_error() {
        let env = |key: &str| (key == "BF_TAPE_SIZE").then(|| "lots".to_string());
        let err = Config::resolve_with(Overrides::default(), env, FileValues::default()).unwrap_err();
        assert!(matches!(err, BrainfuckError::InvalidConfig { key: "BF_TAPE_SIZE", .. }));
    }
}
