use crate::error::AppError;
use crate::share::DEFAULT_ORIGIN;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKLIST_CONFIG_PATH";
const APP_DIR_NAME: &str = "tasklist";

const RESET: &str = "\x1b[0m";

/// ANSI colours for terminal output. `None` leaves text unstyled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    accent: Option<&'static str>,
    muted: Option<&'static str>,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        paint(self.accent, text)
    }

    pub fn mutedize(&self, text: &str) -> String {
        paint(self.muted, text)
    }
}

fn paint(code: Option<&str>, text: &str) -> String {
    match code {
        Some(code) => format!("{code}{text}{RESET}"),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Plain,
    Noir,
    Solarized,
}

impl Theme {
    /// Case, spaces, `-` and `_` are ignored. `dark` is accepted for `noir`.
    pub fn parse(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .map(|ch| ch.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "" | "plain" | "default" => Some(Self::Plain),
            "noir" | "dark" => Some(Self::Noir),
            "solarized" => Some(Self::Solarized),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Noir => "noir",
            Self::Solarized => "solarized",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Plain => Palette {
                accent: None,
                muted: None,
            },
            Self::Noir => Palette {
                accent: Some("\x1b[38;5;208m"),
                muted: Some("\x1b[38;5;250m"),
            },
            Self::Solarized => Palette {
                accent: Some("\x1b[38;5;108m"),
                muted: Some("\x1b[38;5;250m"),
            },
        }
    }
}

/// Unknown or missing themes fall back to plain output.
pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    theme.and_then(Theme::parse).unwrap_or_default().palette()
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    /// Base URL that share links are built on.
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl Config {
    pub fn origin(&self) -> &str {
        self.origin
            .as_deref()
            .filter(|origin| !origin.trim().is_empty())
            .unwrap_or(DEFAULT_ORIGIN)
    }

    /// Expands an alias in the first word of `line`. Lines that do not start
    /// with a known alias are returned unchanged.
    pub fn expand_alias(&self, line: &str) -> String {
        let trimmed = line.trim_start();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, Some(rest)),
            None => (trimmed, None),
        };

        match (self.aliases.get(head), rest) {
            (Some(expansion), Some(rest)) => format!("{expansion} {rest}"),
            (Some(expansion), None) => expansion.clone(),
            (None, _) => line.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub origin: Option<String>,
    pub aliases: HashMap<String, String>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    Ok(normalize_theme(config))
}

fn normalize_theme(mut config: Config) -> Config {
    config.theme = config.theme.as_deref().and_then(canonical_theme);
    config
}

fn canonical_theme(raw: &str) -> Option<String> {
    match Theme::parse(raw) {
        Some(theme) => Some(theme.name().to_string()),
        None => {
            tracing::debug!(theme = raw, "unknown theme, using plain output");
            None
        }
    }
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_deref()
        && let Some(normalized) = canonical_theme(theme)
    {
        merged.theme = Some(normalized);
    }

    if let Some(origin) = overrides.origin.as_ref() {
        merged.origin = Some(origin.clone());
    }

    for (alias, value) in overrides.aliases.iter() {
        merged.aliases.insert(alias.clone(), value.clone());
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::{
        Config, ConfigOverrides, Theme, load_config_from_path, load_config_with_fallback_from_path,
        merge_overrides, palette_for_theme,
    };
    use crate::share::DEFAULT_ORIGIN;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("tasklist-{nanos}-{file_name}"))
    }

    #[test]
    fn load_config_missing_returns_defaults_without_error() {
        let path = temp_path("missing-config.json");
        let result = load_config_with_fallback_from_path(&path);

        assert_eq!(result.config, Config::default());
        assert!(result.error.is_none());
    }

    #[test]
    fn load_config_invalid_returns_defaults_and_error() {
        let path = temp_path("invalid-config.json");
        fs::write(&path, "{ invalid json ").unwrap();

        let result = load_config_with_fallback_from_path(&path);
        fs::remove_file(&path).ok();

        assert_eq!(result.config, Config::default());
        assert_eq!(result.error.map(|err| err.code()), Some("invalid_data"));
    }

    #[test]
    fn load_config_reads_valid_file() {
        let path = temp_path("valid-config.json");
        let content = serde_json::json!({
            "theme": "Dark",
            "origin": "https://lists.example.com",
            "aliases": {
                "ls": "list --all"
            }
        });
        fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.theme.as_deref(), Some("noir"));
        assert_eq!(loaded.origin(), "https://lists.example.com");
        assert_eq!(
            loaded.aliases.get("ls").map(String::as_str),
            Some("list --all")
        );
    }

    #[test]
    fn origin_falls_back_to_default() {
        assert_eq!(Config::default().origin(), DEFAULT_ORIGIN);

        let blank = Config {
            origin: Some("  ".into()),
            ..Config::default()
        };
        assert_eq!(blank.origin(), DEFAULT_ORIGIN);
    }

    #[test]
    fn expand_alias_rewrites_first_word_only() {
        let config = Config {
            aliases: [
                ("ls".into(), "list --all".into()),
                ("t".into(), "toggle".into()),
            ]
            .into_iter()
            .collect(),
            ..Config::default()
        };

        assert_eq!(config.expand_alias("ls"), "list --all");
        assert_eq!(config.expand_alias("t 42"), "toggle 42");
        assert_eq!(config.expand_alias("title ls"), "title ls");
        assert_eq!(config.expand_alias("  "), "  ");
    }

    #[test]
    fn merge_overrides_updates_theme_origin_and_aliases() {
        let base = Config {
            theme: Some("plain".into()),
            origin: Some("http://old.example".into()),
            aliases: [("ls".into(), "list".into())].into_iter().collect(),
        };

        let overrides = ConfigOverrides {
            theme: Some("noir".into()),
            origin: Some("https://new.example".into()),
            aliases: [
                ("ls".into(), "list --all".into()),
                ("done".into(), "filter completed".into()),
            ]
            .into_iter()
            .collect(),
        };

        let merged = merge_overrides(&base, &overrides);
        assert_eq!(merged.theme.as_deref(), Some("noir"));
        assert_eq!(merged.origin(), "https://new.example");
        assert_eq!(
            merged.aliases.get("ls").map(String::as_str),
            Some("list --all")
        );
        assert_eq!(
            merged.aliases.get("done").map(String::as_str),
            Some("filter completed")
        );

        assert_eq!(base.theme.as_deref(), Some("plain"));
        assert!(base.aliases.get("done").is_none());
    }

    #[test]
    fn merge_overrides_with_empty_overrides_returns_clone() {
        let base = Config {
            theme: Some("plain".into()),
            origin: None,
            aliases: [("ls".into(), "list".into())].into_iter().collect(),
        };

        let merged = merge_overrides(&base, &ConfigOverrides::default());

        assert_eq!(merged, base);
    }

    #[test]
    fn theme_parse_ignores_case_and_separators() {
        assert_eq!(Theme::parse("Noir"), Some(Theme::Noir));
        assert_eq!(Theme::parse("DARK"), Some(Theme::Noir));
        assert_eq!(Theme::parse("so-larized"), Some(Theme::Solarized));
        assert_eq!(Theme::parse("  "), Some(Theme::Plain));
        assert_eq!(Theme::parse("oceanic"), None);
    }

    #[test]
    fn palette_for_theme_colours_only_known_themes() {
        let plain = palette_for_theme(None);
        assert_eq!(plain.accentize("done"), "done");
        assert_eq!(plain.mutedize("done"), "done");

        let noir = palette_for_theme(Some("noir"));
        assert_eq!(noir.accentize("x"), "\x1b[38;5;208mx\x1b[0m");

        assert_eq!(palette_for_theme(Some("oceanic")), plain);
    }

    #[test]
    fn unknown_theme_in_file_is_dropped() {
        let path = temp_path("unknown-theme.json");
        fs::write(&path, r#"{"theme": "oceanic"}"#).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.theme, None);
    }
}
