//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--library`, `--theme`, `--log-level`)
//! 2. `$SIMPLESEEK_CONFIG` environment variable (path to config file)
//! 3. Project-local `.simpleseek.toml` in the current working directory
//! 4. Global `~/.config/simpleseek/config.toml`
//! 5. Built-in defaults
//!
//! Credentials are special: `SOULSEEK_USER` and `SOULSEEK_PASSWORD` in the
//! environment win over anything in a file, and both must end up present.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

pub const USER_ENV: &str = "SOULSEEK_USER";
pub const PASSWORD_ENV: &str = "SOULSEEK_PASSWORD";

// ── Section configs ──────────────────────────────────────────────────────────

/// Account used to log in to the network.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AccountConfig {
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Search backend settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SearchConfig {
    /// JSON result library answering searches offline.
    pub library: Option<String>,
    /// Maximum number of peer responses accepted per search.
    pub response_limit: Option<usize>,
}

/// Log file settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub level: Option<String>,
    /// Directory for rolling log files.
    pub dir: Option<String>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub results_bg: Option<String>,
    pub results_fg: Option<String>,
    pub selected_bg: Option<String>,
    pub selected_fg: Option<String>,
    pub header_fg: Option<String>,
    pub dir_fg: Option<String>,
    pub file_fg: Option<String>,
    pub query_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub account: AccountConfig,
    pub search: SearchConfig,
    pub log: LogConfig,
    pub theme: ThemeConfig,
}

/// Resolved login credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default cap on peer responses per search.
pub const DEFAULT_RESPONSE_LIMIT: usize = 256;
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("SIMPLESEEK_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".simpleseek.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("simpleseek").join("config.toml"));
    }

    paths
}

/// Read and parse a TOML config file. A missing file is `Ok(None)`.
fn load_file(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Ok(None),
    };
    toml::from_str::<AppConfig>(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            account: AccountConfig {
                user: other.account.user.clone().or(self.account.user),
                password: other.account.password.clone().or(self.account.password),
            },
            search: SearchConfig {
                library: other.search.library.clone().or(self.search.library),
                response_limit: other.search.response_limit.or(self.search.response_limit),
            },
            log: LogConfig {
                level: other.log.level.clone().or(self.log.level),
                dir: other.log.dir.clone().or(self.log.dir),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: match (&self.theme.custom, &other.theme.custom) {
                    (_, Some(o)) => Some(o.clone()),
                    (Some(s), None) => Some(s.clone()),
                    (None, None) => None,
                },
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// Unparseable candidate files are skipped with a warning; an unparseable
    /// explicit `--config` file is an error.
    pub fn load(
        cli_config_path: Option<&Path>,
        cli_overrides: Option<&AppConfig>,
    ) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            match load_file(path) {
                Ok(Some(file_cfg)) => config = config.merge(&file_cfg),
                Ok(None) => {}
                Err(e) => eprintln!("Warning: {e}"),
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path)? {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        Ok(config)
    }

    /// Resolve credentials from the process environment and this config.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        self.credentials_from(|key| std::env::var(key).ok())
    }

    /// Resolve credentials with an explicit environment lookup.
    pub fn credentials_from(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Credentials, ConfigError> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        let user = non_empty(env(USER_ENV))
            .or_else(|| non_empty(self.account.user.clone()))
            .ok_or(ConfigError::MissingCredential(USER_ENV))?;
        let password = non_empty(env(PASSWORD_ENV))
            .or_else(|| non_empty(self.account.password.clone()))
            .ok_or(ConfigError::MissingCredential(PASSWORD_ENV))?;
        Ok(Credentials { user, password })
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn library_path(&self) -> Option<PathBuf> {
        self.search.library.as_deref().map(PathBuf::from)
    }

    pub fn response_limit(&self) -> usize {
        self.search
            .response_limit
            .unwrap_or(DEFAULT_RESPONSE_LIMIT)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Log directory, defaulting to the platform data dir.
    pub fn log_dir(&self) -> PathBuf {
        match self.log.dir.as_deref() {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("simpleseek")
                .join("logs"),
        }
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.response_limit(), 256);
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.theme_scheme(), "dark");
        assert!(cfg.library_path().is_none());
        assert!(cfg.log_dir().ends_with("simpleseek/logs"));
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[account]
user = "alice"
password = "hunter2"

[search]
library = "/tmp/library.json"
response_limit = 32

[log]
level = "debug"
dir = "/tmp/logs"

[theme]
scheme = "light"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.account.user.as_deref(), Some("alice"));
        assert_eq!(cfg.library_path(), Some(PathBuf::from("/tmp/library.json")));
        assert_eq!(cfg.response_limit(), 32);
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.log_dir(), PathBuf::from("/tmp/logs"));
        assert_eq!(cfg.theme_scheme(), "light");
    }

    #[test]
    fn test_toml_parsing_partial() {
        let cfg: AppConfig = toml::from_str("[log]\nlevel = \"warn\"\n").expect("parse failed");
        assert_eq!(cfg.log_level(), "warn");
        assert_eq!(cfg.response_limit(), 256);
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            search: SearchConfig {
                library: Some("base.json".into()),
                response_limit: Some(10),
            },
            ..Default::default()
        };
        let over = AppConfig {
            search: SearchConfig {
                library: Some("over.json".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert_eq!(merged.library_path(), Some(PathBuf::from("over.json")));
        assert_eq!(merged.response_limit(), 10);
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            account: AccountConfig {
                user: Some("alice".into()),
                password: Some("pw".into()),
            },
            ..Default::default()
        };
        let merged = base.merge(&AppConfig::default());
        assert_eq!(merged.account.user.as_deref(), Some("alice"));
        assert_eq!(merged.account.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(f, "[search]\nresponse_limit = 5\n").expect("write");

        let cfg = load_file(&cfg_path).expect("parse").expect("present");
        assert_eq!(cfg.response_limit(), 5);
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_file(Path::new("/nonexistent/config.toml")).expect("no error");
        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        let err = load_file(&cfg_path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_explicit_invalid_config_fails_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "[search\n").expect("write");
        assert!(AppConfig::load(Some(&cfg_path), None).is_err());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            "[search]\nresponse_limit = 7\nlibrary = \"file.json\"\n",
        )
        .expect("write");

        let cli_overrides = AppConfig {
            search: SearchConfig {
                library: Some("cli.json".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides)).expect("load");
        assert_eq!(cfg.library_path(), Some(PathBuf::from("cli.json")));
        assert_eq!(cfg.response_limit(), 7);
    }

    #[test]
    fn credentials_from_environment_win() {
        let cfg = AppConfig {
            account: AccountConfig {
                user: Some("file-user".into()),
                password: Some("file-pw".into()),
            },
            ..Default::default()
        };
        let creds = cfg
            .credentials_from(env_of(&[(USER_ENV, "env-user")]))
            .expect("credentials");
        assert_eq!(creds.user, "env-user");
        assert_eq!(creds.password, "file-pw");
    }

    #[test]
    fn missing_user_is_an_error() {
        let cfg = AppConfig::default();
        let err = cfg
            .credentials_from(env_of(&[(PASSWORD_ENV, "pw")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(USER_ENV)));
    }

    #[test]
    fn empty_password_counts_as_missing() {
        let cfg = AppConfig::default();
        let err = cfg
            .credentials_from(env_of(&[(USER_ENV, "u"), (PASSWORD_ENV, "")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(PASSWORD_ENV)));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials {
            user: "u".into(),
            password: "secret".into(),
        };
        assert!(!format!("{creds:?}").contains("secret"));
    }

    #[test]
    fn test_theme_custom_colors() {
        let toml = r##"
[theme]
scheme = "custom"

[theme.custom]
results_bg = "#1a1b26"
header_fg = "#c0caf5"
"##;
        let cfg: AppConfig = toml::from_str(toml).expect("parse");
        assert_eq!(cfg.theme_scheme(), "custom");
        let custom = cfg.theme.custom.as_ref().expect("custom present");
        assert_eq!(custom.results_bg.as_deref(), Some("#1a1b26"));
        assert_eq!(custom.header_fg.as_deref(), Some("#c0caf5"));
        assert!(custom.border_fg.is_none());
    }
}
