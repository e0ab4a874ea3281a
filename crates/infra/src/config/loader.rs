//! Configuration loader
//!
//! Loads application configuration from a config file overlaid with
//! environment variables.
//!
//! ## Loading Strategy
//! 1. Locates a config file (`MAILCAL_CONFIG`, else probed paths)
//! 2. Parses it if found; supports JSON and TOML formats
//! 3. Applies environment variable overrides on top of file values
//! 4. Fills anything still missing from the built-in defaults; default
//!    token/credentials paths land in the config file's directory
//!
//! ## Environment Variables
//! - `MAILCAL_CONFIG`: Explicit config file path
//! - `MAILCAL_CALENDAR_ID`: Target calendar identifier
//! - `MAILCAL_TIMEZONE`: IANA timezone for timed events
//! - `MAILCAL_ORACLE_PROVIDER`: Oracle backend (`anthropic` or `openai`)
//! - `MAILCAL_ORACLE_MODEL`: Model identifier for the oracle backend
//! - `MAILCAL_ORACLE_API_KEY`: API key for the oracle backend
//! - `MAILCAL_TOKEN_PATH`: OAuth token file location
//! - `MAILCAL_CREDENTIALS_PATH`: OAuth client secret file location
//!
//! Empty environment values are treated as unset.
//!
//! ## File Locations
//! When `MAILCAL_CONFIG` is not set, the loader probes (in order):
//! 1. `./config.json` (current working directory)
//! 2. `./config.toml` (current working directory)

use std::path::{Path, PathBuf};

use mailcal_domain::{AppConfig, MailcalError, OracleConfig, Result};
use serde::Deserialize;

/// Flat on-disk configuration shape.
///
/// Mirrors the keys accepted in `config.json`/`config.toml`. Every field
/// is optional; unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    calendar_id: Option<String>,
    timezone: Option<String>,
    llm_provider: Option<String>,
    llm_model: Option<String>,
    llm_api_key: Option<String>,
    token_path: Option<PathBuf>,
    credentials_path: Option<PathBuf>,
}

/// Load configuration from file and environment.
///
/// A missing config file is not an error; environment variables and
/// defaults can carry the whole configuration. An explicitly named file
/// (`MAILCAL_CONFIG`) must exist.
///
/// # Errors
/// Returns `MailcalError::Config` if:
/// - `MAILCAL_CONFIG` points at a file that does not exist
/// - The config file cannot be read or parsed
pub fn load() -> Result<AppConfig> {
    let located = config_file_path()?;
    let file = match &located {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading configuration from file");
            let contents = std::fs::read_to_string(path)
                .map_err(|e| MailcalError::Config(format!("Failed to read config file: {}", e)))?;
            parse_config(&contents, path)?
        }
        None => {
            tracing::debug!("No config file found, using environment and defaults");
            FileConfig::default()
        }
    };

    let config_dir = located.as_deref().and_then(Path::parent);
    Ok(resolve(file, config_dir))
}

/// Probe the working directory for configuration files.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    [cwd.join("config.json"), cwd.join("config.toml")].into_iter().find(|path| path.exists())
}

fn config_file_path() -> Result<Option<PathBuf>> {
    if let Some(explicit) = env_var("MAILCAL_CONFIG") {
        let path = PathBuf::from(explicit);
        if !path.exists() {
            return Err(MailcalError::Config(format!("Config file not found: {}", path.display())));
        }
        return Ok(Some(path));
    }

    Ok(probe_config_paths())
}

/// Parse configuration from string content.
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<FileConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| MailcalError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| MailcalError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(MailcalError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Overlay environment variables on file values, then fill defaults.
///
/// Default token and credentials paths land next to the config file when
/// one was found; explicitly configured paths are taken as given.
fn resolve(file: FileConfig, config_dir: Option<&Path>) -> AppConfig {
    let defaults = AppConfig::default();
    let anchored = |default: PathBuf| match config_dir {
        Some(dir) => dir.join(default),
        None => default,
    };

    AppConfig {
        calendar_id: env_var("MAILCAL_CALENDAR_ID")
            .or(file.calendar_id)
            .unwrap_or(defaults.calendar_id),
        timezone: env_var("MAILCAL_TIMEZONE").or(file.timezone).unwrap_or(defaults.timezone),
        oracle: OracleConfig {
            provider: env_var("MAILCAL_ORACLE_PROVIDER").or(file.llm_provider),
            model: env_var("MAILCAL_ORACLE_MODEL").or(file.llm_model),
            api_key: env_var("MAILCAL_ORACLE_API_KEY").or(file.llm_api_key),
        },
        token_path: env_var("MAILCAL_TOKEN_PATH")
            .map(PathBuf::from)
            .or(file.token_path)
            .unwrap_or_else(|| anchored(defaults.token_path)),
        credentials_path: env_var("MAILCAL_CREDENTIALS_PATH")
            .map(PathBuf::from)
            .or(file.credentials_path)
            .unwrap_or_else(|| anchored(defaults.credentials_path)),
    }
}

/// Read an environment variable, treating empty values as unset.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: &[&str] = &[
        "MAILCAL_CONFIG",
        "MAILCAL_CALENDAR_ID",
        "MAILCAL_TIMEZONE",
        "MAILCAL_ORACLE_PROVIDER",
        "MAILCAL_ORACLE_MODEL",
        "MAILCAL_ORACLE_API_KEY",
        "MAILCAL_TOKEN_PATH",
        "MAILCAL_CREDENTIALS_PATH",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let config = resolve(FileConfig::default(), None);
        assert_eq!(config.calendar_id, "primary");
        assert_eq!(config.timezone, "America/Los_Angeles");
        assert_eq!(config.token_path, PathBuf::from("token.json"));
        assert_eq!(config.credentials_path, PathBuf::from("credentials.json"));
        assert!(config.oracle.provider.is_none());
        assert!(config.oracle.model.is_none());
        assert!(config.oracle.api_key.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("MAILCAL_CALENDAR_ID", "env-calendar");
        std::env::set_var("MAILCAL_ORACLE_PROVIDER", "openai");

        let file = FileConfig {
            calendar_id: Some("file-calendar".into()),
            llm_provider: Some("anthropic".into()),
            llm_model: Some("claude-sonnet-4-20250514".into()),
            ..FileConfig::default()
        };

        let config = resolve(file, None);
        assert_eq!(config.calendar_id, "env-calendar");
        assert_eq!(config.oracle.provider.as_deref(), Some("openai"));
        // Untouched keys still come from the file
        assert_eq!(config.oracle.model.as_deref(), Some("claude-sonnet-4-20250514"));

        clear_env();
    }

    #[test]
    fn test_empty_env_value_treated_as_unset() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("MAILCAL_CALENDAR_ID", "");

        let file =
            FileConfig { calendar_id: Some("file-calendar".into()), ..FileConfig::default() };

        let config = resolve(file, None);
        assert_eq!(config.calendar_id, "file-calendar");

        clear_env();
    }

    #[test]
    fn test_file_values_fill_missing_env() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let file = FileConfig {
            calendar_id: Some("family@group.calendar.google.com".into()),
            timezone: Some("Europe/Berlin".into()),
            llm_provider: Some("anthropic".into()),
            llm_model: Some("claude-sonnet-4-20250514".into()),
            llm_api_key: Some("sk-test".into()),
            token_path: Some(PathBuf::from("/var/lib/mailcal/token.json")),
            credentials_path: Some(PathBuf::from("/var/lib/mailcal/credentials.json")),
        };

        let config = resolve(file, None);
        assert_eq!(config.calendar_id, "family@group.calendar.google.com");
        assert_eq!(config.timezone, "Europe/Berlin");
        assert_eq!(config.oracle.provider.as_deref(), Some("anthropic"));
        assert_eq!(config.oracle.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.token_path, PathBuf::from("/var/lib/mailcal/token.json"));
    }

    #[test]
    fn test_default_paths_anchor_to_config_dir() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let config = resolve(FileConfig::default(), Some(Path::new("/etc/mailcal")));
        assert_eq!(config.token_path, PathBuf::from("/etc/mailcal/token.json"));
        assert_eq!(config.credentials_path, PathBuf::from("/etc/mailcal/credentials.json"));

        // An explicitly configured path is never re-anchored
        let file = FileConfig {
            token_path: Some(PathBuf::from("elsewhere/token.json")),
            ..FileConfig::default()
        };
        let config = resolve(file, Some(Path::new("/etc/mailcal")));
        assert_eq!(config.token_path, PathBuf::from("elsewhere/token.json"));
    }

    #[test]
    fn test_parse_json_file() {
        let json_content = r#"{
            "calendar_id": "school@group.calendar.google.com",
            "llm_provider": "anthropic",
            "llm_model": "claude-sonnet-4-20250514",
            "llm_api_key": "sk-json",
            "unknown_key": "ignored"
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let file = parse_config(&contents, &path).unwrap();
        assert_eq!(file.calendar_id.as_deref(), Some("school@group.calendar.google.com"));
        assert_eq!(file.llm_provider.as_deref(), Some("anthropic"));
        assert_eq!(file.llm_api_key.as_deref(), Some("sk-json"));
        assert!(file.timezone.is_none());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_toml_file() {
        let toml_content = r#"
            calendar_id = "primary"
            timezone = "America/New_York"
            llm_provider = "openai"
            llm_model = "gpt-4o"
        "#;

        let file = parse_config(toml_content, Path::new("config.toml")).unwrap();
        assert_eq!(file.calendar_id.as_deref(), Some("primary"));
        assert_eq!(file.timezone.as_deref(), Some("America/New_York"));
        assert_eq!(file.llm_provider.as_deref(), Some("openai"));
        assert!(file.llm_api_key.is_none());
    }

    #[test]
    fn test_invalid_json_rejected() {
        let result = parse_config("{not json", Path::new("config.json"));
        match result {
            Err(MailcalError::Config(msg)) => assert!(msg.contains("Invalid JSON")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let result = parse_config("calendar_id: primary", Path::new("config.yaml"));
        match result {
            Err(MailcalError::Config(msg)) => assert!(msg.contains("Unsupported config format")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_config_path_must_exist() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("MAILCAL_CONFIG", "/nonexistent/mailcal/config.json");

        let result = load();
        match result {
            Err(MailcalError::Config(msg)) => assert!(msg.contains("not found")),
            other => panic!("expected config error, got {:?}", other),
        }

        clear_env();
    }

    #[test]
    fn test_load_reads_explicit_file() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(br#"{"calendar_id": "explicit-calendar"}"#).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        std::env::set_var("MAILCAL_CONFIG", &path);

        let config = load().unwrap();
        assert_eq!(config.calendar_id, "explicit-calendar");
        // Everything else falls back to defaults, paths anchored beside the file
        assert_eq!(config.timezone, "America/Los_Angeles");
        assert_eq!(config.token_path, path.parent().unwrap().join("token.json"));

        clear_env();
        std::fs::remove_file(path).ok();
    }
}
