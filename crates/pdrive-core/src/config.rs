//! Configuration module for pdrive.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, defaults, and a builder pattern for
//! programmatic use. Note that this file only configures *this* program;
//! the remote credentials live in the external tool's own config store.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::newtypes::RemoteName;

/// Top-level configuration for pdrive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub remote: RemoteConfig,
    pub tool: ToolConfig,
    pub link: LinkConfig,
    pub sync: SyncConfig,
    pub mount: MountConfig,
    pub status: StatusConfig,
    pub logging: LoggingConfig,
}

/// Which remote this front-end manages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Name of the tool remote this program creates and drives.
    pub name: String,
    /// Tool backend type used when creating the remote.
    pub backend: String,
}

/// External tool invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Binary name or absolute path of the external tool.
    pub binary: PathBuf,
    /// Seconds allowed for quick probes (version, listremotes, config show).
    pub probe_timeout: u64,
    /// Seconds allowed for config delete/obscure.
    pub config_timeout: u64,
    /// Seconds allowed for config create.
    pub create_timeout: u64,
    /// Seconds allowed for directory listings.
    pub list_timeout: u64,
    /// Seconds allowed for the mount command to daemonize.
    pub mount_timeout: u64,
}

/// Account linking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Seconds to wait between creating the config and the verification
    /// listing. A fresh backend session needs a moment before the first
    /// listing succeeds.
    pub verify_delay: u64,
}

/// Sync invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Request per-file output lines.
    pub verbose: bool,
    /// Request transfer statistics.
    pub progress: bool,
}

/// Mount invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountConfig {
    /// Default directory where the remote is mounted.
    pub mount_point: String,
    /// Value for the tool's VFS cache mode: `off`, `minimal`, `writes`, `full`.
    pub cache_mode: String,
    /// Let the tool detach and keep the mount alive on its own.
    pub daemonize: bool,
}

/// Connection status polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Seconds between link-status probes in the terminal UI.
    pub poll_interval: u64,
    /// Seconds allowed for the probe's root listing.
    pub probe_timeout: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/pdrive/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("pdrive")
            .join("config.yaml")
    }

    /// The configured remote name as a validated domain value.
    ///
    /// # Errors
    /// Returns error when `remote.name` fails validation; `validate()`
    /// reports the same problem without failing.
    pub fn remote_name(&self) -> Result<RemoteName, crate::domain::DomainError> {
        RemoteName::new(self.remote.name.clone())
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

// Config derives Default because all its fields implement Default.

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            name: "protondrive".to_string(),
            backend: "protondrive".to_string(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("rclone"),
            probe_timeout: 5,
            config_timeout: 10,
            create_timeout: 30,
            list_timeout: 30,
            mount_timeout: 30,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { verify_delay: 2 }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            progress: true,
        }
    }
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            mount_point: "~/ProtonDrive".to_string(),
            cache_mode: "full".to_string(),
            daemonize: true,
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            poll_interval: 30,
            probe_timeout: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"tool.probe_timeout"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid values for `mount.cache_mode`.
const VALID_CACHE_MODES: &[&str] = &["off", "minimal", "writes", "full"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- remote ---
        if let Err(e) = RemoteName::new(self.remote.name.clone()) {
            errors.push(ValidationError {
                field: "remote.name".into(),
                message: e.to_string(),
            });
        }
        if self.remote.backend.trim().is_empty() {
            errors.push(ValidationError {
                field: "remote.backend".into(),
                message: "must not be empty".into(),
            });
        }

        // --- tool ---
        if self.tool.binary.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "tool.binary".into(),
                message: "must not be empty".into(),
            });
        }
        for (field, value) in [
            ("tool.probe_timeout", self.tool.probe_timeout),
            ("tool.config_timeout", self.tool.config_timeout),
            ("tool.create_timeout", self.tool.create_timeout),
            ("tool.list_timeout", self.tool.list_timeout),
            ("tool.mount_timeout", self.tool.mount_timeout),
        ] {
            if value == 0 {
                errors.push(ValidationError {
                    field: field.into(),
                    message: "must be greater than 0".into(),
                });
            }
        }

        // --- mount ---
        if !VALID_CACHE_MODES.contains(&self.mount.cache_mode.as_str()) {
            errors.push(ValidationError {
                field: "mount.cache_mode".into(),
                message: format!(
                    "invalid cache mode '{}'; valid options: {}",
                    self.mount.cache_mode,
                    VALID_CACHE_MODES.join(", ")
                ),
            });
        }
        if self.mount.mount_point.trim().is_empty() {
            errors.push(ValidationError {
                field: "mount.mount_point".into(),
                message: "must not be empty".into(),
            });
        }

        // --- status ---
        if self.status.poll_interval == 0 {
            errors.push(ValidationError {
                field: "status.poll_interval".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.status.probe_timeout == 0 {
            errors.push(ValidationError {
                field: "status.probe_timeout".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use pdrive_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .remote_name("protondrive-work")
///     .status_poll_interval(60)
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- remote ---

    pub fn remote_name(mut self, name: impl Into<String>) -> Self {
        self.config.remote.name = name.into();
        self
    }

    pub fn remote_backend(mut self, backend: impl Into<String>) -> Self {
        self.config.remote.backend = backend.into();
        self
    }

    // --- tool ---

    pub fn tool_binary(mut self, binary: PathBuf) -> Self {
        self.config.tool.binary = binary;
        self
    }

    pub fn tool_probe_timeout(mut self, seconds: u64) -> Self {
        self.config.tool.probe_timeout = seconds;
        self
    }

    pub fn tool_config_timeout(mut self, seconds: u64) -> Self {
        self.config.tool.config_timeout = seconds;
        self
    }

    pub fn tool_create_timeout(mut self, seconds: u64) -> Self {
        self.config.tool.create_timeout = seconds;
        self
    }

    pub fn tool_list_timeout(mut self, seconds: u64) -> Self {
        self.config.tool.list_timeout = seconds;
        self
    }

    pub fn tool_mount_timeout(mut self, seconds: u64) -> Self {
        self.config.tool.mount_timeout = seconds;
        self
    }

    // --- link ---

    pub fn link_verify_delay(mut self, seconds: u64) -> Self {
        self.config.link.verify_delay = seconds;
        self
    }

    // --- sync ---

    pub fn sync_verbose(mut self, verbose: bool) -> Self {
        self.config.sync.verbose = verbose;
        self
    }

    pub fn sync_progress(mut self, progress: bool) -> Self {
        self.config.sync.progress = progress;
        self
    }

    // --- mount ---

    pub fn mount_point(mut self, mount_point: impl Into<String>) -> Self {
        self.config.mount.mount_point = mount_point.into();
        self
    }

    pub fn mount_cache_mode(mut self, cache_mode: impl Into<String>) -> Self {
        self.config.mount.cache_mode = cache_mode.into();
        self
    }

    pub fn mount_daemonize(mut self, daemonize: bool) -> Self {
        self.config.mount.daemonize = daemonize;
        self
    }

    // --- status ---

    pub fn status_poll_interval(mut self, seconds: u64) -> Self {
        self.config.status.poll_interval = seconds;
        self
    }

    pub fn status_probe_timeout(mut self, seconds: u64) -> Self {
        self.config.status.probe_timeout = seconds;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // -- Defaults --

    #[test]
    fn default_config_has_sensible_values() {
        let cfg = Config::default();
        assert_eq!(cfg.remote.name, "protondrive");
        assert_eq!(cfg.remote.backend, "protondrive");
        assert_eq!(cfg.tool.binary, PathBuf::from("rclone"));
        assert_eq!(cfg.tool.probe_timeout, 5);
        assert_eq!(cfg.tool.config_timeout, 10);
        assert_eq!(cfg.tool.create_timeout, 30);
        assert_eq!(cfg.tool.list_timeout, 30);
        assert_eq!(cfg.tool.mount_timeout, 30);
        assert_eq!(cfg.link.verify_delay, 2);
        assert!(cfg.sync.verbose);
        assert!(cfg.sync.progress);
        assert_eq!(cfg.mount.mount_point, "~/ProtonDrive");
        assert_eq!(cfg.mount.cache_mode, "full");
        assert!(cfg.mount.daemonize);
        assert_eq!(cfg.status.poll_interval, 30);
        assert_eq!(cfg.status.probe_timeout, 10);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn default_config_passes_validation() {
        let errors = Config::default().validate();
        assert!(errors.is_empty(), "unexpected validation errors: {errors:?}");
    }

    // -- Loading --

    #[test]
    fn load_from_yaml_file() {
        let yaml = r#"
remote:
  name: proton-work
  backend: protondrive
tool:
  binary: /usr/local/bin/rclone
  probe_timeout: 3
  config_timeout: 15
  create_timeout: 60
  list_timeout: 45
  mount_timeout: 20
link:
  verify_delay: 5
sync:
  verbose: false
  progress: true
mount:
  mount_point: /mnt/proton
  cache_mode: writes
  daemonize: false
status:
  poll_interval: 60
  probe_timeout: 15
logging:
  level: debug
"#;
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.remote.name, "proton-work");
        assert_eq!(cfg.tool.binary, PathBuf::from("/usr/local/bin/rclone"));
        assert_eq!(cfg.tool.probe_timeout, 3);
        assert_eq!(cfg.tool.create_timeout, 60);
        assert_eq!(cfg.link.verify_delay, 5);
        assert!(!cfg.sync.verbose);
        assert_eq!(cfg.mount.mount_point, "/mnt/proton");
        assert_eq!(cfg.mount.cache_mode, "writes");
        assert!(!cfg.mount.daemonize);
        assert_eq!(cfg.status.poll_interval, 60);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn load_or_default_returns_default_on_missing_file() {
        let cfg = Config::load_or_default(Path::new("/nonexistent/config.yaml"));
        assert_eq!(cfg.status.poll_interval, 30);
    }

    #[test]
    fn load_returns_error_on_invalid_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"not: [valid: yaml: {{{").unwrap();
        tmp.flush().unwrap();

        let result = Config::load(tmp.path());
        assert!(result.is_err());
    }

    // -- Validation --

    #[test]
    fn validate_catches_bad_remote_name() {
        let mut cfg = Config::default();
        cfg.remote.name = "has:colon".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "remote.name"));
    }

    #[test]
    fn validate_catches_empty_backend() {
        let mut cfg = Config::default();
        cfg.remote.backend = "  ".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "remote.backend"));
    }

    #[test]
    fn validate_catches_zero_timeouts() {
        let mut cfg = Config::default();
        cfg.tool.probe_timeout = 0;
        cfg.tool.config_timeout = 0;
        cfg.tool.create_timeout = 0;
        cfg.tool.list_timeout = 0;
        cfg.tool.mount_timeout = 0;
        let errors = cfg.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"tool.probe_timeout"));
        assert!(fields.contains(&"tool.config_timeout"));
        assert!(fields.contains(&"tool.create_timeout"));
        assert!(fields.contains(&"tool.list_timeout"));
        assert!(fields.contains(&"tool.mount_timeout"));
    }

    #[test]
    fn validate_catches_invalid_cache_mode() {
        let mut cfg = Config::default();
        cfg.mount.cache_mode = "everything".to_string();
        let errors = cfg.validate();
        assert!(errors
            .iter()
            .any(|e| e.field == "mount.cache_mode" && e.message.contains("everything")));
    }

    #[test]
    fn validate_accepts_all_valid_cache_modes() {
        for mode in VALID_CACHE_MODES {
            let mut cfg = Config::default();
            cfg.mount.cache_mode = mode.to_string();
            let errors = cfg.validate();
            assert!(
                !errors.iter().any(|e| e.field == "mount.cache_mode"),
                "cache mode '{mode}' should be valid"
            );
        }
    }

    #[test]
    fn validate_catches_zero_poll_interval() {
        let mut cfg = Config::default();
        cfg.status.poll_interval = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "status.poll_interval"));
    }

    #[test]
    fn validate_catches_invalid_log_level() {
        let mut cfg = Config::default();
        cfg.logging.level = "verbose".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "logging.level"));
    }

    #[test]
    fn validate_accepts_all_valid_log_levels() {
        for level in VALID_LOG_LEVELS {
            let mut cfg = Config::default();
            cfg.logging.level = level.to_string();
            let errors = cfg.validate();
            assert!(
                !errors.iter().any(|e| e.field == "logging.level"),
                "level '{level}' should be valid"
            );
        }
    }

    // -- Builder --

    #[test]
    fn builder_starts_from_defaults() {
        let cfg = ConfigBuilder::new().build();
        assert_eq!(cfg.remote.name, "protondrive");
        assert_eq!(cfg.status.poll_interval, 30);
    }

    #[test]
    fn builder_overrides_fields() {
        let cfg = ConfigBuilder::new()
            .remote_name("proton-work")
            .remote_backend("protondrive")
            .tool_binary(PathBuf::from("/opt/rclone"))
            .tool_probe_timeout(2)
            .tool_config_timeout(20)
            .tool_create_timeout(90)
            .tool_list_timeout(40)
            .tool_mount_timeout(25)
            .link_verify_delay(1)
            .sync_verbose(false)
            .sync_progress(false)
            .mount_point("/mnt/proton")
            .mount_cache_mode("minimal")
            .mount_daemonize(false)
            .status_poll_interval(10)
            .status_probe_timeout(5)
            .logging_level("trace")
            .build();

        assert_eq!(cfg.remote.name, "proton-work");
        assert_eq!(cfg.tool.binary, PathBuf::from("/opt/rclone"));
        assert_eq!(cfg.tool.probe_timeout, 2);
        assert_eq!(cfg.tool.config_timeout, 20);
        assert_eq!(cfg.tool.create_timeout, 90);
        assert_eq!(cfg.tool.list_timeout, 40);
        assert_eq!(cfg.tool.mount_timeout, 25);
        assert_eq!(cfg.link.verify_delay, 1);
        assert!(!cfg.sync.verbose);
        assert!(!cfg.sync.progress);
        assert_eq!(cfg.mount.mount_point, "/mnt/proton");
        assert_eq!(cfg.mount.cache_mode, "minimal");
        assert!(!cfg.mount.daemonize);
        assert_eq!(cfg.status.poll_interval, 10);
        assert_eq!(cfg.status.probe_timeout, 5);
        assert_eq!(cfg.logging.level, "trace");
    }

    #[test]
    fn builder_build_validated_succeeds_for_valid_config() {
        let result = ConfigBuilder::new().remote_name("proton-2").build_validated();
        assert!(result.is_ok());
    }

    #[test]
    fn builder_build_validated_fails_for_invalid_config() {
        let result = ConfigBuilder::new()
            .status_poll_interval(0)
            .logging_level("nope")
            .build_validated();
        assert!(result.is_err());
        let errors = result.unwrap_err();
        assert!(errors.len() >= 2);
    }

    // -- remote_name --

    #[test]
    fn remote_name_accessor_returns_validated_name() {
        let cfg = Config::default();
        assert_eq!(cfg.remote_name().unwrap().as_str(), "protondrive");

        let mut cfg = Config::default();
        cfg.remote.name = "no good".to_string();
        assert!(cfg.remote_name().is_err());
    }

    // -- default_path --

    #[test]
    fn default_path_ends_with_config_yaml() {
        let p = Config::default_path();
        assert!(p.ends_with("pdrive/config.yaml"));
    }

    // -- ValidationError Display --

    #[test]
    fn validation_error_display() {
        let err = ValidationError {
            field: "status.poll_interval".into(),
            message: "must be greater than 0".into(),
        };
        assert_eq!(err.to_string(), "status.poll_interval: must be greater than 0");
    }
}
