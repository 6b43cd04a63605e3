//! Config command - View and manage pdrive configuration
//!
//! Operates on pdrive's own YAML file, not on the tool's remote config
//! (see `pdrive remote show` for that):
//! 1. Shows the current configuration (YAML or JSON)
//! 2. Sets individual configuration values via dot-notation keys
//! 3. Validates the configuration file and reports errors
//! 4. Prints the configuration file path

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use pdrive_core::config::Config;

use crate::CliContext;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "status.poll_interval")
        key: String,
        /// New value
        value: String,
    },
    /// Validate configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(&self, ctx: &CliContext, config_path: &Path) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(ctx, config_path),
            ConfigCommand::Set { key, value } => execute_set(ctx, config_path, key, value),
            ConfigCommand::Validate => execute_validate(ctx, config_path),
            ConfigCommand::Path => execute_path(ctx, config_path),
        }
    }
}

/// Show current configuration
fn execute_show(ctx: &CliContext, config_path: &Path) -> Result<()> {
    let fmt = ctx.formatter();

    info!(config_path = %config_path.display(), "Showing configuration");

    if matches!(ctx.format, crate::OutputFormat::Json) {
        let json = serde_json::to_value(&ctx.config)
            .context("Failed to serialize configuration to JSON")?;
        fmt.print_json(&json);
    } else {
        fmt.success(&format!("Configuration ({})", config_path.display()));
        fmt.info("");

        let yaml = serde_yaml::to_string(&ctx.config)
            .context("Failed to serialize configuration to YAML")?;

        for line in yaml.lines() {
            fmt.info(line);
        }
    }

    Ok(())
}

/// Set a configuration value using dot-notation
fn execute_set(ctx: &CliContext, config_path: &Path, key: &str, value: &str) -> Result<()> {
    let fmt = ctx.formatter();
    let mut config = ctx.config.clone();

    info!(key = %key, "Setting configuration value");

    if let Err(message) = apply_config_value(&mut config, key, value) {
        fmt.error(&message);
        return Ok(());
    }

    // Validate before saving so a bad value never lands on disk
    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        fmt.error(&format!(
            "Invalid value for '{}': {}",
            key,
            messages.join("; ")
        ));
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create configuration directory")?;
    }
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
    std::fs::write(config_path, yaml).context("Failed to write configuration file")?;

    fmt.success(&format!("Set {key} = {value}"));
    Ok(())
}

/// Validate configuration file
fn execute_validate(ctx: &CliContext, config_path: &Path) -> Result<()> {
    let fmt = ctx.formatter();

    let errors = ctx.config.validate();

    if matches!(ctx.format, crate::OutputFormat::Json) {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        fmt.print_json(&serde_json::json!({
            "path": config_path.display().to_string(),
            "valid": errors.is_empty(),
            "errors": messages,
        }));
        return Ok(());
    }

    if errors.is_empty() {
        fmt.success("Configuration is valid");
    } else {
        fmt.error(&format!("Configuration has {} problem(s):", errors.len()));
        for error in &errors {
            fmt.info(&format!("- {error}"));
        }
    }

    Ok(())
}

/// Print the configuration file path
fn execute_path(ctx: &CliContext, config_path: &Path) -> Result<()> {
    let fmt = ctx.formatter();
    if matches!(ctx.format, crate::OutputFormat::Json) {
        fmt.print_json(&serde_json::json!({
            "path": config_path.display().to_string(),
            "exists": config_path.exists(),
        }));
    } else {
        fmt.plain(&config_path.display().to_string());
    }
    Ok(())
}

/// Apply one dot-notation key to the config
///
/// Returns a user-facing message on unknown keys or unparseable values.
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
        value
            .parse()
            .map_err(|_| format!("Cannot parse '{value}' for '{key}'"))
    }

    match key {
        "remote.name" => config.remote.name = value.to_string(),
        "remote.backend" => config.remote.backend = value.to_string(),
        "tool.binary" => config.tool.binary = value.into(),
        "tool.probe_timeout" => config.tool.probe_timeout = parse(key, value)?,
        "tool.config_timeout" => config.tool.config_timeout = parse(key, value)?,
        "tool.create_timeout" => config.tool.create_timeout = parse(key, value)?,
        "tool.list_timeout" => config.tool.list_timeout = parse(key, value)?,
        "tool.mount_timeout" => config.tool.mount_timeout = parse(key, value)?,
        "link.verify_delay" => config.link.verify_delay = parse(key, value)?,
        "sync.verbose" => config.sync.verbose = parse(key, value)?,
        "sync.progress" => config.sync.progress = parse(key, value)?,
        "mount.mount_point" => config.mount.mount_point = value.to_string(),
        "mount.cache_mode" => config.mount.cache_mode = value.to_string(),
        "mount.daemonize" => config.mount.daemonize = parse(key, value)?,
        "status.poll_interval" => config.status.poll_interval = parse(key, value)?,
        "status.probe_timeout" => config.status.probe_timeout = parse(key, value)?,
        "logging.level" => config.logging.level = value.to_string(),
        _ => return Err(format!("Unknown configuration key: {key}")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_sets_string_keys() {
        let mut config = Config::default();
        apply_config_value(&mut config, "remote.name", "proton-work").unwrap();
        assert_eq!(config.remote.name, "proton-work");
    }

    #[test]
    fn apply_sets_numeric_keys() {
        let mut config = Config::default();
        apply_config_value(&mut config, "status.poll_interval", "45").unwrap();
        assert_eq!(config.status.poll_interval, 45);
    }

    #[test]
    fn apply_sets_bool_keys() {
        let mut config = Config::default();
        apply_config_value(&mut config, "sync.verbose", "false").unwrap();
        assert!(!config.sync.verbose);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut config = Config::default();
        let err = apply_config_value(&mut config, "nope.nothing", "1").unwrap_err();
        assert!(err.contains("Unknown configuration key"));
    }

    #[test]
    fn apply_rejects_unparseable_value() {
        let mut config = Config::default();
        let err = apply_config_value(&mut config, "tool.probe_timeout", "soon").unwrap_err();
        assert!(err.contains("Cannot parse"));
    }
}
