//! Config command - View and manage Gigbook configuration
//!
//! `gigbook config show` prints the effective configuration,
//! `config set` edits one key in the file, `config validate` checks the
//! file on disk and `config path` prints where it lives.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use gigbook_core::config::Config;

use super::CommandContext;
use crate::output::plural;

/// Keys accepted by `config set`, with a short description
const SUPPORTED_KEYS: &[(&str, &str)] = &[
    ("database.path", "SQLite database file"),
    ("logging.level", "trace|debug|info|warn|error"),
    ("conflicts.show_soft", "true|false"),
    ("conflicts.show_resolved", "true|false"),
    ("conflicts.default_user", "user id, or 'none'"),
];

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "conflicts.show_soft")
        key: String,
        /// New value
        value: String,
    },
    /// Validate the configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(ctx),
            ConfigCommand::Set { key, value } => execute_set(ctx, key, value),
            ConfigCommand::Validate => execute_validate(ctx),
            ConfigCommand::Path => execute_path(ctx),
        }
    }
}

fn execute_show(ctx: &CommandContext) -> Result<()> {
    let formatter = ctx.formatter();

    if ctx.is_json() {
        let json =
            serde_json::to_value(&ctx.config).context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
        return Ok(());
    }

    formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
    formatter.info("");
    let yaml =
        serde_yaml::to_string(&ctx.config).context("Failed to serialize configuration to YAML")?;
    for line in yaml.lines() {
        formatter.info(line);
    }

    Ok(())
}

fn execute_set(ctx: &CommandContext, key: &str, value: &str) -> Result<()> {
    let formatter = ctx.formatter();

    // Edit the file contents, not the effective config, so defaults stay implicit.
    let mut config = load_for_edit(&ctx.config_path)?;
    apply_config_value(&mut config, key, value).with_context(|| {
        let keys: Vec<_> = SUPPORTED_KEYS.iter().map(|(k, _)| *k).collect();
        format!("Supported keys: {}", keys.join(", "))
    })?;

    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!("Invalid value for '{}': {}", key, messages.join("; "));
    }

    save(&config, &ctx.config_path)?;
    info!(key = %key, value = %value, path = %ctx.config_path.display(), "Configuration updated");

    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({
            "success": true,
            "key": key,
            "value": value,
            "config_path": ctx.config_path.display().to_string(),
        }));
    } else {
        formatter.success(&format!("Set {} = {}", key, value));
        formatter.info(&format!("Saved to {}", ctx.config_path.display()));
    }

    Ok(())
}

fn execute_validate(ctx: &CommandContext) -> Result<()> {
    let formatter = ctx.formatter();
    let path = &ctx.config_path;

    if !path.exists() {
        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "valid": true,
                "config_path": path.display().to_string(),
                "exists": false,
                "errors": [],
            }));
        } else {
            formatter.success("No configuration file; defaults are in effect");
            formatter.info(&format!("Expected at {}", path.display()));
        }
        return Ok(());
    }

    let errors: Vec<String> = match Config::load(path) {
        Ok(config) => config.validate().iter().map(|e| e.to_string()).collect(),
        Err(e) => vec![format!("Failed to parse configuration: {}", e)],
    };

    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": path.display().to_string(),
            "exists": true,
            "errors": errors,
        }));
    } else if errors.is_empty() {
        formatter.success("Configuration is valid");
        formatter.info(&format!("File: {}", path.display()));
    } else {
        formatter.info(&format!("File: {}", path.display()));
        for error in &errors {
            formatter.info(&format!("  {}", error));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} in {}", plural(errors.len(), "configuration error"), path.display())
    }
}

fn execute_path(ctx: &CommandContext) -> Result<()> {
    if ctx.is_json() {
        ctx.formatter().print_json(&serde_json::json!({
            "config_path": ctx.config_path.display().to_string(),
            "exists": ctx.config_path.exists(),
        }));
    } else {
        println!("{}", ctx.config_path.display());
    }
    Ok(())
}

/// Loads the file to edit; a missing file starts from defaults
fn load_for_edit(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path).with_context(|| format!("Failed to read {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

fn save(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create configuration directory")?;
    }
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    std::fs::write(path, yaml).context("Failed to write configuration file")?;
    Ok(())
}

/// Apply a dot-notation key/value pair to a Config struct
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "database.path" => {
            config.database.path = PathBuf::from(value);
        }
        "logging.level" => {
            config.logging.level = value.to_lowercase();
        }
        "conflicts.show_soft" => {
            config.conflicts.show_soft = parse_bool(value)?;
        }
        "conflicts.show_resolved" => {
            config.conflicts.show_resolved = parse_bool(value)?;
        }
        "conflicts.default_user" => {
            config.conflicts.default_user = match value {
                "" | "none" => None,
                v => Some(
                    v.parse::<i64>()
                        .context("Expected a user id for conflicts.default_user")?,
                ),
            };
        }
        _ => {
            anyhow::bail!("Unknown configuration key: '{}'", key);
        }
    }

    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => anyhow::bail!("Expected true or false, got '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_database_path() {
        let mut config = Config::default();
        apply_config_value(&mut config, "database.path", "/srv/gigbook.db").unwrap();
        assert_eq!(config.database.path, PathBuf::from("/srv/gigbook.db"));
    }

    #[test]
    fn test_apply_logging_level() {
        let mut config = Config::default();
        apply_config_value(&mut config, "logging.level", "DEBUG").unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_apply_show_soft() {
        let mut config = Config::default();
        apply_config_value(&mut config, "conflicts.show_soft", "off").unwrap();
        assert!(!config.conflicts.show_soft);
    }

    #[test]
    fn test_apply_show_resolved() {
        let mut config = Config::default();
        apply_config_value(&mut config, "conflicts.show_resolved", "yes").unwrap();
        assert!(config.conflicts.show_resolved);
    }

    #[test]
    fn test_apply_default_user() {
        let mut config = Config::default();
        apply_config_value(&mut config, "conflicts.default_user", "42").unwrap();
        assert_eq!(config.conflicts.default_user, Some(42));

        apply_config_value(&mut config, "conflicts.default_user", "none").unwrap();
        assert!(config.conflicts.default_user.is_none());
    }

    #[test]
    fn test_apply_invalid_bool_fails() {
        let mut config = Config::default();
        assert!(apply_config_value(&mut config, "conflicts.show_soft", "maybe").is_err());
    }

    #[test]
    fn test_apply_invalid_user_fails() {
        let mut config = Config::default();
        assert!(apply_config_value(&mut config, "conflicts.default_user", "abc").is_err());
    }

    #[test]
    fn test_apply_unknown_key_fails() {
        let mut config = Config::default();
        let err = apply_config_value(&mut config, "sync.root", "/x").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_supported_keys_all_apply() {
        let samples = ["/tmp/g.db", "warn", "true", "false", "7"];
        for ((key, _), value) in SUPPORTED_KEYS.iter().zip(samples) {
            let mut config = Config::default();
            apply_config_value(&mut config, key, value)
                .unwrap_or_else(|e| panic!("{key} rejected {value}: {e}"));
        }
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gigbook").join("config.yaml");

        let mut config = load_for_edit(&path).unwrap();
        apply_config_value(&mut config, "conflicts.default_user", "9").unwrap();
        save(&config, &path).unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.conflicts.default_user, Some(9));
    }
}
