//! CLI subcommands

use std::path::PathBuf;

use anyhow::{bail, Result};

use gigbook_core::{config::Config, domain::UserId};

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

pub mod completions;
pub mod config;
pub mod conflicts;

/// Settings shared by every subcommand
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub format: OutputFormat,
    pub config: Config,
    pub config_path: PathBuf,
    /// `--user` from the command line
    pub user: Option<UserId>,
}

impl CommandContext {
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(self.is_json())
    }

    /// The user to act for: `--user`, then `conflicts.default_user`
    pub fn user_id(&self) -> Result<UserId> {
        if let Some(user) = self.user {
            return Ok(user);
        }
        match self.config.conflicts.default_user {
            Some(raw) => Ok(UserId::new(raw)?),
            None => bail!("No user selected. Pass --user <id> or set conflicts.default_user"),
        }
    }
}
