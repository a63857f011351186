//! Per-invocation application context.

use std::path::PathBuf;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    /// Explicit config file, if one was given.
    pub config_path: Option<PathBuf>,
    pub project_root: PathBuf,
    pub output_format: OutputFormat,
    pub robot_mode: bool,
    pub quiet: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_root = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &project_root)?;
        let output_format = cli.output_format();
        Ok(Self {
            config,
            config_path: cli.config.clone(),
            project_root,
            robot_mode: output_format.is_machine_readable(),
            output_format,
            quiet: cli.quiet,
        })
    }

    /// Context with default configuration, for tests and embedding.
    #[must_use]
    pub fn with_config(config: Config, output_format: OutputFormat) -> Self {
        Self {
            config,
            config_path: None,
            project_root: PathBuf::from("."),
            robot_mode: output_format.is_machine_readable(),
            output_format,
            quiet: false,
        }
    }
}
