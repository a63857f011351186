//! fitpick config - Show effective configuration

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{self, robot_ok};
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::{FitError, Result};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Dotted key to print, e.g. `search.k` (default: everything)
    pub key: Option<String>,

    /// List the files that are consulted, in load order
    #[arg(long)]
    pub paths: bool,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    if args.paths {
        return emit_paths(ctx);
    }
    match &args.key {
        Some(key) => get_key(ctx, key),
        None => emit_config(ctx),
    }
}

fn emit_config(ctx: &AppContext) -> Result<()> {
    if ctx.robot_mode {
        return output::emit_json(&robot_ok(&ctx.config));
    }

    let rendered = toml::to_string_pretty(&ctx.config)
        .map_err(|err| FitError::Config(format!("render config: {err}")))?;
    println!("{rendered}");
    Ok(())
}

fn get_key(ctx: &AppContext, key: &str) -> Result<()> {
    let value = ctx.config.value_at(key)?;
    if ctx.robot_mode {
        return output::emit_json(&robot_ok(&value));
    }
    println!("{}", format_value(&value));
    Ok(())
}

fn emit_paths(ctx: &AppContext) -> Result<()> {
    let paths: Vec<String> = match &ctx.config_path {
        Some(path) => vec![path.display().to_string()],
        None => Config::global_path()
            .into_iter()
            .chain(std::iter::once(ctx.project_root.join(PROJECT_CONFIG_FILE)))
            .map(|path| path.display().to_string())
            .collect(),
    };
    if ctx.robot_mode {
        return output::emit_json(&robot_ok(&paths));
    }
    for path in paths {
        println!("{path}");
    }
    Ok(())
}

fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
