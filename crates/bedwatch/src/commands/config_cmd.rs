//! Config subcommand handlers.

use std::path::{Path, PathBuf};

use dialoguer::{Input, Select};

use bedwatch_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::commands::util::{confirm, prompt_err};
use crate::error::CliError;
use crate::output;

const OUTPUT_CHOICES: [&str; 5] = ["table", "json", "json-compact", "yaml", "plain"];
const COLOR_CHOICES: [&str; 3] = ["auto", "always", "never"];

/// `--config` if given, else the platform config path.
pub fn resolve_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config::config_path)
}

/// Load the layered config for `path`, attributing failures to it.
pub fn load(path: &Path) -> Result<Config, CliError> {
    config::load_config_from(path).map_err(|e| CliError::config(path.display(), e))
}

// ── Init wizard ─────────────────────────────────────────────────────

fn choose(prompt: &str, items: &[&str], current: &str) -> Result<String, CliError> {
    let default = items.iter().position(|i| *i == current).unwrap_or(0);
    let idx = Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()
        .map_err(prompt_err)?;
    Ok(items.get(idx).copied().unwrap_or(current).to_owned())
}

fn interactive(mut cfg: Config, path: &Path) -> Result<Config, CliError> {
    eprintln!("bedwatch configuration wizard");
    eprintln!("   Config path: {}\n", path.display());

    cfg.defaults.output = choose("Default output format", &OUTPUT_CHOICES, &cfg.defaults.output)?;
    cfg.defaults.color = choose("Color output", &COLOR_CHOICES, &cfg.defaults.color)?;

    let seed: String = Input::new()
        .with_prompt("Generator seed (empty for random)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    let seed = seed.trim();
    cfg.monitor.seed = if seed.is_empty() {
        None
    } else {
        Some(seed.parse().map_err(|e| CliError::Validation {
            field: "seed".into(),
            reason: format!("'{seed}' is not an unsigned integer: {e}"),
        })?)
    };
    Ok(cfg)
}

fn init(global: &GlobalOpts, path: &Path) -> Result<(), CliError> {
    if path.exists() {
        let prompt = format!("{} exists. Overwrite?", path.display());
        if !confirm(&prompt, global.yes, &path.display().to_string())? {
            eprintln!("Aborted; config left unchanged.");
            return Ok(());
        }
    }

    let mut cfg = Config::default();
    cfg.monitor.seed = global.seed;
    let cfg = if global.yes {
        cfg
    } else {
        interactive(cfg, path)?
    };
    cfg.validate()
        .map_err(|e| CliError::config(path.display(), e))?;

    config::save_config_to(&cfg, path).map_err(|e| CliError::config(path.display(), e))?;
    if !global.quiet {
        eprintln!("✓ Wrote {}", path.display());
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = resolve_path(global);
    match args.command {
        ConfigCommand::Init => init(global, &path),

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = load(&path)?;
            let format = global.output.unwrap_or(OutputFormat::Table);
            let out = match format {
                OutputFormat::Table => toml::to_string_pretty(&cfg)?,
                _ => output::render_single(
                    format,
                    &cfg,
                    |_| String::new(),
                    |_| path.display().to_string(),
                )?,
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }
    }
}
