//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util::{self, prompt_err};

/// Guided setup for a fresh config file.
fn prompt_config() -> Result<Config, CliError> {
    let mut cfg = Config::default();

    cfg.controller.url = Input::new()
        .with_prompt("Controller URL")
        .default(cfg.controller.url.clone())
        .interact_text()
        .map_err(prompt_err)?;

    cfg.controller.timeout = Input::new()
        .with_prompt("Request timeout (seconds)")
        .default(cfg.controller.timeout)
        .interact_text()
        .map_err(prompt_err)?;

    let catalog: String = Input::new()
        .with_prompt("Catalog YAML file (empty for none)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    if !catalog.trim().is_empty() {
        cfg.catalog = Some(PathBuf::from(catalog.trim()));
    }

    // Fail now rather than on first use.
    cfg.controller_config()?;
    Ok(cfg)
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = flowgate_config::load_config()?;
            let resolved = config::resolve_controller(&cfg, global)?;
            let body =
                toml::to_string_pretty(&cfg).map_err(flowgate_config::ConfigError::from)?;
            let out = format!(
                "# {}\n{body}\n# effective controller: {} (timeout {}s, priority {})",
                config::config_path().display(),
                resolved.url,
                resolved.timeout.as_secs(),
                resolved.flow_priority,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init => {
            let path = config::config_path();
            if path.exists()
                && !util::confirm(
                    &format!("Overwrite existing config at {}?", path.display()),
                    global.yes,
                )?
            {
                return Ok(());
            }

            let cfg = if global.yes {
                Config::default()
            } else {
                prompt_config()?
            };
            let written = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Config written to {}", written.display());
            }
            Ok(())
        }
    }
}
