//! Command handlers: bridge CLI args to the catalog and connection manager.

pub mod catalog;
pub mod config_cmd;
pub mod connect;
pub mod locate;
pub mod menu;
pub mod path;
pub mod util;

use flowgate_core::ConnectionManager;

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    manager: &ConnectionManager,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Menu => {
            let catalog = match config::catalog_path(cfg, global) {
                Some(path) => Some(flowgate_core::Catalog::load(&path)?),
                None => None,
            };
            menu::run(manager, catalog, global).await
        }
        Command::Connect(args) => {
            let catalog = config::load_catalog(cfg, global)?;
            connect::handle(manager, &catalog, args, global).await
        }
        Command::Locate { mac } => locate::handle(manager, &mac, global).await,
        Command::Path { src, dst } => path::handle(manager, &src, &dst, global).await,
        // Offline commands are handled before dispatch
        Command::Catalog(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
