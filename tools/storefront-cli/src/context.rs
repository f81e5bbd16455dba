//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::{debug, warn};
use turbo_storefront::{Storefront, StorefrontConfig};

use crate::output::Output;
use crate::page::TerminalPage;

/// Config file names searched from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Storefront configuration.
    pub config: StorefrontConfig,
    /// Where the configuration came from, if a file.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from an explicit config file or the directory tree.
    pub fn load(config_path: Option<&str>, base_url: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = match config_path {
            Some(path) => {
                let config = StorefrontConfig::load(path)
                    .with_context(|| format!("Failed to load config: {}", path))?;
                (config, Some(PathBuf::from(path)))
            }
            None => match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (StorefrontConfig::default(), None),
            },
        };

        if let Some(url) = base_url {
            config.base_url = url.to_string();
        }

        debug!(
            config = ?config_path,
            base_url = %config.base_url,
            "context loaded"
        );

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// A storefront over the real shop, rendering into the terminal.
    pub fn storefront(&self) -> Result<Storefront<TerminalPage>> {
        Storefront::from_config(self.config.clone(), TerminalPage::new(self.output.clone()))
            .context("Failed to create HTTP client")
    }
}

/// Find a config file in the directory tree, nearest first.
pub fn find_config(start: &Path) -> Option<(StorefrontConfig, PathBuf)> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let path = current.join(name);
            if !path.exists() {
                continue;
            }
            match StorefrontConfig::load(&path) {
                Ok(config) => return Some((config, path)),
                Err(e) => warn!(error = %e, "skipping unreadable config"),
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}
