//! Storefront CLI - drive TurboCommerce product panels and the cart from a terminal.
//!
//! Commands:
//! - `storefront quick-view` - Load a product panel and show its options
//! - `storefront add` - Add a product to the cart
//! - `storefront cart` - Show the cart
//! - `storefront remove` - Remove a cart line
//! - `storefront config` - Manage configuration

mod commands;
mod context;
mod logging;
mod output;
mod page;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AddArgs, ConfigArgs, QuickViewArgs, RemoveArgs};
use turbo_storefront::StorefrontError;

/// Storefront CLI - Product panels and cart actions against a TurboCommerce shop
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<String>,

    /// Shop origin, overriding the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a product's quick view (or cart modal) and show its options
    QuickView(QuickViewArgs),

    /// Add a product to the cart
    Add(AddArgs),

    /// Show the cart
    Cart,

    /// Remove a line from the cart
    Remove(RemoveArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&logging::LogConfig::from_flags(cli.verbose, cli.json));

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = context::Context::load(cli.config.as_deref(), cli.base_url.as_deref(), output)?;

    // Execute command
    let result = match cli.command {
        Commands::QuickView(args) => commands::quick_view::run(args, &ctx).await,
        Commands::Add(args) => commands::add::run(args, &ctx).await,
        Commands::Cart => commands::cart::run(&ctx).await,
        Commands::Remove(args) => commands::remove::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        if let Some(hint) = failure_hint(&e, &ctx.config.base_url) {
            ctx.output.warn(&hint);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// A next step for errors that came from talking to the shop.
fn failure_hint(error: &anyhow::Error, base_url: &str) -> Option<String> {
    let error = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<StorefrontError>())?;

    if error.is_transport() {
        return Some(format!(
            "Could not reach {}; check --base-url or the config file",
            base_url
        ));
    }
    match error.status() {
        Some(404) => Some("The shop has no such product or cart item".to_string()),
        Some(status) if status >= 500 => {
            Some(format!("The shop answered with HTTP {}; try again later", status))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use commands::ConfigCommand;
    use turbo_storefront::FetchError;

    #[test]
    fn test_failure_hint() {
        let offline = anyhow::Error::from(StorefrontError::from(FetchError::Timeout));
        assert_eq!(
            failure_hint(&offline, "https://shop.test").as_deref(),
            Some("Could not reach https://shop.test; check --base-url or the config file")
        );

        let missing = anyhow::Error::from(StorefrontError::from(FetchError::HttpError {
            status: 404,
            message: "not found".to_string(),
        }))
        .context("loading product 9");
        assert_eq!(
            failure_hint(&missing, "").as_deref(),
            Some("The shop has no such product or cart item")
        );

        let down = anyhow::Error::from(StorefrontError::from(FetchError::HttpError {
            status: 503,
            message: "unavailable".to_string(),
        }));
        assert_eq!(
            failure_hint(&down, "").as_deref(),
            Some("The shop answered with HTTP 503; try again later")
        );

        assert_eq!(failure_hint(&anyhow::anyhow!("no config"), ""), None);
        let rejected = anyhow::Error::from(StorefrontError::CartRejected("sold out".to_string()));
        assert_eq!(failure_hint(&rejected, ""), None);
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_short_flags_with_config() {
        let cli = Cli::try_parse_from([
            "storefront", "add", "42", "-s", "L", "-c", "Blue", "-i", "--config", "shop.toml",
        ])
        .unwrap();

        assert_eq!(cli.config.as_deref(), Some("shop.toml"));
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.size.as_deref(), Some("L"));
                assert_eq!(args.color.as_deref(), Some("Blue"));
                assert_eq!(args.quantity, 1);
                assert!(args.interactive);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "storefront",
            "--base-url",
            "https://shop.test",
            "add",
            "42",
            "--size",
            "M",
            "--color",
            "Red",
            "-q",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("https://shop.test"));
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.product_id, "42");
                assert_eq!(args.size.as_deref(), Some("M"));
                assert_eq!(args.color.as_deref(), Some("Red"));
                assert_eq!(args.quantity, 2);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_quick_view_and_globals() {
        let cli = Cli::try_parse_from(["storefront", "quick-view", "7", "--modal", "--json", "-v"])
            .unwrap();
        assert!(cli.json);
        assert!(cli.verbose);
        match cli.command {
            Commands::QuickView(args) => {
                assert_eq!(args.product_id, "7");
                assert!(args.modal);
                assert!(!args.pick);
            }
            _ => panic!("expected quick-view"),
        }
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from(["storefront", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(args) => {
                assert!(matches!(args.command, ConfigCommand::Init { force: true }))
            }
            _ => panic!("expected config"),
        }
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert!(Cli::try_parse_from(["storefront", "add", "42", "--quantity", "0"]).is_err());
        assert!(Cli::try_parse_from(["storefront", "remove"]).is_err());
    }
}
