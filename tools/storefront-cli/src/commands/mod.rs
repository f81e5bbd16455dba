//! CLI command implementations.

pub mod add;
pub mod cart;
pub mod config;
pub mod quick_view;
pub mod remove;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use dialoguer::{Confirm, Select};
use turbo_fragment::FragmentDocument;
use turbo_storefront::{FragmentKind, LoadOutcome, Storefront};
use turbo_variants::{OptionKind, SelectOutcome, VariantSelector};

use crate::context::Context;
use crate::output::chip_label;
use crate::page::TerminalPage;

/// Arguments for the quick-view command.
#[derive(Args)]
pub struct QuickViewArgs {
    /// Product ID.
    pub product_id: String,

    /// Load the options-only cart modal instead of the quick view.
    #[arg(long)]
    pub modal: bool,

    /// Pick options interactively and offer to add the product.
    #[arg(short, long)]
    pub pick: bool,
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    pub product_id: String,

    /// Size to select.
    #[arg(short, long)]
    pub size: Option<String>,

    /// Color to select.
    #[arg(short, long)]
    pub color: Option<String>,

    /// Quantity to add.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub quantity: u32,

    /// Prompt for any option not given on the command line.
    #[arg(short, long)]
    pub interactive: bool,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Cart item key, as shown by `storefront cart`.
    pub key: String,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Write a config file with every default spelled out.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

type Shop = Storefront<TerminalPage>;
type Selector = VariantSelector<FragmentDocument>;

/// Load a product panel, failing the command unless the fragment bound.
async fn load_panel(
    shop: &mut Shop,
    kind: FragmentKind,
    product_id: &str,
    ctx: &Context,
) -> Result<()> {
    let spinner = ctx.output.spinner(&ctx.config.messages.loading);
    let outcome = shop.load(kind, product_id).await;
    spinner.finish_and_clear();

    match outcome {
        LoadOutcome::Bound { phase } => {
            ctx.output.debug(&format!("panel bound ({})", phase.as_str()));
            Ok(())
        }
        LoadOutcome::Failed(e) => Err(e.into()),
        LoadOutcome::Stale => bail!("Product {} was superseded before it loaded", product_id),
    }
}

/// Select a chip, turning a rejection into a command error.
fn apply_choice(shop: &mut Shop, kind: OptionKind, value: &str) -> Result<()> {
    let outcome = match kind {
        OptionKind::Size => shop.select_size(value)?,
        OptionKind::Color => shop.select_color(value)?,
    };
    if let SelectOutcome::Rejected(e) = outcome {
        bail!("{}", e);
    }
    Ok(())
}

/// Print every chip of the open panel, marking the selected ones.
fn print_options(selector: &Selector, ctx: &Context) {
    if !selector.descriptor().has_variants() {
        ctx.output.info("No options to choose");
        return;
    }

    let document = selector.view();
    for kind in OptionKind::ALL {
        let chips: Vec<String> = document
            .chips(kind)
            .map(|chip| chip_label(&chip.value, chip.selected, chip.available))
            .collect();
        if !chips.is_empty() {
            ctx.output.kv(kind.display_name(), &chips.join("  "));
        }
    }
}

/// Ask for every required option that is still missing.
fn prompt_missing(shop: &mut Shop) -> Result<()> {
    let missing = match shop.selector() {
        Some(selector) => selector.missing(),
        None => return Ok(()),
    };

    for kind in missing {
        let choices: Vec<String> = shop
            .selector()
            .map(|s| {
                s.descriptor()
                    .options(kind)
                    .iter()
                    .filter(|o| o.is_available)
                    .map(|o| o.value.clone())
                    .collect()
            })
            .unwrap_or_default();
        if choices.is_empty() {
            bail!("No {} is available", kind.display_name().to_lowercase());
        }

        let index = Select::new()
            .with_prompt(format!("Choose a {}", kind.display_name().to_lowercase()))
            .items(&choices)
            .default(0)
            .interact()?;
        apply_choice(shop, kind, &choices[index])?;
    }

    Ok(())
}

/// Ask before a cart change.
fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(true).interact()?)
}
