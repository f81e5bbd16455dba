//! Add-to-cart command.

use anyhow::Result;
use turbo_storefront::FragmentKind;
use turbo_variants::OptionKind;

use super::{apply_choice, load_panel, prompt_missing, AddArgs};
use crate::commands::cart::print_cart;
use crate::context::Context;

/// Run the add command.
pub async fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront()?;
    load_panel(&mut shop, FragmentKind::CartModal, &args.product_id, ctx).await?;

    if let Some(size) = &args.size {
        apply_choice(&mut shop, OptionKind::Size, size)?;
    }
    if let Some(color) = &args.color {
        apply_choice(&mut shop, OptionKind::Color, color)?;
    }
    shop.set_quantity(args.quantity)?;

    if args.interactive && !ctx.output.is_json() {
        prompt_missing(&mut shop)?;
    }

    let spinner = ctx.output.spinner("Adding to cart...");
    let result = shop.add_to_cart().await;
    spinner.finish_and_clear();
    let response = result?;

    if ctx.output.is_json() {
        ctx.output.json(&response);
        return Ok(());
    }

    print_cart(&response.snapshot(), ctx);
    Ok(())
}
