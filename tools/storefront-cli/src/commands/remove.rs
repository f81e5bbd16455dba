//! Cart line removal.

use anyhow::Result;
use turbo_variants::CartItemKey;

use super::{confirm, RemoveArgs};
use crate::commands::cart::print_cart;
use crate::context::Context;

/// Run the remove command.
pub async fn run(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let prompt = format!("Remove {} from the cart?", args.key);
    if !args.yes && !ctx.output.is_json() && !confirm(&prompt)? {
        ctx.output.warn("Removal cancelled");
        return Ok(());
    }

    let mut shop = ctx.storefront()?;
    let key = CartItemKey::from(args.key);

    let spinner = ctx.output.spinner("Removing...");
    let result = shop.remove_item(&key).await;
    spinner.finish_and_clear();
    let response = result?;

    if ctx.output.is_json() {
        ctx.output.json(&response);
        return Ok(());
    }

    print_cart(&response.snapshot(), ctx);
    Ok(())
}
