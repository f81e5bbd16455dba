//! Cart display.

use anyhow::Result;
use turbo_storefront::CartSnapshot;

use crate::context::Context;

const HEADERS: [&str; 6] = ["KEY", "PRODUCT", "SIZE", "COLOR", "QTY", "PRICE"];
const WIDTHS: [usize; 6] = [16, 24, 6, 10, 4, 10];

/// Run the cart command.
pub async fn run(ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront()?;

    let spinner = ctx.output.spinner("Fetching cart...");
    let result = shop.open_cart_drawer().await;
    spinner.finish_and_clear();
    let snapshot = result?;

    if ctx.output.is_json() {
        ctx.output.json(&snapshot);
        return Ok(());
    }

    print_cart(&snapshot, ctx);
    Ok(())
}

/// Print the drawer contents as a table.
pub(crate) fn print_cart(cart: &CartSnapshot, ctx: &Context) {
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    ctx.output.header(&format!("Cart ({} items)", cart.item_count()));
    ctx.output.table_row(&HEADERS, &WIDTHS);
    for line in &cart.cart_items {
        let name = if line.name.is_empty() {
            line.product_id.as_str()
        } else {
            line.name.as_str()
        };
        let quantity = line.quantity.to_string();
        ctx.output.table_row(
            &[
                line.key.as_str(),
                name,
                line.size.as_str(),
                line.color.as_str(),
                quantity.as_str(),
                line.unit_price.as_str(),
            ],
            &WIDTHS,
        );
    }
    ctx.output.kv("Total", &cart.cart_total);
}
