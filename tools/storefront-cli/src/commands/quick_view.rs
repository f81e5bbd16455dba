//! Product panel inspection.

use anyhow::{anyhow, Result};
use serde::Serialize;
use turbo_storefront::FragmentKind;
use turbo_variants::{MediaAsset, SelectionState, VariantOption};

use super::{
    confirm, load_panel, print_options, prompt_missing, QuickViewArgs, Selector,
};
use crate::commands::cart::print_cart;
use crate::context::Context;

/// What a loaded panel offers, for `--json`.
#[derive(Serialize)]
struct PanelSummary<'a> {
    product_id: &'a str,
    panel: &'static str,
    sizes: &'a [VariantOption],
    colors: &'a [VariantOption],
    media: &'a [MediaAsset],
    selection: &'a SelectionState,
    quantity: u32,
    can_submit: bool,
}

impl<'a> PanelSummary<'a> {
    fn new(product_id: &'a str, kind: FragmentKind, selector: &'a Selector) -> Self {
        let descriptor = selector.descriptor();
        Self {
            product_id,
            panel: kind.as_str(),
            sizes: descriptor.sizes(),
            colors: descriptor.colors(),
            media: descriptor.media(),
            selection: selector.state(),
            quantity: selector.quantity(),
            can_submit: selector.can_submit(),
        }
    }
}

/// Run the quick-view command.
pub async fn run(args: QuickViewArgs, ctx: &Context) -> Result<()> {
    let kind = if args.modal {
        FragmentKind::CartModal
    } else {
        FragmentKind::QuickView
    };

    let mut shop = ctx.storefront()?;
    load_panel(&mut shop, kind, &args.product_id, ctx).await?;

    {
        let selector = shop
            .selector()
            .ok_or_else(|| anyhow!("Panel for {} has no options", args.product_id))?;

        if ctx.output.is_json() {
            ctx.output.json(&PanelSummary::new(&args.product_id, kind, selector));
            return Ok(());
        }

        ctx.output.header(&format!("Product {}", args.product_id));
        print_options(selector, ctx);

        let descriptor = selector.descriptor();
        for (index, asset) in descriptor.media().iter().enumerate() {
            let marker = if selector.active_media() == Some(index) { "*" } else { " " };
            let color = asset
                .associated_color
                .as_deref()
                .map(|c| format!(" ({})", c))
                .unwrap_or_default();
            ctx.output.list_item(&format!(
                "{} {} {}{}",
                marker,
                asset.kind.as_str(),
                asset.source_url,
                color
            ));
        }

        if !selector.can_submit() {
            let missing: Vec<&str> = selector.missing().iter().map(|k| k.as_str()).collect();
            ctx.output.info(&format!("Choose: {}", missing.join(", ")));
        }
    }

    if !args.pick {
        return Ok(());
    }

    prompt_missing(&mut shop)?;
    if let Ok(url) = shop.checkout_url() {
        ctx.output.kv("Checkout", &url);
    }

    if !confirm("Add to cart?")? {
        ctx.output.warn("Nothing added");
        return Ok(());
    }

    let spinner = ctx.output.spinner("Adding to cart...");
    let result = shop.add_to_cart().await;
    spinner.finish_and_clear();

    let response = result?;
    print_cart(&response.snapshot(), ctx);
    Ok(())
}
