use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use storefront_checkout::{Receipt, ShopService};
use storefront_core::money::format_amount;
use storefront_core::{Entity, ProductId};
use storefront_observability::LogFormat;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "In-memory shop: carts, stock and promotions.")]
pub struct CommandLine {
    /// Shop configuration file (TOML). Defaults to the built-in demo shop.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log output format (overrides the config file).
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormatArg>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the catalog
    #[command(alias = "p")]
    Products {
        #[arg(long)]
        json: bool,
    },
    /// Run the three demo checkout scenarios
    #[command(alias = "s")]
    Scenarios,
    /// Fill one cart with PRODUCT=QTY items and check it out
    #[command(alias = "c")]
    Checkout {
        #[arg(value_parser = parse_item, required = true)]
        items: Vec<(ProductId, u32)>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Json,
    Compact,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Compact => LogFormat::Compact,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Parse `product=qty`.
fn parse_item(raw: &str) -> Result<(ProductId, u32), String> {
    let (id, qty) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PRODUCT=QTY, got '{raw}'"))?;
    let id = ProductId::parse(id.trim()).map_err(|e| e.to_string())?;
    let qty = qty
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid quantity '{qty}': {e}"))?;
    Ok((id, qty))
}

pub fn products(service: &ShopService, json: bool) -> anyhow::Result<()> {
    let products = service.list_products()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    }

    println!("{:<14} {:<8} {:<18} {:>10} {:>6}", "ID", "SKU", "NAME", "PRICE", "STOCK");
    for product in &products {
        println!(
            "{:<14} {:<8} {:<18} {:>10} {:>6}",
            product.id(),
            product.sku(),
            product.name(),
            format_amount(product.unit_price()),
            product.quantity()
        );
    }
    Ok(())
}

pub fn checkout(service: &ShopService, items: &[(ProductId, u32)], json: bool) -> anyhow::Result<()> {
    let receipt = fill_and_checkout(service, items)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        println!("{receipt}");
    }
    Ok(())
}

/// The demo scenarios. Each runs against the same service, so stock carries
/// over from one scenario to the next.
pub fn scenarios(service: &ShopService) -> anyhow::Result<()> {
    let runs: [(&str, &[(&str, u32)]); 3] = [
        (
            "Each sale of a MacBook Pro comes with a free Raspberry Pi B",
            &[("macbookpro", 1), ("raspberrypi", 1)],
        ),
        (
            "Buy 3 Google Homes for the price of 2",
            &[("googlehome", 1), ("googlehome", 1), ("googlehome", 1)],
        ),
        (
            "Buying 3 or more Alexa Speakers gives 10% off all of them",
            &[("alexaspeaker", 1), ("alexaspeaker", 1), ("alexaspeaker", 1)],
        ),
    ];

    for (n, (title, items)) in runs.iter().enumerate() {
        let items: Vec<(ProductId, u32)> = items
            .iter()
            .map(|(id, qty)| (ProductId::from(*id), *qty))
            .collect();
        let receipt = fill_and_checkout(service, &items)
            .with_context(|| format!("scenario {} failed", n + 1))?;

        println!("Scenario {}: {title}", n + 1);
        println!("  you need to pay: {}", format_amount(receipt.total));
    }
    Ok(())
}

fn fill_and_checkout(service: &ShopService, items: &[(ProductId, u32)]) -> anyhow::Result<Receipt> {
    let cart = service.create_cart()?;
    for (product_id, quantity) in items {
        service
            .add_item_to_cart(cart.id_typed(), product_id, *quantity)
            .with_context(|| format!("cannot add {quantity} x {product_id} to cart"))?;
    }
    service
        .checkout_receipt(cart.id_typed())
        .context("checkout failed")
}
