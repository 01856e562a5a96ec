mod commands;
mod config;

use anyhow::Context;

use commands::{CommandLine, Commands};
use config::ShopConfig;

fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse_args();

    let mut config = match &cli.config {
        Some(path) => ShopConfig::from_file(path)
            .with_context(|| format!("cannot load shop config {}", path.display()))?,
        None => ShopConfig::demo().context("built-in demo shop is invalid")?,
    };
    if let Some(format) = cli.log_format {
        config.log.format = format.into();
    }
    if cli.verbose {
        config.log.level = "debug".to_string();
    }
    storefront_observability::init_with(&config.log);

    let service = config.build_service()?;
    tracing::info!(
        products = config.products.len(),
        promotions = config.promotions.len(),
        "shop ready"
    );

    match cli.command {
        Commands::Products { json } => commands::products(&service, json),
        Commands::Scenarios => commands::scenarios(&service),
        Commands::Checkout { items, json } => commands::checkout(&service, &items, json),
    }
}
