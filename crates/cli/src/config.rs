//! Shop configuration (TOML).
//!
//! ```toml
//! [log]
//! format = "compact"
//! level = "info"
//!
//! [[products]]
//! id = "googlehome"
//! sku = "120P90"
//! name = "Google Home"
//! unit_price = 49.99
//! quantity = 10
//!
//! [[promotions]]
//! name = "3 for 2 on Google Home"
//! starts_at = "2024-01-01T00:00:00Z"   # optional, quoted RFC 3339
//! ends_at = "2024-12-31T23:59:59Z"     # optional
//! [promotions.condition]
//! kind = "quantity_threshold"
//! product = "googlehome"
//! required_quantity = 3
//! discounted_quantity = 1
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_checkout::ShopService;
use storefront_core::{DomainError, ProductId};
use storefront_observability::LogConfig;
use storefront_products::{Catalog, Product};
use storefront_promotions::{
    BuyXGetFreeProduct, PercentageThresholdDiscount, Promotion, QuantityThresholdDiscount,
};
use storefront_sales::OrderStore;

/// The shop used when no `--config` is given.
pub const DEMO_CONFIG: &str = r#"
[[products]]
id = "googlehome"
sku = "120P90"
name = "Google Home"
unit_price = "49.99"
quantity = 10

[[products]]
id = "macbookpro"
sku = "43N23P"
name = "MacBook Pro"
unit_price = "5399.99"
quantity = 5

[[products]]
id = "alexaspeaker"
sku = "A304SD"
name = "Alexa Speaker"
unit_price = "109.50"
quantity = 10

[[products]]
id = "raspberrypi"
sku = "234234"
name = "Raspberry Pi B"
unit_price = "30.00"
quantity = 2

[[promotions]]
name = "Free Raspberry Pi B with every MacBook Pro"
[promotions.condition]
kind = "buy_x_get_free"
x_product = "macbookpro"
free_product = "raspberrypi"

[[promotions]]
name = "3 Google Homes for the price of 2"
[promotions.condition]
kind = "quantity_threshold"
product = "googlehome"
required_quantity = 3
discounted_quantity = 1

[[promotions]]
name = "10% off Alexa Speakers from 3"
[promotions.condition]
kind = "percentage_threshold"
product = "alexaspeaker"
min_quantity = 3
percent = 10
"#;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid shop configuration: {0}")]
    Invalid(#[from] DomainError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub products: Vec<ProductConfig>,
    #[serde(default)]
    pub promotions: Vec<PromotionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionConfig {
    pub name: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub condition: Option<ConditionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionConfig {
    BuyXGetFree {
        x_product: String,
        free_product: String,
    },
    QuantityThreshold {
        product: String,
        required_quantity: u32,
        discounted_quantity: u32,
    },
    PercentageThreshold {
        product: String,
        min_quantity: u32,
        percent: Decimal,
    },
}

impl ShopConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn demo() -> Result<Self, ConfigError> {
        Self::from_toml(DEMO_CONFIG)
    }

    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        let products = self
            .products
            .iter()
            .map(ProductConfig::to_product)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Catalog::with_products(products)?)
    }

    pub fn promotions(&self) -> Result<Vec<Promotion>, ConfigError> {
        Ok(self
            .promotions
            .iter()
            .map(PromotionConfig::to_promotion)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Validate the whole configuration and build a service over it.
    pub fn build_service(&self) -> Result<ShopService, ConfigError> {
        let catalog = self.catalog()?;
        let promotions = self.promotions()?;
        tracing::debug!(
            products = self.products.len(),
            promotions = promotions.len(),
            "shop configured"
        );
        Ok(ShopService::new(catalog, promotions, OrderStore::new()))
    }
}

impl ProductConfig {
    fn to_product(&self) -> Result<Product, DomainError> {
        Product::new(
            ProductId::parse(self.id.as_str())?,
            self.sku.as_str(),
            self.name.as_str(),
            self.unit_price,
            self.quantity,
        )
    }
}

impl PromotionConfig {
    fn to_promotion(&self) -> Result<Promotion, DomainError> {
        let promotion = match &self.condition {
            Some(condition) => condition.to_promotion()?,
            None => Promotion::default(),
        };
        let promotion = match &self.name {
            Some(name) => promotion.named(name.as_str()),
            None => promotion,
        };
        promotion.with_window(self.starts_at, self.ends_at)
    }
}

impl ConditionConfig {
    fn to_promotion(&self) -> Result<Promotion, DomainError> {
        Ok(match self {
            ConditionConfig::BuyXGetFree {
                x_product,
                free_product,
            } => Promotion::new(BuyXGetFreeProduct::new(
                ProductId::parse(x_product.as_str())?,
                ProductId::parse(free_product.as_str())?,
            )),
            ConditionConfig::QuantityThreshold {
                product,
                required_quantity,
                discounted_quantity,
            } => Promotion::new(QuantityThresholdDiscount::new(
                ProductId::parse(product.as_str())?,
                *required_quantity,
                *discounted_quantity,
            )?),
            ConditionConfig::PercentageThreshold {
                product,
                min_quantity,
                percent,
            } => Promotion::new(PercentageThresholdDiscount::new(
                ProductId::parse(product.as_str())?,
                *min_quantity,
                *percent,
            )?),
        })
    }
}
