use crate::config::toml_config::TomlConfig;
use crate::config::Environment;
use crate::domain::model::{PriceUpdate, SellerItem, StockUpdate, MAX_PAGE_LIMIT};
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "seller-items")]
#[command(about = "Manage the items a seller offers on the marketplace")]
pub struct CliConfig {
    /// TOML configuration file; flags below override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    pub environment: Option<Environment>,

    /// Overrides the environment's base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, global = true)]
    pub app_token: Option<String>,

    #[arg(long, global = true)]
    pub auth_token: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every item sold by the seller
    List(PageArgs),
    /// List items already available for sale
    Available(PageArgs),
    /// Fetch an item by marketplace SKU
    Get { sku_id: String },
    /// Fetch an item by the seller's own SKU
    GetOrigin { sku_origin: String },
    /// Associate a catalog product with the seller
    Create(CreateArgs),
    /// Update the prices of an item
    Price(PriceArgs),
    /// Update the stock of an item
    Stock(StockArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    #[arg(long, default_value_t = MAX_PAGE_LIMIT)]
    pub limit: u32,
}

#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub sku_id: String,
    #[arg(long)]
    pub sku_origin: String,
    #[arg(long)]
    pub default_price: Option<Decimal>,
    #[arg(long)]
    pub sale_price: Option<Decimal>,
    #[arg(long)]
    pub available_quantity: Option<u32>,
    #[arg(long)]
    pub total_quantity: Option<u32>,
    #[arg(long)]
    pub installment_id: Option<String>,
    #[arg(long)]
    pub cross_docking_time: Option<u32>,
}

impl CreateArgs {
    pub fn to_seller_item(&self) -> SellerItem {
        SellerItem {
            sku_id: Some(self.sku_id.clone()),
            sku_origin: Some(self.sku_origin.clone()),
            default_price: self.default_price,
            sale_price: self.sale_price,
            available_quantity: self.available_quantity,
            total_quantity: self.total_quantity,
            installment_id: self.installment_id.clone(),
            cross_docking_time: self.cross_docking_time,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PriceArgs {
    pub sku_id: String,
    #[arg(long)]
    pub default_price: Decimal,
    #[arg(long)]
    pub sale_price: Decimal,
    #[arg(long)]
    pub installment_id: Option<String>,
}

impl PriceArgs {
    pub fn to_update(&self) -> PriceUpdate {
        PriceUpdate {
            default_price: self.default_price,
            sale_price: self.sale_price,
            installment_id: self.installment_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct StockArgs {
    pub sku_id: String,
    #[arg(long)]
    pub available_quantity: u32,
    #[arg(long)]
    pub total_quantity: u32,
    /// Days the seller needs before handing the item to the carrier.
    #[arg(long)]
    pub cross_docking_time: u32,
}

impl StockArgs {
    pub fn to_update(&self) -> StockUpdate {
        StockUpdate::new(
            self.available_quantity,
            self.total_quantity,
            self.cross_docking_time,
        )
    }
}

impl CliConfig {
    /// Loads the `--config` file (if any) and layers the CLI flags on top.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(environment) = self.environment {
            config.api.environment = environment;
        }
        if let Some(base_url) = &self.base_url {
            config.api.base_url = Some(base_url.clone());
        }
        if let Some(timeout) = self.timeout_seconds {
            config.api.timeout_seconds = Some(timeout);
        }
        if let Some(token) = &self.app_token {
            config.auth.app_token = Some(token.clone());
        }
        if let Some(token) = &self.auth_token {
            config.auth.auth_token = Some(token.clone());
        }

        Ok(config)
    }
}
