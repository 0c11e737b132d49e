pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::{toml_config::TomlConfig, Environment};
pub use crate::core::{client::HttpSellerItemsClient, memory::InMemorySellerItems};
pub use domain::model::{Page, PriceUpdate, SellerItem, StockUpdate, MAX_PAGE_LIMIT};
pub use domain::ports::{ConfigProvider, SellerItemsResource};
pub use utils::error::{Result, SdkError, ServiceError, ServiceErrorKind};
