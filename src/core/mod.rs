pub mod client;
pub mod memory;

pub use crate::domain::model::{Page, PriceUpdate, SellerItem, StockUpdate};
pub use crate::domain::ports::{ConfigProvider, SellerItemsResource};
pub use crate::utils::error::Result;
