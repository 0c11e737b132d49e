use crate::domain::model::{Page, PriceUpdate, SellerItem, StockUpdate};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Remote operations for managing the items a seller offers on the
/// marketplace (`/sellerItems`).
///
/// Every failure to complete a call surfaces as
/// [`SdkError::Service`](crate::utils::error::SdkError::Service).
#[async_trait]
pub trait SellerItemsResource: Send + Sync {
    /// `GET /sellerItems/status/selling`: items already available for sale.
    async fn get_available_seller_items(&self, page: Page) -> Result<Vec<SellerItem>>;

    /// `GET /sellerItems/{skuId}`
    async fn get_seller_item_by_sku_id(&self, sku_id: &str) -> Result<SellerItem>;

    /// `GET /sellerItems/skuOrigin/{skuOrigin}`
    async fn get_seller_item_by_sku_origin(&self, sku_origin: &str) -> Result<SellerItem>;

    /// `GET /sellerItems`: every item sold by the seller.
    async fn get_seller_items(&self, page: Page) -> Result<Vec<SellerItem>>;

    /// `POST /sellerItems`: associates a catalog product with the seller.
    async fn post_seller_item(&self, item: &SellerItem) -> Result<bool>;

    /// `PUT /sellerItems/{skuId}/prices`
    async fn update_price(&self, sku_id: &str, prices: &PriceUpdate) -> Result<bool>;

    /// `PUT /sellerItems/{skuId}/stock`
    async fn update_stock(&self, sku_id: &str, stock: &StockUpdate) -> Result<bool>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn app_token(&self) -> Option<&str>;
    fn auth_token(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
    fn user_agent(&self) -> Option<&str>;
    fn extra_headers(&self) -> &HashMap<String, String>;
}
