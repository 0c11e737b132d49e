use crate::core::{Page, PriceUpdate, SellerItem, SellerItemsResource, StockUpdate};
use crate::utils::error::{Result, SdkError, ServiceError, ServiceErrorKind};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct StoredItem {
    item: SellerItem,
    /// "selling" status on the marketplace.
    available: bool,
}

/// [`SellerItemsResource`] over an in-process map keyed by sku id.
///
/// Mirrors the service's observable behaviour closely enough for tests and
/// offline development: unknown SKUs are 404s, duplicate associations are
/// 409s, and [`set_offline`](Self::set_offline) makes every call fail as a
/// transport error.
#[derive(Debug, Default)]
pub struct InMemorySellerItems {
    items: Mutex<BTreeMap<String, StoredItem>>,
    offline: AtomicBool,
}

impl InMemorySellerItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an item. Items without a sku id are ignored.
    pub fn with_item(mut self, item: SellerItem, available: bool) -> Self {
        if let Some(sku_id) = item.sku_id.clone() {
            self.items
                .get_mut()
                .insert(sku_id, StoredItem { item, available });
        }
        self
    }

    pub async fn set_available(&self, sku_id: &str, available: bool) -> Result<()> {
        self.check_online()?;
        let mut items = self.items.lock().await;
        let stored = items.get_mut(sku_id).ok_or_else(|| not_found("skuId", sku_id))?;
        stored.available = available;
        Ok(())
    }

    /// Simulates losing the connection to the service.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SdkError::service(
                ServiceErrorKind::Transport,
                "connection refused (simulated)",
            ));
        }
        Ok(())
    }

    async fn page_of<F>(&self, page: Page, keep: F) -> Result<Vec<SellerItem>>
    where
        F: Fn(&StoredItem) -> bool + Send,
    {
        self.check_online()?;
        let items = self.items.lock().await;
        Ok(items
            .values()
            .filter(|stored| keep(stored))
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|stored| stored.item.clone())
            .collect())
    }
}

fn not_found(field: &str, value: &str) -> SdkError {
    ServiceError::new(
        ServiceErrorKind::NotFound,
        format!("no seller item with {} '{}'", field, value),
    )
    .with_status(404)
    .into()
}

fn rejected(status: u16, message: String) -> SdkError {
    ServiceError::new(ServiceErrorKind::Rejected, message)
        .with_status(status)
        .into()
}

#[async_trait]
impl SellerItemsResource for InMemorySellerItems {
    async fn get_available_seller_items(&self, page: Page) -> Result<Vec<SellerItem>> {
        self.page_of(page, |stored| stored.available).await
    }

    async fn get_seller_item_by_sku_id(&self, sku_id: &str) -> Result<SellerItem> {
        self.check_online()?;
        let items = self.items.lock().await;
        items
            .get(sku_id)
            .map(|stored| stored.item.clone())
            .ok_or_else(|| not_found("skuId", sku_id))
    }

    async fn get_seller_item_by_sku_origin(&self, sku_origin: &str) -> Result<SellerItem> {
        self.check_online()?;
        let items = self.items.lock().await;
        items
            .values()
            .find(|stored| stored.item.sku_origin.as_deref() == Some(sku_origin))
            .map(|stored| stored.item.clone())
            .ok_or_else(|| not_found("skuOrigin", sku_origin))
    }

    async fn get_seller_items(&self, page: Page) -> Result<Vec<SellerItem>> {
        self.page_of(page, |_| true).await
    }

    async fn post_seller_item(&self, item: &SellerItem) -> Result<bool> {
        self.check_online()?;

        let sku_id = match item.sku_id.as_deref().map(str::trim) {
            Some(sku_id) if !sku_id.is_empty() => sku_id.to_string(),
            _ => return Err(rejected(422, "skuId is required".to_string())),
        };

        let mut items = self.items.lock().await;
        if items.contains_key(&sku_id) {
            return Err(rejected(
                409,
                format!("sku '{}' is already associated with the seller", sku_id),
            ));
        }

        tracing::debug!("Associating sku {} with the seller", sku_id);
        let mut stored = item.clone();
        stored.sku_id = Some(sku_id.clone());
        items.insert(
            sku_id,
            StoredItem {
                item: stored,
                available: true,
            },
        );
        Ok(true)
    }

    async fn update_price(&self, sku_id: &str, prices: &PriceUpdate) -> Result<bool> {
        self.check_online()?;
        let mut items = self.items.lock().await;
        let stored = items.get_mut(sku_id).ok_or_else(|| not_found("skuId", sku_id))?;
        stored.item.apply_prices(prices);
        Ok(true)
    }

    async fn update_stock(&self, sku_id: &str, stock: &StockUpdate) -> Result<bool> {
        self.check_online()?;
        let mut items = self.items.lock().await;
        let stored = items.get_mut(sku_id).ok_or_else(|| not_found("skuId", sku_id))?;
        stored.item.apply_stock(stock);
        Ok(true)
    }
}
