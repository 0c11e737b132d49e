use crate::config::DEFAULT_TIMEOUT_SECONDS;
use crate::core::{ConfigProvider, Page, PriceUpdate, SellerItem, SellerItemsResource, StockUpdate};
use crate::utils::error::{Result, SdkError, ServiceError, ServiceErrorKind};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub const APP_TOKEN_HEADER: &str = "nova-app-token";
pub const AUTH_TOKEN_HEADER: &str = "nova-auth-token";

const RESOURCE: &str = "sellerItems";

/// [`SellerItemsResource`] backed by the marketplace REST API.
#[derive(Debug, Clone)]
pub struct HttpSellerItemsClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Clone)]
pub struct HttpSellerItemsClientBuilder {
    base_url: String,
    app_token: Option<String>,
    auth_token: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
    headers: Vec<(String, String)>,
}

impl HttpSellerItemsClientBuilder {
    pub fn app_token(mut self, token: impl Into<String>) -> Self {
        self.app_token = Some(token.into());
        self
    }

    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Extra header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn build(self) -> Result<HttpSellerItemsClient> {
        let base_url = validate_url("base_url", &self.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                SdkError::InvalidConfigValueError {
                    field: "headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(header_name, header_value(name, value)?);
        }

        // Tokens go last so a stray extra header cannot shadow them.
        if let Some(token) = &self.app_token {
            headers.insert(APP_TOKEN_HEADER, secret_header_value("app_token", token)?);
        }
        if let Some(token) = &self.auth_token {
            headers.insert(AUTH_TOKEN_HEADER, secret_header_value("auth_token", token)?);
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("seller-items-sdk/{}", env!("CARGO_PKG_VERSION")));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| SdkError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        tracing::debug!(
            "Seller items client ready for {} (timeout {:?})",
            base_url,
            self.timeout
        );

        Ok(HttpSellerItemsClient { client, base_url })
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| SdkError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: "Not a valid HTTP header value".to_string(),
    })
}

fn secret_header_value(field: &str, value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value).map_err(|_| SdkError::InvalidConfigValueError {
        field: field.to_string(),
        value: "<redacted>".to_string(),
        reason: "Not a valid HTTP header value".to_string(),
    })?;
    header.set_sensitive(true);
    Ok(header)
}

/// Sku path segments must be non-empty and must not be `.` or `..`, which
/// URL normalisation would collapse into a different endpoint.
fn require_sku(field: &str, value: &str) -> Result<()> {
    match value.trim() {
        "" => Err(SdkError::service(
            ServiceErrorKind::Rejected,
            format!("{} must not be empty", field),
        )),
        "." | ".." => Err(SdkError::service(
            ServiceErrorKind::Rejected,
            format!("{} '{}' is not a valid path segment", field, value),
        )),
        _ => Ok(()),
    }
}

impl HttpSellerItemsClient {
    pub fn builder(base_url: impl Into<String>) -> HttpSellerItemsClientBuilder {
        HttpSellerItemsClientBuilder {
            base_url: base_url.into(),
            app_token: None,
            auth_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            user_agent: None,
            headers: Vec::new(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut builder = Self::builder(config.base_url())
            .timeout(Duration::from_secs(config.timeout_seconds()));

        if let Some(token) = config.app_token() {
            builder = builder.app_token(token);
        }
        if let Some(token) = config.auth_token() {
            builder = builder.auth_token(token);
        }
        if let Some(user_agent) = config.user_agent() {
            builder = builder.user_agent(user_agent);
        }
        for (name, value) in config.extra_headers() {
            builder = builder.header(name.clone(), value.clone());
        }

        builder.build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded `segments` to the base URL, keeping its path prefix.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| SdkError::ConfigError {
                message: format!("Base URL cannot carry a path: {}", self.base_url),
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("📡 {}: request failed: {}", operation, e);
            SdkError::from(e)
        })?;

        let status = response.status();
        tracing::debug!("📡 {}: API response status: {}", operation, status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_else(|e| {
            tracing::debug!("📡 {}: could not read error body: {}", operation, e);
            String::new()
        });
        let error = ServiceError::from_status(status.as_u16(), &body);
        tracing::warn!("📡 {}: {}", operation, error);
        Err(error.into())
    }

    async fn fetch_one<T: DeserializeOwned>(&self, operation: &str, url: Url) -> Result<T> {
        tracing::debug!("📡 {}: GET {}", operation, url);
        let response = self.send(operation, self.client.get(url)).await?;
        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!("📡 {}: undecodable response: {}", operation, e);
            SdkError::from(e)
        })
    }

    async fn fetch_page(&self, operation: &str, url: Url, page: Page) -> Result<Vec<SellerItem>> {
        tracing::debug!(
            "📡 {}: GET {} (offset {}, limit {})",
            operation,
            url,
            page.offset(),
            page.limit()
        );
        let request = self.client.get(url).query(&page.query());
        let response = self.send(operation, request).await?;
        let body = response.bytes().await?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let mut items: Vec<SellerItem> = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!("📡 {}: undecodable response: {}", operation, e);
            SdkError::from(e)
        })?;

        let limit = page.limit() as usize;
        if items.len() > limit {
            tracing::warn!(
                "📡 {}: service returned {} items for limit {}, truncating",
                operation,
                items.len(),
                limit
            );
            items.truncate(limit);
        }

        Ok(items)
    }

    async fn confirm(&self, operation: &str, request: RequestBuilder) -> Result<bool> {
        let response = self.send(operation, request).await?;
        tracing::info!("✅ {}: confirmed ({})", operation, response.status());
        Ok(true)
    }
}

#[async_trait]
impl SellerItemsResource for HttpSellerItemsClient {
    async fn get_available_seller_items(&self, page: Page) -> Result<Vec<SellerItem>> {
        let url = self.endpoint(&[RESOURCE, "status", "selling"])?;
        self.fetch_page("get_available_seller_items", url, page).await
    }

    async fn get_seller_item_by_sku_id(&self, sku_id: &str) -> Result<SellerItem> {
        require_sku("skuId", sku_id)?;
        let url = self.endpoint(&[RESOURCE, sku_id])?;
        self.fetch_one("get_seller_item_by_sku_id", url).await
    }

    async fn get_seller_item_by_sku_origin(&self, sku_origin: &str) -> Result<SellerItem> {
        require_sku("skuOrigin", sku_origin)?;
        let url = self.endpoint(&[RESOURCE, "skuOrigin", sku_origin])?;
        self.fetch_one("get_seller_item_by_sku_origin", url).await
    }

    async fn get_seller_items(&self, page: Page) -> Result<Vec<SellerItem>> {
        let url = self.endpoint(&[RESOURCE])?;
        self.fetch_page("get_seller_items", url, page).await
    }

    async fn post_seller_item(&self, item: &SellerItem) -> Result<bool> {
        let url = self.endpoint(&[RESOURCE])?;
        tracing::debug!("📡 post_seller_item: POST {}", url);
        self.confirm("post_seller_item", self.client.post(url).json(item))
            .await
    }

    async fn update_price(&self, sku_id: &str, prices: &PriceUpdate) -> Result<bool> {
        require_sku("skuId", sku_id)?;
        let url = self.endpoint(&[RESOURCE, sku_id, "prices"])?;
        tracing::debug!("📡 update_price: PUT {}", url);
        self.confirm("update_price", self.client.put(url).json(prices))
            .await
    }

    async fn update_stock(&self, sku_id: &str, stock: &StockUpdate) -> Result<bool> {
        require_sku("skuId", sku_id)?;
        let url = self.endpoint(&[RESOURCE, sku_id, "stock"])?;
        tracing::debug!("📡 update_stock: PUT {}", url);
        self.confirm("update_stock", self.client.put(url).json(stock))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpSellerItemsClient {
        HttpSellerItemsClient::builder(base).build().unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let c = client("https://sandbox.extra.com.br/api/v1");
        let url = c.endpoint(&[RESOURCE, "9001", "prices"]).unwrap();
        assert_eq!(url.as_str(), "https://sandbox.extra.com.br/api/v1/sellerItems/9001/prices");

        let c = client("https://sandbox.extra.com.br/api/v1/");
        let url = c.endpoint(&[RESOURCE]).unwrap();
        assert_eq!(url.as_str(), "https://sandbox.extra.com.br/api/v1/sellerItems");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let c = client("http://localhost:8080");
        let url = c.endpoint(&[RESOURCE, "skuOrigin", "A/B 1"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/sellerItems/skuOrigin/A%2FB%201");
    }

    #[test]
    fn test_builder_rejects_bad_input() {
        assert!(HttpSellerItemsClient::builder("not a url").build().is_err());
        assert!(HttpSellerItemsClient::builder("http://localhost")
            .app_token("bad\ntoken")
            .build()
            .is_err());
        assert!(HttpSellerItemsClient::builder("http://localhost")
            .header("bad header", "x")
            .build()
            .is_err());
    }

    #[tokio::test]
    async fn test_empty_sku_is_rejected_before_sending() {
        let c = client("http://127.0.0.1:1");
        let err = c.get_seller_item_by_sku_id(" ").await.unwrap_err();
        assert_eq!(err.service_kind(), Some(ServiceErrorKind::Rejected));
    }
}
