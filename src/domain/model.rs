use crate::utils::error::Result;
use crate::utils::validation::validate_range;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest page the client will request in one call.
pub const MAX_PAGE_LIMIT: u32 = 50;

/// Association between a seller and a marketplace catalog SKU.
///
/// Every field is optional on the wire. Prices travel as decimal strings
/// (`"500.00"`); quantities are accepted either as JSON integers or as
/// numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerItem {
    /// The seller's own SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_origin: Option<String>,

    /// Catalog SKU on the marketplace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_price: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_u32"
    )]
    pub available_quantity: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_id: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_u32"
    )]
    pub total_quantity: Option<u32>,

    /// Days before the seller's stock can be dispatched.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_u32"
    )]
    pub cross_docking_time: Option<u32>,
}

impl SellerItem {
    pub fn new(sku_id: impl Into<String>, sku_origin: impl Into<String>) -> Self {
        Self {
            sku_id: Some(sku_id.into()),
            sku_origin: Some(sku_origin.into()),
            ..Self::default()
        }
    }

    pub fn with_prices(mut self, default_price: Decimal, sale_price: Decimal) -> Self {
        self.default_price = Some(default_price);
        self.sale_price = Some(sale_price);
        self
    }

    pub fn with_stock(mut self, available_quantity: u32, total_quantity: u32) -> Self {
        self.available_quantity = Some(available_quantity);
        self.total_quantity = Some(total_quantity);
        self
    }

    pub fn with_installment(mut self, installment_id: impl Into<String>) -> Self {
        self.installment_id = Some(installment_id.into());
        self
    }

    pub fn with_cross_docking_time(mut self, days: u32) -> Self {
        self.cross_docking_time = Some(days);
        self
    }

    pub fn apply_prices(&mut self, prices: &PriceUpdate) {
        self.default_price = Some(prices.default_price);
        self.sale_price = Some(prices.sale_price);
        // An update without an installment plan keeps the current one.
        if let Some(installment_id) = &prices.installment_id {
            self.installment_id = Some(installment_id.clone());
        }
    }

    pub fn apply_stock(&mut self, stock: &StockUpdate) {
        self.available_quantity = Some(stock.available_quantity);
        self.total_quantity = Some(stock.total_quantity);
        self.cross_docking_time = Some(stock.cross_docking_time);
    }
}

/// Body of `PUT /sellerItems/{skuId}/prices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    /// The "from" price.
    pub default_price: Decimal,
    /// The "for" price actually charged.
    pub sale_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_id: Option<String>,
}

impl PriceUpdate {
    pub fn new(default_price: Decimal, sale_price: Decimal) -> Self {
        Self {
            default_price,
            sale_price,
            installment_id: None,
        }
    }

    pub fn with_installment(mut self, installment_id: impl Into<String>) -> Self {
        self.installment_id = Some(installment_id.into());
        self
    }
}

/// Body of `PUT /sellerItems/{skuId}/stock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub available_quantity: u32,
    pub total_quantity: u32,
    pub cross_docking_time: u32,
}

impl StockUpdate {
    pub fn new(available_quantity: u32, total_quantity: u32, cross_docking_time: u32) -> Self {
        Self {
            available_quantity,
            total_quantity,
            cross_docking_time,
        }
    }
}

/// Offset/limit window for the listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: u32,
    limit: u32,
}

impl Page {
    pub fn new(offset: u32, limit: u32) -> Result<Self> {
        validate_range("limit", limit, 1, MAX_PAGE_LIMIT)?;
        Ok(Self { offset, limit })
    }

    pub fn first(limit: u32) -> Result<Self> {
        Self::new(0, limit)
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// The page that follows this one.
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
        }
    }

    pub(crate) fn query(&self) -> [(&'static str, String); 2] {
        [
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: MAX_PAGE_LIMIT,
        }
    }
}

mod lenient {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        Text(String),
    }

    pub fn opt_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrString::Number(n)) => Ok(Some(n)),
            Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(NumberOrString::Text(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid quantity: {:?}", s))),
        }
    }
}
