use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single catalog entry as published by the remote source and echoed back to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "Title")]
    pub title: String,
    #[serde(alias = "Price", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(alias = "Sizes", default)]
    pub sizes: Vec<String>,
    #[serde(alias = "Description", default)]
    pub description: String,
}

/// Envelope served by the catalog source. `products` may be `null` upstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEnvelope {
    #[serde(alias = "Products", default)]
    pub products: Option<Vec<Product>>,
    #[serde(alias = "ApiKeys", default)]
    pub api_keys: Option<ApiKeys>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeys {
    #[serde(alias = "Primary", default)]
    pub primary: Option<String>,
    #[serde(alias = "Secondary", default)]
    pub secondary: Option<String>,
}
