use std::collections::BTreeSet;

use catalog_common::model::Product;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::FilterError;
use crate::words::WordRanking;

/// Summary of the whole catalog, independent of any filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterMetadata {
    #[serde(with = "rust_decimal::serde::float")]
    pub min_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_price: Decimal,
    pub sizes: Vec<String>,
    pub most_common_words: Vec<String>,
}

impl FilterMetadata {
    /// Fails with [`FilterError::EmptyCatalog`] since an empty catalog has no price range.
    pub fn from_catalog(catalog: &[Product], ranking: WordRanking) -> Result<Self, FilterError> {
        let (min_price, max_price) = price_range(catalog).ok_or(FilterError::EmptyCatalog)?;
        Ok(Self {
            min_price,
            max_price,
            sizes: distinct_sizes(catalog),
            most_common_words: ranking
                .most_common_words(catalog.iter().map(|p| p.description.as_str())),
        })
    }

    /// Zero-valued metadata used when there is nothing to summarize.
    pub fn empty() -> Self {
        Self {
            min_price: Decimal::ZERO,
            max_price: Decimal::ZERO,
            sizes: Vec::new(),
            most_common_words: Vec::new(),
        }
    }
}

fn price_range(catalog: &[Product]) -> Option<(Decimal, Decimal)> {
    let mut prices = catalog.iter().map(|p| p.price);
    let first = prices.next()?;
    Some(prices.fold((first, first), |(min, max), price| {
        (min.min(price), max.max(price))
    }))
}

fn distinct_sizes(catalog: &[Product]) -> Vec<String> {
    catalog
        .iter()
        .flat_map(|p| p.sizes.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
