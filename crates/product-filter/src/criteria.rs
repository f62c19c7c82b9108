use catalog_common::model::Product;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::FilterError;

/// Optional filter parameters, deserialized straight from the query string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub size: Option<String>,
    pub highlight: Option<String>,
}

impl FilterCriteria {
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.min_price.is_some_and(|min| min < Decimal::ZERO) {
            return Err(FilterError::invalid("minPrice cannot be less than 0."));
        }
        if self.max_price.is_some_and(|max| max < Decimal::ZERO) {
            return Err(FilterError::invalid("maxPrice cannot be less than 0."));
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(FilterError::invalid(
                    "minPrice cannot be greater than maxPrice.",
                ));
            }
        }
        Ok(())
    }

    /// Price bounds are inclusive; an empty size string matches everything.
    pub fn matches(&self, product: &Product) -> bool {
        let above_min = self.min_price.map_or(true, |min| product.price >= min);
        let below_max = self.max_price.map_or(true, |max| product.price <= max);
        let has_size = match self.size.as_deref() {
            None | Some("") => true,
            Some(size) => product.sizes.iter().any(|s| s == size),
        };
        above_min && below_max && has_size
    }

    /// Highlight terms in the order given, with empty entries dropped.
    pub fn highlight_terms(&self) -> Vec<&str> {
        self.highlight
            .as_deref()
            .map(|raw| raw.split(',').filter(|t| !t.is_empty()).collect())
            .unwrap_or_default()
    }
}
