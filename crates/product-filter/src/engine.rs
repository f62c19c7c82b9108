use catalog_common::model::Product;
use serde::Serialize;
use tracing::{debug, warn};

use crate::criteria::FilterCriteria;
use crate::error::FilterError;
use crate::highlight::highlight;
use crate::metadata::FilterMetadata;
use crate::words::WordRanking;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductResponse {
    pub products: Vec<Product>,
    #[serde(rename = "filterMetaData")]
    pub filter_metadata: FilterMetadata,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterEngine {
    ranking: WordRanking,
}

impl FilterEngine {
    pub fn new(ranking: WordRanking) -> Self {
        Self { ranking }
    }

    pub fn ranking(&self) -> WordRanking {
        self.ranking
    }

    /// Filter and highlight a catalog snapshot, and summarize the full snapshot.
    ///
    /// Criteria are validated before the catalog is read. An empty catalog
    /// yields zero-valued metadata rather than an error.
    pub fn apply(
        &self,
        catalog: &[Product],
        criteria: &FilterCriteria,
    ) -> Result<ProductResponse, FilterError> {
        criteria.validate()?;

        let terms = criteria.highlight_terms();
        let products: Vec<Product> = catalog
            .iter()
            .filter(|p| criteria.matches(p))
            .map(|p| {
                let mut copy = p.clone();
                if !terms.is_empty() {
                    copy.description = highlight(&p.description, &terms);
                }
                copy
            })
            .collect();

        let filter_metadata = match FilterMetadata::from_catalog(catalog, self.ranking) {
            Ok(metadata) => metadata,
            Err(FilterError::EmptyCatalog) => {
                warn!("catalog is empty, returning zero-valued metadata");
                FilterMetadata::empty()
            }
            Err(e) => return Err(e),
        };

        debug!(
            catalog = catalog.len(),
            matched = products.len(),
            highlight_terms = terms.len(),
            "filtered catalog"
        );

        Ok(ProductResponse {
            products,
            filter_metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn sample_catalog() -> Vec<Product> {
        vec![
            Product {
                title: "Product1".to_string(),
                price: Decimal::from(50),
                sizes: vec!["S".to_string(), "M".to_string()],
                description: "Test description 1".to_string(),
            },
            Product {
                title: "Product2".to_string(),
                price: Decimal::from(100),
                sizes: vec!["L".to_string(), "XL".to_string()],
                description: "Test description 2".to_string(),
            },
        ]
    }

    fn criteria(
        min: Option<i64>,
        max: Option<i64>,
        size: Option<&str>,
        highlight: Option<&str>,
    ) -> FilterCriteria {
        FilterCriteria {
            min_price: min.map(Decimal::from),
            max_price: max.map(Decimal::from),
            size: size.map(str::to_string),
            highlight: highlight.map(str::to_string),
        }
    }

    #[test]
    fn filters_by_price_and_size_with_full_catalog_metadata() {
        let catalog = sample_catalog();
        let response = FilterEngine::default()
            .apply(&catalog, &criteria(Some(60), Some(120), Some("L"), Some("description")))
            .unwrap();

        assert_eq!(response.products.len(), 1);
        assert_eq!(response.products[0].title, "Product2");
        assert_eq!(
            response.products[0].description,
            "Test <em>description</em> 2"
        );

        let metadata = &response.filter_metadata;
        assert_eq!(metadata.min_price, Decimal::from(50));
        assert_eq!(metadata.max_price, Decimal::from(100));
        assert_eq!(metadata.sizes, vec!["L", "M", "S", "XL"]);
    }

    #[test]
    fn no_criteria_returns_every_product_in_order() {
        let catalog = sample_catalog();
        let response = FilterEngine::default()
            .apply(&catalog, &FilterCriteria::default())
            .unwrap();
        assert_eq!(response.products, catalog);
    }

    #[test]
    fn nothing_matching_is_an_empty_list_with_unchanged_metadata() {
        let catalog = sample_catalog();
        let engine = FilterEngine::default();
        let unfiltered = engine.apply(&catalog, &FilterCriteria::default()).unwrap();
        let response = engine
            .apply(&catalog, &criteria(Some(150), Some(200), None, None))
            .unwrap();
        assert!(response.products.is_empty());
        assert_eq!(response.filter_metadata, unfiltered.filter_metadata);
    }

    #[test]
    fn invalid_criteria_fail_before_filtering() {
        let catalog = sample_catalog();
        let err = FilterEngine::default()
            .apply(&catalog, &criteria(Some(60), Some(50), None, None))
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgument(_)));

        let err = FilterEngine::default()
            .apply(&catalog, &criteria(Some(-1), None, None, None))
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgument(_)));
    }

    #[test]
    fn highlighting_does_not_touch_the_catalog() {
        let catalog = sample_catalog();
        let before = catalog.clone();
        let response = FilterEngine::default()
            .apply(&catalog, &criteria(None, None, None, Some("TEST")))
            .unwrap();
        assert_eq!(response.products[0].description, "<em>Test</em> description 1");
        assert_eq!(catalog, before);
    }

    #[test]
    fn repeated_highlight_term_nests() {
        let catalog = sample_catalog();
        let response = FilterEngine::default()
            .apply(
                &catalog,
                &criteria(None, Some(50), None, Some("description,description")),
            )
            .unwrap();
        assert_eq!(
            response.products[0].description,
            "Test <em><em>description</em></em> 1"
        );
    }

    #[test]
    fn empty_highlight_entries_leave_descriptions_alone() {
        let catalog = sample_catalog();
        let response = FilterEngine::default()
            .apply(&catalog, &criteria(None, None, None, Some(",,")))
            .unwrap();
        assert_eq!(response.products, catalog);
    }

    #[test]
    fn metadata_words_use_the_configured_ranking() {
        let catalog = sample_catalog();
        let response = FilterEngine::new(WordRanking::new(0, 3))
            .apply(&catalog, &criteria(Some(100), None, None, None))
            .unwrap();
        assert_eq!(
            response.filter_metadata.most_common_words,
            vec!["description", "test", "1"]
        );
    }

    #[test]
    fn empty_catalog_yields_zero_metadata() {
        let response = FilterEngine::default()
            .apply(&[], &FilterCriteria::default())
            .unwrap();
        assert!(response.products.is_empty());
        assert_eq!(response.filter_metadata, FilterMetadata::empty());
    }

    #[test]
    fn response_uses_wire_field_names() {
        let catalog = sample_catalog();
        let response = FilterEngine::default()
            .apply(&catalog, &FilterCriteria::default())
            .unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["products"][1]["title"], "Product2");
        assert_eq!(value["filterMetaData"]["maxPrice"].as_f64(), Some(100.0));
        assert_eq!(value["filterMetaData"]["sizes"][3], "XL");
    }
}
