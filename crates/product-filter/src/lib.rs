//! Product filtering and catalog aggregation.
//!
//! The engine is a pure function of a catalog snapshot and a set of criteria. It
//! never mutates the snapshot: filtered products are owned copies.

pub mod criteria;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod metadata;
pub mod words;

pub use criteria::FilterCriteria;
pub use engine::{FilterEngine, ProductResponse};
pub use error::FilterError;
pub use metadata::FilterMetadata;
pub use words::WordRanking;
