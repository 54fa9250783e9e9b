// ABOUTME: Dimension resolver - maps source attributes onto warehouse surrogate keys
// ABOUTME: Pure and deterministic; the partitioning rule is pluggable behind a trait

use chrono::Datelike;

use super::error::ResolutionError;
use crate::models::{DimensionKeys, SourceRecord};

/// Maps a source record onto the pre-seeded dimension tables.
///
/// Implementations must be pure: same record in, same keys out, no I/O.
/// A record that cannot be mapped is rejected with a `ResolutionError`
/// rather than given a key that doesn't exist in the dimensions.
pub trait DimensionResolver {
    fn resolve(&self, record: &SourceRecord) -> Result<DimensionKeys, ResolutionError>;
}

/// The fixed partitioning rule the warehouse dimensions were seeded for:
/// `category_key = (product_id mod categories) + 1`,
/// `country_key = (customer_id mod countries) + 1`,
/// `date_key = yyyymmdd(occurred_at)`.
///
/// Lives behind `DimensionResolver` so a live dimension lookup can replace
/// it without touching the orchestrator.
#[derive(Debug, Clone)]
pub struct ModuloResolver {
    categories: i64,
    countries: i64,
}

impl ModuloResolver {
    pub fn new(categories: i64, countries: i64) -> Self {
        assert!(categories > 0 && countries > 0, "dimension sizes must be positive");
        Self {
            categories,
            countries,
        }
    }
}

impl Default for ModuloResolver {
    fn default() -> Self {
        Self::new(
            crate::schema::CATEGORIES.len() as i64,
            crate::schema::COUNTRIES.len() as i64,
        )
    }
}

impl DimensionResolver for ModuloResolver {
    fn resolve(&self, record: &SourceRecord) -> Result<DimensionKeys, ResolutionError> {
        if record.product_id < 0 {
            return Err(ResolutionError::new(
                record.row_id,
                format!("negative product_id {}", record.product_id),
            ));
        }
        if record.customer_id < 0 {
            return Err(ResolutionError::new(
                record.row_id,
                format!("negative customer_id {}", record.customer_id),
            ));
        }

        let date = record.occurred_at.date();
        let date_key = date.year() * 10_000 + (date.month() as i32) * 100 + date.day() as i32;

        Ok(DimensionKeys {
            date_key,
            category_key: ((record.product_id % self.categories) + 1) as i32,
            country_key: ((record.customer_id % self.countries) + 1) as i32,
        })
    }
}
