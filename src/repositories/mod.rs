//! Storage for product transactions.
//!
//! [TransactionStore] is implemented over MongoDB for deployments and over a
//! plain vector for tests and database-less runs. Both must agree on the
//! semantics of [TransactionFilter].
mod memory_repository;
mod transaction_repository;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{CategoryCount, MonthIndex, PriceBand, ProductTransaction};
use crate::utils::helpers::parse_leading_number;

pub use memory_repository::InMemoryTransactionStore;
pub use transaction_repository::MongoTransactionStore;

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Removes every record and returns how many were removed.
    async fn delete_all(&self) -> Result<u64, AppError>;

    /// Appends `records` and returns how many were inserted.
    async fn insert_all(&self, records: Vec<ProductTransaction>) -> Result<u64, AppError>;

    /// Returns up to `limit` matches after skipping the first `skip`, in
    /// insertion order.
    async fn find(
        &self,
        filter: &TransactionFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ProductTransaction>, AppError>;

    async fn count(&self, filter: &TransactionFilter) -> Result<u64, AppError>;

    /// Sum of `price` over the matches, 0 when nothing matches.
    async fn sum_price(&self, filter: &TransactionFilter) -> Result<f64, AppError>;

    /// Number of matches per distinct category.
    async fn count_by_category(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<CategoryCount>, AppError>;
}

/// Conditions a record must meet. Unset fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Month of `dateOfSale`, any year.
    pub month: Option<MonthIndex>,
    /// Case-insensitive substring of title or description, or an exact
    /// price equal to the term's leading number (0 when it has none).
    pub search: Option<String>,
    pub sold: Option<bool>,
    pub price_band: Option<PriceBand>,
}

impl TransactionFilter {
    pub fn for_month(month: MonthIndex) -> Self {
        Self {
            month: Some(month),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sold(mut self, sold: bool) -> Self {
        self.sold = Some(sold);
        self
    }

    pub fn with_price_band(mut self, band: PriceBand) -> Self {
        self.price_band = Some(band);
        self
    }

    /// The price a search term is compared against.
    pub fn search_price(term: &str) -> f64 {
        parse_leading_number(term)
    }

    pub fn matches(&self, record: &ProductTransaction) -> bool {
        if let Some(month) = self.month {
            if !month.contains(&record.date_of_sale) {
                return false;
            }
        }

        if let Some(term) = &self.search {
            let needle = term.to_lowercase();
            let text_match = record.title.to_lowercase().contains(&needle)
                || record.description.to_lowercase().contains(&needle);
            if !text_match && record.price != Self::search_price(term) {
                return false;
            }
        }

        if let Some(sold) = self.sold {
            if record.sold != sold {
                return false;
            }
        }

        self.price_band.map_or(true, |band| band.contains(record.price))
    }
}
