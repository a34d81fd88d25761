use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{TransactionFilter, TransactionStore};
use crate::error::AppError;
use crate::models::{CategoryCount, ProductTransaction};

/// Holds product transactions in memory. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionStore {
    records: Arc<RwLock<Vec<ProductTransaction>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ProductTransaction>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn delete_all(&self) -> Result<u64, AppError> {
        let mut records = self.records.write().await;
        let deleted = records.len() as u64;
        records.clear();
        Ok(deleted)
    }

    async fn insert_all(&self, records: Vec<ProductTransaction>) -> Result<u64, AppError> {
        let inserted = records.len() as u64;
        self.records.write().await.extend(records);
        Ok(inserted)
    }

    async fn find(
        &self,
        filter: &TransactionFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ProductTransaction>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| filter.matches(record))
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &TransactionFilter) -> Result<u64, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|record| filter.matches(record)).count() as u64)
    }

    async fn sum_price(&self, filter: &TransactionFilter) -> Result<f64, AppError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| filter.matches(record))
            .map(|record| record.price)
            .sum())
    }

    async fn count_by_category(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<CategoryCount>, AppError> {
        let records = self.records.read().await;
        let mut counts: Vec<CategoryCount> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for record in records.iter().filter(|record| filter.matches(record)) {
            match positions.get(record.category.as_str()) {
                Some(&position) => counts[position].count += 1,
                None => {
                    positions.insert(&record.category, counts.len());
                    counts.push(CategoryCount {
                        category: record.category.clone(),
                        count: 1,
                    });
                }
            }
        }

        Ok(counts)
    }
}
