use async_trait::async_trait;
use log::{info, warn};

use crate::error::AppError;
use crate::models::ProductTransaction;
use crate::repositories::TransactionStore;
use crate::utils::helpers::load_transactions;

/// Somewhere a full list of seed records can be read from.
#[async_trait]
pub trait SeedSource: Send + Sync {
    /// A human readable name for logs, e.g. the URL.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<ProductTransaction>, AppError>;
}

/// Downloads the seed feed, a JSON array of records, over HTTP.
pub struct HttpSeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSeedSource {
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<ProductTransaction>, AppError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamFetch(format!(
                "{} responded with {}",
                self.url, status
            )));
        }

        Ok(response.json().await?)
    }
}

/// Reads seed records from a JSON file on disk.
pub struct FileSeedSource {
    path: String,
}

impl FileSeedSource {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

#[async_trait]
impl SeedSource for FileSeedSource {
    fn describe(&self) -> String {
        format!("file {}", self.path)
    }

    async fn fetch(&self) -> Result<Vec<ProductTransaction>, AppError> {
        load_transactions(&self.path)
            .map_err(|e| AppError::UpstreamFetch(format!("{}: {}", self.path, e)))
    }
}

/// Replaces every stored record with the records from `source`, returning
/// how many were inserted.
///
/// Runs in two phases, delete all then insert all, with no transaction
/// around them. Readers can observe an empty or partially filled store in
/// between, a failed insert leaves it that way, and concurrent calls may
/// interleave.
pub async fn initialize_collection(
    store: &dyn TransactionStore,
    source: &dyn SeedSource,
) -> Result<u64, AppError> {
    info!("Fetching seed data from {}", source.describe());
    let records = source.fetch().await?;
    check_records(&records)?;
    info!("Fetched {} seed records", records.len());

    let deleted = store.delete_all().await?;
    info!("Deleted {} existing records", deleted);

    let inserted = store.insert_all(records).await?;
    info!("Inserted {} seed records", inserted);

    Ok(inserted)
}

fn check_records(records: &[ProductTransaction]) -> Result<(), AppError> {
    if records.is_empty() {
        warn!("Seed source returned no records; the store will be left empty");
    }

    match records
        .iter()
        .find(|record| !(record.price >= 0.0 && record.price.is_finite()))
    {
        Some(record) => Err(AppError::UpstreamFetch(format!(
            "record {} has invalid price {}",
            record.id, record.price
        ))),
        None => Ok(()),
    }
}


#[cfg(test)]
mod tests {
    use std::{env, fs};

    use async_trait::async_trait;

    use super::test_utils::StaticSeedSource;
    use super::{initialize_collection, FileSeedSource, SeedSource};
    use crate::error::AppError;
    use crate::models::{CategoryCount, ProductTransaction};
    use crate::repositories::test_utils::record;
    use crate::repositories::{InMemoryTransactionStore, TransactionFilter, TransactionStore};

    /// Accepts deletes but fails every insert.
    struct BrokenInsertStore(InMemoryTransactionStore);

    #[async_trait]
    impl TransactionStore for BrokenInsertStore {
        async fn delete_all(&self) -> Result<u64, AppError> {
            self.0.delete_all().await
        }

        async fn insert_all(&self, _records: Vec<ProductTransaction>) -> Result<u64, AppError> {
            Err(AppError::StoreWrite("insert rejected".to_string()))
        }

        async fn find(
            &self,
            filter: &TransactionFilter,
            skip: u64,
            limit: u64,
        ) -> Result<Vec<ProductTransaction>, AppError> {
            self.0.find(filter, skip, limit).await
        }

        async fn count(&self, filter: &TransactionFilter) -> Result<u64, AppError> {
            self.0.count(filter).await
        }

        async fn sum_price(&self, filter: &TransactionFilter) -> Result<f64, AppError> {
            self.0.sum_price(filter).await
        }

        async fn count_by_category(
            &self,
            filter: &TransactionFilter,
        ) -> Result<Vec<CategoryCount>, AppError> {
            self.0.count_by_category(filter).await
        }
    }

    #[tokio::test]
    async fn replaces_existing_records() {
        let store = InMemoryTransactionStore::with_records(vec![record(99, 1.0, "Old", true, 1, 1)]);
        let source = StaticSeedSource(Ok(vec![
            record(1, 10.0, "A", true, 3, 5),
            record(2, 20.0, "B", false, 3, 10),
        ]));

        let inserted = initialize_collection(&store, &source).await.unwrap();

        assert_eq!(inserted, 2);
        let stored = store.find(&TransactionFilter::default(), 0, 10).await.unwrap();
        let ids: Vec<i64> = stored.iter().map(|record| record.id).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_store_untouched() {
        let store = InMemoryTransactionStore::with_records(vec![record(99, 1.0, "Old", true, 1, 1)]);
        let source = StaticSeedSource(Err(AppError::UpstreamFetch("unreachable".to_string())));

        let result = initialize_collection(&store, &source).await;

        assert_eq!(result, Err(AppError::UpstreamFetch("unreachable".to_string())));
        assert_eq!(store.count(&TransactionFilter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn negative_price_is_malformed_feed() {
        let store = InMemoryTransactionStore::new();
        let source = StaticSeedSource(Ok(vec![record(7, -1.0, "A", true, 3, 5)]));

        let result = initialize_collection(&store, &source).await;

        assert!(matches!(result, Err(AppError::UpstreamFetch(_))));
    }

    #[tokio::test]
    async fn failed_insert_leaves_store_empty() {
        let inner = InMemoryTransactionStore::with_records(vec![record(99, 1.0, "Old", true, 1, 1)]);
        let store = BrokenInsertStore(inner.clone());
        let source = StaticSeedSource(Ok(vec![record(1, 10.0, "A", true, 3, 5)]));

        let result = initialize_collection(&store, &source).await;

        assert_eq!(result, Err(AppError::StoreWrite("insert rejected".to_string())));
        assert_eq!(inner.count(&TransactionFilter::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_feed_clears_store() {
        let store = InMemoryTransactionStore::with_records(vec![record(99, 1.0, "Old", true, 1, 1)]);

        let inserted = initialize_collection(&store, &StaticSeedSource(Ok(Vec::new())))
            .await
            .unwrap();

        assert_eq!(inserted, 0);
        assert_eq!(store.count(&TransactionFilter::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_file_is_upstream_error() {
        let source = FileSeedSource::new("/definitely/not/here/seed.json");

        assert!(matches!(source.fetch().await, Err(AppError::UpstreamFetch(_))));
    }

    #[tokio::test]
    async fn malformed_file_is_upstream_error() {
        let path = env::temp_dir().join("product-dashboard-malformed-seed.json");
        fs::write(&path, "{ not json").unwrap();

        let result = FileSeedSource::new(path.to_str().unwrap()).fetch().await;
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(AppError::UpstreamFetch(_))));
    }
}
