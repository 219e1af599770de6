use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{
    ChannelId, PersistedTransaction, TimestampBoundaries, TimestampedTransaction, TransactionState,
};
use std::collections::{BTreeMap, BTreeSet};

use crate::adapters::time::SystemTimeSource;
use crate::ports::outbound::{
    ChannelTransactions, ChannelsByTopic, DataAccess, DataAccessError, PersistMeta, PersistResult,
    TimeSource,
};

struct StoredRecord {
    record: TimestampedTransaction,
    location: String,
}

#[derive(Default)]
struct Store {
    channels: BTreeMap<ChannelId, Vec<StoredRecord>>,
    topics: BTreeMap<String, BTreeSet<ChannelId>>,
    sequence: u64,
}

impl Store {
    fn append(
        &mut self,
        channel_id: &str,
        record: TimestampedTransaction,
        topics: &[String],
    ) -> String {
        self.sequence += 1;
        let location = format!("memory://{}/{}", channel_id, self.sequence);
        self.channels
            .entry(channel_id.to_string())
            .or_default()
            .push(StoredRecord {
                record,
                location: location.clone(),
            });
        for topic in topics {
            self.topics
                .entry(topic.clone())
                .or_default()
                .insert(channel_id.to_string());
        }
        location
    }

    fn channels_by_topics<'a>(
        &self,
        topics: impl IntoIterator<Item = &'a String>,
        updated_between: Option<TimestampBoundaries>,
    ) -> ChannelsByTopic {
        let channel_ids: BTreeSet<&ChannelId> = topics
            .into_iter()
            .filter_map(|topic| self.topics.get(topic))
            .flatten()
            .collect();

        let mut result = ChannelsByTopic::default();
        for channel_id in channel_ids {
            let Some(records) = self.channels.get(channel_id) else {
                continue;
            };
            let updated = updated_between.map_or(true, |window| {
                records.iter().any(|stored| window.contains(stored.record.timestamp))
            });
            if !updated {
                continue;
            }
            result.transactions.insert(
                channel_id.clone(),
                records.iter().map(|stored| stored.record.clone()).collect(),
            );
            result.meta.transactions_storage_location.insert(
                channel_id.clone(),
                records.iter().map(|stored| stored.location.clone()).collect(),
            );
        }
        result
    }
}

/// In-memory storage and topic index.
///
/// Records are confirmed as soon as they are appended and stamped by the
/// time source. Used by tests and embedders without a ledger.
pub struct InMemoryDataAccess<T: TimeSource = SystemTimeSource> {
    store: RwLock<Store>,
    time_source: T,
}

impl InMemoryDataAccess {
    pub fn new() -> Self {
        Self::with_time_source(SystemTimeSource)
    }
}

impl Default for InMemoryDataAccess {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> InMemoryDataAccess<T> {
    pub fn with_time_source(time_source: T) -> Self {
        Self {
            store: RwLock::new(Store::default()),
            time_source,
        }
    }

    pub fn time_source(&self) -> &T {
        &self.time_source
    }

    /// Append `record` as-is, bypassing the time source.
    ///
    /// Lets callers store records the manager would never build.
    pub fn insert_raw(
        &self,
        channel_id: &str,
        record: TimestampedTransaction,
        topics: &[String],
    ) -> String {
        self.store.write().append(channel_id, record, topics)
    }

    /// Number of stored channels.
    pub fn channel_count(&self) -> usize {
        self.store.read().channels.len()
    }
}

#[async_trait]
impl<T: TimeSource> DataAccess for InMemoryDataAccess<T> {
    async fn persist_transaction(
        &self,
        transaction: &PersistedTransaction,
        channel_id: &str,
        topics: &[String],
    ) -> Result<PersistResult, DataAccessError> {
        if channel_id.is_empty() {
            return Err(DataAccessError::InvalidRequest(
                "empty channel id".to_string(),
            ));
        }
        let timestamp = self.time_source.now();
        let record = TimestampedTransaction::new(
            transaction.clone(),
            timestamp,
            Some(TransactionState::Confirmed),
        );
        let storage_location = self.store.write().append(channel_id, record, topics);

        Ok(PersistResult {
            meta: PersistMeta {
                storage_location,
                topics: topics.to_vec(),
                timestamp,
            },
        })
    }

    async fn get_transactions_by_channel_id(
        &self,
        channel_id: &str,
        timestamp_boundaries: Option<TimestampBoundaries>,
    ) -> Result<ChannelTransactions, DataAccessError> {
        let store = self.store.read();
        let mut result = ChannelTransactions::default();
        let Some(records) = store.channels.get(channel_id) else {
            return Ok(result);
        };

        for stored in records.iter().filter(|stored| {
            timestamp_boundaries.map_or(true, |window| window.contains(stored.record.timestamp))
        }) {
            result.transactions.push(stored.record.clone());
            result
                .meta
                .transactions_storage_location
                .push(stored.location.clone());
        }
        Ok(result)
    }

    async fn get_channels_by_topic(
        &self,
        topic: &str,
        updated_between: Option<TimestampBoundaries>,
    ) -> Result<ChannelsByTopic, DataAccessError> {
        let topic = topic.to_string();
        Ok(self
            .store
            .read()
            .channels_by_topics(std::iter::once(&topic), updated_between))
    }

    async fn get_channels_by_multiple_topics(
        &self,
        topics: &[String],
        updated_between: Option<TimestampBoundaries>,
    ) -> Result<ChannelsByTopic, DataAccessError> {
        Ok(self.store.read().channels_by_topics(topics, updated_between))
    }
}
