//! Read paths.

use futures::future::join_all;
use shared_types::{ChannelId, TimestampBoundaries, TimestampedTransaction};

use super::TransactionManager;
use crate::domain::entities::{CleanedChannel, ReturnGetChannels, ReturnGetTransactions};
use crate::domain::errors::TransactionManagerError;
use crate::domain::value_objects::Pagination;
use crate::ports::outbound::{ChannelsByTopic, DataAccess};

/// A channel selected by a multi-channel read, before cleaning.
struct Candidate {
    channel_id: ChannelId,
    latest: u64,
    records: Vec<TimestampedTransaction>,
}

impl<D: DataAccess> TransactionManager<D> {
    pub(crate) async fn read_channel(
        &self,
        channel_id: &str,
        timestamp_boundaries: Option<TimestampBoundaries>,
    ) -> Result<ReturnGetTransactions, TransactionManagerError> {
        if channel_id.is_empty() {
            return Err(TransactionManagerError::MissingChannelId);
        }
        let channel = self
            .data_access
            .get_transactions_by_channel_id(channel_id, timestamp_boundaries)
            .await
            .map_err(|e| {
                tracing::warn!("[tx-manager] Channel read failed for {}: {}", channel_id, e);
                e
            })?;

        let cleaned = self
            .channel_parser
            .decrypt_and_clean_channel(channel_id, &channel.transactions)
            .await;
        tracing::debug!(
            "[tx-manager] Channel {}: {}/{} valid records",
            channel_id,
            cleaned.valid_count(),
            channel.transactions.len()
        );

        Ok(ReturnGetTransactions {
            transactions: cleaned.transactions,
            ignored_transactions: cleaned.ignored_transactions,
            encryption_method: cleaned.encryption_method,
            data_access_meta: channel.meta,
        })
    }

    /// Select, order, clean and page the channels of a topic read.
    ///
    /// Channels are ordered by their latest record inside `updated_between`,
    /// newest first, ties by id. Each one is cleaned over all its records.
    /// When paginated, only channels whose first record is valid are counted.
    pub(crate) async fn clean_channels(
        &self,
        channels: ChannelsByTopic,
        updated_between: Option<TimestampBoundaries>,
        pagination: Option<Pagination>,
    ) -> ReturnGetChannels {
        let ChannelsByTopic {
            transactions,
            mut meta,
        } = channels;

        let mut candidates: Vec<Candidate> = transactions
            .into_iter()
            .filter_map(|(channel_id, records)| {
                let latest = records
                    .iter()
                    .map(|record| record.timestamp)
                    .filter(|&ts| updated_between.map_or(true, |window| window.contains(ts)))
                    .max()?;
                Some(Candidate {
                    channel_id,
                    latest,
                    records,
                })
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.latest
                .cmp(&a.latest)
                .then_with(|| a.channel_id.cmp(&b.channel_id))
        });

        let cleaned: Vec<CleanedChannel> = if self.config.parallel_channel_parsing {
            join_all(candidates.iter().map(|candidate| {
                self.channel_parser
                    .decrypt_and_clean_channel(&candidate.channel_id, &candidate.records)
            }))
            .await
        } else {
            let mut cleaned = Vec::with_capacity(candidates.len());
            for candidate in &candidates {
                cleaned.push(
                    self.channel_parser
                        .decrypt_and_clean_channel(&candidate.channel_id, &candidate.records)
                        .await,
                );
            }
            cleaned
        };

        let mut ordered: Vec<(ChannelId, CleanedChannel)> = candidates
            .into_iter()
            .map(|candidate| candidate.channel_id)
            .zip(cleaned)
            .collect();

        let pagination_meta = pagination.map(|pagination| {
            ordered.retain(|(_, channel)| channel.starts_with_valid_transaction());
            let page_meta = pagination.meta(ordered.len());
            let (start, end) = pagination.bounds(ordered.len());
            ordered.truncate(end);
            ordered.drain(..start);
            page_meta
        });

        let channel_ids: Vec<ChannelId> = ordered.iter().map(|(id, _)| id.clone()).collect();
        meta.retain_channels(&channel_ids);
        tracing::debug!("[tx-manager] Returning {} channel(s)", channel_ids.len());

        ReturnGetChannels {
            channels: ordered.into_iter().collect(),
            channel_ids,
            data_access_meta: meta,
            pagination: pagination_meta,
        }
    }
}
