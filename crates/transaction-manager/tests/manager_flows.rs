//! # Manager Flow Tests
//!
//! End-to-end write and read paths over the in-memory storage, with readers
//! holding real registered private keys.

use std::sync::{Arc, Once};

use channel_telemetry::{init_logging, TelemetryConfig};
use epk_decryption::EthereumPrivateKeyDecryptionProvider;
use shared_crypto::channel_hash;
use shared_types::{DecryptionParameters, TimestampBoundaries, CHANNEL_ENCRYPTION_METHOD};
use transaction_manager::test_utils::{clear_record, recipient, timestamped, DATA, PRIVATE_KEYS};
use transaction_manager::{
    DecryptionProvider, InMemoryDataAccess, ManualTimeSource, Pagination, TransactionManager,
    TransactionManagerApi, TransactionManagerConfig, TransactionManagerError,
};

const OTHER_DATA: &str = r#"{"attribut1":"foo","attribut2":"bar"}"#;

type SharedStorage = Arc<InMemoryDataAccess<ManualTimeSource>>;

static LOGGING: Once = Once::new();

fn storage() -> SharedStorage {
    LOGGING.call_once(|| {
        init_logging(&TelemetryConfig::from_env()).unwrap();
    });
    Arc::new(InMemoryDataAccess::with_time_source(ManualTimeSource::new(
        1_000,
    )))
}

fn reader(index: usize) -> Arc<dyn DecryptionProvider> {
    Arc::new(
        EthereumPrivateKeyDecryptionProvider::new(Some(DecryptionParameters::ecies(
            PRIVATE_KEYS[index],
        )))
        .unwrap(),
    )
}

fn manager(
    storage: &SharedStorage,
    provider: Option<Arc<dyn DecryptionProvider>>,
) -> TransactionManager<SharedStorage> {
    TransactionManager::new(
        Arc::clone(storage),
        provider,
        TransactionManagerConfig::default(),
    )
}

fn data_of(
    transactions: &[Option<shared_types::TimestampedTransaction>],
) -> Vec<Option<String>> {
    transactions
        .iter()
        .map(|tx| tx.as_ref().and_then(|tx| tx.transaction.data.clone()))
        .collect()
}

#[tokio::test]
async fn test_every_recipient_reads_the_channel() {
    let storage = storage();
    let writer = manager(&storage, Some(reader(0)));
    let channel_id = channel_hash(DATA).unwrap();

    writer
        .persist_encrypted_transaction(DATA, &channel_id, &[recipient(0), recipient(2)], &[])
        .await
        .unwrap();
    storage.time_source().advance(1);
    writer
        .persist_encrypted_transaction(OTHER_DATA, &channel_id, &[], &[])
        .await
        .unwrap();

    for index in [0, 2] {
        let read = manager(&storage, Some(reader(index)))
            .get_transactions_by_channel_id(&channel_id, None)
            .await
            .unwrap();
        assert_eq!(
            data_of(&read.transactions),
            vec![Some(DATA.to_string()), Some(OTHER_DATA.to_string())]
        );
        assert_eq!(
            read.encryption_method.as_deref(),
            Some(CHANNEL_ENCRYPTION_METHOD)
        );
    }
}

#[tokio::test]
async fn test_outsider_sees_only_ignored_records() {
    let storage = storage();
    let writer = manager(&storage, Some(reader(0)));
    let channel_id = channel_hash(DATA).unwrap();
    writer
        .persist_encrypted_transaction(DATA, &channel_id, &[recipient(0)], &[])
        .await
        .unwrap();
    writer
        .persist_encrypted_transaction(OTHER_DATA, &channel_id, &[], &[])
        .await
        .unwrap();

    let read = manager(&storage, Some(reader(1)))
        .get_transactions_by_channel_id(&channel_id, None)
        .await
        .unwrap();
    assert_eq!(read.transactions, vec![None, None]);
    let first_reason = read.ignored_transactions[0].as_ref().unwrap().reason.clone();
    assert!(first_reason.starts_with("Impossible to decrypt the channel key from this transaction"));
    // The channel never got a key, so the later record is read as a first one.
    assert_eq!(
        read.ignored_transactions[1].as_ref().unwrap().reason,
        "the properties \"encryptionMethod\" and \"keys\" are needed to compute the channel key"
    );

    let error = manager(&storage, Some(reader(1)))
        .persist_encrypted_transaction(OTHER_DATA, &channel_id, &[], &[])
        .await
        .unwrap_err();
    assert_eq!(
        error,
        TransactionManagerError::ChannelKeyUnavailable(channel_id)
    );
}

#[tokio::test]
async fn test_no_provider_reads_encrypted_channel() {
    let storage = storage();
    let channel_id = channel_hash(DATA).unwrap();
    manager(&storage, Some(reader(0)))
        .persist_encrypted_transaction(DATA, &channel_id, &[recipient(0)], &[])
        .await
        .unwrap();

    let read = manager(&storage, None)
        .get_transactions_by_channel_id(&channel_id, None)
        .await
        .unwrap();
    assert_eq!(
        read.ignored_transactions[0].as_ref().unwrap().reason,
        "No decryption provider given"
    );
    assert!(read.encryption_method.is_none());
}

#[tokio::test]
async fn test_injected_records_do_not_break_the_channel() {
    let storage = storage();
    let writer = manager(&storage, Some(reader(0)));
    let channel_id = channel_hash(DATA).unwrap();
    writer
        .persist_encrypted_transaction(DATA, &channel_id, &[recipient(0)], &[])
        .await
        .unwrap();

    // Someone outside the channel appends a clear record and a new key set.
    storage.insert_raw(&channel_id, timestamped(clear_record(OTHER_DATA), 1_001), &[]);
    let intruder = manager(&storage, Some(reader(1)));
    let intruder_first =
        transaction_manager::TransactionsFactory::create_encrypted_transaction_in_new_channel(
            OTHER_DATA,
            &[recipient(1)],
        )
        .unwrap();
    storage.insert_raw(&channel_id, timestamped(intruder_first, 1_002), &[]);

    writer
        .persist_encrypted_transaction(OTHER_DATA, &channel_id, &[], &[])
        .await
        .unwrap();

    let read = writer
        .get_transactions_by_channel_id(&channel_id, None)
        .await
        .unwrap();
    assert_eq!(
        data_of(&read.transactions),
        vec![
            Some(DATA.to_string()),
            None,
            None,
            Some(OTHER_DATA.to_string())
        ]
    );
    assert_eq!(
        read.ignored_transactions[1].as_ref().unwrap().reason,
        "Clear transactions are not allowed in encrypted channel"
    );
    assert_eq!(
        read.ignored_transactions[2].as_ref().unwrap().reason,
        "the properties \"encryptionMethod\" and \"keys\" have already been given for this channel"
    );

    // The intruder cannot hijack the channel either.
    let error = intruder
        .persist_encrypted_transaction(OTHER_DATA, &channel_id, &[], &[])
        .await
        .unwrap_err();
    assert_eq!(
        error,
        TransactionManagerError::ChannelKeyUnavailable(channel_id)
    );
}

#[tokio::test]
async fn test_topic_pages_mix_clear_and_encrypted_channels() {
    let storage = storage();
    let writer = manager(&storage, Some(reader(0)));
    let topic = vec!["invoices".to_string()];
    let clear_id = channel_hash(OTHER_DATA).unwrap();
    let encrypted_id = channel_hash(DATA).unwrap();

    writer
        .persist_transaction(OTHER_DATA, &clear_id, &topic)
        .await
        .unwrap();
    storage.time_source().advance(10);
    writer
        .persist_encrypted_transaction(DATA, &encrypted_id, &[recipient(0)], &topic)
        .await
        .unwrap();

    let page = writer
        .get_channels_by_topic("invoices", None, Some(Pagination::new(1, 10).unwrap()))
        .await
        .unwrap();
    assert_eq!(page.channel_ids, vec![encrypted_id.clone(), clear_id.clone()]);
    assert_eq!(page.pagination.unwrap().total, 2);

    // Without a key the encrypted channel no longer starts with a valid record.
    let outsider_page = manager(&storage, Some(reader(1)))
        .get_channels_by_topic("invoices", None, Some(Pagination::new(1, 10).unwrap()))
        .await
        .unwrap();
    assert_eq!(outsider_page.channel_ids, vec![clear_id.clone()]);

    // The content hash topic finds the channel too.
    let by_hash = writer
        .get_channels_by_multiple_topics(
            &[encrypted_id.clone()],
            Some(TimestampBoundaries {
                from: Some(1_005),
                to: None,
            }),
            None,
        )
        .await
        .unwrap();
    assert_eq!(by_hash.channel_ids, vec![encrypted_id]);
}
