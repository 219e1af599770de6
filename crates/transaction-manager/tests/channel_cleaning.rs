//! # Channel Cleaning Scenarios
//!
//! The channel parser against hand-built record lists.

use std::sync::Arc;

use shared_crypto::channel_hash;
use shared_types::{ChannelKey, ChannelType, PersistedTransaction, TimestampedTransaction};
use transaction_manager::test_utils::*;
use transaction_manager::ChannelParser;

const D: &str = r#"{"a":1}"#;

fn records(transactions: Vec<PersistedTransaction>) -> Vec<TimestampedTransaction> {
    transactions
        .into_iter()
        .enumerate()
        .map(|(i, tx)| timestamped(tx, i as u64))
        .collect()
}

#[tokio::test]
async fn test_single_clear_record() {
    let input = records(vec![clear_record(D)]);
    let cleaned = ChannelParser::default()
        .decrypt_and_clean_channel(&channel_hash(D).unwrap(), &input)
        .await;
    assert_eq!(cleaned.transactions, vec![Some(input[0].clone())]);
    assert_eq!(cleaned.ignored_transactions, vec![None]);
}

#[tokio::test]
async fn test_hash_mismatch_then_match() {
    let input = records(vec![clear_record(r#"{"b":2}"#), clear_record(D)]);
    let cleaned = ChannelParser::default()
        .decrypt_and_clean_channel(&channel_hash(D).unwrap(), &input)
        .await;

    assert_eq!(cleaned.transactions, vec![None, Some(input[1].clone())]);
    let ignored = cleaned.ignored_transactions[0].as_ref().unwrap();
    assert_eq!(
        ignored.reason,
        "as first transaction, the hash of the transaction do not match the channelId"
    );
    assert_eq!(ignored.transaction, input[0]);
    assert!(cleaned.ignored_transactions[1].is_none());
}

#[tokio::test]
async fn test_undecryptable_first_record() {
    let input = records(vec![encrypted_first_record(D, &[0, 1])]);
    let parser = ChannelParser::new(Some(Arc::new(FakeDecryptionProvider::with_identities(&[2]))));
    let cleaned = parser
        .decrypt_and_clean_channel(&channel_hash(D).unwrap(), &input)
        .await;
    assert!(cleaned.transactions[0].is_none());
    assert!(cleaned.ignored_transactions[0]
        .as_ref()
        .unwrap()
        .reason
        .starts_with("Impossible to decrypt the channel key from this transaction"));
}

#[tokio::test]
async fn test_type_lock_in_is_symmetric() {
    let channel_key = ChannelKey::aes256_gcm(shared_crypto::generate_32_buffer_key());
    let provider = Arc::new(FakeDecryptionProvider::with_identities(&[0]));
    let parser = ChannelParser::new(Some(provider));

    let clear_channel = records(vec![clear_record(D), encrypted_record(D, &channel_key)]);
    let cleaned = parser
        .decrypt_and_clean_channel(&channel_hash(D).unwrap(), &clear_channel)
        .await;
    assert_eq!(
        cleaned.ignored_transactions[1].as_ref().unwrap().reason,
        "Encrypted transactions are not allowed in clear channel"
    );

    let encrypted_channel = records(vec![encrypted_first_record(D, &[0]), clear_record(D)]);
    let cleaned = parser
        .decrypt_and_clean_channel(&channel_hash(D).unwrap(), &encrypted_channel)
        .await;
    assert_eq!(
        cleaned.ignored_transactions[1].as_ref().unwrap().reason,
        "Clear transactions are not allowed in encrypted channel"
    );
}

#[tokio::test]
async fn test_mixed_shape_records_are_rejected() {
    let mut mixed = clear_record(D);
    mixed.encrypted_data = Some("04abcd".to_string());
    let empty = PersistedTransaction {
        data: Some(String::new()),
        ..Default::default()
    };
    let input = records(vec![mixed, empty, clear_record(D)]);
    let cleaned = ChannelParser::default()
        .decrypt_and_clean_channel(&channel_hash(D).unwrap(), &input)
        .await;

    let reasons: Vec<_> = cleaned
        .ignored_transactions
        .iter()
        .map(|ignored| ignored.as_ref().map(|i| i.reason.as_str()))
        .collect();
    assert_eq!(
        reasons,
        vec![
            Some("only the property \"data\" is allowed for clear transaction"),
            Some("Transaction must have a property \"data\" or \"encryptedData\""),
            None,
        ]
    );
}

#[tokio::test]
async fn test_wire_records_are_cleaned() {
    // Records as they come off the wire, with unknown fields and key order
    // that differs from the channel id's canonical form.
    let raw = r#"[
        {"transaction": {"data": "{\"b\":1,\"a\":2}"}, "timestamp": 10, "state": "confirmed"},
        {"transaction": {"data": "{\"c\":3}", "extra": true}, "timestamp": 11}
    ]"#;
    let input: Vec<TimestampedTransaction> = serde_json::from_str(raw).unwrap();
    let cleaned = ChannelParser::default()
        .decrypt_and_clean_channel(&channel_hash(r#"{"a":2,"b":1}"#).unwrap(), &input)
        .await;
    assert_eq!(cleaned.valid_count(), 2);
}

#[tokio::test]
async fn test_key_inference_without_provider() {
    let input = records(vec![encrypted_first_record(D, &[0])]);
    let info = ChannelParser::default()
        .get_channel_type_and_channel_key(&channel_hash(D).unwrap(), &input)
        .await;
    assert_eq!(info.channel_type, ChannelType::Encrypted);
    assert!(info.channel_key.is_none());
}

#[tokio::test]
async fn test_empty_optional_fields_count_as_absent() {
    let mut with_method = clear_record(D);
    with_method.encryption_method = Some(String::new());
    let mut with_hash = clear_record(D);
    with_hash.hash = Some(String::new());
    let input = records(vec![with_method, with_hash]);
    let cleaned = ChannelParser::default()
        .decrypt_and_clean_channel(&channel_hash(D).unwrap(), &input)
        .await;
    assert_eq!(cleaned.valid_count(), 2);

    let mut first = encrypted_first_record(D, &[0]);
    first.encryption_method = Some(String::new());
    let parser = ChannelParser::new(Some(Arc::new(FakeDecryptionProvider::with_identities(&[0]))));
    let cleaned = parser
        .decrypt_and_clean_channel(&channel_hash(D).unwrap(), &records(vec![first]))
        .await;
    assert_eq!(
        cleaned.ignored_transactions[0].as_ref().unwrap().reason,
        "the properties \"encryptionMethod\" and \"keys\" are needed to compute the channel key"
    );
}
