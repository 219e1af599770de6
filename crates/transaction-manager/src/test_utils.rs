//! Fixtures shared by unit and integration tests.
//!
//! Three secp256k1 identities with known addresses, fake decryption
//! providers and record builders.

use async_trait::async_trait;
use shared_crypto::decrypt;
use shared_types::multiformat::{deserialize_encrypted_data, serialize_identity};
use shared_types::{
    ChannelKey, DecryptionParameters, DecryptionProvider, DecryptionProviderError, EncryptedData,
    EncryptionMethod, EncryptionParameters, Identity, IdentityType, PersistedTransaction,
    TimestampedTransaction,
};

use crate::domain::factory::TransactionsFactory;

pub const DATA: &str = r#"{"attribut1":"VALUE","attribut2":"value"}"#;

pub const PRIVATE_KEYS: [&str; 3] = [
    "0x04674d2e53e0e14653487d7323cc5f0a7959c83067f5654cafe4094bde90fa8a",
    "0x0906ff14227cead2b25811514302d57706e7d5013fcc40eca5985b216baeb998",
    "0x4025da5692759add08f98f4b056c41c71916a671cedc7584a80d73adc7fb43c0",
];

pub const PUBLIC_KEYS: [&str; 3] = [
    "299708c07399c9b28e9870c4e643742f65c94683f35d1b3fc05d0478344ee0cc5a6a5e23f78b5ff8c93a04254232b32350c8672d2873677060d5095184dad422",
    "9008306d319755055226827c22f4b95552c799bae7af0e99780cf1b5500d9d1ecbdbcf6f27cdecc72c97fef3703c54b717bca613894212e0b2525cbb2d1161b9",
    "cf4a1d0bbef8bf0e3fa479a9def565af1b22ea6266294061bfb430701b54a83699e3d47bf52e9f0224dcc29a02721810f1f624f1f70ea3cc5f1fb752cfed379d",
];

pub const ADDRESSES: [&str; 3] = [
    "0xaf083f77f1ffd54218d91491afd06c9296eac3ce",
    "0x740fc87bd3f41d07d23a01dec90623ebc5fed9d6",
    "0x818b6337657a23f58581715fc610577292e521d0",
];

const METHODS: [EncryptionMethod; 1] = [EncryptionMethod::Ecies];
const IDENTITY_TYPES: [IdentityType; 1] = [IdentityType::EthereumAddress];

/// Provider holding the private keys of a subset of the fixture identities.
pub struct FakeDecryptionProvider {
    keys: Vec<(String, String)>,
}

impl FakeDecryptionProvider {
    pub fn with_identities(indices: &[usize]) -> Self {
        let keys = indices
            .iter()
            .map(|&i| (ADDRESSES[i].to_string(), PRIVATE_KEYS[i].to_string()))
            .collect();
        Self { keys }
    }

    fn private_key_for(&self, identity: &Identity) -> Option<&str> {
        self.keys
            .iter()
            .find(|(address, _)| address.eq_ignore_ascii_case(&identity.value))
            .map(|(_, key)| key.as_str())
    }
}

#[async_trait]
impl DecryptionProvider for FakeDecryptionProvider {
    fn supported_methods(&self) -> &[EncryptionMethod] {
        &METHODS
    }

    fn supported_identity_types(&self) -> &[IdentityType] {
        &IDENTITY_TYPES
    }

    async fn is_identity_registered(&self, identity: &Identity) -> bool {
        self.private_key_for(identity).is_some()
    }

    async fn decrypt(
        &self,
        encrypted: &EncryptedData,
        identity: &Identity,
    ) -> Result<String, DecryptionProviderError> {
        if encrypted.method != EncryptionMethod::Ecies {
            return Err(DecryptionProviderError::UnsupportedMethod {
                expected: EncryptionMethod::Ecies,
            });
        }
        let private_key = self
            .private_key_for(identity)
            .ok_or_else(|| DecryptionProviderError::IdentityNotRegistered(identity.value.clone()))?;
        decrypt(encrypted, &DecryptionParameters::ecies(private_key))
            .map_err(|e| DecryptionProviderError::Decryption(e.to_string()))
    }
}

/// Provider that claims every identity and fails every decryption.
pub struct FailingDecryptionProvider;

#[async_trait]
impl DecryptionProvider for FailingDecryptionProvider {
    fn supported_methods(&self) -> &[EncryptionMethod] {
        &METHODS
    }

    fn supported_identity_types(&self) -> &[IdentityType] {
        &IDENTITY_TYPES
    }

    async fn is_identity_registered(&self, _identity: &Identity) -> bool {
        true
    }

    async fn decrypt(
        &self,
        _encrypted: &EncryptedData,
        _identity: &Identity,
    ) -> Result<String, DecryptionProviderError> {
        Err(DecryptionProviderError::Decryption(
            "provider failure".to_string(),
        ))
    }
}

/// ECIES recipient for fixture identity `index`.
pub fn recipient(index: usize) -> EncryptionParameters {
    EncryptionParameters::ecies(PUBLIC_KEYS[index])
}

/// Multi-formatted identity of fixture identity `index`.
pub fn serialized_identity(index: usize) -> String {
    serialize_identity(&Identity::ethereum_address(ADDRESSES[index]))
}

pub fn clear_record(data: &str) -> PersistedTransaction {
    PersistedTransaction::clear(data)
}

/// First record of a new encrypted channel, readable by `recipients`.
pub fn encrypted_first_record(data: &str, recipients: &[usize]) -> PersistedTransaction {
    let recipients: Vec<_> = recipients.iter().map(|&i| recipient(i)).collect();
    TransactionsFactory::create_encrypted_transaction_in_new_channel(data, &recipients)
        .expect("fixture record")
}

/// Later record of an encrypted channel.
pub fn encrypted_record(data: &str, channel_key: &ChannelKey) -> PersistedTransaction {
    TransactionsFactory::create_encrypted_transaction(data, channel_key).expect("fixture record")
}

/// Channel key of `record`, unwrapped by fixture identity `index`.
pub fn recover_channel_key(record: &PersistedTransaction, index: usize) -> ChannelKey {
    let wrapped = record
        .keys
        .as_ref()
        .and_then(|keys| keys.get(&serialized_identity(index)))
        .expect("identity is a recipient");
    let wrapped = deserialize_encrypted_data(wrapped).expect("multi-formatted key");
    let key = decrypt(&wrapped, &DecryptionParameters::ecies(PRIVATE_KEYS[index]))
        .expect("recipient can unwrap");
    ChannelKey::aes256_gcm(key)
}

pub fn timestamped(transaction: PersistedTransaction, timestamp: u64) -> TimestampedTransaction {
    TimestampedTransaction::new(transaction, timestamp, None)
}

