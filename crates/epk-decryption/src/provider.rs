use async_trait::async_trait;
use parking_lot::RwLock;
use shared_crypto::{address_from_private_key, decrypt};
use shared_types::{
    DecryptionParameters, DecryptionProvider, DecryptionProviderError, EncryptedData,
    EncryptionMethod, Identity, IdentityType,
};
use zeroize::Zeroizing;

use crate::errors::EpkDecryptionError;

const SUPPORTED_METHODS: [EncryptionMethod; 1] = [EncryptionMethod::Ecies];
const SUPPORTED_IDENTITY_TYPES: [IdentityType; 1] = [IdentityType::EthereumAddress];

struct RegisteredKey {
    /// Lowercase `0x` address.
    address: String,
    private_key: Zeroizing<String>,
}

/// Decryption provider holding secp256k1 private keys by Ethereum address.
///
/// Keys are kept in registration order. Registering a key for an address
/// that is already known replaces the previous key.
#[derive(Default)]
pub struct EthereumPrivateKeyDecryptionProvider {
    keys: RwLock<Vec<RegisteredKey>>,
}

impl EthereumPrivateKeyDecryptionProvider {
    /// Create a provider, optionally registering a first key.
    pub fn new(
        decryption_parameters: Option<DecryptionParameters>,
    ) -> Result<Self, EpkDecryptionError> {
        let provider = Self::default();
        if let Some(params) = decryption_parameters {
            provider.add_decryption_parameters(&params)?;
        }
        Ok(provider)
    }

    /// Register an ECIES private key. Returns the identity it unlocks.
    pub fn add_decryption_parameters(
        &self,
        params: &DecryptionParameters,
    ) -> Result<Identity, EpkDecryptionError> {
        if params.method != EncryptionMethod::Ecies {
            return Err(EpkDecryptionError::UnsupportedMethod(
                params.method.to_string(),
            ));
        }
        let address = address_from_private_key(&params.key)
            .map_err(|_| EpkDecryptionError::InvalidPrivateKey)?;

        let mut keys = self.keys.write();
        keys.retain(|registered| registered.address != address);
        keys.push(RegisteredKey {
            address: address.clone(),
            private_key: Zeroizing::new(params.key.clone()),
        });
        tracing::debug!("[epk-decryption] Registered key for {}", address);
        Ok(Identity::ethereum_address(address))
    }

    /// Forget the key of `identity`. Unknown identities are a no-op.
    pub fn remove_registered_identity(&self, identity: &Identity) -> Result<(), EpkDecryptionError> {
        ensure_supported(identity)?;
        let address = identity.value.to_lowercase();
        self.keys
            .write()
            .retain(|registered| registered.address != address);
        Ok(())
    }

    pub fn clear_all_registered_identities(&self) {
        self.keys.write().clear();
    }

    /// Identities with a registered key, in registration order.
    pub fn get_all_registered_identities(&self) -> Vec<Identity> {
        self.keys
            .read()
            .iter()
            .map(|registered| Identity::ethereum_address(registered.address.clone()))
            .collect()
    }

    fn private_key_of(&self, identity: &Identity) -> Option<Zeroizing<String>> {
        let address = identity.value.to_lowercase();
        self.keys
            .read()
            .iter()
            .find(|registered| registered.address == address)
            .map(|registered| registered.private_key.clone())
    }
}

fn ensure_supported(identity: &Identity) -> Result<(), EpkDecryptionError> {
    if SUPPORTED_IDENTITY_TYPES.contains(&identity.identity_type) {
        Ok(())
    } else {
        Err(EpkDecryptionError::UnsupportedIdentityType(
            identity.identity_type,
        ))
    }
}

#[async_trait]
impl DecryptionProvider for EthereumPrivateKeyDecryptionProvider {
    fn supported_methods(&self) -> &[EncryptionMethod] {
        &SUPPORTED_METHODS
    }

    fn supported_identity_types(&self) -> &[IdentityType] {
        &SUPPORTED_IDENTITY_TYPES
    }

    async fn is_identity_registered(&self, identity: &Identity) -> bool {
        identity.identity_type == IdentityType::EthereumAddress
            && self.private_key_of(identity).is_some()
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
        if identity.identity_type != IdentityType::EthereumAddress {
            return Err(DecryptionProviderError::UnsupportedIdentityType(
                identity.identity_type,
            ));
        }
        let private_key = self
            .private_key_of(identity)
            .ok_or_else(|| DecryptionProviderError::IdentityNotRegistered(identity.value.clone()))?;

        decrypt(encrypted, &DecryptionParameters::ecies(private_key.as_str()))
            .map_err(|e| DecryptionProviderError::Decryption(e.to_string()))
    }
}
