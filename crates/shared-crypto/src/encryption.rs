//! Method-dispatching encryption helpers over [`EncryptionParameters`] and
//! [`DecryptionParameters`].

use crate::address::address_from_public_key;
use crate::ecies::{ecies_decrypt, ecies_encrypt};
use crate::symmetric::{aes256_gcm_decrypt, aes256_gcm_encrypt};
use crate::CryptoError;
use shared_types::{
    DecryptionParameters, EncryptedData, EncryptionMethod, EncryptionParameters, Identity,
};

/// Encrypt `data` with the recipient's parameters.
pub fn encrypt(data: &str, params: &EncryptionParameters) -> Result<EncryptedData, CryptoError> {
    let value = match params.method {
        EncryptionMethod::Ecies => ecies_encrypt(&params.key, data)?,
        EncryptionMethod::Aes256Gcm => aes256_gcm_encrypt(data, &params.key)?,
        EncryptionMethod::Aes256Cbc => {
            return Err(CryptoError::UnsupportedMethod(EncryptionMethod::Aes256Cbc))
        }
    };
    Ok(EncryptedData {
        method: params.method,
        value,
    })
}

/// Decrypt `encrypted`. The parameters' method must match the data's.
pub fn decrypt(
    encrypted: &EncryptedData,
    params: &DecryptionParameters,
) -> Result<String, CryptoError> {
    if encrypted.method != params.method {
        return Err(CryptoError::MethodMismatch {
            expected: encrypted.method,
            actual: params.method,
        });
    }
    match encrypted.method {
        EncryptionMethod::Ecies => ecies_decrypt(&params.key, &encrypted.value),
        EncryptionMethod::Aes256Gcm => aes256_gcm_decrypt(&encrypted.value, &params.key),
        EncryptionMethod::Aes256Cbc => {
            Err(CryptoError::UnsupportedMethod(EncryptionMethod::Aes256Cbc))
        }
    }
}

/// Identity that owns the recipient key. ECIES only.
pub fn identity_from_encryption_params(
    params: &EncryptionParameters,
) -> Result<Identity, CryptoError> {
    match params.method {
        EncryptionMethod::Ecies => Ok(Identity::ethereum_address(address_from_public_key(
            &params.key,
        )?)),
        other => Err(CryptoError::UnsupportedMethod(other)),
    }
}
