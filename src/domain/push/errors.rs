//! Push Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VapidError {
    #[error("VAPID public key is not valid base64url: {0}")]
    PublicKeyEncoding(String),

    #[error("VAPID public key must be a 65-byte uncompressed P-256 point, got {0} bytes")]
    PublicKeyLength(usize),

    #[error("VAPID public key must start with 0x04 (uncompressed point), got {0:#04x}")]
    PublicKeyFormat(u8),

    #[error("VAPID private key is not valid base64url: {0}")]
    PrivateKeyEncoding(String),

    #[error("VAPID private key must be a 32-byte P-256 scalar, got {0} bytes")]
    PrivateKeyLength(usize),

    #[error("VAPID private key is not a valid P-256 scalar")]
    PrivateKeyScalar,

    #[error("VAPID subject must be a mailto:, https: or http: URI, got {0:?}")]
    InvalidSubject(String),
}
