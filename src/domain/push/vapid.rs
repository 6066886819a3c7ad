//! VAPID 密钥 (RFC 8292)
//!
//! 私钥为 P-256 原始 32 字节标量（base64url），公钥为 65 字节未压缩 SEC1 点。
//! `web_push::VapidSignatureBuilder::from_base64()` 需要的正是这种私钥格式。

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use p256::ecdsa::SigningKey;
use p256::elliptic_curve::rand_core::OsRng;

use super::errors::VapidError;

/// VAPID 密钥对
#[derive(Clone)]
pub struct VapidKeys {
    public_key_b64: String,
    private_key_b64: String,
}

impl VapidKeys {
    /// 生成新的密钥对（启动缺少密钥时作为示例输出）
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        let public_bytes = signing_key.verifying_key().to_encoded_point(false);

        Self {
            public_key_b64: BASE64URL.encode(public_bytes.as_bytes()),
            private_key_b64: BASE64URL.encode(&signing_key.to_bytes()[..]),
        }
    }

    /// 从 base64url 字符串构造并校验
    ///
    /// 容忍尾部的 `=` 填充。
    pub fn from_base64url(public_key: &str, private_key: &str) -> Result<Self, VapidError> {
        let public_key = public_key.trim().trim_end_matches('=');
        let private_key = private_key.trim().trim_end_matches('=');

        let pub_bytes = BASE64URL
            .decode(public_key)
            .map_err(|e| VapidError::PublicKeyEncoding(e.to_string()))?;
        if pub_bytes.len() != 65 {
            return Err(VapidError::PublicKeyLength(pub_bytes.len()));
        }
        if pub_bytes[0] != 0x04 {
            return Err(VapidError::PublicKeyFormat(pub_bytes[0]));
        }

        let priv_bytes = BASE64URL
            .decode(private_key)
            .map_err(|e| VapidError::PrivateKeyEncoding(e.to_string()))?;
        if priv_bytes.len() != 32 {
            return Err(VapidError::PrivateKeyLength(priv_bytes.len()));
        }
        SigningKey::from_slice(&priv_bytes).map_err(|_| VapidError::PrivateKeyScalar)?;

        Ok(Self {
            public_key_b64: public_key.to_string(),
            private_key_b64: private_key.to_string(),
        })
    }

    /// 公钥（浏览器端的 `applicationServerKey`）
    pub fn public_key(&self) -> &str {
        &self.public_key_b64
    }

    pub fn private_key(&self) -> &str {
        &self.private_key_b64
    }
}

impl std::fmt::Debug for VapidKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VapidKeys")
            .field("public_key", &self.public_key_b64)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// VAPID 联系人标识（JWT `sub` claim）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VapidSubject(String);

impl VapidSubject {
    pub fn parse(subject: impl Into<String>) -> Result<Self, VapidError> {
        let subject = subject.into();
        let trimmed = subject.trim();
        let valid = match trimmed.split_once(':') {
            Some(("mailto", rest)) => !rest.is_empty(),
            Some(("https" | "http", rest)) => rest.starts_with("//") && rest.len() > 2,
            _ => false,
        };
        if !valid {
            return Err(VapidError::InvalidSubject(subject));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VapidSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 推送发送方的身份：联系人 + 密钥对
#[derive(Debug, Clone)]
pub struct VapidDetails {
    pub subject: VapidSubject,
    pub keys: VapidKeys,
}

impl VapidDetails {
    pub fn new(subject: VapidSubject, keys: VapidKeys) -> Self {
        Self { subject, keys }
    }
}
