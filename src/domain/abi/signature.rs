//! Signature-hash lookup contracts
//!
//! The resolver talks to an external signature database through
//! [`SignatureSource`] and remembers answers in a [`SignatureCache`], so tests
//! can swap either side without touching the network.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hash namespace of a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureKind {
    /// 4-byte function or error selector
    Function,
    /// 32-byte event topic
    Event,
}

impl SignatureKind {
    /// Keyword prepended to bare text signatures of this kind
    pub fn default_keyword(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Event => "event",
        }
    }

    /// Hash length in bytes
    pub fn hash_len(self) -> usize {
        match self {
            Self::Function => 4,
            Self::Event => 32,
        }
    }
}

impl fmt::Display for SignatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_keyword())
    }
}

/// One row of the signature database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureCandidate {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    /// e.g. `transfer(address,uint256)`
    pub text_signature: String,
    /// e.g. `0xa9059cbb`
    pub hex_signature: String,
    pub bytes_signature: String,
}

/// Cache key: lowercased hash plus namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    hash: String,
    kind: SignatureKind,
}

impl CacheKey {
    /// Validate `hash` against the namespace and normalize it
    pub fn new(hash: &str, kind: SignatureKind) -> Result<Self, ResolveError> {
        let hash = hash.trim();
        if !is_hex_signature(hash, kind.hash_len()) {
            return Err(ResolveError::InvalidHash {
                hash: hash.to_string(),
                kind,
            });
        }
        Ok(Self {
            hash: hash.to_lowercase(),
            kind,
        })
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn kind(&self) -> SignatureKind {
        self.kind
    }
}

/// `0x` followed by exactly `len` bytes of hex
pub fn is_hex_signature(value: &str, len: usize) -> bool {
    let Some(digits) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) else {
        return false;
    };
    digits.len() == len * 2 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Errors from signature lookups
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid {kind} signature hash: {hash}")]
    InvalidHash { hash: String, kind: SignatureKind },

    #[error("signature lookup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("signature database returned HTTP {status} for {hash}")]
    Status { status: u16, hash: String },
}

/// External signature database
#[async_trait]
pub trait SignatureSource: Send + Sync {
    /// Every candidate registered for `hash`; an empty list means unknown
    async fn lookup(
        &self,
        hash: &str,
        kind: SignatureKind,
    ) -> Result<Vec<SignatureCandidate>, ResolveError>;
}

/// Storage for lookup answers
#[async_trait]
pub trait SignatureCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Option<Vec<SignatureCandidate>>;

    async fn put(&self, key: CacheKey, candidates: Vec<SignatureCandidate>);

    async fn has(&self, key: &CacheKey) -> bool {
        self.get(key).await.is_some()
    }
}
