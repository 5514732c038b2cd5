//! Vanity address search by rejection sampling

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use thiserror::Error;

use super::wallet::Wallet;
use crate::infrastructure::runtime::CancellationToken;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VanityError {
    #[error("`{0}` is not a hex pattern")]
    InvalidPattern(String),

    #[error("prefix and suffix together exceed 40 hex characters")]
    PatternTooLong,
}

/// Hex prefix and suffix an address must show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VanityPattern {
    prefix: String,
    suffix: String,
    case_sensitive: bool,
}

impl VanityPattern {
    pub fn new(prefix: &str, suffix: &str, case_sensitive: bool) -> Result<Self, VanityError> {
        let prefix = validate(prefix.strip_prefix("0x").unwrap_or(prefix))?;
        let suffix = validate(suffix)?;
        if prefix.len() + suffix.len() > 40 {
            return Err(VanityError::PatternTooLong);
        }

        let fold = |s: String| if case_sensitive { s } else { s.to_lowercase() };
        Ok(Self {
            prefix: fold(prefix),
            suffix: fold(suffix),
            case_sensitive,
        })
    }

    pub fn matches(&self, address: &Address) -> bool {
        let body = if self.case_sensitive {
            address.to_checksum(None).split_off(2)
        } else {
            hex::encode(address.as_slice())
        };
        body.starts_with(&self.prefix) && body.ends_with(&self.suffix)
    }

    /// Expected number of attempts per match
    pub fn difficulty(&self) -> f64 {
        let pattern = self.prefix.chars().chain(self.suffix.chars());
        pattern.fold(1.0, |acc, c| {
            if self.case_sensitive && c.is_ascii_alphabetic() {
                acc * 32.0
            } else {
                acc * 16.0
            }
        })
    }
}

fn validate(part: &str) -> Result<String, VanityError> {
    if part.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(part.to_string())
    } else {
        Err(VanityError::InvalidPattern(part.to_string()))
    }
}

/// Draw random keys until one matches, `max_tries` runs out, or `cancel` fires
pub fn search_for_matching_wallet(
    pattern: &VanityPattern,
    max_tries: Option<u64>,
    cancel: &CancellationToken,
) -> Option<Wallet> {
    let mut tries = 0u64;
    while max_tries.map_or(true, |max| tries < max) {
        if cancel.is_cancelled() {
            return None;
        }
        tries += 1;

        let signer = PrivateKeySigner::random();
        if pattern.matches(&signer.address()) {
            tracing::debug!(tries, "vanity match found");
            return Some(Wallet::from_signer(&signer));
        }
    }
    None
}
