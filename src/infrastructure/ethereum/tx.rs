//! Signed transaction decoding and sender recovery

use alloy::consensus::transaction::SignerRecoverable;
use alloy::consensus::{Signed, Transaction, TxEip1559, TxEip2930, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::{Decodable2718, Eip2718Error};
use alloy::primitives::{Address, Bytes, B256, U256};
use thiserror::Error;

/// Raw transaction could not be decoded
#[derive(Debug, Error)]
pub enum TxDecodeError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid transaction envelope: {0}")]
    Envelope(#[from] Eip2718Error),

    #[error("{0} trailing bytes after the transaction")]
    TrailingBytes(usize),

    #[error("unsupported transaction type {0:#04x}")]
    UnsupportedType(u8),

    #[error("failed to recover sender: {0}")]
    Recovery(String),
}

macro_rules! with_inner {
    ($self:expr, $tx:ident => $body:expr) => {
        match $self {
            DecodedTransaction::Legacy(signed) => {
                let $tx = signed.tx();
                $body
            }
            DecodedTransaction::Eip2930(signed) => {
                let $tx = signed.tx();
                $body
            }
            DecodedTransaction::Eip1559(signed) => {
                let $tx = signed.tx();
                $body
            }
        }
    };
}

/// The three supported envelope types
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedTransaction {
    Legacy(Signed<TxLegacy>),
    Eip2930(Signed<TxEip2930>),
    Eip1559(Signed<TxEip1559>),
}

impl DecodedTransaction {
    /// Human-readable envelope name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Legacy(_) => "legacy",
            Self::Eip2930(_) => "eip2930",
            Self::Eip1559(_) => "eip1559",
        }
    }

    pub fn tx_type(&self) -> u8 {
        match self {
            Self::Legacy(_) => 0,
            Self::Eip2930(_) => 1,
            Self::Eip1559(_) => 2,
        }
    }

    pub fn hash(&self) -> B256 {
        match self {
            Self::Legacy(tx) => *tx.hash(),
            Self::Eip2930(tx) => *tx.hash(),
            Self::Eip1559(tx) => *tx.hash(),
        }
    }

    pub fn nonce(&self) -> u64 {
        with_inner!(self, tx => tx.nonce())
    }

    pub fn to(&self) -> Option<Address> {
        with_inner!(self, tx => tx.to())
    }

    pub fn value(&self) -> U256 {
        with_inner!(self, tx => tx.value())
    }

    pub fn input(&self) -> &Bytes {
        with_inner!(self, tx => tx.input())
    }

    pub fn chain_id(&self) -> Option<u64> {
        with_inner!(self, tx => tx.chain_id())
    }

    /// Labelled fields for display
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("type", self.kind().to_string()),
            ("hash", self.hash().to_string()),
        ];
        with_inner!(self, tx => push_fields(tx, &mut fields));
        fields
    }
}

fn push_fields<T: Transaction>(tx: &T, fields: &mut Vec<(&'static str, String)>) {
    fields.push((
        "chainId",
        tx.chain_id().map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
    ));
    fields.push(("nonce", tx.nonce().to_string()));
    fields.push(("gasLimit", tx.gas_limit().to_string()));

    match tx.gas_price() {
        Some(price) => fields.push(("gasPrice", price.to_string())),
        None => {
            fields.push(("maxFeePerGas", tx.max_fee_per_gas().to_string()));
            fields.push((
                "maxPriorityFeePerGas",
                tx.max_priority_fee_per_gas().unwrap_or_default().to_string(),
            ));
        }
    }

    fields.push((
        "to",
        tx.to()
            .map(|to| to.to_checksum(None))
            .unwrap_or_else(|| "(contract creation)".into()),
    ));
    fields.push(("value", tx.value().to_string()));
    fields.push(("data", tx.input().to_string()));
    if let Some(list) = tx.access_list() {
        fields.push(("accessList", format!("{} entries", list.0.len())));
    }
}

/// A decoded transaction and the address that signed it
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTx {
    pub tx: DecodedTransaction,
    pub sender: Address,
}

/// Decode a raw signed transaction and recover its sender
pub fn decode_tx(raw: &str) -> Result<DecodedTx, TxDecodeError> {
    let raw = raw.trim();
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(digits)?;

    let mut buf = bytes.as_slice();
    let envelope = TxEnvelope::decode_2718(&mut buf)?;
    if !buf.is_empty() {
        return Err(TxDecodeError::TrailingBytes(buf.len()));
    }

    let sender = envelope
        .recover_signer()
        .map_err(|e| TxDecodeError::Recovery(e.to_string()))?;

    let tx = match envelope {
        TxEnvelope::Legacy(tx) => DecodedTransaction::Legacy(tx),
        TxEnvelope::Eip2930(tx) => DecodedTransaction::Eip2930(tx),
        TxEnvelope::Eip1559(tx) => DecodedTransaction::Eip1559(tx),
        other => return Err(TxDecodeError::UnsupportedType(other.tx_type().into())),
    };
    tracing::debug!(kind = tx.kind(), %sender, "decoded transaction");

    Ok(DecodedTx { tx, sender })
}
