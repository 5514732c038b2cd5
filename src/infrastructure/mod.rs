//! Infrastructure layer - implementations behind the domain types
//!
//! This layer contains:
//! - ABI parsing, calldata/event decoding and signature lookup (alloy-dyn-abi, reqwest)
//! - Transaction decoding, wallets and vanity search (alloy consensus and signers)
//! - A thread pool for racing CPU-bound searches

pub mod abi;
pub mod ethereum;
pub mod runtime;
