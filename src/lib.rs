//! Ethereum dapp developer tools
//!
//! Unit and base converters, ABI calldata/event/transaction decoders, an
//! argument encoder, contract address calculators and a vanity address
//! generator. The `dapptools` binary exposes each one as a subcommand.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod modules;
