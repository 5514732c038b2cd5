//! Ethereum infrastructure - transactions, keys and addresses via alloy

mod tx;
mod vanity;
mod wallet;

pub use tx::{decode_tx, DecodedTransaction, DecodedTx, TxDecodeError};
pub use vanity::{search_for_matching_wallet, VanityError, VanityPattern};
pub use wallet::{Wallet, WalletError};
