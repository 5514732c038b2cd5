//! ABI infrastructure - alloy-based parsing, decoding and signature lookup

mod combinations;
mod decoder;
mod error;
mod event;
mod parser;
mod resolver;
mod tree;

pub use combinations::{combinations, Combinations};
pub use decoder::{decode_across_interfaces, decode_calldata};
pub use error::{EventError, ParseError, TreeError};
pub use event::{decode_event, try_decode_with_fragment};
pub use parser::{parse_interface, parse_interface_with};
pub use resolver::{
    candidate_interfaces, derive_sig_hash, FourByteClient, MemorySignatureCache,
    SignatureResolver, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS,
};
pub use tree::{build_tree, format_value};
