//! ABI domain models and contracts
//!
//! This module defines the fragment, interface and result types of the
//! decoding pipeline, plus the traits the signature resolver is built on,
//! independent of the underlying implementation (alloy-dyn-abi, reqwest).

mod decoder;
mod interface;
mod signature;
mod tree;

pub use decoder::{DecodeResult, DecodedArgs, DecodedEventResult, EventLog, TreeSource};
pub use interface::{event_param_to_param, Fragment, FragmentKind, Interface};
pub use signature::{
    is_hex_signature, CacheKey, ResolveError, SignatureCache, SignatureCandidate, SignatureKind,
    SignatureSource,
};
pub use tree::TreeNode;
