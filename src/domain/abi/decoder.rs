//! Decoding results produced by the calldata and event decoders

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::{Event, Param};
use alloy_primitives::{Bytes, B256};

use super::interface::event_param_to_param;
use super::{Fragment, TreeNode};

/// A successful calldata decode
#[derive(Debug, Clone)]
pub struct DecodeResult {
    /// Decoded arguments, in parameter order
    pub values: Vec<DynSolValue>,
    /// The fragment whose re-encoding reproduced the calldata
    pub fragment: Fragment,
    /// 4-byte selector of `fragment`, `0x`-prefixed
    pub sighash: String,
}

/// Raw event log as found in a receipt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    pub topics: Vec<B256>,
    pub data: Bytes,
}

impl EventLog {
    pub fn new(topics: Vec<B256>, data: impl Into<Bytes>) -> Self {
        Self {
            topics,
            data: data.into(),
        }
    }
}

/// Event arguments, keyed by name when the fragment names them
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedArgs {
    /// Named arguments in declaration order; unnamed ones are left out
    Named(Vec<(String, DynSolValue)>),
    /// Every argument in declaration order
    Positional(Vec<DynSolValue>),
}

impl DecodedArgs {
    pub fn len(&self) -> usize {
        match self {
            Self::Named(args) => args.len(),
            Self::Positional(args) => args.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a named argument
    pub fn get(&self, name: &str) -> Option<&DynSolValue> {
        match self {
            Self::Named(args) => args.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            Self::Positional(_) => None,
        }
    }

    pub fn values(&self) -> Vec<&DynSolValue> {
        match self {
            Self::Named(args) => args.iter().map(|(_, v)| v).collect(),
            Self::Positional(args) => args.iter().collect(),
        }
    }
}

/// A successful event log decode
#[derive(Debug, Clone)]
pub struct DecodedEventResult {
    pub args: DecodedArgs,
    /// The event as it was decoded, with the indexed layout that matched
    pub fragment: Event,
    pub has_argument_names: bool,
    /// Canonical signature, e.g. `Transfer(address,address,uint256)`
    pub signature: String,
    /// Full signature, including `indexed` markers and parameter names
    pub full_signature: String,
}

impl DecodedEventResult {
    /// Parameters matching `args`, in the same order
    pub fn params(&self) -> Vec<Param> {
        self.fragment
            .inputs
            .iter()
            .filter(|p| !self.has_argument_names || !p.name.is_empty())
            .map(event_param_to_param)
            .collect()
    }

    pub fn values(&self) -> Vec<DynSolValue> {
        self.args.values().into_iter().cloned().collect()
    }
}

/// Builds display trees for decoded payloads
pub trait TreeSource {
    type Error;

    fn tree(&self) -> Result<Vec<TreeNode>, Self::Error>;
}
