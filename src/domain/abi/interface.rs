//! ABI fragments and the interfaces that hold them

use std::fmt;

use alloy_json_abi::{Constructor, Error, Event, EventParam, Fallback, Function, Param, Receive};
use alloy_primitives::{Selector, B256};

/// Kind tag of a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    Function,
    Event,
    Error,
    Constructor,
    Fallback,
    Receive,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Function => "function",
            Self::Event => "event",
            Self::Error => "error",
            Self::Constructor => "constructor",
            Self::Fallback => "fallback",
            Self::Receive => "receive",
        };
        f.write_str(name)
    }
}

/// One callable, loggable or constructible ABI element
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Function(Function),
    Event(Event),
    Error(Error),
    Constructor(Constructor),
    Fallback(Fallback),
    Receive(Receive),
}

impl Fragment {
    pub fn kind(&self) -> FragmentKind {
        match self {
            Self::Function(_) => FragmentKind::Function,
            Self::Event(_) => FragmentKind::Event,
            Self::Error(_) => FragmentKind::Error,
            Self::Constructor(_) => FragmentKind::Constructor,
            Self::Fallback(_) => FragmentKind::Fallback,
            Self::Receive(_) => FragmentKind::Receive,
        }
    }

    /// Fragment name; constructor, fallback and receive are unnamed
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Function(f) => Some(&f.name),
            Self::Event(e) => Some(&e.name),
            Self::Error(e) => Some(&e.name),
            Self::Constructor(_) | Self::Fallback(_) | Self::Receive(_) => None,
        }
    }

    /// Input parameters, with event parameters stripped of their `indexed` flag
    pub fn inputs(&self) -> Vec<Param> {
        match self {
            Self::Function(f) => f.inputs.clone(),
            Self::Event(e) => e.inputs.iter().map(event_param_to_param).collect(),
            Self::Error(e) => e.inputs.clone(),
            Self::Constructor(c) => c.inputs.clone(),
            Self::Fallback(_) | Self::Receive(_) => Vec::new(),
        }
    }

    /// 4-byte selector of a function or error
    pub fn selector(&self) -> Option<Selector> {
        match self {
            Self::Function(f) => Some(f.selector()),
            Self::Error(e) => Some(e.selector()),
            _ => None,
        }
    }

    /// 32-byte topic hash of a non-anonymous event
    pub fn topic(&self) -> Option<B256> {
        match self {
            Self::Event(e) if !e.anonymous => Some(e.selector()),
            _ => None,
        }
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> String {
        match self {
            Self::Function(f) => f.signature(),
            Self::Event(e) => e.signature(),
            Self::Error(e) => e.signature(),
            Self::Constructor(c) => {
                let types: Vec<String> = c
                    .inputs
                    .iter()
                    .map(|p| p.selector_type().into_owned())
                    .collect();
                format!("constructor({})", types.join(","))
            }
            Self::Fallback(_) => "fallback()".to_string(),
            Self::Receive(_) => "receive()".to_string(),
        }
    }
}

/// Drop the `indexed` flag so event inputs can share the plain parameter path
pub fn event_param_to_param(param: &EventParam) -> Param {
    Param {
        ty: param.ty.clone(),
        name: param.name.clone(),
        components: param.components.clone(),
        internal_type: param.internal_type.clone(),
    }
}

/// Fragments parsed from one ABI source, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interface {
    fragments: Vec<Fragment>,
}

impl Interface {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.fragments.iter().filter_map(|f| match f {
            Fragment::Function(function) => Some(function),
            _ => None,
        })
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.fragments.iter().filter_map(|f| match f {
            Fragment::Event(event) => Some(event),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &Error> {
        self.fragments.iter().filter_map(|f| match f {
            Fragment::Error(error) => Some(error),
            _ => None,
        })
    }

    /// First constructor in the interface, if any
    pub fn constructor(&self) -> Option<&Constructor> {
        self.fragments.iter().find_map(|f| match f {
            Fragment::Constructor(constructor) => Some(constructor),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl FromIterator<Fragment> for Interface {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
