//! Event log decoding with indexed-layout recovery
//!
//! Text signatures from the signature database carry no `indexed` markers, so
//! an event whose topic hash matches may still declare the wrong number of
//! indexed parameters. When that happens every placement of `topics.len() - 1`
//! indexed parameters is tried in turn against a synthesized copy of the
//! event; the interface itself is never modified.

use alloy_dyn_abi::{DynSolValue, EventExt};
use alloy_json_abi::Event;
use alloy_primitives::B256;
use tracing::debug;

use super::combinations::combinations;
use super::error::{EventError, TreeError};
use super::tree::build_tree;
use crate::domain::abi::{
    DecodedArgs, DecodedEventResult, EventLog, Fragment, Interface, TreeNode, TreeSource,
};

/// Decode `log` against the events of `iface`
pub fn decode_event(iface: &Interface, log: &EventLog) -> Result<DecodedEventResult, EventError> {
    let topic = *log.topics.first().ok_or(EventError::NoTopics)?;

    let candidates: Vec<&Event> = iface
        .fragments()
        .iter()
        .filter(|fragment| fragment.topic() == Some(topic))
        .filter_map(|fragment| match fragment {
            Fragment::Event(event) => Some(event),
            _ => None,
        })
        .collect();
    if candidates.is_empty() {
        return Err(EventError::UnknownEvent { topic });
    }

    let mut last_error = None;
    for event in candidates {
        match decode_with_recovery(event, log) {
            Ok(decoded) => return Ok(decoded),
            Err(err) => {
                debug!(event = %event.name, error = %err, "event candidate failed");
                last_error = Some(err);
            }
        }
    }

    Err(EventError::NoMatchingEvent {
        topic,
        source: Box::new(last_error.unwrap_or(EventError::UnknownEvent { topic })),
    })
}

/// Decode with the declared layout, then with every other indexed placement
fn decode_with_recovery(event: &Event, log: &EventLog) -> Result<DecodedEventResult, EventError> {
    let primary = match try_decode_with_fragment(event, &log.topics, &log.data) {
        Ok(decoded) => return Ok(decoded),
        Err(err @ EventError::TopicCountMismatch { .. }) => err,
        Err(err) => return Err(err),
    };

    let indexed_count = log.topics.len() - 1;
    debug!(
        event = %event.name,
        indexed = indexed_count,
        params = event.inputs.len(),
        "retrying with alternate indexed layouts"
    );

    let mut last_error = primary;
    for positions in combinations(event.inputs.len(), indexed_count) {
        let candidate = with_indexed_positions(event, &positions);
        match try_decode_with_fragment(&candidate, &log.topics, &log.data) {
            Ok(decoded) => return Ok(decoded),
            Err(err) => {
                debug!(?positions, error = %err, "indexed layout rejected");
                last_error = err;
            }
        }
    }
    Err(last_error)
}

fn with_indexed_positions(event: &Event, positions: &[usize]) -> Event {
    let mut event = event.clone();
    for (idx, input) in event.inputs.iter_mut().enumerate() {
        input.indexed = positions.contains(&idx);
    }
    event
}

/// Decode one log against one event, exactly as the event is declared
pub fn try_decode_with_fragment(
    event: &Event,
    topics: &[B256],
    data: &[u8],
) -> Result<DecodedEventResult, EventError> {
    let actual = *topics.first().ok_or(EventError::NoTopics)?;
    let expected = event.selector();
    if !event.anonymous && actual != expected {
        return Err(EventError::SignatureMismatch { expected, actual });
    }

    let declared = usize::from(!event.anonymous)
        + event.inputs.iter().filter(|input| input.indexed).count();
    if topics.len() != declared {
        return Err(EventError::TopicCountMismatch {
            expected: declared,
            actual: topics.len(),
        });
    }

    let decoded = event.decode_log_parts(topics.iter().copied(), data)?;

    let mut indexed = decoded.indexed.into_iter();
    let mut body = decoded.body.into_iter();
    let mut values = Vec::with_capacity(event.inputs.len());
    for input in &event.inputs {
        let value = if input.indexed {
            indexed.next()
        } else {
            body.next()
        };
        // decode_log_parts yields one value per declared parameter
        values.extend(value);
    }

    let has_argument_names = event.inputs.iter().any(|input| !input.name.is_empty());
    let args = if has_argument_names {
        DecodedArgs::Named(
            event
                .inputs
                .iter()
                .zip(values)
                .filter(|(input, _)| !input.name.is_empty())
                .map(|(input, value)| (input.name.clone(), value))
                .collect(),
        )
    } else {
        DecodedArgs::Positional(values)
    };

    Ok(DecodedEventResult {
        args,
        fragment: event.clone(),
        has_argument_names,
        signature: event.signature(),
        full_signature: event.full_signature(),
    })
}

impl TreeSource for DecodedEventResult {
    type Error = TreeError;

    fn tree(&self) -> Result<Vec<TreeNode>, TreeError> {
        let values: Vec<DynSolValue> = self.values();
        build_tree(&self.params(), &values)
    }
}
