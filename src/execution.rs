//! Action payloads and their wire codec.
//!
//! The orchestrator that splits a raw payload into actions sits outside the
//! engine, but caveats that iterate batches need a concrete framing. The
//! layout is fixed-offset and big-endian throughout:
//!
//! - single: `target (20B) || value (32B) || payload (rest)`
//! - batch:  `count (4B)` then, per action, `len (4B) || single encoding`

use alloc::vec::Vec;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::{CaveatError, Result};

/// Byte length of the fixed prefix of a single encoded action.
pub const ACTION_HEADER_LEN: usize = 20 + 32;

/// One normalized unit of delegated work.
///
/// Immutable once constructed for a given invocation; caveats read it,
/// never rewrite it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Destination identity.
    pub target: Address,
    /// Native value carried by the action.
    pub value: U256,
    /// Opaque payload forwarded to the destination.
    pub payload: Vec<u8>,
}

impl Action {
    /// Encode as a single-action execution payload.
    pub fn encode_single(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ACTION_HEADER_LEN + self.payload.len());
        out.extend_from_slice(self.target.as_slice());
        out.extend_from_slice(&self.value.to_be_bytes::<32>());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Decode a single-action execution payload.
    pub fn decode_single(data: &[u8]) -> Result<Self> {
        if data.len() < ACTION_HEADER_LEN {
            return Err(CaveatError::ExecutionMalformed);
        }
        let target = Address::from_slice(&data[..20]);
        let value = U256::from_be_slice(&data[20..ACTION_HEADER_LEN]);
        let payload = data[ACTION_HEADER_LEN..].to_vec();
        Ok(Self { target, value, payload })
    }
}

/// Encode a batch of actions with length-prefixed framing.
pub fn encode_batch(actions: &[Action]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(actions.len() as u32).to_be_bytes());
    for action in actions {
        let encoded = action.encode_single();
        out.extend_from_slice(&(encoded.len() as u32).to_be_bytes());
        out.extend_from_slice(&encoded);
    }
    out
}

/// Decode a batch execution payload, in encoding order.
///
/// Truncated frames and trailing bytes both reject; a batch caveat must
/// never silently skip an action it could not see.
pub fn decode_batch(data: &[u8]) -> Result<Vec<Action>> {
    let count = read_u32(data, 0)? as usize;

    // The count prefix is caller-supplied; never size an allocation from it
    // alone. Every frame costs at least its length prefix plus the action
    // header, so a count the payload cannot possibly hold is malformed.
    let max_frames = data.len().saturating_sub(4) / (4 + ACTION_HEADER_LEN);
    if count > max_frames {
        return Err(CaveatError::ExecutionMalformed);
    }

    let mut offset = 4;
    let mut actions = Vec::with_capacity(count);

    for _ in 0..count {
        let len = read_u32(data, offset)? as usize;
        offset += 4;
        let end = offset.checked_add(len).ok_or(CaveatError::ExecutionMalformed)?;
        if end > data.len() {
            return Err(CaveatError::ExecutionMalformed);
        }
        actions.push(Action::decode_single(&data[offset..end])?);
        offset = end;
    }

    if offset != data.len() {
        return Err(CaveatError::ExecutionMalformed);
    }
    Ok(actions)
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    let end = offset.checked_add(4).ok_or(CaveatError::ExecutionMalformed)?;
    let bytes = data
        .get(offset..end)
        .ok_or(CaveatError::ExecutionMalformed)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
