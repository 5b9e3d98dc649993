//! Exact-execution caveat: the delegation permits one precise action and
//! nothing else. Stateless; single-call modes only.

use alloc::vec::Vec;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::caveats::CaveatEnforcer;
use crate::env::Environment;
use crate::error::{CaveatError, Result};
use crate::execution::{Action, ACTION_HEADER_LEN};
use crate::types::HookContext;
use crate::utils::keccak256;

/// Decoded exact-execution terms: `target (20B) || value (32B) || payload`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactExecutionTerms {
    /// The only destination the action may have.
    pub target: Address,
    /// The only value the action may carry.
    pub value: U256,
    /// The only payload the action may carry.
    pub payload: Vec<u8>,
}

impl ExactExecutionTerms {
    /// Minimum terms blob length (target and value; payload may be empty).
    pub const MIN_LEN: usize = ACTION_HEADER_LEN;

    /// Decode and validate a terms blob.
    pub fn decode(terms: &[u8]) -> Result<Self> {
        if terms.len() < Self::MIN_LEN {
            return Err(CaveatError::TermsLengthInvalid {
                expected: Self::MIN_LEN,
                actual: terms.len(),
            });
        }
        Ok(Self {
            target: Address::from_slice(&terms[..20]),
            value: U256::from_be_slice(&terms[20..Self::MIN_LEN]),
            payload: terms[Self::MIN_LEN..].to_vec(),
        })
    }

    /// Encode into the terms layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::MIN_LEN + self.payload.len());
        out.extend_from_slice(self.target.as_slice());
        out.extend_from_slice(&self.value.to_be_bytes::<32>());
        out.extend_from_slice(&self.payload);
        out
    }
}

/// Stateless enforcer for [`ExactExecutionTerms`].
#[derive(Clone, Debug, Default)]
pub struct ExactExecutionEnforcer;

impl ExactExecutionEnforcer {
    pub fn new() -> Self {
        Self
    }
}

impl CaveatEnforcer for ExactExecutionEnforcer {
    fn before_hook(&mut self, ctx: &HookContext<'_>, _env: &dyn Environment) -> Result<()> {
        ctx.mode.require_single()?;
        let terms = ExactExecutionTerms::decode(ctx.terms)?;
        let action = Action::decode_single(ctx.execution)?;

        // Payloads compared by hash so the cost of the check is bounded by
        // the hash, not the payload size.
        if action.target != terms.target
            || action.value != terms.value
            || keccak256(&action.payload) != keccak256(&terms.payload)
        {
            return Err(CaveatError::ExecutionMismatch);
        }
        Ok(())
    }
}
