//! No-payload caveat: every action redeemed under the delegation must carry
//! an empty payload (plain value transfers only). Stateless; accepts single
//! and batch call types.

use crate::caveats::CaveatEnforcer;
use crate::env::Environment;
use crate::error::{CaveatError, Result};
use crate::execution::{decode_batch, Action};
use crate::types::{CallType, HookContext};

/// Stateless enforcer rejecting any nonempty action payload.
///
/// Takes no terms; an empty blob is conventional.
#[derive(Clone, Debug, Default)]
pub struct NoPayloadEnforcer;

impl NoPayloadEnforcer {
    pub fn new() -> Self {
        Self
    }
}

impl CaveatEnforcer for NoPayloadEnforcer {
    fn before_hook(&mut self, ctx: &HookContext<'_>, _env: &dyn Environment) -> Result<()> {
        match ctx.mode.call_type {
            CallType::Single => {
                let action = Action::decode_single(ctx.execution)?;
                if !action.payload.is_empty() {
                    return Err(CaveatError::PayloadNotAllowed);
                }
            }
            CallType::Batch => {
                // First violation aborts; the rest are never inspected.
                for action in decode_batch(ctx.execution)? {
                    if !action.payload.is_empty() {
                        return Err(CaveatError::PayloadNotAllowed);
                    }
                }
            }
        }
        Ok(())
    }
}
