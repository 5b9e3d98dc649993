//! Core types shared by every caveat: execution modes and the hook context.
//!
//! The mode descriptor is fixed for an attempt before any hook runs; caveats
//! only ever validate it, never mutate it. Mode guards reject unsupported
//! combinations *before* terms decoding, so malformed terms against an
//! unsupported mode are never inspected.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::error::{CaveatError, Result};

/// How the attempt's actions are shaped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallType {
    /// One action per attempt.
    Single,
    /// Several actions executed as one attempt.
    Batch,
}

/// How the host treats a failing action inside the attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecType {
    /// Any failure aborts the whole attempt.
    Default,
    /// Failures are tolerated per action.
    Try,
}

/// Execution mode descriptor: two independent axes, fixed at invocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionMode {
    pub call_type: CallType,
    pub exec_type: ExecType,
}

impl ExecutionMode {
    /// Single-action mode with default (all-or-nothing) execution.
    pub const SINGLE_DEFAULT: Self = Self {
        call_type: CallType::Single,
        exec_type: ExecType::Default,
    };

    /// Batch mode with default (all-or-nothing) execution.
    pub const BATCH_DEFAULT: Self = Self {
        call_type: CallType::Batch,
        exec_type: ExecType::Default,
    };

    /// Reject any mode that is not single-call.
    pub fn require_single(&self) -> Result<()> {
        match self.call_type {
            CallType::Single => Ok(()),
            CallType::Batch => Err(CaveatError::ModeNotSupported),
        }
    }

    /// Reject any mode that is not single-call with default execution.
    pub fn require_single_default(&self) -> Result<()> {
        if self.call_type == CallType::Single && self.exec_type == ExecType::Default {
            Ok(())
        } else {
            Err(CaveatError::ModeNotSupported)
        }
    }
}

/// The contextual tuple passed to both hooks of every caveat.
///
/// `caller` is the delegation manager invoking the hooks on the redeemer's
/// behalf; `redeemer` is the grantee actually exercising the delegation.
/// Stateful caveats partition their state by [`HookContext::delegation_key`],
/// never by raw context fields.
#[derive(Copy, Clone, Debug)]
pub struct HookContext<'a> {
    /// Caveat-specific configuration blob, set at delegation creation.
    pub terms: &'a [u8],
    /// Auxiliary per-invocation data. Unused by the built-in caveats.
    pub args: &'a [u8],
    /// Shape of the attempt.
    pub mode: ExecutionMode,
    /// Encoded action payload; decoded per the caveat's accepted CallType.
    pub execution: &'a [u8],
    /// Identifier of the delegation instance being redeemed.
    pub delegation_id: B256,
    /// The grantor who created the delegation.
    pub delegator: Address,
    /// The grantee exercising the delegation.
    pub redeemer: Address,
    /// The delegation manager invoking the hooks.
    pub caller: Address,
}

impl HookContext<'_> {
    /// Derive the key partitioning per-delegation caveat state.
    ///
    /// Keccak-256 over `caller || delegation_id` makes collisions between
    /// unrelated delegations computationally infeasible.
    pub fn delegation_key(&self) -> B256 {
        let mut hasher = Keccak256::new();
        hasher.update(self.caller.as_slice());
        hasher.update(self.delegation_id.as_slice());
        let digest: [u8; 32] = hasher.finalize().into();
        B256::from(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_guards() {
        assert!(ExecutionMode::SINGLE_DEFAULT.require_single().is_ok());
        assert!(ExecutionMode::SINGLE_DEFAULT.require_single_default().is_ok());
        assert_eq!(
            ExecutionMode::BATCH_DEFAULT.require_single(),
            Err(CaveatError::ModeNotSupported)
        );

        let single_try = ExecutionMode {
            call_type: CallType::Single,
            exec_type: ExecType::Try,
        };
        assert!(single_try.require_single().is_ok());
        assert_eq!(
            single_try.require_single_default(),
            Err(CaveatError::ModeNotSupported)
        );
    }

    #[test]
    fn delegation_key_partitions_by_caller_and_id() {
        let base = HookContext {
            terms: &[],
            args: &[],
            mode: ExecutionMode::SINGLE_DEFAULT,
            execution: &[],
            delegation_id: B256::repeat_byte(0x11),
            delegator: Address::repeat_byte(0xD1),
            redeemer: Address::repeat_byte(0xE1),
            caller: Address::repeat_byte(0xC1),
        };

        let other_caller = HookContext {
            caller: Address::repeat_byte(0xC2),
            ..base
        };
        let other_id = HookContext {
            delegation_id: B256::repeat_byte(0x22),
            ..base
        };
        // Redeemer/delegator changes must not move the key.
        let other_redeemer = HookContext {
            redeemer: Address::repeat_byte(0xE2),
            ..base
        };

        assert_ne!(base.delegation_key(), other_caller.delegation_key());
        assert_ne!(base.delegation_key(), other_id.delegation_key());
        assert_eq!(base.delegation_key(), other_redeemer.delegation_key());
    }
}
