//! Value-ceiling caveat: a single action may not carry more native value
//! than the delegated ceiling. Stateless; single default mode only.

use alloc::vec::Vec;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::caveats::{expect_terms_len, CaveatEnforcer};
use crate::env::Environment;
use crate::error::{CaveatError, Result};
use crate::execution::Action;
use crate::types::HookContext;

/// Decoded value-ceiling terms: a single 32-byte ceiling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCeilingTerms {
    pub ceiling: U256,
}

impl ValueCeilingTerms {
    /// Terms blob length.
    pub const LEN: usize = 32;

    /// Decode and validate a terms blob.
    pub fn decode(terms: &[u8]) -> Result<Self> {
        expect_terms_len(terms, Self::LEN)?;
        Ok(Self { ceiling: U256::from_be_slice(terms) })
    }

    /// Encode into the fixed terms layout.
    pub fn encode(&self) -> Vec<u8> {
        self.ceiling.to_be_bytes::<32>().to_vec()
    }
}

/// Stateless enforcer for [`ValueCeilingTerms`].
#[derive(Clone, Debug, Default)]
pub struct ValueCeilingEnforcer;

impl ValueCeilingEnforcer {
    pub fn new() -> Self {
        Self
    }
}

impl CaveatEnforcer for ValueCeilingEnforcer {
    fn before_hook(&mut self, ctx: &HookContext<'_>, _env: &dyn Environment) -> Result<()> {
        ctx.mode.require_single_default()?;
        let terms = ValueCeilingTerms::decode(ctx.terms)?;
        let action = Action::decode_single(ctx.execution)?;
        if action.value > terms.ceiling {
            return Err(CaveatError::ValueTooHigh {
                value: action.value,
                ceiling: terms.ceiling,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnvironment;
    use crate::types::{CallType, ExecType, ExecutionMode};
    use alloy_primitives::{Address, B256};

    fn ctx<'a>(terms: &'a [u8], execution: &'a [u8], mode: ExecutionMode) -> HookContext<'a> {
        HookContext {
            terms,
            args: &[],
            mode,
            execution,
            delegation_id: B256::repeat_byte(0x01),
            delegator: Address::repeat_byte(0xD1),
            redeemer: Address::repeat_byte(0xE1),
            caller: Address::repeat_byte(0xC1),
        }
    }

    fn execution(value: u64) -> Vec<u8> {
        Action {
            target: Address::repeat_byte(0x10),
            value: U256::from(value),
            payload: Vec::new(),
        }
        .encode_single()
    }

    #[test]
    fn value_at_ceiling_passes() {
        let terms = ValueCeilingTerms { ceiling: U256::from(500) }.encode();
        let exec = execution(500);
        let env = MockEnvironment::new();
        let mut enforcer = ValueCeilingEnforcer::new();
        assert!(enforcer
            .before_hook(&ctx(&terms, &exec, ExecutionMode::SINGLE_DEFAULT), &env)
            .is_ok());
    }

    #[test]
    fn value_above_ceiling_rejects() {
        let terms = ValueCeilingTerms { ceiling: U256::from(500) }.encode();
        let exec = execution(501);
        let env = MockEnvironment::new();
        let mut enforcer = ValueCeilingEnforcer::new();
        assert_eq!(
            enforcer.before_hook(&ctx(&terms, &exec, ExecutionMode::SINGLE_DEFAULT), &env),
            Err(CaveatError::ValueTooHigh {
                value: U256::from(501),
                ceiling: U256::from(500),
            })
        );
    }

    #[test]
    fn try_mode_rejects() {
        let terms = ValueCeilingTerms { ceiling: U256::from(500) }.encode();
        let exec = execution(1);
        let env = MockEnvironment::new();
        let mode = ExecutionMode { call_type: CallType::Single, exec_type: ExecType::Try };
        let mut enforcer = ValueCeilingEnforcer::new();
        assert_eq!(
            enforcer.before_hook(&ctx(&terms, &exec, mode), &env),
            Err(CaveatError::ModeNotSupported)
        );
    }
}
