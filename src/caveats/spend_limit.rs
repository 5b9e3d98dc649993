//! Cumulative-spend caveat: the native value redeemed under one delegation,
//! summed over every attempt, may never exceed the delegated allowance.
//!
//! The running total and the allowance check happen inside one call, so a
//! rejected attempt leaves the prior total untouched regardless of whether
//! the host rolls anything back.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

use crate::caveats::{expect_terms_len, CaveatEnforcer};
use crate::env::Environment;
use crate::error::{CaveatError, Result};
use crate::events::{CaveatEvent, EventLog};
use crate::execution::Action;
use crate::types::HookContext;

/// Decoded spend-limit terms: a single 32-byte allowance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendLimitTerms {
    pub allowance: U256,
}

impl SpendLimitTerms {
    /// Terms blob length.
    pub const LEN: usize = 32;

    /// Decode and validate a terms blob.
    pub fn decode(terms: &[u8]) -> Result<Self> {
        expect_terms_len(terms, Self::LEN)?;
        Ok(Self { allowance: U256::from_be_slice(terms) })
    }

    /// Encode into the fixed terms layout.
    pub fn encode(&self) -> Vec<u8> {
        self.allowance.to_be_bytes::<32>().to_vec()
    }
}

/// Monotonic cumulative-spend enforcer for [`SpendLimitTerms`].
///
/// Before-hook only; the spend record keyed by delegation key only grows.
#[derive(Clone, Debug, Default)]
pub struct SpendLimitEnforcer {
    spent: BTreeMap<B256, U256>,
    events: EventLog,
}

impl SpendLimitEnforcer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cumulative amount already authorized for a delegation key.
    pub fn spent(&self, key: &B256) -> U256 {
        self.spent.get(key).copied().unwrap_or(U256::ZERO)
    }

    /// Records emitted by committed operations, in emission order.
    pub fn events(&self) -> &[CaveatEvent] {
        self.events.all()
    }

    /// Drain the buffered records.
    pub fn take_events(&mut self) -> Vec<CaveatEvent> {
        self.events.take()
    }
}

impl CaveatEnforcer for SpendLimitEnforcer {
    fn before_hook(&mut self, ctx: &HookContext<'_>, _env: &dyn Environment) -> Result<()> {
        ctx.mode.require_single_default()?;
        let terms = SpendLimitTerms::decode(ctx.terms)?;
        let action = Action::decode_single(ctx.execution)?;
        let key = ctx.delegation_key();

        let prior = self.spent(&key);
        let new_total = match prior.checked_add(action.value) {
            Some(total) if total <= terms.allowance => total,
            _ => {
                return Err(CaveatError::AllowanceExceeded {
                    attempted: prior.saturating_add(action.value),
                    allowance: terms.allowance,
                })
            }
        };

        self.spent.insert(key, new_total);
        self.events.record(CaveatEvent::SpentIncreased {
            caller: ctx.caller,
            redeemer: ctx.redeemer,
            delegation_id: ctx.delegation_id,
            limit: terms.allowance,
            spent: new_total,
        });
        Ok(())
    }
}
