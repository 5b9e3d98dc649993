//! Balance-increase caveat: the attempt only stands if a recipient's native
//! balance grew by at least the delegated minimum across the action.
//!
//! This is the one caveat that needs its own mutual exclusion. The
//! before-hook snapshots the recipient balance and takes a per-delegation
//! lock; the after-hook releases the lock and checks the gain. Without the
//! lock, a nested redemption under the same key could re-snapshot between a
//! genuine before-hook and its after-hook and reset the baseline.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::caveats::{expect_terms_len, CaveatEnforcer};
use crate::env::Environment;
use crate::error::{CaveatError, Result};
use crate::types::HookContext;

/// Decoded balance-increase terms: `recipient (20B) || min_increase (32B)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceIncreaseTerms {
    /// Identity whose balance must grow.
    pub recipient: Address,
    /// Minimum required gain across the action.
    pub min_increase: U256,
}

impl BalanceIncreaseTerms {
    /// Terms blob length.
    pub const LEN: usize = 52;

    /// Decode and validate a terms blob.
    pub fn decode(terms: &[u8]) -> Result<Self> {
        expect_terms_len(terms, Self::LEN)?;
        Ok(Self {
            recipient: Address::from_slice(&terms[..20]),
            min_increase: U256::from_be_slice(&terms[20..]),
        })
    }

    /// Encode into the fixed terms layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::LEN);
        out.extend_from_slice(self.recipient.as_slice());
        out.extend_from_slice(&self.min_increase.to_be_bytes::<32>());
        out
    }
}

/// Pending balance check for one delegation key.
#[derive(Copy, Clone, Debug, Default)]
struct Checkpoint {
    snapshot: U256,
    locked: bool,
}

/// Two-phase, lock-guarded enforcer for [`BalanceIncreaseTerms`].
#[derive(Clone, Debug, Default)]
pub struct BalanceIncreaseEnforcer {
    checkpoints: BTreeMap<B256, Checkpoint>,
}

impl BalanceIncreaseEnforcer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a before-hook is pending for the given delegation key.
    pub fn is_locked(&self, key: &B256) -> bool {
        self.checkpoints.get(key).map(|c| c.locked).unwrap_or(false)
    }
}

impl CaveatEnforcer for BalanceIncreaseEnforcer {
    fn before_hook(&mut self, ctx: &HookContext<'_>, env: &dyn Environment) -> Result<()> {
        let terms = BalanceIncreaseTerms::decode(ctx.terms)?;
        let key = ctx.delegation_key();

        let checkpoint = self.checkpoints.entry(key).or_default();
        if checkpoint.locked {
            return Err(CaveatError::LockAlreadyHeld);
        }
        checkpoint.locked = true;
        checkpoint.snapshot = env.native_balance(&terms.recipient);
        Ok(())
    }

    fn after_hook(&mut self, ctx: &HookContext<'_>, env: &dyn Environment) -> Result<()> {
        let terms = BalanceIncreaseTerms::decode(ctx.terms)?;
        let key = ctx.delegation_key();

        let checkpoint = match self.checkpoints.get_mut(&key) {
            Some(c) if c.locked => c,
            _ => return Err(CaveatError::LockNotHeld),
        };
        // Release first: a failing balance check must never leave the lock
        // stuck for the next attempt.
        checkpoint.locked = false;
        let snapshot = checkpoint.snapshot;

        let required = match snapshot.checked_add(terms.min_increase) {
            Some(required) => required,
            // Unsatisfiable threshold; observed balance cannot reach it.
            None => {
                return Err(CaveatError::BalanceNotIncreased {
                    required: U256::MAX,
                    observed: env.native_balance(&terms.recipient),
                })
            }
        };

        let observed = env.native_balance(&terms.recipient);
        if observed < required {
            return Err(CaveatError::BalanceNotIncreased { required, observed });
        }
        Ok(())
    }
}
