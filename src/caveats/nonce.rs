//! Nonce caveat: replay protection and mass revocation.
//!
//! Each delegation encodes the counter value it was minted against. The
//! before-hook requires an exact match with the live counter, so one
//! administrative increment by the delegator permanently invalidates every
//! delegation carrying the old value.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::caveats::{expect_terms_len, CaveatEnforcer};
use crate::env::Environment;
use crate::error::{CaveatError, Result};
use crate::events::{CaveatEvent, EventLog};
use crate::types::HookContext;

/// Decoded nonce terms: a single 32-byte counter value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceTerms {
    pub nonce: U256,
}

impl NonceTerms {
    /// Terms blob length.
    pub const LEN: usize = 32;

    /// Decode and validate a terms blob.
    pub fn decode(terms: &[u8]) -> Result<Self> {
        expect_terms_len(terms, Self::LEN)?;
        Ok(Self { nonce: U256::from_be_slice(terms) })
    }

    /// Encode into the fixed terms layout.
    pub fn encode(&self) -> Vec<u8> {
        self.nonce.to_be_bytes::<32>().to_vec()
    }
}

/// Revocation-counter enforcer for [`NonceTerms`].
///
/// Counters are keyed by `(manager, delegator)`; a delegator's counter under
/// one manager never affects its delegations under another.
#[derive(Clone, Debug, Default)]
pub struct NonceEnforcer {
    counters: BTreeMap<(Address, Address), U256>,
    events: EventLog,
}

impl NonceEnforcer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live counter for a `(manager, delegator)` pair.
    pub fn current_nonce(&self, manager: Address, delegator: Address) -> U256 {
        self.counters
            .get(&(manager, delegator))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Advance the delegator's counter by one, revoking every delegation
    /// minted against the superseded value.
    ///
    /// The host must have authenticated `delegator` as the caller of this
    /// operation; nobody else may advance the counter. Wrap-around is
    /// permitted, the domain is large enough that reuse is not a practical
    /// concern.
    pub fn increment_nonce(&mut self, manager: Address, delegator: Address) {
        let entry = self
            .counters
            .entry((manager, delegator))
            .or_insert(U256::ZERO);
        let superseded = *entry;
        *entry = entry.wrapping_add(U256::from(1));
        self.events.record(CaveatEvent::NonceIncreased {
            manager,
            delegator,
            superseded_nonce: superseded,
        });
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

impl CaveatEnforcer for NonceEnforcer {
    fn before_hook(&mut self, ctx: &HookContext<'_>, _env: &dyn Environment) -> Result<()> {
        let terms = NonceTerms::decode(ctx.terms)?;
        let expected = self.current_nonce(ctx.caller, ctx.delegator);
        if terms.nonce != expected {
            return Err(CaveatError::NonceMismatch {
                expected,
                provided: terms.nonce,
            });
        }
        Ok(())
    }
}
