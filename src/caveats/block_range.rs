//! Block-range caveat: the delegation is only redeemable inside a window of
//! block heights. Stateless and mode-agnostic.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::caveats::{expect_terms_len, CaveatEnforcer};
use crate::env::Environment;
use crate::error::{CaveatError, Result};
use crate::types::HookContext;

/// Decoded block-range terms: `after (16B BE) || before (16B BE)`.
///
/// A zero threshold disables that bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRangeTerms {
    /// Height the current block must strictly exceed, when nonzero.
    pub after_block: u128,
    /// Height the current block must stay strictly below, when nonzero.
    pub before_block: u128,
}

impl BlockRangeTerms {
    /// Terms blob length.
    pub const LEN: usize = 32;

    /// Decode and validate a terms blob.
    pub fn decode(terms: &[u8]) -> Result<Self> {
        expect_terms_len(terms, Self::LEN)?;
        let mut after = [0u8; 16];
        let mut before = [0u8; 16];
        after.copy_from_slice(&terms[..16]);
        before.copy_from_slice(&terms[16..]);
        Ok(Self {
            after_block: u128::from_be_bytes(after),
            before_block: u128::from_be_bytes(before),
        })
    }

    /// Encode into the fixed terms layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::LEN);
        out.extend_from_slice(&self.after_block.to_be_bytes());
        out.extend_from_slice(&self.before_block.to_be_bytes());
        out
    }

    fn permits(&self, current: u128) -> bool {
        if self.after_block > 0 && current <= self.after_block {
            return false;
        }
        if self.before_block > 0 && current >= self.before_block {
            return false;
        }
        true
    }
}

/// Stateless enforcer for [`BlockRangeTerms`].
#[derive(Clone, Debug, Default)]
pub struct BlockRangeEnforcer;

impl BlockRangeEnforcer {
    pub fn new() -> Self {
        Self
    }
}

impl CaveatEnforcer for BlockRangeEnforcer {
    fn before_hook(&mut self, ctx: &HookContext<'_>, env: &dyn Environment) -> Result<()> {
        let terms = BlockRangeTerms::decode(ctx.terms)?;
        let current = env.block_number();
        if terms.permits(current) {
            Ok(())
        } else {
            Err(CaveatError::EarlyOrExpiredWindow { current })
        }
    }
}
