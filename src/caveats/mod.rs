//! The caveat capability and its concrete variants.
//!
//! Every caveat is an independent policy axis implementing [`CaveatEnforcer`].
//! Composition happens outside the engine by attaching several caveats to one
//! delegation; no caveat reads or writes another caveat's state.

pub mod balance_increase;
pub mod block_range;
pub mod exact_execution;
pub mod no_payload;
pub mod nonce;
pub mod spend_limit;
pub mod subscription;
pub mod value_ceiling;

pub use balance_increase::{BalanceIncreaseEnforcer, BalanceIncreaseTerms};
pub use block_range::{BlockRangeEnforcer, BlockRangeTerms};
pub use exact_execution::{ExactExecutionEnforcer, ExactExecutionTerms};
pub use no_payload::NoPayloadEnforcer;
pub use nonce::{NonceEnforcer, NonceTerms};
pub use spend_limit::{SpendLimitEnforcer, SpendLimitTerms};
pub use subscription::{SubscriptionEnforcer, PERIOD_SECONDS};
pub use value_ceiling::{ValueCeilingEnforcer, ValueCeilingTerms};

use crate::env::Environment;
use crate::error::{CaveatError, Result};
use crate::types::HookContext;

/// The shared two-phase contract every caveat satisfies.
///
/// `before_hook` runs before any side effect of the action and must reject
/// to abort the attempt. `after_hook` runs only once the action and every
/// other before-hook succeeded; a rejection there retroactively invalidates
/// the attempt, which the host's atomicity discards. Stateless caveats keep
/// the default after-hook.
pub trait CaveatEnforcer {
    /// Validate the action before it executes.
    fn before_hook(&mut self, ctx: &HookContext<'_>, env: &dyn Environment) -> Result<()>;

    /// Validate the outcome after the action executed.
    fn after_hook(&mut self, ctx: &HookContext<'_>, env: &dyn Environment) -> Result<()> {
        let _ = (ctx, env);
        Ok(())
    }
}

/// Validate an exact terms length before any slicing.
pub(crate) fn expect_terms_len(terms: &[u8], expected: usize) -> Result<()> {
    if terms.len() == expected {
        Ok(())
    } else {
        Err(CaveatError::TermsLengthInvalid {
            expected,
            actual: terms.len(),
        })
    }
}
