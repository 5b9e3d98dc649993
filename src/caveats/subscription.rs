//! Subscription caveat: one claim per 30-day period, measured from a fixed
//! start time.
//!
//! A period becomes claimable once it has completed, so the earliest
//! successful claim is for period 0 at `start + PERIOD`. A claim landing
//! exactly on a boundary counts toward the new period, which is what makes
//! the just-finished one claimable. Missed periods can be reconciled later
//! through [`SubscriptionEnforcer::fulfil_missed_subscribe`]; both paths
//! share one claimed-period set, first claim wins, ever.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use alloy_primitives::Address;

use crate::caveats::CaveatEnforcer;
use crate::env::Environment;
use crate::error::{CaveatError, Result};
use crate::events::{CaveatEvent, EventLog};
use crate::types::HookContext;

/// Period length: 30 days of unix seconds.
pub const PERIOD_SECONDS: u64 = 30 * 24 * 60 * 60;

/// Time-windowed one-shot claim enforcer.
#[derive(Clone, Debug)]
pub struct SubscriptionEnforcer {
    start: u64,
    claimed: BTreeSet<u64>,
    events: EventLog,
}

impl SubscriptionEnforcer {
    /// Create an enforcer anchored at `start` (unix seconds).
    pub fn new(start: u64) -> Self {
        Self {
            start,
            claimed: BTreeSet::new(),
            events: EventLog::new(),
        }
    }

    /// The fixed start time.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Whether a period index has been claimed by either path.
    pub fn is_claimed(&self, period: u64) -> bool {
        self.claimed.contains(&period)
    }

    /// Claim the most recently completed period.
    ///
    /// Rejects until the first period boundary (`start + PERIOD`) has
    /// passed, and rejects a period that was already claimed.
    pub fn subscribe(&mut self, caller: Address, env: &dyn Environment) -> Result<()> {
        let now = env.timestamp();
        match self.start.checked_add(PERIOD_SECONDS) {
            // A start so late the first boundary never fits in u64 is never
            // eligible; everything earlier waits for the real boundary.
            None => {
                return Err(CaveatError::SubscriptionWindowNotReached {
                    next_eligible: u64::MAX,
                })
            }
            Some(first_eligible) if now < first_eligible => {
                return Err(CaveatError::SubscriptionWindowNotReached {
                    next_eligible: first_eligible,
                })
            }
            Some(_) => {}
        }

        // Current period index; the one before it is the claimable one.
        // `now >= start + PERIOD` here, so the index is at least 1.
        let current = (now - self.start) / PERIOD_SECONDS;
        let period = current - 1;
        if !self.claimed.insert(period) {
            return Err(CaveatError::PeriodAlreadyClaimed { period });
        }

        self.events.record(CaveatEvent::Subscribed {
            caller,
            next_eligible: self
                .start
                .saturating_add(period.saturating_add(2).saturating_mul(PERIOD_SECONDS)),
        });
        Ok(())
    }

    /// Claim an earlier, skipped period exactly once.
    ///
    /// Independent of the current-period gate: any completed period is fair
    /// game as long as nothing claimed it before.
    pub fn fulfil_missed_subscribe(
        &mut self,
        caller: Address,
        period: u64,
        env: &dyn Environment,
    ) -> Result<()> {
        let now = env.timestamp();
        let completes_at = self
            .start
            .saturating_add(period.saturating_add(1).saturating_mul(PERIOD_SECONDS));
        if now < completes_at {
            return Err(CaveatError::SubscriptionWindowNotReached {
                next_eligible: completes_at,
            });
        }
        if !self.claimed.insert(period) {
            return Err(CaveatError::PeriodAlreadyClaimed { period });
        }

        self.events
            .record(CaveatEvent::MissedPeriodFulfilled { caller, period });
        Ok(())
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

impl CaveatEnforcer for SubscriptionEnforcer {
    /// An on-time claim gates redemption: the before-hook is `subscribe`
    /// on behalf of the redeemer.
    fn before_hook(&mut self, ctx: &HookContext<'_>, env: &dyn Environment) -> Result<()> {
        self.subscribe(ctx.redeemer, env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnvironment;

    const START: u64 = 1_700_000_000;

    fn env_at(now: u64) -> MockEnvironment {
        let mut env = MockEnvironment::new();
        env.timestamp = now;
        env
    }

    #[test]
    fn rejects_before_first_boundary() {
        let mut enforcer = SubscriptionEnforcer::new(START);
        let caller = Address::repeat_byte(0x0A);
        assert_eq!(
            enforcer.subscribe(caller, &env_at(START + PERIOD_SECONDS - 1)),
            Err(CaveatError::SubscriptionWindowNotReached {
                next_eligible: START + PERIOD_SECONDS,
            })
        );
    }

    #[test]
    fn boundary_claim_counts_toward_new_period() {
        let mut enforcer = SubscriptionEnforcer::new(START);
        let caller = Address::repeat_byte(0x0A);
        enforcer.subscribe(caller, &env_at(START + PERIOD_SECONDS)).unwrap();
        assert!(enforcer.is_claimed(0));
        assert!(!enforcer.is_claimed(1));
    }

    #[test]
    fn start_near_max_time_never_underflows() {
        let caller = Address::repeat_byte(0x0A);

        // First boundary does not fit in u64: never eligible, even at the
        // end of time.
        let mut late = SubscriptionEnforcer::new(u64::MAX - PERIOD_SECONDS + 1);
        assert_eq!(
            late.subscribe(caller, &env_at(u64::MAX)),
            Err(CaveatError::SubscriptionWindowNotReached { next_eligible: u64::MAX })
        );

        // First boundary lands exactly on u64::MAX: period 0 is claimable
        // there and nowhere before.
        let mut edge = SubscriptionEnforcer::new(u64::MAX - PERIOD_SECONDS);
        assert_eq!(
            edge.subscribe(caller, &env_at(u64::MAX - 1)),
            Err(CaveatError::SubscriptionWindowNotReached { next_eligible: u64::MAX })
        );
        edge.subscribe(caller, &env_at(u64::MAX)).unwrap();
        assert!(edge.is_claimed(0));
    }

    #[test]
    fn missed_period_not_yet_completed_rejects() {
        let mut enforcer = SubscriptionEnforcer::new(START);
        let caller = Address::repeat_byte(0x0A);
        assert_eq!(
            enforcer.fulfil_missed_subscribe(caller, 2, &env_at(START + 2 * PERIOD_SECONDS)),
            Err(CaveatError::SubscriptionWindowNotReached {
                next_eligible: START + 3 * PERIOD_SECONDS,
            })
        );
    }
}
