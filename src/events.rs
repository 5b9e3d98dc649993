//! Observability records emitted by stateful caveats.
//!
//! Each stateful enforcer owns an [`EventLog`]; the host drains it once an
//! attempt has committed. Records for a discarded attempt are dropped with
//! the attempt and must never be replayed.

use alloc::vec::Vec;
use alloy_primitives::{Address, B256, U256};
use core::fmt;
use serde::{Deserialize, Serialize};

/// A state-changing caveat operation that succeeded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaveatEvent {
    /// The delegator advanced its revocation counter.
    NonceIncreased {
        manager: Address,
        delegator: Address,
        superseded_nonce: U256,
    },
    /// Cumulative spend grew within the allowance.
    SpentIncreased {
        caller: Address,
        redeemer: Address,
        delegation_id: B256,
        limit: U256,
        spent: U256,
    },
    /// An on-time subscription claim succeeded.
    Subscribed {
        caller: Address,
        next_eligible: u64,
    },
    /// A skipped period was reconciled after the fact.
    MissedPeriodFulfilled {
        caller: Address,
        period: u64,
    },
}

impl fmt::Display for CaveatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonceIncreased { manager, delegator, superseded_nonce } => {
                write!(
                    f,
                    "nonce-increased manager={manager} delegator={delegator} superseded={superseded_nonce}"
                )
            }
            Self::SpentIncreased { caller, redeemer, delegation_id, limit, spent } => {
                write!(
                    f,
                    "spent-increased caller={caller} redeemer={redeemer} delegation=0x{} limit={limit} spent={spent}",
                    hex::encode(delegation_id)
                )
            }
            Self::Subscribed { caller, next_eligible } => {
                write!(f, "subscribed caller={caller} next-eligible={next_eligible}")
            }
            Self::MissedPeriodFulfilled { caller, period } => {
                write!(f, "missed-period-fulfilled caller={caller} period={period}")
            }
        }
    }
}

/// Append-only record buffer owned by one enforcer.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    records: Vec<CaveatEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn record(&mut self, event: CaveatEvent) {
        self.records.push(event);
    }

    /// All records emitted so far, in emission order.
    pub fn all(&self) -> &[CaveatEvent] {
        &self.records
    }

    /// Drain the buffered records, leaving the log empty.
    pub fn take(&mut self) -> Vec<CaveatEvent> {
        core::mem::take(&mut self.records)
    }
}
