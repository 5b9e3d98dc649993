//! Host environment boundary.
//!
//! The engine never reads the chain directly; block height, time, and
//! balance lookups come through this trait so the host stays in control of
//! what the caveats observe.

use alloc::collections::BTreeMap;
use alloy_primitives::{Address, U256};

/// Read-only view of the host environment at hook time.
pub trait Environment {
    /// Current block height.
    fn block_number(&self) -> u128;

    /// Current time, unix seconds.
    fn timestamp(&self) -> u64;

    /// Native balance of an arbitrary identity.
    fn native_balance(&self, account: &Address) -> U256;
}

/// In-memory environment for tests and embedding.
///
/// Balances, height, and time are all settable so hook sequences can be
/// driven deterministically.
#[derive(Clone, Debug, Default)]
pub struct MockEnvironment {
    pub block_number: u128,
    pub timestamp: u64,
    balances: BTreeMap<Address, U256>,
}

impl MockEnvironment {
    /// Create an environment at block 0, time 0, with no balances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite an account's balance.
    pub fn set_balance(&mut self, account: Address, balance: U256) {
        self.balances.insert(account, balance);
    }

    /// Add to an account's balance, saturating at the type maximum.
    pub fn credit(&mut self, account: Address, amount: U256) {
        let entry = self.balances.entry(account).or_insert(U256::ZERO);
        *entry = entry.saturating_add(amount);
    }
}

impl Environment for MockEnvironment {
    fn block_number(&self) -> u128 {
        self.block_number
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn native_balance(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or(U256::ZERO)
    }
}
