//! Error types for caveat enforcement.
//!
//! Every variant is fatal to the enclosing attempt: hooks reject by
//! returning one of these and the host discards the attempt wholesale.
//! Nothing here is retried or downgraded by the engine itself.

use alloy_primitives::U256;
use thiserror::Error;

/// Rejection reasons a caveat hook can produce.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaveatError {
    /// Terms blob does not match the caveat's fixed layout.
    #[error("invalid terms length: expected {expected} bytes, got {actual}")]
    TermsLengthInvalid { expected: usize, actual: usize },

    /// The CallType/ExecType combination is not accepted by this caveat.
    #[error("execution mode not supported by this caveat")]
    ModeNotSupported,

    /// Current block height falls outside the delegated validity window.
    #[error("block height {current} outside the allowed range")]
    EarlyOrExpiredWindow { current: u128 },

    /// The action differs from the single execution the delegation permits.
    #[error("execution does not match the allowed execution")]
    ExecutionMismatch,

    /// A payload was supplied where the delegation allows none.
    #[error("payload not allowed for this delegation")]
    PayloadNotAllowed,

    /// Action value exceeds the delegated ceiling.
    #[error("value {value} exceeds ceiling {ceiling}")]
    ValueTooHigh { value: U256, ceiling: U256 },

    /// Cumulative spend would exceed the delegated allowance.
    #[error("allowance exceeded: {attempted} spent of {allowance} allowed")]
    AllowanceExceeded { attempted: U256, allowance: U256 },

    /// Encoded nonce does not equal the live revocation counter.
    #[error("nonce mismatch: expected {expected}, got {provided}")]
    NonceMismatch { expected: U256, provided: U256 },

    /// A balance check is already pending for this delegation key.
    #[error("balance check already in progress for this delegation")]
    LockAlreadyHeld,

    /// After-hook ran with no pending before-hook for this delegation key.
    #[error("no pending balance check for this delegation")]
    LockNotHeld,

    /// Recipient balance did not grow by the required minimum.
    #[error("balance increase of {required} required, observed {observed}")]
    BalanceNotIncreased { required: U256, observed: U256 },

    /// The subscription period boundary has not been crossed yet.
    #[error("subscription window not reached, next eligible at {next_eligible}")]
    SubscriptionWindowNotReached { next_eligible: u64 },

    /// The subscription period was already claimed, by either claim path.
    #[error("period {period} already claimed")]
    PeriodAlreadyClaimed { period: u64 },

    /// Encoded action payload could not be decoded.
    #[error("malformed execution payload")]
    ExecutionMalformed,
}

/// Result type alias for caveat operations.
pub type Result<T> = core::result::Result<T, CaveatError>;
