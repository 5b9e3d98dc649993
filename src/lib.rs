//! # Caveat Engine
//!
//! Delegated-authorization policy engine: a grantor permits a grantee to
//! perform one normalized action on the grantor's behalf, subject to a
//! composable set of independent caveats. Each caveat is evaluated twice
//! around the action, once before it proceeds and once after it completes,
//! and may keep persistent state across invocations.
//!
//! The engine answers exactly one question: "is this specific action, under
//! this specific caveat, currently permitted?" Delegation-chain signature
//! verification, action routing, and batching orchestration all live in the
//! host.
//!
//! ## Features
//!
//! - **Two-phase hooks**: one shared [`CaveatEnforcer`] contract for every
//!   caveat variant
//! - **Fixed-layout terms**: each caveat validates its configuration blob's
//!   length before slicing
//! - **Keyed state**: stateful caveats partition state by a keccak-derived
//!   delegation key
//! - **`no_std` Compatible**: works in embedded and WASM environments
//!
//! ## Quick Start
//!
//! ```rust
//! use alloy_primitives::{Address, B256, U256};
//! use caveat_engine::{
//!     Action, CaveatEnforcer, ExecutionMode, HookContext, MockEnvironment,
//!     SpendLimitEnforcer, SpendLimitTerms,
//! };
//!
//! // A delegation allowing up to 1000 native units of cumulative spend.
//! let terms = SpendLimitTerms { allowance: U256::from(1000) }.encode();
//! let action = Action {
//!     target: Address::repeat_byte(0x42),
//!     value: U256::from(400),
//!     payload: Vec::new(),
//! };
//! let execution = action.encode_single();
//!
//! let ctx = HookContext {
//!     terms: &terms,
//!     args: &[],
//!     mode: ExecutionMode::SINGLE_DEFAULT,
//!     execution: &execution,
//!     delegation_id: B256::repeat_byte(0x01),
//!     delegator: Address::repeat_byte(0xD1),
//!     redeemer: Address::repeat_byte(0xE1),
//!     caller: Address::repeat_byte(0xC1),
//! };
//!
//! let env = MockEnvironment::new();
//! let mut enforcer = SpendLimitEnforcer::new();
//! assert!(enforcer.before_hook(&ctx, &env).is_ok());
//! assert_eq!(enforcer.spent(&ctx.delegation_key()), U256::from(400));
//! ```
//!
//! ## Atomicity
//!
//! The host executes an attempt all-or-nothing: if any hook rejects, every
//! side effect of the attempt is discarded. The engine never assumes a
//! rejected attempt's mutations persisted, and its own stateful updates are
//! shaped so a rejected call leaves no partial residue.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

// Module declarations
pub mod caveats;
pub mod env;
pub mod error;
pub mod events;
pub mod execution;
pub mod types;
pub mod utils;

// Re-export the capability and its variants
pub use caveats::{
    BalanceIncreaseEnforcer, BalanceIncreaseTerms, BlockRangeEnforcer, BlockRangeTerms,
    CaveatEnforcer, ExactExecutionEnforcer, ExactExecutionTerms, NoPayloadEnforcer, NonceEnforcer,
    NonceTerms, SpendLimitEnforcer, SpendLimitTerms, SubscriptionEnforcer, ValueCeilingEnforcer,
    ValueCeilingTerms, PERIOD_SECONDS,
};

// Re-export core types
pub use env::{Environment, MockEnvironment};
pub use error::{CaveatError, Result};
pub use events::{CaveatEvent, EventLog};
pub use execution::{decode_batch, encode_batch, Action};
pub use types::{CallType, ExecType, ExecutionMode, HookContext};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
