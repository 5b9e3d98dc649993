use alloy_primitives::{Address, B256, U256};
use caveat_engine::{
    Action, BalanceIncreaseEnforcer, BalanceIncreaseTerms, CaveatEnforcer, CaveatError,
    CaveatEvent, ExecutionMode, HookContext, MockEnvironment, NonceEnforcer, NonceTerms,
    SpendLimitEnforcer, SpendLimitTerms,
};

const MANAGER: Address = Address::repeat_byte(0xC1);
const DELEGATOR: Address = Address::repeat_byte(0xD1);
const REDEEMER: Address = Address::repeat_byte(0xE1);

fn ctx_for<'a>(terms: &'a [u8], execution: &'a [u8], delegation_id: B256) -> HookContext<'a> {
    HookContext {
        terms,
        args: &[],
        mode: ExecutionMode::SINGLE_DEFAULT,
        execution,
        delegation_id,
        delegator: DELEGATOR,
        redeemer: REDEEMER,
        caller: MANAGER,
    }
}

fn transfer(value: u64) -> Vec<u8> {
    Action {
        target: Address::repeat_byte(0x10),
        value: U256::from(value),
        payload: Vec::new(),
    }
    .encode_single()
}

// --- balance increase ---

#[test]
fn balance_increase_happy_path_clears_lock() {
    let recipient = Address::repeat_byte(0x77);
    let terms = BalanceIncreaseTerms {
        recipient,
        min_increase: U256::from(100u64),
    }
    .encode();
    let delegation = B256::repeat_byte(0x01);
    let ctx = ctx_for(&terms, &[], delegation);

    let mut env = MockEnvironment::new();
    env.set_balance(recipient, U256::from(1_000u64));

    let mut enforcer = BalanceIncreaseEnforcer::new();
    enforcer.before_hook(&ctx, &env).unwrap();
    assert!(enforcer.is_locked(&ctx.delegation_key()));

    // The action executes and the recipient gains exactly the minimum.
    env.credit(recipient, U256::from(100u64));
    enforcer.after_hook(&ctx, &env).unwrap();
    assert!(!enforcer.is_locked(&ctx.delegation_key()));

    // A fresh attempt under the same key is allowed again.
    assert!(enforcer.before_hook(&ctx, &env).is_ok());
}

#[test]
fn balance_increase_nested_before_hook_rejects() {
    let recipient = Address::repeat_byte(0x77);
    let terms = BalanceIncreaseTerms {
        recipient,
        min_increase: U256::from(1u64),
    }
    .encode();
    let ctx = ctx_for(&terms, &[], B256::repeat_byte(0x02));
    let env = MockEnvironment::new();

    let mut enforcer = BalanceIncreaseEnforcer::new();
    enforcer.before_hook(&ctx, &env).unwrap();
    // Re-entered attempt under the same key before the after-hook ran: the
    // baseline snapshot must not be resettable.
    assert_eq!(enforcer.before_hook(&ctx, &env), Err(CaveatError::LockAlreadyHeld));

    // A different delegation id keys independently and is unaffected.
    let other = ctx_for(&terms, &[], B256::repeat_byte(0x03));
    assert!(enforcer.before_hook(&other, &env).is_ok());
}

#[test]
fn balance_increase_insufficient_gain_rejects_but_unlocks() {
    let recipient = Address::repeat_byte(0x77);
    let terms = BalanceIncreaseTerms {
        recipient,
        min_increase: U256::from(100u64),
    }
    .encode();
    let ctx = ctx_for(&terms, &[], B256::repeat_byte(0x04));

    let mut env = MockEnvironment::new();
    env.set_balance(recipient, U256::from(500u64));

    let mut enforcer = BalanceIncreaseEnforcer::new();
    enforcer.before_hook(&ctx, &env).unwrap();

    env.credit(recipient, U256::from(99u64));
    assert_eq!(
        enforcer.after_hook(&ctx, &env),
        Err(CaveatError::BalanceNotIncreased {
            required: U256::from(600u64),
            observed: U256::from(599u64),
        })
    );
    // Failing after-hook still releases the lock for the next attempt.
    assert!(!enforcer.is_locked(&ctx.delegation_key()));
    assert!(enforcer.before_hook(&ctx, &env).is_ok());
}

#[test]
fn balance_decrease_rejects() {
    let recipient = Address::repeat_byte(0x77);
    let terms = BalanceIncreaseTerms {
        recipient,
        min_increase: U256::from(1u64),
    }
    .encode();
    let ctx = ctx_for(&terms, &[], B256::repeat_byte(0x05));

    let mut env = MockEnvironment::new();
    env.set_balance(recipient, U256::from(500u64));

    let mut enforcer = BalanceIncreaseEnforcer::new();
    enforcer.before_hook(&ctx, &env).unwrap();

    env.set_balance(recipient, U256::from(400u64));
    assert!(matches!(
        enforcer.after_hook(&ctx, &env),
        Err(CaveatError::BalanceNotIncreased { .. })
    ));
}

// --- cumulative spend ---

#[test]
fn spend_limit_exact_allowance_in_steps() {
    let terms = SpendLimitTerms { allowance: U256::from(1_000u64) }.encode();
    let delegation = B256::repeat_byte(0x11);
    let env = MockEnvironment::new();
    let mut enforcer = SpendLimitEnforcer::new();

    for step in [400u64, 400, 200] {
        let execution = transfer(step);
        let ctx = ctx_for(&terms, &execution, delegation);
        enforcer.before_hook(&ctx, &env).unwrap();
    }
    let key = ctx_for(&terms, &[], delegation).delegation_key();
    assert_eq!(enforcer.spent(&key), U256::from(1_000u64));

    // One more unit breaches the allowance and leaves the total untouched.
    let execution = transfer(1);
    let ctx = ctx_for(&terms, &execution, delegation);
    assert_eq!(
        enforcer.before_hook(&ctx, &env),
        Err(CaveatError::AllowanceExceeded {
            attempted: U256::from(1_001u64),
            allowance: U256::from(1_000u64),
        })
    );
    assert_eq!(enforcer.spent(&key), U256::from(1_000u64));
}

#[test]
fn spend_limit_emits_running_totals() {
    let terms = SpendLimitTerms { allowance: U256::from(300u64) }.encode();
    let delegation = B256::repeat_byte(0x12);
    let env = MockEnvironment::new();
    let mut enforcer = SpendLimitEnforcer::new();

    for step in [100u64, 150] {
        let execution = transfer(step);
        enforcer
            .before_hook(&ctx_for(&terms, &execution, delegation), &env)
            .unwrap();
    }

    let events = enforcer.take_events();
    assert_eq!(
        events,
        vec![
            CaveatEvent::SpentIncreased {
                caller: MANAGER,
                redeemer: REDEEMER,
                delegation_id: delegation,
                limit: U256::from(300u64),
                spent: U256::from(100u64),
            },
            CaveatEvent::SpentIncreased {
                caller: MANAGER,
                redeemer: REDEEMER,
                delegation_id: delegation,
                limit: U256::from(300u64),
                spent: U256::from(250u64),
            },
        ]
    );
    // Events serialize for host-side observability pipelines.
    let json = serde_json::to_string(&events).unwrap();
    assert!(json.contains("SpentIncreased"));
}

#[test]
fn spend_limit_keys_are_independent() {
    let terms = SpendLimitTerms { allowance: U256::from(100u64) }.encode();
    let env = MockEnvironment::new();
    let mut enforcer = SpendLimitEnforcer::new();

    let execution = transfer(100);
    enforcer
        .before_hook(&ctx_for(&terms, &execution, B256::repeat_byte(0x21)), &env)
        .unwrap();
    // A different delegation has its own record and full allowance.
    enforcer
        .before_hook(&ctx_for(&terms, &execution, B256::repeat_byte(0x22)), &env)
        .unwrap();
}

// --- nonce revocation ---

#[test]
fn nonce_lifecycle_and_mass_revocation() {
    let env = MockEnvironment::new();
    let mut enforcer = NonceEnforcer::new();

    let minted_at_zero = NonceTerms { nonce: U256::ZERO }.encode();
    let ctx = ctx_for(&minted_at_zero, &[], B256::repeat_byte(0x31));

    // Valid while the live counter equals the encoded nonce.
    enforcer.before_hook(&ctx, &env).unwrap();
    enforcer.before_hook(&ctx, &env).unwrap();

    // The delegator revokes everything minted against nonce 0.
    enforcer.increment_nonce(MANAGER, DELEGATOR);
    assert_eq!(
        enforcer.before_hook(&ctx, &env),
        Err(CaveatError::NonceMismatch {
            expected: U256::from(1),
            provided: U256::ZERO,
        })
    );

    // A freshly minted delegation against the new counter validates.
    let minted_at_one = NonceTerms { nonce: U256::from(1) }.encode();
    let fresh = ctx_for(&minted_at_one, &[], B256::repeat_byte(0x32));
    enforcer.before_hook(&fresh, &env).unwrap();

    assert_eq!(
        enforcer.take_events(),
        vec![CaveatEvent::NonceIncreased {
            manager: MANAGER,
            delegator: DELEGATOR,
            superseded_nonce: U256::ZERO,
        }]
    );
}

#[test]
fn nonce_counters_scoped_to_manager_delegator_pair() {
    let env = MockEnvironment::new();
    let mut enforcer = NonceEnforcer::new();

    // Another delegator's revocation must not touch ours.
    enforcer.increment_nonce(MANAGER, Address::repeat_byte(0xD2));

    let minted_at_zero = NonceTerms { nonce: U256::ZERO }.encode();
    let ctx = ctx_for(&minted_at_zero, &[], B256::repeat_byte(0x33));
    assert!(enforcer.before_hook(&ctx, &env).is_ok());
}
