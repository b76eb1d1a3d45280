//! Property-based checks of pool invariants

mod common;

use amm::{AmmError, RemoveLiquidity, V2Math};
use common::*;
use ledger::AssetHost;
use proptest::prelude::*;
use types::{Address, Amount};

fn pool(reserve_a: u64, reserve_b: u64) -> (Harness, Address, Address) {
    let mut harness = Harness::new();
    let a = harness.token(0xa0, "AAA");
    let b = harness.token(0xb0b, "BBB");
    harness.add_liquidity(a, b, reserve_a, reserve_b);
    (harness, a, b)
}

fn swap(harness: &mut Harness, path: Vec<Address>, amount_in: u64) -> Result<Vec<Amount>, AmmError> {
    let alice = harness.accounts.alice;
    let params = amm::ExactInput {
        amount_in: amt(amount_in),
        amount_out_min: Amount::zero(),
        path,
        to: alice,
        deadline: DEADLINE,
        referrer: None,
    };
    harness.exchange.swap_exact_tokens_for_tokens(alice, &params)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Reserve product never shrinks across a sequence of swaps in either direction
    #[test]
    fn k_never_decreases(
        reserve_a in 10_000u64..1_000_000_000,
        reserve_b in 10_000u64..1_000_000_000,
        trades in prop::collection::vec((any::<bool>(), 100u64..10_000_000), 1..8),
    ) {
        let (mut harness, a, b) = pool(reserve_a, reserve_b);
        let (mut ra, mut rb) = harness.reserves(&a, &b);

        for (forward, amount) in trades {
            let path = if forward { vec![a, b] } else { vec![b, a] };
            // tiny trades may round to zero output; those must fail cleanly
            if swap(&mut harness, path, amount).is_err() {
                prop_assert_eq!(harness.reserves(&a, &b), (ra, rb));
                continue;
            }
            let (na, nb) = harness.reserves(&a, &b);
            prop_assert!(na * nb >= ra * rb, "k shrank: {} -> {}", ra * rb, na * nb);
            ra = na;
            rb = nb;
        }
    }

    /// A depositor can never withdraw more than they put in
    #[test]
    fn mint_then_burn_never_profits(
        reserve_a in 10_000u64..1_000_000_000,
        reserve_b in 10_000u64..1_000_000_000,
        deposit in 1_000u64..100_000_000,
    ) {
        let (mut harness, a, b) = pool(reserve_a, reserve_b);
        let bob = harness.accounts.bob;
        let router = harness.router();
        let pair = harness.exchange.get_pair(&a, &b).unwrap();
        let lp = amm::lp_token_address(&pair);
        harness.exchange.host_mut().approve(&lp, bob, router, Amount::MAX).unwrap();

        let a_before = harness.balance(&a, &bob);
        let b_before = harness.balance(&b, &bob);
        let added = harness.exchange.add_liquidity(bob, &amm::AddLiquidity {
            token_a: a,
            token_b: b,
            amount_a_desired: amt(deposit),
            amount_b_desired: amt(deposit),
            amount_a_min: Amount::zero(),
            amount_b_min: Amount::zero(),
            to: bob,
            deadline: DEADLINE,
        });
        // deposits too small for a single share are rejected outright
        let Ok(added) = added else {
            prop_assert_eq!(harness.balance(&a, &bob), a_before);
            return Ok(());
        };

        let removed = harness.exchange.remove_liquidity(bob, &RemoveLiquidity {
            token_a: a,
            token_b: b,
            liquidity: added.liquidity,
            amount_a_min: Amount::zero(),
            amount_b_min: Amount::zero(),
            to: bob,
            deadline: DEADLINE,
        });
        if let Ok(removed) = removed {
            prop_assert!(removed.amount_a <= added.amount_a);
            prop_assert!(removed.amount_b <= added.amount_b);
        }
        prop_assert!(harness.balance(&a, &bob) <= a_before);
        prop_assert!(harness.balance(&b, &bob) <= b_before);
    }

    /// Paying the quoted input for an exact output always yields at least that output
    #[test]
    fn quoted_input_covers_output(
        reserves in prop::collection::vec(10_000u64..1_000_000_000, 4),
        amount_out in 1u64..1_000_000,
    ) {
        let mut harness = Harness::new();
        let a = harness.token(0xa0, "AAA");
        let b = harness.token(0xb0b, "BBB");
        let c = harness.token(0xc0, "CCC");
        harness.add_liquidity(a, b, reserves[0], reserves[1]);
        harness.add_liquidity(b, c, reserves[2], reserves[3]);
        let path = [a, b, c];

        // outputs at or beyond a reserve cannot be quoted
        let Ok(amounts_in) = harness.exchange.get_amounts_in(amt(amount_out), &path) else {
            return Ok(());
        };
        let amounts_out = harness.exchange.get_amounts_out(amounts_in[0], &path).unwrap();
        prop_assert!(
            amounts_out[2] >= amt(amount_out),
            "{} in yields {} < {}",
            amounts_in[0],
            amounts_out[2],
            amount_out
        );
    }

    /// Re-quoting the input for a quoted output never exceeds the original input by more
    /// than the single unit `get_amount_in` rounds up when the division is exact
    #[test]
    fn amount_in_of_amount_out_is_bounded(
        reserve_in in 1_000u64..1_000_000_000_000,
        reserve_out in 1_000u64..1_000_000_000_000,
        x in 1u64..1_000_000_000,
    ) {
        let (ri, ro) = (Amount::from(reserve_in), Amount::from(reserve_out));
        let out = V2Math::get_amount_out(Amount::from(x), ri, ro).unwrap();
        prop_assume!(!out.is_zero());
        let back = V2Math::get_amount_in(out, ri, ro).unwrap();
        prop_assert!(back <= Amount::from(x) + Amount::one(), "{} > {} + 1", back, x);
    }

    /// Single-hop output is monotone in the input and stays below the output reserve
    #[test]
    fn amount_out_is_monotone(
        reserve_in in 1u64..u64::MAX / 2,
        reserve_out in 1u64..u64::MAX / 2,
        x in 1u64..1_000_000_000_000,
        dx in 0u64..1_000_000,
    ) {
        let (ri, ro) = (Amount::from(reserve_in), Amount::from(reserve_out));
        let small = V2Math::get_amount_out(Amount::from(x), ri, ro).unwrap();
        let large = V2Math::get_amount_out(Amount::from(x) + Amount::from(dx), ri, ro).unwrap();
        prop_assert!(small <= large);
        prop_assert!(large < ro);
    }
}
