//! Indirect-cost calculator tests.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn input(total: Decimal, equipment: Decimal, cooperation: Decimal) -> IndirectCostInput {
    IndirectCostInput {
        total,
        equipment,
        cooperation,
    }
}

#[test]
fn test_schedule_bands() {
    let calc = IndirectCostCalculator::default();
    assert_eq!(calc.indirect_for(dec!(0), dec!(0), dec!(0)), dec!(0));
    assert_eq!(calc.indirect_for(dec!(500), dec!(0), dec!(0)), dec!(100));
    assert_eq!(calc.indirect_for(dec!(1000), dec!(0), dec!(0)), dec!(175));
    assert_eq!(calc.indirect_for(dec!(2000), dec!(0), dec!(0)), dec!(305));
    // Equipment and cooperation leave the base.
    assert_eq!(calc.indirect_for(dec!(600), dec!(50), dec!(50)), dec!(100));
}

#[test]
fn test_first_band_solution() {
    // d + 0.2 (d - 30) = 100  =>  d = 88.33, indirect = 11.67
    let result = IndirectCostCalculator::default()
        .calculate(&input(dec!(100), dec!(20), dec!(10)))
        .unwrap();
    assert!(result.max_indirect >= dec!(11.66) && result.max_indirect <= dec!(11.68));
    assert!(result.direct_cost >= dec!(88.32) && result.direct_cost <= dec!(88.34));
}

#[test]
fn test_second_band_solution() {
    // 1.15 d + 25 = 1000  =>  d = 847.83, indirect = 152.17
    let result = IndirectCostCalculator::default()
        .calculate(&input(dec!(1000), dec!(0), dec!(0)))
        .unwrap();
    assert!(result.max_indirect >= dec!(152.16) && result.max_indirect <= dec!(152.19));
}

#[test]
fn test_custom_rates() {
    let rates = Rates::new(dec!(10), dec!(10), dec!(10)).unwrap();
    // 1.1 d = 110  =>  d = 100, indirect = 10
    let result = IndirectCostCalculator::new(rates)
        .calculate(&input(dec!(110), dec!(0), dec!(0)))
        .unwrap();
    assert!(result.max_indirect >= dec!(9.99) && result.max_indirect <= dec!(10.01));
}

#[test]
fn test_zero_total() {
    let result = IndirectCostCalculator::default()
        .calculate(&input(dec!(0), dec!(0), dec!(0)))
        .unwrap();
    assert_eq!(result.max_indirect, dec!(0));
    assert_eq!(result.iterations, 0);
}

#[test]
fn test_excluded_costs_cover_total() {
    // Base is negative everywhere and clamps to zero: nothing is left for
    // indirect cost beyond the search tolerance.
    let result = IndirectCostCalculator::default()
        .calculate(&input(dec!(100), dec!(80), dec!(40)))
        .unwrap();
    assert!(result.max_indirect >= Decimal::ZERO);
    assert!(result.max_indirect <= TOLERANCE);
    assert_eq!(result.indirect_at_direct, dec!(0));
}

#[test]
fn test_rejects_invalid_input() {
    let calc = IndirectCostCalculator::default();
    assert_eq!(
        calc.calculate(&input(dec!(-1), dec!(0), dec!(0))),
        Err(IndirectCostError::NegativeInput {
            field: "total",
            value: dec!(-1),
        })
    );
    assert!(matches!(
        calc.calculate(&input(dec!(10000000000000), dec!(0), dec!(0))),
        Err(IndirectCostError::TooLarge { .. })
    ));
    assert_eq!(
        Rates::new(dec!(20), dec!(101), dec!(13)),
        Err(IndirectCostError::InvalidRate(dec!(101)))
    );
}

fn wan() -> impl Strategy<Value = Decimal> {
    (0i64..500_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    /// d + indirect(d) never decreases as d grows.
    #[test]
    fn prop_total_cost_is_monotonic(
        a in wan(),
        b in wan(),
        equipment in wan(),
        cooperation in wan(),
    ) {
        let calc = IndirectCostCalculator::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let f = |d: Decimal| d + calc.indirect_for(d, equipment, cooperation);
        prop_assert!(f(lo) <= f(hi));
    }

    /// The bracket converges and its left end always fits into the total.
    #[test]
    fn prop_bisection_converges(total in wan(), equipment in wan(), cooperation in wan()) {
        let calc = IndirectCostCalculator::default();
        let bracket = calc.bisect(&input(total, equipment, cooperation)).unwrap();

        prop_assert!(bracket.right - bracket.left <= TOLERANCE);
        prop_assert!(bracket.left >= Decimal::ZERO);
        prop_assert!(
            bracket.left + calc.indirect_for(bracket.left, equipment, cooperation) <= total
        );
    }

    /// The maximum indirect cost is never negative and never exceeds the total.
    #[test]
    fn prop_result_within_total(total in wan(), equipment in wan(), cooperation in wan()) {
        let result = IndirectCostCalculator::default()
            .calculate(&input(total, equipment, cooperation))
            .unwrap();
        prop_assert!(result.max_indirect >= Decimal::ZERO);
        prop_assert!(result.max_indirect <= total);
    }
}
