//! Bisection over the direct cost.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::IndirectCostError;

/// Bracket width at which the search stops, in wan.
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

const FIRST_BAND: Decimal = Decimal::from_parts(500, 0, 0, false, 0);
const SECOND_BAND: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);
// 10^12 wan; keeps every intermediate product far from Decimal's limits.
const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);
const MAX_ITERATIONS: u32 = 128;

/// Marginal rates in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rates {
    /// Rate on the part of the base up to 500 wan.
    pub first: Decimal,
    /// Rate on the part between 500 and 1000 wan.
    pub second: Decimal,
    /// Rate on the part above 1000 wan.
    pub third: Decimal,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            first: Decimal::from(20),
            second: Decimal::from(15),
            third: Decimal::from(13),
        }
    }
}

impl Rates {
    /// Builds a rate schedule, rejecting rates outside 0..=100.
    pub fn new(first: Decimal, second: Decimal, third: Decimal) -> Result<Self, IndirectCostError> {
        for rate in [first, second, third] {
            if rate.is_sign_negative() || rate > Decimal::ONE_HUNDRED {
                return Err(IndirectCostError::InvalidRate(rate));
            }
        }
        Ok(Self {
            first,
            second,
            third,
        })
    }
}

/// Calculator input, all in wan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndirectCostInput {
    /// Total funds.
    pub total: Decimal,
    /// Equipment purchases, excluded from the indirect-cost base.
    #[serde(default)]
    pub equipment: Decimal,
    /// External cooperation, excluded from the indirect-cost base.
    #[serde(default)]
    pub cooperation: Decimal,
}

impl IndirectCostInput {
    fn validate(&self) -> Result<(), IndirectCostError> {
        for (field, value) in [
            ("total", self.total),
            ("equipment", self.equipment),
            ("cooperation", self.cooperation),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(IndirectCostError::NegativeInput { field, value });
            }
            if value > MAX_AMOUNT {
                return Err(IndirectCostError::TooLarge { field, value });
            }
        }
        Ok(())
    }
}

/// Final search bracket: `left` satisfies `left + indirect(left) <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    /// Largest direct cost known to fit.
    pub left: Decimal,
    /// Smallest direct cost known not to fit (or the total).
    pub right: Decimal,
    /// Halvings performed.
    pub iterations: u32,
}

/// Calculator output, in wan rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndirectCostResult {
    /// Largest indirect cost the total can carry.
    pub max_indirect: Decimal,
    /// Direct cost at the solution.
    pub direct_cost: Decimal,
    /// Indirect cost the schedule assigns to `direct_cost`.
    pub indirect_at_direct: Decimal,
    /// Halvings performed.
    pub iterations: u32,
}

/// Tiered indirect-cost calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndirectCostCalculator {
    rates: Rates,
}

impl IndirectCostCalculator {
    /// Creates a calculator with the given schedule.
    #[must_use]
    pub const fn new(rates: Rates) -> Self {
        Self { rates }
    }

    /// The rate schedule in use.
    #[must_use]
    pub const fn rates(&self) -> Rates {
        self.rates
    }

    /// Indirect cost for a direct cost `direct`.
    ///
    /// The base is `direct - equipment - cooperation`, clamped at zero.
    #[must_use]
    pub fn indirect_for(
        &self,
        direct: Decimal,
        equipment: Decimal,
        cooperation: Decimal,
    ) -> Decimal {
        let base = (direct - equipment - cooperation).max(Decimal::ZERO);
        let charge = |amount: Decimal, rate: Decimal| amount * rate / Decimal::ONE_HUNDRED;
        let Rates {
            first,
            second,
            third,
        } = self.rates;

        if base <= FIRST_BAND {
            charge(base, first)
        } else if base <= SECOND_BAND {
            charge(FIRST_BAND, first) + charge(base - FIRST_BAND, second)
        } else {
            charge(FIRST_BAND, first)
                + charge(SECOND_BAND - FIRST_BAND, second)
                + charge(base - SECOND_BAND, third)
        }
    }

    /// Runs the bisection on `[0, total]` until the bracket is at most
    /// [`TOLERANCE`] wide.
    pub fn bisect(&self, input: &IndirectCostInput) -> Result<Bracket, IndirectCostError> {
        input.validate()?;

        let two = Decimal::from(2);
        let mut left = Decimal::ZERO;
        let mut right = input.total;
        let mut iterations = 0;
        while right - left > TOLERANCE && iterations < MAX_ITERATIONS {
            let mid = (left + right) / two;
            if mid + self.indirect_for(mid, input.equipment, input.cooperation) > input.total {
                right = mid;
            } else {
                left = mid;
            }
            iterations += 1;
        }

        Ok(Bracket {
            left,
            right,
            iterations,
        })
    }

    /// Largest indirect cost `total` can carry.
    pub fn calculate(
        &self,
        input: &IndirectCostInput,
    ) -> Result<IndirectCostResult, IndirectCostError> {
        let bracket = self.bisect(input)?;
        let direct = bracket.left;
        let indirect = self.indirect_for(direct, input.equipment, input.cooperation);

        tracing::debug!(
            total = %input.total,
            direct = %direct,
            iterations = bracket.iterations,
            "indirect cost bisection finished"
        );

        Ok(IndirectCostResult {
            max_indirect: (input.total - direct).round_dp(2),
            direct_cost: direct.round_dp(2),
            indirect_at_direct: indirect.round_dp(2),
            iterations: bracket.iterations,
        })
    }
}
