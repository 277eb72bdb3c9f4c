//! Maximum indirect cost for a funding total.
//!
//! Indirect cost is charged on the direct cost net of equipment purchases and
//! external cooperation, at marginal rates for the bands `[0, 500]`,
//! `(500, 1000]` and above 1000 (all in wan). Given a funding total `T`, the
//! calculator finds the direct cost `d` with `d + indirect(d) = T` by
//! bisection and reports `T - d` as the largest indirect cost the total can
//! carry.

mod calculator;
mod error;

#[cfg(test)]
mod tests;

pub use calculator::{
    Bracket, IndirectCostCalculator, IndirectCostInput, IndirectCostResult, Rates, TOLERANCE,
};
pub use error::IndirectCostError;
