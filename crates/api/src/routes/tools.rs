//! Stateless calculators.

use axum::{Json, Router, extract::State, routing::post};
use fundtrack_core::indirect::{
    IndirectCostCalculator, IndirectCostInput, IndirectCostResult, Rates,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the calculator routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/tools/indirect-cost", post(indirect_cost))
}

/// Calculator request. Amounts are in wan, rates in percent.
#[derive(Debug, Deserialize)]
pub struct IndirectCostRequest {
    /// Totals to solve for.
    #[serde(flatten)]
    pub input: IndirectCostInput,
    /// Overrides the configured rates.
    pub rates: Option<Rates>,
}

/// Calculator response with the rates actually applied.
#[derive(Debug, Serialize)]
pub struct IndirectCostResponse {
    /// Solution.
    #[serde(flatten)]
    pub result: IndirectCostResult,
    /// Rates used.
    pub rates: Rates,
}

/// POST `/tools/indirect-cost`
async fn indirect_cost(
    State(state): State<AppState>,
    Json(request): Json<IndirectCostRequest>,
) -> ApiResult<Json<IndirectCostResponse>> {
    let rates = match request.rates {
        Some(rates) => Rates::new(rates.first, rates.second, rates.third)?,
        None => {
            let configured = &state.config.calculator;
            Rates::new(
                Decimal::from(configured.rate1),
                Decimal::from(configured.rate2),
                Decimal::from(configured.rate3),
            )?
        }
    };
    let result = IndirectCostCalculator::new(rates).calculate(&request.input)?;
    debug!(
        total = %request.input.total,
        max_indirect = %result.max_indirect,
        iterations = result.iterations,
        "indirect cost calculated"
    );
    Ok(Json(IndirectCostResponse { result, rates }))
}
