//! Request extractors.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::AppState;

/// Header naming the person making a change.
pub const OPERATOR_HEADER: &str = "x-operator";

/// Operator recorded in the activity log.
///
/// Taken from the `X-Operator` header (UTF-8); requests without one are
/// attributed to the configured default operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator(pub String);

impl Operator {
    /// The operator's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl FromRequestParts<AppState> for Operator {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(OPERATOR_HEADER)
            .and_then(|h| std::str::from_utf8(h.as_bytes()).ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| state.config.operator.default_name.clone(), ToString::to_string);
        Ok(Self(name))
    }
}
