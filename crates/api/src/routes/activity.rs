//! Activity log route.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use fundtrack_core::audit::{ActionKind, ActivityFilter, ActivityRecord, EntityKind};
use fundtrack_db::ActivityLogRepository;
use fundtrack_shared::types::{PageRequest, PageResponse, ProjectId};
use serde::Deserialize;

use crate::AppState;
use crate::error::{ApiError, ApiResult};

/// Creates the activity log routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/activity-log", get(list_activity))
}

/// Query string for the activity log.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    /// Only entries for this project.
    pub project_id: Option<ProjectId>,
    /// Entity code, e.g. `expense`.
    pub entity: Option<String>,
    /// Action code, e.g. `delete`.
    pub action: Option<String>,
    /// Page number, from 1.
    pub page: Option<u32>,
    /// Entries per page.
    pub per_page: Option<u32>,
}

impl ActivityQuery {
    fn split(self) -> ApiResult<(ActivityFilter, PageRequest)> {
        let entity = parse_code(self.entity.as_deref(), "entity", EntityKind::parse)?;
        let action = parse_code(self.action.as_deref(), "action", ActionKind::parse)?;
        let defaults = PageRequest::default();
        let page = PageRequest {
            page: self.page.unwrap_or(defaults.page).max(1),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        };
        Ok((
            ActivityFilter {
                project_id: self.project_id,
                entity,
                action,
            },
            page,
        ))
    }
}

fn parse_code<T>(
    raw: Option<&str>,
    field: &str,
    parse: fn(&str) -> Option<T>,
) -> ApiResult<Option<T>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(code) => parse(code)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request(format!("unknown {field} '{code}'"))),
    }
}

/// GET `/activity-log`
///
/// Newest entries first.
async fn list_activity(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Json<PageResponse<ActivityRecord>>> {
    let (filter, page) = query.split()?;
    let records = ActivityLogRepository::new(state.db.clone())
        .list(&filter, &page)
        .await?;
    Ok(Json(records))
}
