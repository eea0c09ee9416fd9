//! HTTP handlers
//!
//! Thin wrappers that extract the request, call one engine operation on the
//! blocking pool and serialize the result.

use super::error::ApiError;
use super::state::AppState;
use crate::auth::{Caller, Role};
use crate::core::{ArchiveRecord, EntryUpdate, QueueEntry};
use crate::engine::JoinRequest;
use crate::report::{RangeSpec, ReportQuery, ReportSummary};
use crate::storage::QueueStore;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Header carrying the caller's role
pub const ROLE_HEADER: &str = "x-queue-role";
/// Header carrying the caller's name
pub const OPERATOR_HEADER: &str = "x-queue-operator";

/// Identity set by the upstream identity provider; anonymous callers are public
fn caller_from_headers(headers: &HeaderMap) -> ApiResult<Caller> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    let role = match header(ROLE_HEADER) {
        Some(role) => role.parse::<Role>()?,
        None => Role::Public,
    };
    Ok(Caller::with_role(
        header(OPERATOR_HEADER).map(str::to_string),
        role,
    ))
}

#[derive(Debug, Serialize)]
pub struct QueueListing {
    pub operating_day: chrono::NaiveDate,
    pub count: usize,
    pub entries: Vec<QueueEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default, rename = "priorityFirst", alias = "priority_first")]
    pub priority_first: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub preset: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportListing {
    pub sort: String,
    pub count: usize,
    pub records: Vec<ArchiveRecord>,
}

#[derive(Debug, Serialize)]
pub struct Cleared {
    pub removed: usize,
}

pub async fn join<S: QueueStore + 'static>(
    State(state): State<AppState<S>>,
    request: Result<Json<JoinRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<QueueEntry>)> {
    let Json(request) = request?;
    let entry = state.run(move |engine| engine.join(request)).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn list<S: QueueStore + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<QueueListing>> {
    let listing = state
        .run(move |engine| {
            let entries = if params.priority_first {
                engine.list_serving_order()?
            } else {
                engine.list_active()?
            };
            Ok(QueueListing {
                operating_day: engine.today(),
                count: entries.len(),
                entries,
            })
        })
        .await?;
    Ok(Json(listing))
}

pub async fn show<S: QueueStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<QueueEntry>> {
    let entry = state.run(move |engine| engine.find_entry(&id)).await?;
    Ok(Json(entry))
}

pub async fn update<S: QueueStore + 'static>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    fields: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Json<QueueEntry>> {
    let caller = caller_from_headers(&headers)?;
    caller.require_staff("update")?;
    let Json(fields) = fields?;
    let entry = state
        .run(move |engine| {
            let update = EntryUpdate::from_json(&fields, engine.config().max_name_length)?;
            let entry = engine.find_entry(&id)?;
            engine.update_entry(&caller, &entry.id, &update)
        })
        .await?;
    Ok(Json(entry))
}

pub async fn serve<S: QueueStore + 'static>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<QueueEntry>> {
    let caller = caller_from_headers(&headers)?;
    caller.require_staff("serve")?;
    let entry = state
        .run(move |engine| {
            let entry = engine.find_entry(&id)?;
            engine.advance_to_serving(&caller, &entry.id)
        })
        .await?;
    Ok(Json(entry))
}

pub async fn complete<S: QueueStore + 'static>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<ArchiveRecord>> {
    let caller = caller_from_headers(&headers)?;
    caller.require_staff("complete")?;
    let record = state
        .run(move |engine| {
            let entry = engine.find_entry(&id)?;
            engine.complete_serving(&caller, &entry.id)
        })
        .await?;
    Ok(Json(record))
}

pub async fn no_show<S: QueueStore + 'static>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<QueueEntry>> {
    let caller = caller_from_headers(&headers)?;
    caller.require_staff("no-show")?;
    let entry = state
        .run(move |engine| {
            let entry = engine.find_entry(&id)?;
            engine.mark_no_show(&caller, &entry.id)
        })
        .await?;
    Ok(Json(entry))
}

pub async fn delete<S: QueueStore + 'static>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<QueueEntry>> {
    let caller = caller_from_headers(&headers)?;
    caller.require_staff("delete")?;
    let entry = state
        .run(move |engine| {
            let entry = engine.find_entry(&id)?;
            engine.delete_entry(&caller, &entry.id)
        })
        .await?;
    Ok(Json(entry))
}

pub async fn clear<S: QueueStore + 'static>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> ApiResult<Json<Cleared>> {
    let caller = caller_from_headers(&headers)?;
    let removed = state.run(move |engine| engine.clear_queue(&caller)).await?;
    Ok(Json(Cleared { removed }))
}

pub async fn reports<S: QueueStore + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<ReportParams>,
) -> ApiResult<Json<ReportListing>> {
    let listing = state
        .run(move |engine| {
            let query = ReportQuery::from_params(
                params.from.as_deref(),
                params.to.as_deref(),
                params.preset.as_deref(),
                params.sort.as_deref(),
            )?;
            let records = engine.reports(&query)?;
            Ok(ReportListing {
                sort: query.sort.to_string(),
                count: records.len(),
                records,
            })
        })
        .await?;
    Ok(Json(listing))
}

pub async fn report_summary<S: QueueStore + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<ReportParams>,
) -> ApiResult<Json<ReportSummary>> {
    let summary = state
        .run(move |engine| {
            let range = RangeSpec::from_params(
                params.from.as_deref(),
                params.to.as_deref(),
                params.preset.as_deref(),
            )?;
            engine.report_summary(&range)
        })
        .await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_missing_headers_mean_public() {
        let caller = caller_from_headers(&HeaderMap::new()).unwrap();
        assert_eq!(caller, Caller::public());
    }

    #[test]
    fn test_headers_carry_identity() {
        let mut headers = HeaderMap::new();
        headers.insert(ROLE_HEADER, HeaderValue::from_static("staff"));
        headers.insert(OPERATOR_HEADER, HeaderValue::from_static("desk-2"));

        let caller = caller_from_headers(&headers).unwrap();
        assert_eq!(caller, Caller::staff("desk-2"));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(ROLE_HEADER, HeaderValue::from_static("root"));
        assert!(caller_from_headers(&headers).is_err());
    }
}
