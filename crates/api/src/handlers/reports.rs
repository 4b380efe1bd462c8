//! Handlers for the `/reports` resource (proposals under consensus).

use agora_core::consensus::validate_consensus_status;
use agora_core::error::CoreError;
use agora_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use agora_core::roles::{is_admin_role, Capability};
use agora_core::types::DbId;
use agora_db::models::report::{CreateReport, Report, ReportFilter, UpdateReport};
use agora_db::repositories::ReportRepo;
use agora_db::DbPool;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::access::{is_member, require_capability};
use crate::error::{AppError, AppResult};
use crate::handlers::workgroups::ensure_workgroup_exists;
use crate::middleware::rbac::RequireAuth;
use crate::query::ReportListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /reports`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 20000))]
    pub content: String,
    pub workgroup_id: Option<DbId>,
}

/// Request body for `PUT /reports/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReportRequest {
    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 20000))]
    pub content: Option<String>,
}

/// Verify that a report exists, returning it.
pub async fn ensure_report_exists(pool: &DbPool, id: DbId) -> AppResult<Report> {
    ReportRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))
}

/// POST /api/v1/reports
///
/// Create a report. Filing it under a workgroup requires membership there
/// (or a global admin role).
pub async fn create_report(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(mut input): Json<CreateReportRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Report>>)> {
    input.title = input.title.trim().to_string();
    input.validate()?;

    if let Some(workgroup_id) = input.workgroup_id {
        ensure_workgroup_exists(&state.pool, workgroup_id).await?;
        if !is_admin_role(&user.role) && !is_member(&state.pool, &user, workgroup_id).await? {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only workgroup members can file reports in this workgroup".into(),
            )));
        }
    }

    let create_dto = CreateReport {
        title: input.title,
        content: input.content,
        workgroup_id: input.workgroup_id,
        created_by: user.user_id,
    };
    let report = ReportRepo::create(&state.pool, &create_dto).await?;

    tracing::info!(
        user_id = user.user_id,
        report_id = report.id,
        workgroup_id = ?report.workgroup_id,
        "Report created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

/// GET /api/v1/reports
///
/// Paginated listing, newest first, optionally filtered by workgroup and
/// consensus status.
pub async fn list_reports(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ReportListParams>,
) -> AppResult<Json<DataResponse<Vec<Report>>>> {
    if let Some(status) = params.consensus_status.as_deref() {
        validate_consensus_status(status)?;
    }

    let filter = ReportFilter {
        workgroup_id: params.workgroup_id,
        consensus_status: params.consensus_status,
        limit: clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        offset: clamp_offset(params.offset),
    };
    let reports = ReportRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: reports }))
}

/// GET /api/v1/reports/{report_id}
pub async fn get_report(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Report>>> {
    let report = ensure_report_exists(&state.pool, report_id).await?;
    Ok(Json(DataResponse { data: report }))
}

/// PUT /api/v1/reports/{report_id}
///
/// Edit title and/or content. Allowed for the author and for anyone who
/// manages consensus on the report.
pub async fn update_report(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(report_id): Path<DbId>,
    Json(mut input): Json<UpdateReportRequest>,
) -> AppResult<Json<DataResponse<Report>>> {
    if let Some(title) = input.title.as_mut() {
        *title = title.trim().to_string();
    }
    input.validate()?;

    let report = ensure_report_exists(&state.pool, report_id).await?;
    if report.created_by != user.user_id {
        require_capability(
            &state.pool,
            &user,
            report.workgroup_id,
            Capability::ManageConsensus,
            "edit this report",
        )
        .await?;
    }

    let update_dto = UpdateReport {
        title: input.title,
        content: input.content,
    };
    let updated = ReportRepo::update(&state.pool, report_id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id: report_id,
        }))?;

    tracing::info!(user_id = user.user_id, report_id, "Report updated");

    Ok(Json(DataResponse { data: updated }))
}
