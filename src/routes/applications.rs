use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::application_dto::{ApplicationListQuery, CreateApplicationPayload, UpdateStatusPayload},
    error::Result,
    middleware::auth::Claims,
    models::application::Application,
    services::authorization::Actor,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/apply",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    request_body = CreateApplicationPayload,
    responses(
        (status = 201, description = "Application submitted", body = Application),
        (status = 400, description = "Invalid payload for an open job"),
        (status = 403, description = "Not a candidate account"),
        (status = 404, description = "Job not found or not active"),
        (status = 409, description = "Already applied")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(job_id): Path<i64>,
    Json(payload): Json<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    let actor = Actor::from_claims(&claims)?;
    let application = state
        .application_service
        .apply(actor, job_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/api/applications",
    params(
        ("jobId" = Option<i64>, Query, description = "Narrow a company's listing to one of its jobs")
    ),
    responses(
        (status = 200, description = "Applications visible to the caller", body = [Application]),
        (status = 403, description = "Job belongs to another company")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let actor = Actor::from_claims(&claims)?;
    let applications = state
        .application_service
        .list_for(&actor, query.job_id)
        .await?;
    Ok(Json(applications))
}

#[utoipa::path(
    put,
    path = "/api/applications/{id}/status",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status changed", body = Application),
        (status = 400, description = "Status is not one of the known values"),
        (status = 403, description = "Application is on another company's job"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    let actor = Actor::from_claims(&claims)?;
    let application = state
        .application_service
        .update_status(actor, id, payload.status.as_deref())
        .await?;
    Ok(Json(application))
}
