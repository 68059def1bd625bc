use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::auth_dto::{UpdateProfilePayload, UserResponse},
    error::Result,
    middleware::auth::Claims,
    services::authorization::Actor,
    AppState,
};

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Account no longer exists")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let actor = Actor::from_claims(&claims)?;
    let user = state.auth_service.update_profile(&actor, payload).await?;
    Ok(Json(UserResponse::from(user)))
}
