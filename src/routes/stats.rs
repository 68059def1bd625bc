use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    error::Result, middleware::auth::Claims, models::stats::Stats, services::authorization::Actor,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Dashboard counts scoped to the caller", body = Stats)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let actor = Actor::from_claims(&claims)?;
    let stats = state.stats_service.get_stats(Some(actor.id)).await?;
    Ok(Json(stats))
}
