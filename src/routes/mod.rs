pub mod applications;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod profile;
pub mod stats;

use axum::{
    response::Json,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::dto::application_dto::{CreateApplicationPayload, UpdateStatusPayload};
use crate::dto::auth_dto::{
    AuthResponse, LoginPayload, RegisterPayload, UpdateProfilePayload, UserResponse,
};
use crate::dto::job_dto::{CreateJobPayload, UpdateJobPayload};
use crate::middleware::{
    auth::require_bearer_auth,
    cors::api_cors,
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::models::{
    application::{Application, ApplicationStatus},
    job::Job,
    stats::Stats,
    user::AccountKind,
};
use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register,
        auth::login,
        auth::me,
        profile::update_profile,
        jobs::list_jobs,
        jobs::get_job,
        jobs::list_my_jobs,
        jobs::create_job,
        jobs::update_job,
        jobs::delete_job,
        applications::apply,
        applications::list_applications,
        applications::update_status,
        stats::get_stats,
    ),
    components(schemas(
        AccountKind,
        ApplicationStatus,
        Application,
        Job,
        Stats,
        RegisterPayload,
        LoginPayload,
        UpdateProfilePayload,
        UserResponse,
        AuthResponse,
        CreateJobPayload,
        UpdateJobPayload,
        CreateApplicationPayload,
        UpdateStatusPayload,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Full application router. Public and authenticated groups are rate limited separately.
pub fn api_router(state: AppState) -> Router {
    let config = state.config.clone();

    let public_api = Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/:id", get(jobs::get_job))
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(config.public_rps),
            rps_middleware,
        ));

    let authed_api = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/profile", put(profile::update_profile))
        .route("/api/jobs/mine", get(jobs::list_my_jobs))
        .route("/api/jobs", post(jobs::create_job))
        .route(
            "/api/jobs/:id",
            put(jobs::update_job).delete(jobs::delete_job),
        )
        .route("/api/jobs/:id/apply", post(applications::apply))
        .route("/api/applications", get(applications::list_applications))
        .route(
            "/api/applications/:id/status",
            put(applications::update_status),
        )
        .route("/api/stats", get(stats::get_stats))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer_auth,
        ))
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(config.api_rps),
            rps_middleware,
        ));

    public_api
        .merge(authed_api)
        .with_state(state)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
}
