use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Submission body. `jobId`, `userId` and `status` are taken from the route,
/// the actor and the pending default respectively.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationPayload {
    #[validate(length(min = 1))]
    pub resume: String,
    pub cover_letter: Option<String>,
}

/// Raw status string, parsed against the enumerated set by the service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusPayload {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationListQuery {
    pub job_id: Option<i64>,
}
