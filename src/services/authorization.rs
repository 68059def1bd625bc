//! Who may do what. Every gate runs before the store is mutated.

use crate::database::Store;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::application::ApplicationStatus;
use crate::models::job::Job;
use crate::models::user::AccountKind;

/// The identity an operation is performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub kind: AccountKind,
}

impl Actor {
    pub fn new(id: i64, kind: AccountKind) -> Self {
        Self { id, kind }
    }

    pub fn from_claims(claims: &Claims) -> Result<Self> {
        Ok(Self::new(claims.user_id()?, claims.kind))
    }

    pub fn is_company(&self) -> bool {
        self.kind == AccountKind::Company
    }
}

/// Re-reads the account behind a token so stale claims cannot authorize a mutation.
pub async fn verify_actor(store: &dyn Store, actor: Actor) -> Result<Actor> {
    let Some(user) = store.get_user_by_id(actor.id).await? else {
        tracing::warn!(user_id = actor.id, "token refers to an unknown account");
        return Err(Error::Unauthorized("Account no longer exists".to_string()));
    };
    if user.kind != actor.kind {
        tracing::warn!(
            user_id = actor.id,
            claimed = %actor.kind,
            stored = %user.kind,
            "token account kind is stale"
        );
        return Err(Error::Unauthorized(
            "Token no longer matches the account".to_string(),
        ));
    }
    Ok(actor)
}

pub fn require_company(actor: &Actor) -> Result<()> {
    if actor.kind == AccountKind::Company {
        Ok(())
    } else {
        Err(Error::Forbidden(
            "Access denied. Company access required.".to_string(),
        ))
    }
}

pub fn require_candidate(actor: &Actor) -> Result<()> {
    if actor.kind == AccountKind::Candidate {
        Ok(())
    } else {
        Err(Error::Forbidden(
            "Access denied. Candidate access required.".to_string(),
        ))
    }
}

/// Existence first, ownership second: a foreign job is Forbidden, a missing one NotFound.
pub fn ensure_job_owner(actor: &Actor, job: Option<Job>, action: &str) -> Result<Job> {
    let job = job.ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
    if job.user_id != actor.id {
        tracing::warn!(actor = actor.id, job_id = job.id, action, "job ownership check failed");
        return Err(Error::Forbidden(format!(
            "You do not have permission to {} this job",
            action
        )));
    }
    Ok(job)
}

pub fn ensure_open_for_applications(job: Option<Job>) -> Result<Job> {
    match job {
        Some(job) if job.is_active => Ok(job),
        _ => Err(Error::NotFound("Job not found or not active".to_string())),
    }
}

pub fn parse_status(raw: Option<&str>) -> Result<ApplicationStatus> {
    raw.and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::BadRequest("Invalid status value".to_string()))
}
