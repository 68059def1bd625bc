//! Storage capability shared by every backend.
//!
//! Absence is reported through `Option`/`bool`, never as an error; callers decide
//! whether a missing row means "not found" or "forbidden". Errors from a store are
//! backend failures, plus `Conflict` when a duplicate application slips past the
//! caller's own check.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::application::{Application, ApplicationStatus, NewApplication};
use crate::models::job::{Job, JobChanges, JobFilters, NewJob};
use crate::models::user::{NewUser, User, UserChanges};

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts without checking email uniqueness; registration checks first.
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    /// Case-insensitive lookup.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>>;

    /// Sets `created_at`, defaults `is_active` to true and starts the view counter at 0.
    async fn create_job(&self, job: NewJob) -> Result<Job>;
    /// Jobs matching every filter, newest first.
    async fn get_jobs(&self, filters: &JobFilters) -> Result<Vec<Job>>;
    /// Read without recording a view.
    async fn peek_job(&self, id: i64) -> Result<Option<Job>>;
    /// Increments the counter of an existing job. Returns false when the id is unknown.
    async fn record_view(&self, id: i64) -> Result<bool>;
    async fn update_job(&self, id: i64, changes: JobChanges) -> Result<Option<Job>>;
    /// Applications and the view counter of the job are left in place.
    async fn delete_job(&self, id: i64) -> Result<bool>;

    /// Always stores the application as pending.
    async fn create_application(&self, application: NewApplication) -> Result<Application>;
    async fn get_application(&self, id: i64) -> Result<Option<Application>>;
    async fn get_applications(
        &self,
        job_id: Option<i64>,
        user_id: Option<i64>,
    ) -> Result<Vec<Application>>;
    async fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<Application>>;

    /// Snapshot of every view counter, including those of deleted jobs.
    async fn view_counts(&self) -> Result<HashMap<i64, u64>>;

    async fn view_count(&self, job_id: i64) -> Result<u64> {
        Ok(self.view_counts().await?.get(&job_id).copied().unwrap_or(0))
    }

    /// Public detail read: records a view, then returns the job.
    async fn get_job_by_id(&self, id: i64) -> Result<Option<Job>> {
        if !self.record_view(id).await? {
            return Ok(None);
        }
        self.peek_job(id).await
    }

    async fn get_jobs_by_user(&self, user_id: i64) -> Result<Vec<Job>> {
        self.get_jobs(&JobFilters::owned_by(user_id)).await
    }
}
