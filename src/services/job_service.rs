use std::sync::Arc;

use crate::database::Store;
use crate::dto::job_dto::{CreateJobPayload, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{Job, JobFilters};
use crate::services::authorization::{self, Actor};

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn Store>,
}

impl JobService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Public listing: only active jobs, whatever the caller asked for.
    pub async fn list_public(&self, mut filters: JobFilters) -> Result<Vec<Job>> {
        filters.is_active = Some(true);
        filters.user_id = None;
        self.store.get_jobs(&filters).await
    }

    /// Public detail: no active check, and every successful fetch counts as a view.
    pub async fn get_public(&self, id: i64) -> Result<Job> {
        self.store
            .get_job_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    /// All of a company's postings, inactive ones included.
    pub async fn list_owned(&self, actor: &Actor) -> Result<Vec<Job>> {
        authorization::require_company(actor)?;
        self.store.get_jobs_by_user(actor.id).await
    }

    pub async fn create(&self, actor: Actor, payload: CreateJobPayload) -> Result<Job> {
        authorization::require_company(&actor)?;
        let actor = authorization::verify_actor(self.store.as_ref(), actor).await?;

        let job = self.store.create_job(payload.into_new_job(actor.id)).await?;
        tracing::info!(job_id = job.id, owner = actor.id, "job created");
        Ok(job)
    }

    pub async fn update(&self, actor: Actor, id: i64, payload: UpdateJobPayload) -> Result<Job> {
        authorization::require_company(&actor)?;
        let actor = authorization::verify_actor(self.store.as_ref(), actor).await?;

        let existing = self.store.peek_job(id).await?;
        authorization::ensure_job_owner(&actor, existing, "update")?;

        let job = self
            .store
            .update_job(id, payload.into())
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        tracing::info!(job_id = job.id, "job updated");
        Ok(job)
    }

    pub async fn delete(&self, actor: Actor, id: i64) -> Result<()> {
        authorization::require_company(&actor)?;
        let actor = authorization::verify_actor(self.store.as_ref(), actor).await?;

        let existing = self.store.peek_job(id).await?;
        authorization::ensure_job_owner(&actor, existing, "delete")?;

        if !self.store.delete_job(id).await? {
            return Err(Error::NotFound("Job not found".to_string()));
        }
        tracing::info!(job_id = id, "job deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemStore;
    use crate::models::user::{AccountKind, NewUser};

    async fn seed_user(store: &MemStore, email: &str, kind: AccountKind) -> Actor {
        let user = store
            .create_user(NewUser {
                email: email.into(),
                password: "hash".into(),
                name: email.into(),
                kind,
                company: None,
                title: None,
                location: None,
                bio: None,
                avatar: None,
            })
            .await
            .unwrap();
        Actor::new(user.id, user.kind)
    }

    fn payload(title: &str) -> CreateJobPayload {
        CreateJobPayload {
            title: title.into(),
            company: "Acme".into(),
            company_logo: None,
            location: "Remote".into(),
            employment_type: "Full-time".into(),
            salary: Some("$100k".into()),
            description: "Build services".into(),
            requirements: "Rust".into(),
            is_active: None,
            tags: Some(vec!["rust".into()]),
        }
    }

    async fn setup() -> (Arc<MemStore>, JobService, Actor, Actor, Actor) {
        let store = Arc::new(MemStore::new());
        let acme = seed_user(&store, "acme@example.com", AccountKind::Company).await;
        let globex = seed_user(&store, "globex@example.com", AccountKind::Company).await;
        let ann = seed_user(&store, "ann@example.com", AccountKind::Candidate).await;
        let service = JobService::new(store.clone());
        (store, service, acme, globex, ann)
    }

    #[tokio::test]
    async fn only_companies_create_and_own_what_they_create() {
        let (_, service, acme, _, ann) = setup().await;
        let job = service.create(acme, payload("Dev")).await.unwrap();
        assert_eq!(job.user_id, acme.id);
        assert!(job.is_active);

        let err = service.create(ann, payload("Dev")).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn foreign_job_is_forbidden_and_missing_job_is_not_found() {
        let (_, service, acme, globex, _) = setup().await;
        let job = service.create(acme, payload("Dev")).await.unwrap();

        let err = service
            .update(globex, job.id, UpdateJobPayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        assert!(matches!(
            service.delete(globex, job.id).await.unwrap_err(),
            Error::Forbidden(_)
        ));
        assert!(matches!(
            service.delete(globex, 999).await.unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn owner_updates_keep_created_at_and_checks_do_not_count_views() {
        let (store, service, acme, _, _) = setup().await;
        let job = service.create(acme, payload("Dev")).await.unwrap();

        let updated = service
            .update(
                acme,
                job.id,
                UpdateJobPayload {
                    title: Some("Staff Dev".into()),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Staff Dev");
        assert!(!updated.is_active);
        assert_eq!(updated.created_at, job.created_at);
        assert_eq!(store.view_count(job.id).await.unwrap(), 0);

        service.delete(acme, job.id).await.unwrap();
        assert!(matches!(
            service.get_public(job.id).await.unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn public_listing_hides_inactive_jobs_but_detail_does_not() {
        let (store, service, acme, _, _) = setup().await;
        let open = service.create(acme, payload("Open role")).await.unwrap();
        let mut closed = payload("Closed role");
        closed.is_active = Some(false);
        let closed = service.create(acme, closed).await.unwrap();

        let listed = service.list_public(JobFilters::default()).await.unwrap();
        assert_eq!(listed.iter().map(|j| j.id).collect::<Vec<_>>(), vec![open.id]);

        assert_eq!(service.get_public(closed.id).await.unwrap().id, closed.id);
        assert_eq!(store.view_count(closed.id).await.unwrap(), 1);

        let mine = service.list_owned(&acme).await.unwrap();
        assert_eq!(mine.len(), 2);
    }

    #[tokio::test]
    async fn detail_fetch_counts_each_view() {
        let (store, service, acme, _, _) = setup().await;
        let job = service.create(acme, payload("Dev")).await.unwrap();
        for _ in 0..5 {
            service.get_public(job.id).await.unwrap();
        }
        assert_eq!(store.view_count(job.id).await.unwrap(), 5);
    }
}
