use std::sync::Arc;

use crate::database::Store;
use crate::dto::application_dto::CreateApplicationPayload;
use crate::error::{Error, Result};
use crate::models::application::{Application, NewApplication};
use crate::models::user::AccountKind;
use crate::services::authorization::{self, Actor};
use validator::Validate;

#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn Store>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn apply(
        &self,
        actor: Actor,
        job_id: i64,
        payload: CreateApplicationPayload,
    ) -> Result<Application> {
        authorization::require_candidate(&actor)?;
        let actor = authorization::verify_actor(self.store.as_ref(), actor).await?;

        let job = self.store.peek_job(job_id).await?;
        authorization::ensure_open_for_applications(job)?;
        payload.validate()?;

        let existing = self
            .store
            .get_applications(Some(job_id), Some(actor.id))
            .await?;
        if !existing.is_empty() {
            return Err(Error::Conflict(
                "You have already applied for this job".to_string(),
            ));
        }

        let application = self
            .store
            .create_application(NewApplication {
                job_id,
                user_id: actor.id,
                resume: payload.resume,
                cover_letter: payload.cover_letter,
            })
            .await?;
        tracing::info!(
            application_id = application.id,
            job_id,
            applicant = actor.id,
            "application submitted"
        );
        Ok(application)
    }

    /// Companies see applications on their own jobs, grouped by job (newest job
    /// first, then newest application first). Candidates always get every
    /// application they submitted; `job_id` only narrows a company's view.
    pub async fn list_for(&self, actor: &Actor, job_id: Option<i64>) -> Result<Vec<Application>> {
        match actor.kind {
            AccountKind::Company => {
                let owned = self.store.get_jobs_by_user(actor.id).await?;

                if let Some(job_id) = job_id {
                    if !owned.iter().any(|job| job.id == job_id) {
                        tracing::warn!(actor = actor.id, job_id, "application listing denied");
                        return Err(Error::Forbidden(
                            "You do not have permission to view these applications".to_string(),
                        ));
                    }
                    return self.store.get_applications(Some(job_id), None).await;
                }

                let mut applications = Vec::new();
                for job in owned {
                    applications.extend(self.store.get_applications(Some(job.id), None).await?);
                }
                Ok(applications)
            }
            AccountKind::Candidate => self.store.get_applications(None, Some(actor.id)).await,
        }
    }

    /// Any status may follow any other; only the company owning the job may change it.
    pub async fn update_status(
        &self,
        actor: Actor,
        application_id: i64,
        status: Option<&str>,
    ) -> Result<Application> {
        authorization::require_company(&actor)?;
        let status = authorization::parse_status(status)?;
        let actor = authorization::verify_actor(self.store.as_ref(), actor).await?;

        let application = self
            .store
            .get_application(application_id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        let job = self.store.peek_job(application.job_id).await?;
        if job.map_or(true, |job| job.user_id != actor.id) {
            tracing::warn!(
                actor = actor.id,
                application_id,
                "application status update denied"
            );
            return Err(Error::Forbidden(
                "You do not have permission to update this application".to_string(),
            ));
        }

        let updated = self
            .store
            .update_application_status(application_id, status)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        tracing::info!(
            application_id,
            from = %application.status,
            to = %updated.status,
            "application status changed"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemStore;
    use crate::models::application::ApplicationStatus;
    use crate::models::job::NewJob;
    use crate::models::user::NewUser;

    struct Fixture {
        store: Arc<MemStore>,
        service: ApplicationService,
        acme: Actor,
        globex: Actor,
        ann: Actor,
        bob: Actor,
        job_id: i64,
    }

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

    async fn seed_job(store: &MemStore, owner: i64, active: bool) -> i64 {
        store
            .create_job(NewJob {
                title: "Dev".into(),
                company: "Acme".into(),
                company_logo: None,
                location: "Remote".into(),
                employment_type: "Full-time".into(),
                salary: None,
                description: "d".into(),
                requirements: "r".into(),
                user_id: owner,
                is_active: Some(active),
                tags: None,
            })
            .await
            .unwrap()
            .id
    }

    fn resume() -> CreateApplicationPayload {
        CreateApplicationPayload {
            resume: "Ten years of Rust".into(),
            cover_letter: Some("Hire me".into()),
        }
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemStore::new());
        let acme = seed_user(&store, "acme@example.com", AccountKind::Company).await;
        let globex = seed_user(&store, "globex@example.com", AccountKind::Company).await;
        let ann = seed_user(&store, "ann@example.com", AccountKind::Candidate).await;
        let bob = seed_user(&store, "bob@example.com", AccountKind::Candidate).await;
        let job_id = seed_job(&store, acme.id, true).await;
        let service = ApplicationService::new(store.clone());
        Fixture {
            store,
            service,
            acme,
            globex,
            ann,
            bob,
            job_id,
        }
    }

    #[tokio::test]
    async fn second_application_for_same_job_conflicts() {
        let f = fixture().await;
        let first = f.service.apply(f.ann, f.job_id, resume()).await.unwrap();
        assert_eq!(first.status, ApplicationStatus::Pending);

        let err = f.service.apply(f.ann, f.job_id, resume()).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        let stored = f.store.get_application(first.id).await.unwrap().unwrap();
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn companies_cannot_apply_and_inactive_jobs_are_closed() {
        let f = fixture().await;
        assert!(matches!(
            f.service.apply(f.acme, f.job_id, resume()).await.unwrap_err(),
            Error::Forbidden(_)
        ));

        let closed = seed_job(&f.store, f.acme.id, false).await;
        assert!(matches!(
            f.service.apply(f.ann, closed, resume()).await.unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(matches!(
            f.service.apply(f.ann, 999, resume()).await.unwrap_err(),
            Error::NotFound(_)
        ));
        assert_eq!(f.store.view_count(f.job_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn listings_never_cross_identities() {
        let f = fixture().await;
        let other_job = seed_job(&f.store, f.globex.id, true).await;
        f.service.apply(f.ann, f.job_id, resume()).await.unwrap();
        f.service.apply(f.bob, f.job_id, resume()).await.unwrap();
        f.service.apply(f.bob, other_job, resume()).await.unwrap();

        let acme_all = f.service.list_for(&f.acme, None).await.unwrap();
        assert_eq!(acme_all.len(), 2);
        assert!(acme_all.iter().all(|a| a.job_id == f.job_id));

        let globex_all = f.service.list_for(&f.globex, None).await.unwrap();
        assert_eq!(globex_all.len(), 1);

        assert!(matches!(
            f.service.list_for(&f.globex, Some(f.job_id)).await.unwrap_err(),
            Error::Forbidden(_)
        ));

        let bob_all = f.service.list_for(&f.bob, None).await.unwrap();
        assert_eq!(bob_all.len(), 2);
        assert!(bob_all.iter().all(|a| a.user_id == f.bob.id));
        let bob_narrowed = f.service.list_for(&f.bob, Some(other_job)).await.unwrap();
        assert_eq!(bob_narrowed, bob_all);
    }

    #[tokio::test]
    async fn company_listing_is_grouped_by_job() {
        let f = fixture().await;
        let newer_job = seed_job(&f.store, f.acme.id, true).await;
        let a1 = f.service.apply(f.ann, f.job_id, resume()).await.unwrap();
        let a2 = f.service.apply(f.ann, newer_job, resume()).await.unwrap();
        let a3 = f.service.apply(f.bob, f.job_id, resume()).await.unwrap();

        let ids: Vec<i64> = f
            .service
            .list_for(&f.acme, None)
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![a2.id, a3.id, a1.id]);
    }

    #[tokio::test]
    async fn closed_job_is_reported_before_an_invalid_resume() {
        let f = fixture().await;
        let empty = CreateApplicationPayload {
            resume: String::new(),
            cover_letter: None,
        };
        assert!(matches!(
            f.service.apply(f.ann, 999, empty.clone()).await.unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(matches!(
            f.service.apply(f.ann, f.job_id, empty).await.unwrap_err(),
            Error::Validation(_)
        ));
        assert!(f
            .store
            .get_applications(Some(f.job_id), None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn status_changes_are_any_to_any_for_the_owning_company() {
        let f = fixture().await;
        let app = f.service.apply(f.ann, f.job_id, resume()).await.unwrap();

        for status in ["accepted", "rejected", "pending", "interviewed"] {
            let updated = f
                .service
                .update_status(f.acme, app.id, Some(status))
                .await
                .unwrap();
            assert_eq!(updated.status.as_str(), status);
        }
    }

    #[tokio::test]
    async fn status_update_checks_value_then_existence_then_ownership() {
        let f = fixture().await;
        let app = f.service.apply(f.ann, f.job_id, resume()).await.unwrap();

        assert!(matches!(
            f.service
                .update_status(f.acme, app.id, Some("hired"))
                .await
                .unwrap_err(),
            Error::BadRequest(_)
        ));
        assert!(matches!(
            f.service
                .update_status(f.acme, 999, Some("reviewed"))
                .await
                .unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(matches!(
            f.service
                .update_status(f.globex, app.id, Some("reviewed"))
                .await
                .unwrap_err(),
            Error::Forbidden(_)
        ));
        assert!(matches!(
            f.service
                .update_status(f.ann, app.id, Some("accepted"))
                .await
                .unwrap_err(),
            Error::Forbidden(_)
        ));

        let unchanged = f.store.get_application(app.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn orphaned_application_cannot_be_updated() {
        let f = fixture().await;
        let app = f.service.apply(f.ann, f.job_id, resume()).await.unwrap();
        f.store.delete_job(f.job_id).await.unwrap();

        assert!(matches!(
            f.service
                .update_status(f.acme, app.id, Some("reviewed"))
                .await
                .unwrap_err(),
            Error::Forbidden(_)
        ));
        assert!(f.store.get_application(app.id).await.unwrap().is_some());
    }
}
