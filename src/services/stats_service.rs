//! Dashboard metrics, scoped per account kind through [`StatsPolicy`].
//!
//! Candidates see platform-wide job and view totals but only their own
//! applications. That asymmetry is kept as-is. An actor id with no matching
//! account falls under the candidate policy.

use std::collections::HashSet;
use std::sync::Arc;

use crate::database::Store;
use crate::error::Result;
use crate::models::job::{Job, JobFilters};
use crate::models::stats::Stats;
use crate::models::user::AccountKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobScope {
    All,
    OwnedByActor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationScope {
    All,
    OnSelectedJobs,
    SubmittedByActor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewScope {
    All,
    SelectedJobs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsPolicy {
    pub jobs: JobScope,
    pub applications: ApplicationScope,
    pub views: ViewScope,
}

impl StatsPolicy {
    pub const GLOBAL: StatsPolicy = StatsPolicy {
        jobs: JobScope::All,
        applications: ApplicationScope::All,
        views: ViewScope::All,
    };

    pub const COMPANY: StatsPolicy = StatsPolicy {
        jobs: JobScope::OwnedByActor,
        applications: ApplicationScope::OnSelectedJobs,
        views: ViewScope::SelectedJobs,
    };

    pub const CANDIDATE: StatsPolicy = StatsPolicy {
        jobs: JobScope::All,
        applications: ApplicationScope::SubmittedByActor,
        views: ViewScope::All,
    };

    /// Policy for a caller that may or may not still have an account.
    /// Anything that is not a known company is scoped like a candidate.
    pub fn for_actor(actor_id: Option<i64>, stored_kind: Option<AccountKind>) -> StatsPolicy {
        match (actor_id, stored_kind) {
            (None, _) => Self::GLOBAL,
            (Some(_), Some(AccountKind::Company)) => Self::COMPANY,
            (Some(_), _) => Self::CANDIDATE,
        }
    }
}

#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn Store>,
}

impl StatsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// The actor's kind is read from the store, not from token claims.
    pub async fn get_stats(&self, actor_id: Option<i64>) -> Result<Stats> {
        let kind = match actor_id {
            Some(id) => {
                let user = self.store.get_user_by_id(id).await?;
                if user.is_none() {
                    tracing::debug!(user_id = id, "stats requested for unknown account");
                }
                user.map(|user| user.kind)
            }
            None => None,
        };
        let policy = StatsPolicy::for_actor(actor_id, kind);
        self.compute(policy, actor_id).await
    }

    async fn compute(&self, policy: StatsPolicy, actor_id: Option<i64>) -> Result<Stats> {
        let jobs: Vec<Job> = match (policy.jobs, actor_id) {
            (JobScope::OwnedByActor, Some(id)) => self.store.get_jobs_by_user(id).await?,
            _ => self.store.get_jobs(&JobFilters::default()).await?,
        };
        let selected: HashSet<i64> = jobs.iter().map(|job| job.id).collect();

        let total_applications = match (policy.applications, actor_id) {
            (ApplicationScope::SubmittedByActor, Some(id)) => {
                self.store.get_applications(None, Some(id)).await?.len()
            }
            (ApplicationScope::OnSelectedJobs, _) => self
                .store
                .get_applications(None, None)
                .await?
                .iter()
                .filter(|application| selected.contains(&application.job_id))
                .count(),
            _ => self.store.get_applications(None, None).await?.len(),
        };

        let counters = self.store.view_counts().await?;
        let view_count: u64 = match policy.views {
            ViewScope::All => counters.values().sum(),
            ViewScope::SelectedJobs => selected
                .iter()
                .map(|id| counters.get(id).copied().unwrap_or(0))
                .sum(),
        };

        Ok(Stats {
            total_jobs: jobs.len() as u64,
            active_jobs: jobs.iter().filter(|job| job.is_active).count() as u64,
            total_applications: total_applications as u64,
            view_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemStore;
    use crate::models::application::NewApplication;
    use crate::models::job::NewJob;
    use crate::models::user::NewUser;

    async fn seed_user(store: &MemStore, email: &str, kind: AccountKind) -> i64 {
        store
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
            .unwrap()
            .id
    }

    async fn seed_job(store: &MemStore, owner: i64, active: bool, views: u32) -> i64 {
        let id = store
            .create_job(NewJob {
                title: "Dev".into(),
                company: "Co".into(),
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
            .id;
        for _ in 0..views {
            store.record_view(id).await.unwrap();
        }
        id
    }

    async fn apply(store: &MemStore, job_id: i64, user_id: i64) {
        store
            .create_application(NewApplication {
                job_id,
                user_id,
                resume: "cv".into(),
                cover_letter: None,
            })
            .await
            .unwrap();
    }

    #[test]
    fn policy_table_per_kind() {
        assert_eq!(StatsPolicy::for_actor(None, None), StatsPolicy::GLOBAL);
        assert_eq!(
            StatsPolicy::for_actor(Some(1), Some(AccountKind::Company)).views,
            ViewScope::SelectedJobs
        );
        let candidate = StatsPolicy::for_actor(Some(2), Some(AccountKind::Candidate));
        assert_eq!(candidate.jobs, JobScope::All);
        assert_eq!(candidate.applications, ApplicationScope::SubmittedByActor);
        assert_eq!(candidate.views, ViewScope::All);
    }

    #[tokio::test]
    async fn company_sees_only_its_own_jobs_views_and_applications() {
        let store = Arc::new(MemStore::new());
        let acme = seed_user(&store, "acme@example.com", AccountKind::Company).await;
        let globex = seed_user(&store, "globex@example.com", AccountKind::Company).await;
        let ann = seed_user(&store, "ann@example.com", AccountKind::Candidate).await;

        let j1 = seed_job(&store, acme, true, 2).await;
        seed_job(&store, acme, false, 3).await;
        let foreign = seed_job(&store, globex, true, 10).await;
        apply(&store, j1, ann).await;
        apply(&store, foreign, ann).await;

        let service = StatsService::new(store.clone());
        let stats = service.get_stats(Some(acme)).await.unwrap();
        assert_eq!(
            stats,
            Stats {
                total_jobs: 2,
                active_jobs: 1,
                total_applications: 1,
                view_count: 5,
            }
        );
    }

    #[tokio::test]
    async fn candidate_sees_global_jobs_and_views_but_own_applications() {
        let store = Arc::new(MemStore::new());
        let acme = seed_user(&store, "acme@example.com", AccountKind::Company).await;
        let ann = seed_user(&store, "ann@example.com", AccountKind::Candidate).await;
        let bob = seed_user(&store, "bob@example.com", AccountKind::Candidate).await;

        let j1 = seed_job(&store, acme, true, 1).await;
        let j2 = seed_job(&store, acme, false, 4).await;
        apply(&store, j1, ann).await;
        apply(&store, j1, bob).await;
        apply(&store, j2, bob).await;

        let service = StatsService::new(store.clone());
        let stats = service.get_stats(Some(ann)).await.unwrap();
        assert_eq!(stats.total_jobs, 2);
        assert_eq!(stats.active_jobs, 1);
        assert_eq!(stats.total_applications, 1);
        assert_eq!(stats.view_count, 5);

        let global = service.get_stats(None).await.unwrap();
        assert_eq!(global.total_applications, 3);
        assert_eq!(global.view_count, 5);
    }

    #[test]
    fn unknown_actor_uses_candidate_policy() {
        assert_eq!(StatsPolicy::for_actor(Some(7), None), StatsPolicy::CANDIDATE);
        assert_eq!(StatsPolicy::for_actor(None, Some(AccountKind::Company)), StatsPolicy::GLOBAL);
    }

    #[tokio::test]
    async fn unknown_actor_gets_global_jobs_and_views_but_no_applications() {
        let store = Arc::new(MemStore::new());
        let acme = seed_user(&store, "acme@example.com", AccountKind::Company).await;
        let ann = seed_user(&store, "ann@example.com", AccountKind::Candidate).await;
        let j1 = seed_job(&store, acme, true, 2).await;
        seed_job(&store, acme, false, 1).await;
        apply(&store, j1, ann).await;

        let service = StatsService::new(store.clone());
        let stats = service.get_stats(Some(999)).await.unwrap();
        assert_eq!(
            stats,
            Stats {
                total_jobs: 2,
                active_jobs: 1,
                total_applications: 0,
                view_count: 3,
            }
        );

        let empty = StatsService::new(Arc::new(MemStore::new()));
        assert_eq!(empty.get_stats(Some(7)).await.unwrap(), Stats::default());
    }

    #[test]
    fn global_stats_on_empty_store_are_zero() {
        let service = StatsService::new(Arc::new(MemStore::new()));
        let stats = tokio_test::block_on(service.get_stats(None)).unwrap();
        assert_eq!(stats, Stats::default());
    }
}
