use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::database::store::Store;
use crate::error::{Error, Result};
use crate::models::application::{self, Application, ApplicationStatus, NewApplication};
use crate::models::job::{self, Job, JobChanges, JobFilters, NewJob};
use crate::models::user::{NewUser, User, UserChanges};
use crate::utils::time::now;

/// Rows keyed by id plus the next id to hand out. Ids are never reused.
#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Process-local store. Each collection sits behind its own lock, so id
/// assignment, inserts and counter increments are serialized per collection.
#[derive(Debug, Default)]
pub struct MemStore {
    users: Mutex<Table<User>>,
    jobs: Mutex<Table<Job>>,
    applications: Mutex<Table<Application>>,
    view_counts: Mutex<HashMap<i64, u64>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn users(&self) -> MutexGuard<'_, Table<User>> {
        self.users.lock().expect("users mutex poisoned")
    }

    fn jobs(&self) -> MutexGuard<'_, Table<Job>> {
        self.jobs.lock().expect("jobs mutex poisoned")
    }

    fn applications(&self) -> MutexGuard<'_, Table<Application>> {
        self.applications
            .lock()
            .expect("applications mutex poisoned")
    }

    fn counters(&self) -> MutexGuard<'_, HashMap<i64, u64>> {
        self.view_counts.lock().expect("view counter mutex poisoned")
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut users = self.users();
        let id = users.allocate_id();
        let record = User {
            id,
            email: user.email,
            password: user.password,
            name: user.name,
            kind: user.kind,
            company: user.company,
            title: user.title,
            location: user.location,
            bio: user.bio,
            avatar: user.avatar,
        };
        users.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users().rows.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let wanted = email.to_lowercase();
        Ok(self
            .users()
            .rows
            .values()
            .find(|user| user.email.to_lowercase() == wanted)
            .cloned())
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        let mut users = self.users();
        let Some(user) = users.rows.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(user);
        Ok(Some(user.clone()))
    }

    async fn create_job(&self, job: NewJob) -> Result<Job> {
        let record = {
            let mut jobs = self.jobs();
            let id = jobs.allocate_id();
            let record = Job {
                id,
                title: job.title,
                company: job.company,
                company_logo: job.company_logo,
                location: job.location,
                employment_type: job.employment_type,
                salary: job.salary,
                description: job.description,
                requirements: job.requirements,
                user_id: job.user_id,
                is_active: job.is_active.unwrap_or(true),
                created_at: now(),
                tags: job.tags,
            };
            jobs.rows.insert(id, record.clone());
            record
        };
        self.counters().insert(record.id, 0);
        Ok(record)
    }

    async fn get_jobs(&self, filters: &JobFilters) -> Result<Vec<Job>> {
        let mut jobs: Vec<Job> = self
            .jobs()
            .rows
            .values()
            .filter(|job| filters.matches(job))
            .cloned()
            .collect();
        job::sort_newest_first(&mut jobs);
        Ok(jobs)
    }

    async fn peek_job(&self, id: i64) -> Result<Option<Job>> {
        Ok(self.jobs().rows.get(&id).cloned())
    }

    async fn record_view(&self, id: i64) -> Result<bool> {
        if !self.jobs().rows.contains_key(&id) {
            return Ok(false);
        }
        *self.counters().entry(id).or_insert(0) += 1;
        Ok(true)
    }

    async fn update_job(&self, id: i64, changes: JobChanges) -> Result<Option<Job>> {
        let mut jobs = self.jobs();
        let Some(job) = jobs.rows.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(job);
        Ok(Some(job.clone()))
    }

    async fn delete_job(&self, id: i64) -> Result<bool> {
        Ok(self.jobs().rows.remove(&id).is_some())
    }

    async fn create_application(&self, application: NewApplication) -> Result<Application> {
        let mut applications = self.applications();
        let duplicate = applications.rows.values().any(|existing| {
            existing.job_id == application.job_id && existing.user_id == application.user_id
        });
        if duplicate {
            return Err(Error::Conflict(
                "You have already applied for this job".to_string(),
            ));
        }

        let id = applications.allocate_id();
        let record = Application {
            id,
            job_id: application.job_id,
            user_id: application.user_id,
            resume: application.resume,
            cover_letter: application.cover_letter,
            status: ApplicationStatus::Pending,
            created_at: now(),
        };
        applications.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn get_application(&self, id: i64) -> Result<Option<Application>> {
        Ok(self.applications().rows.get(&id).cloned())
    }

    async fn get_applications(
        &self,
        job_id: Option<i64>,
        user_id: Option<i64>,
    ) -> Result<Vec<Application>> {
        let mut applications: Vec<Application> = self
            .applications()
            .rows
            .values()
            .filter(|a| job_id.map_or(true, |id| a.job_id == id))
            .filter(|a| user_id.map_or(true, |id| a.user_id == id))
            .cloned()
            .collect();
        application::sort_newest_first(&mut applications);
        Ok(applications)
    }

    async fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let mut applications = self.applications();
        let Some(application) = applications.rows.get_mut(&id) else {
            return Ok(None);
        };
        application.status = status;
        Ok(Some(application.clone()))
    }

    async fn view_counts(&self) -> Result<HashMap<i64, u64>> {
        Ok(self.counters().clone())
    }

    async fn view_count(&self, job_id: i64) -> Result<u64> {
        Ok(self.counters().get(&job_id).copied().unwrap_or(0))
    }
}
