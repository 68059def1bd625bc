use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::database::store::Store;
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, NewApplication};
use crate::models::job::{Job, JobChanges, JobFilters, NewJob};
use crate::models::user::{NewUser, User, UserChanges};

const USER_COLUMNS: &str = "id, email, password, name, kind, company, title, location, bio, avatar";
const JOB_COLUMNS: &str = "id, title, company, company_logo, location, employment_type, salary, description, requirements, user_id, is_active, created_at, tags";
const APPLICATION_COLUMNS: &str = "id, job_id, user_id, resume, cover_letter, status, created_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password: String,
    name: String,
    kind: String,
    company: Option<String>,
    title: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    avatar: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id,
            email: row.email,
            password: row.password,
            name: row.name,
            kind: row.kind.parse().map_err(Error::Internal)?,
            company: row.company,
            title: row.title,
            location: row.location,
            bio: row.bio,
            avatar: row.avatar,
        })
    }
}

#[derive(Debug, FromRow)]
struct JobRow {
    id: i64,
    title: String,
    company: String,
    company_logo: Option<String>,
    location: String,
    employment_type: String,
    salary: Option<String>,
    description: String,
    requirements: String,
    user_id: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    tags: Option<Vec<String>>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: row.id,
            title: row.title,
            company: row.company,
            company_logo: row.company_logo,
            location: row.location,
            employment_type: row.employment_type,
            salary: row.salary,
            description: row.description,
            requirements: row.requirements,
            user_id: row.user_id,
            is_active: row.is_active,
            created_at: row.created_at,
            tags: row.tags,
        }
    }
}

#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: i64,
    job_id: i64,
    user_id: i64,
    resume: String,
    cover_letter: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = Error;

    fn try_from(row: ApplicationRow) -> Result<Self> {
        Ok(Application {
            id: row.id,
            job_id: row.job_id,
            user_id: row.user_id,
            resume: row.resume,
            cover_letter: row.cover_letter,
            status: row.status.parse().map_err(Error::Internal)?,
            created_at: row.created_at,
        })
    }
}

/// Escapes LIKE metacharacters so user input only ever matches literally.
fn like_pattern(raw: &str) -> String {
    let escaped = raw
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (email, password, name, kind, company, title, location, bio, avatar)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.name)
        .bind(user.kind.as_str())
        .bind(&user.company)
        .bind(&user.title)
        .bind(&user.location)
        .bind(&user.bio)
        .bind(&user.avatar)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1) ORDER BY id LIMIT 1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET
                name = COALESCE($2, name),
                company = COALESCE($3, company),
                title = COALESCE($4, title),
                location = COALESCE($5, location),
                bio = COALESCE($6, bio),
                avatar = COALESCE($7, avatar)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.company)
        .bind(changes.title)
        .bind(changes.location)
        .bind(changes.bio)
        .bind(changes.avatar)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn create_job(&self, job: NewJob) -> Result<Job> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            INSERT INTO jobs (
                title, company, company_logo, location, employment_type,
                salary, description, requirements, user_id, is_active, tags
            ) VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10, $11
            )
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.company_logo)
        .bind(&job.location)
        .bind(&job.employment_type)
        .bind(&job.salary)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(job.user_id)
        .bind(job.is_active.unwrap_or(true))
        .bind(&job.tags)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO job_views (job_id, count) VALUES ($1, 0) ON CONFLICT (job_id) DO NOTHING")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn get_jobs(&self, filters: &JobFilters) -> Result<Vec<Job>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM jobs WHERE TRUE", JOB_COLUMNS));

        if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = like_pattern(search);
            query
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR company ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(location) = filters.location.as_deref().filter(|s| !s.is_empty()) {
            query
                .push(" AND location ILIKE ")
                .push_bind(like_pattern(location));
        }
        if let Some(employment_type) = filters.employment_type.as_deref().filter(|s| !s.is_empty())
        {
            query
                .push(" AND employment_type = ")
                .push_bind(employment_type.to_string());
        }
        if let Some(tags) = filters.tags.as_ref().filter(|t| !t.is_empty()) {
            query.push(" AND tags && ").push_bind(tags.clone());
        }
        if let Some(user_id) = filters.user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(is_active) = filters.is_active {
            query.push(" AND is_active = ").push_bind(is_active);
        }
        query.push(" ORDER BY created_at DESC, id DESC");

        let rows = query
            .build_query_as::<JobRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn peek_job(&self, id: i64) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM jobs WHERE id = $1",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Job::from))
    }

    async fn record_view(&self, id: i64) -> Result<bool> {
        let counted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO job_views (job_id, count)
            SELECT id, 1 FROM jobs WHERE id = $1
            ON CONFLICT (job_id) DO UPDATE SET count = job_views.count + 1
            RETURNING count
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(counted.is_some())
    }

    async fn update_job(&self, id: i64, changes: JobChanges) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            UPDATE jobs
            SET
                title = COALESCE($2, title),
                company = COALESCE($3, company),
                company_logo = COALESCE($4, company_logo),
                location = COALESCE($5, location),
                employment_type = COALESCE($6, employment_type),
                salary = COALESCE($7, salary),
                description = COALESCE($8, description),
                requirements = COALESCE($9, requirements),
                is_active = COALESCE($10, is_active),
                tags = COALESCE($11, tags)
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.company)
        .bind(changes.company_logo)
        .bind(changes.location)
        .bind(changes.employment_type)
        .bind(changes.salary)
        .bind(changes.description)
        .bind(changes.requirements)
        .bind(changes.is_active)
        .bind(changes.tags)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Job::from))
    }

    async fn delete_job(&self, id: i64) -> Result<bool> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn create_application(&self, application: NewApplication) -> Result<Application> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            INSERT INTO applications (job_id, user_id, resume, cover_letter, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        ))
        .bind(application.job_id)
        .bind(application.user_id)
        .bind(&application.resume)
        .bind(&application.cover_letter)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match Error::from(err) {
            Error::Conflict(_) => {
                Error::Conflict("You have already applied for this job".to_string())
            }
            other => other,
        })?;

        row.try_into()
    }

    async fn get_application(&self, id: i64) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {} FROM applications WHERE id = $1",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Application::try_from).transpose()
    }

    async fn get_applications(
        &self,
        job_id: Option<i64>,
        user_id: Option<i64>,
    ) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            SELECT {}
            FROM applications
            WHERE ($1::BIGINT IS NULL OR job_id = $1)
              AND ($2::BIGINT IS NULL OR user_id = $2)
            ORDER BY created_at DESC, id DESC
            "#,
            APPLICATION_COLUMNS
        ))
        .bind(job_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Application::try_from).collect()
    }

    async fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "UPDATE applications SET status = $2 WHERE id = $1 RETURNING {}",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Application::try_from).transpose()
    }

    async fn view_counts(&self) -> Result<HashMap<i64, u64>> {
        let rows = sqlx::query_as::<_, (i64, i64)>("SELECT job_id, count FROM job_views")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(job_id, count)| (job_id, count.max(0) as u64))
            .collect())
    }

    async fn view_count(&self, job_id: i64) -> Result<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT count FROM job_views WHERE job_id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }
}
