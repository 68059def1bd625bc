use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub company_logo: Option<String>,
    pub location: String,
    #[serde(rename = "type")]
    pub employment_type: String,
    pub salary: Option<String>,
    pub description: String,
    pub requirements: String,
    pub user_id: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub company_logo: Option<String>,
    pub location: String,
    pub employment_type: String,
    pub salary: Option<String>,
    pub description: String,
    pub requirements: String,
    pub user_id: i64,
    pub is_active: Option<bool>,
    pub tags: Option<Vec<String>>,
}

/// Mutable job fields. `id`, `user_id` and `created_at` cannot change after creation.
#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub company: Option<String>,
    pub company_logo: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub is_active: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl JobChanges {
    pub fn apply_to(self, job: &mut Job) {
        if let Some(title) = self.title {
            job.title = title;
        }
        if let Some(company) = self.company {
            job.company = company;
        }
        if let Some(logo) = self.company_logo {
            job.company_logo = Some(logo);
        }
        if let Some(location) = self.location {
            job.location = location;
        }
        if let Some(employment_type) = self.employment_type {
            job.employment_type = employment_type;
        }
        if let Some(salary) = self.salary {
            job.salary = Some(salary);
        }
        if let Some(description) = self.description {
            job.description = description;
        }
        if let Some(requirements) = self.requirements {
            job.requirements = requirements;
        }
        if let Some(is_active) = self.is_active {
            job.is_active = is_active;
        }
        if let Some(tags) = self.tags {
            job.tags = Some(tags);
        }
    }
}

/// Listing filters, combined with logical AND.
#[derive(Debug, Clone, Default)]
pub struct JobFilters {
    pub search: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub tags: Option<Vec<String>>,
    pub user_id: Option<i64>,
    pub is_active: Option<bool>,
}

impl JobFilters {
    pub fn owned_by(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        if let Some(search) = non_empty(&self.search) {
            let needle = search.to_lowercase();
            let hit = job.title.to_lowercase().contains(&needle)
                || job.company.to_lowercase().contains(&needle)
                || job.description.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if let Some(location) = non_empty(&self.location) {
            if !job
                .location
                .to_lowercase()
                .contains(&location.to_lowercase())
            {
                return false;
            }
        }

        if let Some(employment_type) = non_empty(&self.employment_type) {
            if job.employment_type != employment_type {
                return false;
            }
        }

        if let Some(wanted) = self.tags.as_ref().filter(|t| !t.is_empty()) {
            let Some(tags) = job.tags.as_ref() else {
                return false;
            };
            if !wanted.iter().any(|tag| tags.contains(tag)) {
                return false;
            }
        }

        if let Some(user_id) = self.user_id {
            if job.user_id != user_id {
                return false;
            }
        }

        if let Some(is_active) = self.is_active {
            if job.is_active != is_active {
                return false;
            }
        }

        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Newest first; ids break ties between jobs created in the same instant.
pub fn sort_newest_first(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}
