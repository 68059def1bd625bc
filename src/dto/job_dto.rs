use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::job::{JobChanges, JobFilters, NewJob};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub company: String,
    pub company_logo: Option<String>,
    #[validate(length(min = 1))]
    pub location: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub employment_type: String,
    pub salary: Option<String>,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub requirements: String,
    pub is_active: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl CreateJobPayload {
    /// The owner always comes from the acting identity, never from the body.
    pub fn into_new_job(self, owner_id: i64) -> NewJob {
        NewJob {
            title: self.title,
            company: self.company,
            company_logo: self.company_logo,
            location: self.location,
            employment_type: self.employment_type,
            salary: self.salary,
            description: self.description,
            requirements: self.requirements,
            user_id: owner_id,
            is_active: self.is_active,
            tags: self.tags,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub company: Option<String>,
    pub company_logo: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub employment_type: Option<String>,
    pub salary: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub requirements: Option<String>,
    pub is_active: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl From<UpdateJobPayload> for JobChanges {
    fn from(value: UpdateJobPayload) -> Self {
        Self {
            title: value.title,
            company: value.company,
            company_logo: value.company_logo,
            location: value.location,
            employment_type: value.employment_type,
            salary: value.salary,
            description: value.description,
            requirements: value.requirements,
            is_active: value.is_active,
            tags: value.tags,
        }
    }
}

/// Public listing query; `tags` is a comma-separated list.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub employment_type: Option<String>,
    pub tags: Option<String>,
}

impl JobListQuery {
    pub fn into_filters(self) -> JobFilters {
        let tags = self.tags.map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        });
        JobFilters {
            search: self.search,
            location: self.location,
            employment_type: self.employment_type,
            tags,
            user_id: None,
            is_active: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_separated_tags_become_a_tag_filter() {
        let filters = JobListQuery {
            tags: Some("rust, remote,,".into()),
            ..Default::default()
        }
        .into_filters();
        assert_eq!(
            filters.tags,
            Some(vec!["rust".to_string(), "remote".to_string()])
        );
        assert!(filters.is_active.is_none());
    }

    #[test]
    fn create_payload_ignores_owner_and_status_fields_in_body() {
        let payload: CreateJobPayload = serde_json::from_value(serde_json::json!({
            "title": "Dev",
            "company": "Acme",
            "location": "Remote",
            "type": "Full-time",
            "description": "Build",
            "requirements": "Rust",
            "userId": 999,
            "createdAt": "2001-01-01T00:00:00Z"
        }))
        .unwrap();
        let job = payload.into_new_job(5);
        assert_eq!(job.user_id, 5);
        assert_eq!(job.is_active, None);
    }
}
