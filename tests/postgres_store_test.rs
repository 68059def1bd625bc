//! Runs against a live database only when `DATABASE_URL` is set.

use std::env;

use jobboard_backend::{
    database::{pool, PgStore, Store},
    error::Error,
    models::{
        application::{ApplicationStatus, NewApplication},
        job::{JobFilters, NewJob},
        user::{AccountKind, NewUser},
    },
};

async fn store() -> Option<PgStore> {
    dotenvy::dotenv().ok();
    let url = env::var("DATABASE_URL").ok()?;
    let pool = pool::create_pool(&url).await.expect("pool");
    pool::run_migrations(&pool).await.expect("migrations");
    Some(PgStore::new(pool))
}

fn unique_email(prefix: &str) -> String {
    format!(
        "{}_{}@example.com",
        prefix,
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

fn new_user(email: String, kind: AccountKind) -> NewUser {
    NewUser {
        email,
        password: "hash".into(),
        name: "Pg User".into(),
        kind,
        company: None,
        title: None,
        location: None,
        bio: None,
        avatar: None,
    }
}

fn new_job(owner: i64, title: &str) -> NewJob {
    NewJob {
        title: title.into(),
        company: "Pg Co".into(),
        company_logo: None,
        location: "100% Remote".into(),
        employment_type: "Full-time".into(),
        salary: None,
        description: "Postgres backed".into(),
        requirements: "SQL".into(),
        user_id: owner,
        is_active: None,
        tags: Some(vec!["pg".into(), "sql".into()]),
    }
}

#[tokio::test]
async fn postgres_store_round_trip() {
    let Some(store) = store().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let email = unique_email("pg_company");
    let company = store
        .create_user(new_user(email.clone(), AccountKind::Company))
        .await
        .expect("company");
    let found = store
        .get_user_by_email(&email.to_uppercase())
        .await
        .expect("lookup")
        .expect("case-insensitive match");
    assert_eq!(found.id, company.id);

    let candidate = store
        .create_user(new_user(unique_email("pg_candidate"), AccountKind::Candidate))
        .await
        .expect("candidate");

    let job = store
        .create_job(new_job(company.id, "Pg Engineer"))
        .await
        .expect("job");
    assert!(job.is_active);

    let owned = store
        .get_jobs(&JobFilters {
            location: Some("100%".into()),
            tags: Some(vec!["sql".into()]),
            ..JobFilters::owned_by(company.id)
        })
        .await
        .expect("filtered");
    assert_eq!(owned.len(), 1);

    assert!(store.record_view(job.id).await.expect("view"));
    assert!(store.get_job_by_id(job.id).await.expect("detail").is_some());
    assert_eq!(store.view_count(job.id).await.expect("count"), 2);
    assert!(!store.record_view(-1).await.expect("unknown"));

    let application = store
        .create_application(NewApplication {
            job_id: job.id,
            user_id: candidate.id,
            resume: "cv".into(),
            cover_letter: None,
        })
        .await
        .expect("application");
    assert_eq!(application.status, ApplicationStatus::Pending);

    let duplicate = store
        .create_application(NewApplication {
            job_id: job.id,
            user_id: candidate.id,
            resume: "cv again".into(),
            cover_letter: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(duplicate, Error::Conflict(_)));

    let updated = store
        .update_application_status(application.id, ApplicationStatus::Interviewed)
        .await
        .expect("status")
        .expect("exists");
    assert_eq!(updated.status, ApplicationStatus::Interviewed);

    assert!(store.delete_job(job.id).await.expect("delete"));
    assert!(store.peek_job(job.id).await.expect("peek").is_none());
    assert!(store
        .get_application(application.id)
        .await
        .expect("orphan")
        .is_some());
}
