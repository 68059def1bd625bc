pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::Store;
use crate::services::{
    application_service::ApplicationService, auth_service::AuthService, job_service::JobService,
    stats_service::StatsService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn Store>,
    pub auth_service: AuthService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub stats_service: StatsService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        let auth_service = AuthService::new(store.clone(), &config.jwt_secret, config.token_ttl_hours);
        let job_service = JobService::new(store.clone());
        let application_service = ApplicationService::new(store.clone());
        let stats_service = StatsService::new(store.clone());

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            job_service,
            application_service,
            stats_service,
        }
    }
}
