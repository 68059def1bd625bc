pub mod application_service;
pub mod auth_service;
pub mod authorization;
pub mod job_service;
pub mod stats_service;
