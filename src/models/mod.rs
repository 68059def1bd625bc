pub mod application;
pub mod job;
pub mod stats;
pub mod user;
