pub mod account;
pub mod cache;
pub mod config;
pub mod health;
pub mod insights;
pub mod logging;
pub mod normalize;
pub mod orchestrator;
pub mod present;
