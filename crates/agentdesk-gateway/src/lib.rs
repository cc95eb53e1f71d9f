//! AgentDesk Gateway - HTTP surface for the record store and agent dispatcher

pub mod config;
pub mod routes;
pub mod service;

pub use config::Config;
pub use routes::{router, AppState};
pub use service::GatewayService;
