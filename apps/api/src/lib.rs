pub mod analysis;
pub mod config;
pub mod errors;
pub mod interview;
pub mod llm_client;
pub mod results;
pub mod resume;
pub mod routes;
pub mod session;
pub mod state;
pub mod telemetry;
