//! HTTP API handlers for candidates-api

pub mod candidates;
pub mod health;
pub mod upload;

pub use candidates::candidate_routes;
pub use health::health_routes;
pub use upload::upload_routes;
