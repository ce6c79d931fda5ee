//! HTTP clients for the two services this proxy relays to.

pub mod engine_client;
pub mod problem_catalog;

pub use engine_client::{EngineClient, HttpEngineClient};
pub use problem_catalog::{HttpProblemCatalogClient, ProblemCatalogClient};
