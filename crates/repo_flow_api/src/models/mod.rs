//! HTTP request and response models
//!
//! These types exist only in the HTTP layer. Analysis types from
//! `repo_flow_core` are embedded in responses as-is.

pub mod request;
pub mod response;

pub use request::AnalyzeRepositoryRequest;
pub use response::{GraphResponse, HealthCheckResponse, StructureResponse};
