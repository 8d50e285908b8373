//! HTTP API consumed by the browser extension.

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerConfig, AppState};
