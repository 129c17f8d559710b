//! Contact Relay API
//!
//! HTTP surface for the contact form pipeline in `contact-core`.
//!
//! ## Endpoints
//!
//! - `POST /api/contact`: validate, store, and notify the operator
//! - `GET /api/contact`: list stored messages, requires the operator token
//! - `GET /health`: liveness
//! - `GET /metrics`: Prometheus metrics

pub mod config;
pub mod handler;
pub mod server;

pub use config::{AppConfig, LogFormat, ServeArgs};
pub use handler::{create_router, ApiError, AppState};
pub use server::{build_state, init_tracing, serve};
