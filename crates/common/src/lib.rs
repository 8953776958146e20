//! Cross-cutting helpers shared by the mentorship crates: logging bootstrap,
//! transport-boundary sanitization, Prometheus metrics and the admin server.

pub mod types;
pub mod utils;
pub mod sanitize;
pub mod metrics;
pub mod admin_http;
