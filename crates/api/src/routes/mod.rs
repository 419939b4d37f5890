//! HTTP handlers

pub mod accounts;
pub mod records;

/// Liveness check
pub async fn health() -> &'static str {
    "ok"
}
