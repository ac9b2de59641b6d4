//! Service layer for business logic.
//!
//! Separates business logic from UI handlers for better testability and maintainability.

pub mod review_service;
pub mod sort_service;

pub use review_service::ReviewService;
