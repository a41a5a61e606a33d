//! # Domain Services
//!
//! Stateless domain logic.
//!
//! - [`validate_review`]: schema validation for externally-shaped reviews

pub mod review_validation;

pub use review_validation::{is_http_url, validate_review};
