//! # Application Layer
//!
//! Use cases that combine the domain with infrastructure.
//!
//! - [`services`]: review search, ranking and testimonial import
//! - [`error`]: application error type and its taxonomy kinds

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
