//! # Domain Layer
//!
//! Platform-agnostic review types, validation rules and the shared error
//! taxonomy.
//!
//! - [`entities`]: [`Review`](entities::Review), [`SearchResult`](entities::SearchResult),
//!   testimonial hand-off shapes
//! - [`value_objects`]: [`Platform`](value_objects::Platform),
//!   [`Rating`](value_objects::Rating), [`Timestamp`](value_objects::Timestamp)
//! - [`services`]: review validation
//! - [`errors`]: [`ErrorKind`](errors::ErrorKind) and [`DomainError`](errors::DomainError)

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
