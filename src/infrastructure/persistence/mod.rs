//! # Persistence Layer
//!
//! Repository ports and implementations.
//!
//! ## Repository Traits (Ports)
//!
//! - [`TestimonialRepository`]: Persistence for imported testimonials
//!
//! ## Implementations
//!
//! - `in_memory`: In-memory implementations for testing

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryTestimonialRepository;
pub use traits::{RepositoryError, RepositoryResult, TestimonialRepository};
