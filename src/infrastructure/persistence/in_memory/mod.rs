//! # In-Memory Repositories
//!
//! In-memory implementations for testing without database dependencies.
//!
//! ## Available Repositories
//!
//! - [`InMemoryTestimonialRepository`]: Testimonial persistence
//!
//! ## Thread Safety
//!
//! All implementations use `Arc<RwLock<..>>` for thread-safe access.

pub mod testimonial_repository;

pub use testimonial_repository::InMemoryTestimonialRepository;
