//! # Domain Entities
//!
//! - [`Review`]: a normalized review from any platform
//! - [`SearchResult`]: one place on one platform with its reviews
//! - [`NewTestimonial`] / [`Testimonial`]: the persistence hand-off shape

pub mod review;
pub mod search_result;
pub mod testimonial;

pub use review::Review;
pub use search_result::SearchResult;
pub use testimonial::{NewTestimonial, SourceMetadata, Testimonial};
