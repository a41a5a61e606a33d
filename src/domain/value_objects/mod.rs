//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`Platform`]: the closed set of review platforms
//! - [`Rating`]: a star rating constrained to `1..=5`
//! - [`Timestamp`]: UTC time with platform date parsing
//! - [`TestimonialId`]: identifier of a stored testimonial

pub mod enums;
pub mod ids;
pub mod rating;
pub mod timestamp;

pub use enums::Platform;
pub use ids::TestimonialId;
pub use rating::Rating;
pub use timestamp::Timestamp;
