//! # Infrastructure Layer
//!
//! Adapters to the outside world.
//!
//! - [`platforms`]: review platform API clients
//! - [`cache`]: TTL result cache
//! - [`persistence`]: testimonial repositories

pub mod cache;
pub mod persistence;
pub mod platforms;
