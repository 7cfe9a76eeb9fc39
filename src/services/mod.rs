//! Business logic services.

pub mod analytics;
