//! Task document model and analytics response shapes.

pub mod stats;
pub mod task;
