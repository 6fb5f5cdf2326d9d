//! API Routes
//!
//! Route handlers organized by functionality.

pub mod dashboard;
pub mod datasets;
pub mod health;
pub mod page;
