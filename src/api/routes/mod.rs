//! API Routes
//!
//! Route handlers organized by functionality.

pub mod doctors;
pub mod health;
pub mod intake;
pub mod profiles;
