//! Route handler modules.

pub mod feedback;
pub mod health;
pub mod pages;
