//! Mentor/apprentice pairings between two users.

pub mod domain;
pub mod manager;
pub mod repository;

pub use domain::{Partnership, Role};
pub use manager::PartnershipManager;
