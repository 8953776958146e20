//! Users: mentors and apprentices with the skills they teach and learn.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::User;
pub use service::UserService;
