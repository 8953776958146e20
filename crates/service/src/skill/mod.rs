//! Skills: catalogue entries users teach or learn.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::Skill;
pub use service::SkillService;
