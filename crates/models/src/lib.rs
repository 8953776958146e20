//! SeaORM entities for the mentorship schema plus the shared identifier type.

pub mod errors;
pub mod db;
pub mod identifier;
pub mod skill;
pub mod user;
pub mod user_skill;
pub mod partnership;

pub use identifier::Identifier;

#[cfg(test)]
mod tests;
