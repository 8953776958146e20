//! Business rules for users, skills and partnerships on top of `models`.
//! - Each entity has a repository trait with a SeaORM and an in-memory implementation.
//! - Services validate input and draw identifiers from [`identifier::IdGenerator`].
//! - All failures surface as [`errors::ServiceError`].

pub mod errors;
pub mod identifier;
pub mod partnership;
pub mod skill;
pub mod user;
#[cfg(test)]
pub mod test_support;
