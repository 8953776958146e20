use std::sync::Arc;

use tracing::{info, instrument};

use models::Identifier;

use crate::errors::ServiceError;
use crate::identifier::IdGenerator;
use super::domain::User;
use super::repository::UserRepository;

pub struct UserService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
    ids: IdGenerator,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>, ids: IdGenerator) -> Self { Self { repo, ids } }

    /// Empty id is an input error; a malformed one is simply not found.
    pub async fn retrieve(&self, id: &str) -> Result<Option<User>, ServiceError> {
        if id.is_empty() {
            return Err(ServiceError::invalid("user id required"));
        }
        match Identifier::try_parse(id) {
            Some(id) => self.repo.find(&id).await,
            None => Ok(None),
        }
    }

    /// Like [`retrieve`](Self::retrieve), but a missing user is `NotFound`.
    pub async fn require(&self, id: &str) -> Result<User, ServiceError> {
        self.retrieve(id).await?.ok_or_else(|| ServiceError::not_found("user"))
    }

    pub async fn retrieve_all(&self) -> Result<Vec<User>, ServiceError> { self.repo.find_all().await }

    /// Store a new user with its skill links. A caller-supplied id that is
    /// already taken yields `false`; otherwise a fresh id is written back.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create(&self, user: &mut User) -> Result<bool, ServiceError> {
        user.validate()?;
        let id = match &user.id {
            Some(id) => {
                if self.repo.exists(id).await? {
                    return Ok(false);
                }
                id.clone()
            }
            None => {
                let id = self.ids.generate(self.repo.as_ref()).await?;
                user.id = Some(id.clone());
                id
            }
        };
        let created = self.repo.insert(&id, user).await?;
        if created {
            info!(id = %id, teaching = user.teaching.len(), learning = user.learning.len(), "user_created");
        }
        Ok(created)
    }

    /// Replace a stored user. Needs an id; `false` when no such user exists.
    #[instrument(skip(self, user))]
    pub async fn update(&self, user: &User) -> Result<bool, ServiceError> {
        let Some(id) = &user.id else {
            return Err(ServiceError::invalid("user id required"));
        };
        user.validate()?;
        let updated = self.repo.update(id, user).await?;
        if updated {
            info!(id = %id, "user_updated");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let Some(id) = Identifier::try_parse(id) else { return Ok(false) };
        let deleted = self.repo.delete(&id).await?;
        if deleted {
            info!(id = %id, "user_deleted");
        }
        Ok(deleted)
    }

    pub async fn exists(&self, id: &str) -> Result<bool, ServiceError> {
        match Identifier::try_parse(id) {
            Some(id) => self.repo.exists(&id).await,
            None => Ok(false),
        }
    }
}
