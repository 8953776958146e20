use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, instrument};

use models::{skill as skill_model, Identifier};

use crate::errors::ServiceError;
use crate::identifier::IdGenerator;
use super::domain::Skill;
use super::repository::SkillRepository;

/// Skill business rules on top of a [`SkillRepository`].
pub struct SkillService<R: SkillRepository + ?Sized> {
    repo: Arc<R>,
    ids: IdGenerator,
}

impl<R: SkillRepository + ?Sized> SkillService<R> {
    pub fn new(repo: Arc<R>, ids: IdGenerator) -> Self { Self { repo, ids } }

    /// Single skill by id. Empty id is an input error; a malformed one is simply not found.
    pub async fn retrieve(&self, id: &str) -> Result<Option<Skill>, ServiceError> {
        if id.is_empty() {
            return Err(ServiceError::invalid("skill id required"));
        }
        match Identifier::try_parse(id) {
            Some(id) => self.repo.find(&id).await,
            None => Ok(None),
        }
    }

    /// Bulk lookup. Malformed ids are dropped and an empty set never reaches the store.
    pub async fn retrieve_by_ids<I, S>(&self, ids: I) -> Result<Vec<Skill>, ServiceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: BTreeSet<Identifier> = ids
            .into_iter()
            .filter_map(|s| Identifier::try_parse(s.as_ref()))
            .collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }
        let wanted: Vec<Identifier> = wanted.into_iter().collect();
        self.repo.find_many(&wanted).await
    }

    /// Substring match on the skill name.
    pub async fn search_by_term(&self, term: &str) -> Result<Vec<Skill>, ServiceError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ServiceError::invalid("search term required"));
        }
        self.repo.search(term).await
    }

    /// Insert or update `skill`. A missing id is generated and written back.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::identifier::IdGenerator;
    /// use service::skill::{Skill, SkillService, repository::mock::MockSkillRepository};
    ///
    /// let svc = SkillService::new(Arc::new(MockSkillRepository::default()), IdGenerator::default());
    /// let mut rust = Skill::new("Rust");
    /// assert!(tokio_test::block_on(svc.save(&mut rust)).unwrap());
    /// let id = rust.id.clone().unwrap();
    /// let found = tokio_test::block_on(svc.retrieve(id.as_str())).unwrap().unwrap();
    /// assert_eq!(found.name, "Rust");
    /// assert!(!found.authorized);
    /// ```
    #[instrument(skip(self, skill), fields(name = %skill.name))]
    pub async fn save(&self, skill: &mut Skill) -> Result<bool, ServiceError> {
        skill_model::validate_name(&skill.name)?;
        skill.name = skill.name.trim().to_string();
        let id = match &skill.id {
            Some(id) => id.clone(),
            None => {
                let id = self.ids.generate(self.repo.as_ref()).await?;
                skill.id = Some(id.clone());
                id
            }
        };
        let written = self.repo.upsert(&id, skill).await?;
        if written {
            info!(id = %id, authorized = skill.authorized, "skill_saved");
        }
        Ok(written)
    }

    /// Hard delete. False for a malformed id or when nothing matched.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let Some(id) = Identifier::try_parse(id) else { return Ok(false) };
        let deleted = self.repo.delete(&id).await?;
        if deleted {
            info!(id = %id, "skill_deleted");
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
