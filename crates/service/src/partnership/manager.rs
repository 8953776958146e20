use std::sync::Arc;

use tracing::{info, instrument};

use models::Identifier;

use crate::errors::ServiceError;
use crate::identifier::IdGenerator;
use super::domain::{Partnership, Role};
use super::repository::PartnershipRepository;

/// Creates and queries partnerships. User existence is not checked: a
/// partnership may name ids that have no user row.
pub struct PartnershipManager<R: PartnershipRepository + ?Sized> {
    repo: Arc<R>,
    ids: IdGenerator,
}

fn required(field: &str, value: &str) -> Result<Identifier, ServiceError> {
    Identifier::parse(value).map_err(|e| ServiceError::invalid(format!("{field}: {e}")))
}

impl<R: PartnershipRepository + ?Sized> PartnershipManager<R> {
    pub fn new(repo: Arc<R>, ids: IdGenerator) -> Self { Self { repo, ids } }

    /// Pair `mentor` with `apprentice` under a fresh id. `None` when nothing was written.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use service::identifier::IdGenerator;
    /// use service::partnership::{PartnershipManager, repository::mock::MockPartnershipRepository};
    ///
    /// let mgr = PartnershipManager::new(Arc::new(MockPartnershipRepository::default()), IdGenerator::default());
    /// let id = tokio_test::block_on(mgr.create("aaaaaaaaaa", "bbbbbbbbbb")).unwrap();
    /// assert!(id.is_some());
    /// assert!(tokio_test::block_on(mgr.create("aaaaaaaaaa", "")).is_err());
    /// ```
    #[instrument(skip(self))]
    pub async fn create(&self, mentor: &str, apprentice: &str) -> Result<Option<Identifier>, ServiceError> {
        let mentor = required("mentor", mentor)?;
        let apprentice = required("apprentice", apprentice)?;
        let id = self.ids.generate(self.repo.as_ref()).await?;
        if !self.repo.upsert(&id, &mentor, &apprentice).await? {
            return Ok(None);
        }
        info!(id = %id, mentor = %mentor, apprentice = %apprentice, "partnership_created");
        Ok(Some(id))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let Some(id) = Identifier::try_parse(id) else { return Ok(false) };
        let deleted = self.repo.delete(&id).await?;
        if deleted {
            info!(id = %id, "partnership_deleted");
        }
        Ok(deleted)
    }

    pub async fn retrieve_by_id(&self, id: &str) -> Result<Option<Partnership>, ServiceError> {
        match Identifier::try_parse(id) {
            Some(id) => self.repo.find(&id).await,
            None => Ok(None),
        }
    }

    pub async fn retrieve_by_mentor(&self, id: &str) -> Result<Vec<Partnership>, ServiceError> {
        match Identifier::try_parse(id) {
            Some(id) => self.repo.find_by_mentor(&id).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn retrieve_by_apprentice(&self, id: &str) -> Result<Vec<Partnership>, ServiceError> {
        match Identifier::try_parse(id) {
            Some(id) => self.repo.find_by_apprentice(&id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Match `id` against the given side. Without a role `id` is taken as a
    /// partnership id and the result holds at most one element.
    pub async fn retrieve_by_role(&self, role: Option<Role>, id: &str) -> Result<Vec<Partnership>, ServiceError> {
        match role {
            Some(Role::Mentor) => self.retrieve_by_mentor(id).await,
            Some(Role::Apprentice) => self.retrieve_by_apprentice(id).await,
            None => Ok(self.retrieve_by_id(id).await?.into_iter().collect()),
        }
    }

    pub async fn exists(&self, id: &str) -> Result<bool, ServiceError> {
        match Identifier::try_parse(id) {
            Some(id) => self.repo.exists(&id).await,
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partnership::repository::mock::MockPartnershipRepository;

    const MENTOR: &str = "aaaaaaaaaa";
    const OTHER_MENTOR: &str = "cccccccccc";
    const APPRENTICE: &str = "bbbbbbbbbb";

    fn manager() -> (Arc<MockPartnershipRepository>, PartnershipManager<MockPartnershipRepository>) {
        let repo = Arc::new(MockPartnershipRepository::default());
        (repo.clone(), PartnershipManager::new(repo, IdGenerator::default()))
    }

    #[tokio::test]
    async fn create_requires_well_formed_ids() {
        let (repo, mgr) = manager();
        for (m, a) in [("", APPRENTICE), (MENTOR, "nothex!!!!"), ("ABCDEFABCD", APPRENTICE)] {
            assert!(matches!(mgr.create(m, a).await, Err(ServiceError::InvalidInput(_))));
        }
        assert_eq!(repo.queries(), 0);
    }

    #[tokio::test]
    async fn create_does_not_check_users() {
        let (_, mgr) = manager();
        let id = mgr.create(MENTOR, APPRENTICE).await.unwrap().unwrap();
        let p = mgr.retrieve_by_id(id.as_str()).await.unwrap().unwrap();
        assert_eq!(p.mentor.as_str(), MENTOR);
        assert_eq!(p.apprentice.as_str(), APPRENTICE);
        assert!(mgr.exists(id.as_str()).await.unwrap());
    }

    #[tokio::test]
    async fn upsert_on_same_id_moves_mentor() {
        let (repo, _) = manager();
        let id = Identifier::parse("1234567890").unwrap();
        let m1 = Identifier::parse(MENTOR).unwrap();
        let m2 = Identifier::parse(OTHER_MENTOR).unwrap();
        let a = Identifier::parse(APPRENTICE).unwrap();
        repo.upsert(&id, &m1, &a).await.unwrap();
        repo.upsert(&id, &m2, &a).await.unwrap();
        let p = repo.find(&id).await.unwrap().unwrap();
        assert_eq!(p.mentor, m2);
    }

    #[tokio::test]
    async fn retrieve_by_role_selects_the_right_side() {
        let (_, mgr) = manager();
        let p1 = mgr.create(MENTOR, APPRENTICE).await.unwrap().unwrap();
        let p2 = mgr.create(OTHER_MENTOR, APPRENTICE).await.unwrap().unwrap();
        let _p3 = mgr.create(MENTOR, OTHER_MENTOR).await.unwrap().unwrap();

        let as_mentor = mgr.retrieve_by_role(Role::parse("Mentor"), MENTOR).await.unwrap();
        assert_eq!(as_mentor.len(), 2);
        assert!(as_mentor.iter().all(|p| p.mentor.as_str() == MENTOR));

        let as_apprentice = mgr.retrieve_by_role(Some(Role::Apprentice), APPRENTICE).await.unwrap();
        let mut ids: Vec<_> = as_apprentice.iter().map(|p| p.id.clone()).collect();
        ids.sort();
        let mut want = vec![p1.clone(), p2];
        want.sort();
        assert_eq!(ids, want);

        let by_id = mgr.retrieve_by_role(Role::parse("coach"), p1.as_str()).await.unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].id, p1);
        assert!(mgr.retrieve_by_role(None, MENTOR).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_ids_short_circuit() {
        let (repo, mgr) = manager();
        assert!(mgr.retrieve_by_id("zz").await.unwrap().is_none());
        assert!(mgr.retrieve_by_mentor("zz").await.unwrap().is_empty());
        assert!(mgr.retrieve_by_apprentice("").await.unwrap().is_empty());
        assert!(!mgr.delete("zz").await.unwrap());
        assert!(!mgr.exists("zz").await.unwrap());
        assert_eq!(repo.queries(), 0);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_went() {
        let (_, mgr) = manager();
        let id = mgr.create(MENTOR, APPRENTICE).await.unwrap().unwrap();
        assert!(!mgr.delete("0000000000").await.unwrap());
        assert!(mgr.delete(id.as_str()).await.unwrap());
        assert!(!mgr.delete(id.as_str()).await.unwrap());
    }
}
