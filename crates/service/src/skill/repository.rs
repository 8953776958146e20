use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr};

use models::{skill, Identifier};

use crate::errors::ServiceError;
use crate::identifier::IdentifierLookup;
use super::domain::Skill;

/// Persistence for skills. Callers pass only well-formed identifiers.
#[async_trait]
pub trait SkillRepository: IdentifierLookup {
    async fn find(&self, id: &Identifier) -> Result<Option<Skill>, ServiceError>;
    async fn find_many(&self, ids: &[Identifier]) -> Result<Vec<Skill>, ServiceError>;
    async fn search(&self, term: &str) -> Result<Vec<Skill>, ServiceError>;
    /// Insert, or update name and authorized flag when `id` exists. True when a row was written.
    async fn upsert(&self, id: &Identifier, skill: &Skill) -> Result<bool, ServiceError>;
    async fn delete(&self, id: &Identifier) -> Result<bool, ServiceError>;
}

/// `%term%` with the LIKE metacharacters in `term` backslash-escaped.
fn contains_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmSkillRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl IdentifierLookup for SeaOrmSkillRepository {
    async fn exists(&self, id: &Identifier) -> Result<bool, ServiceError> {
        let n = skill::Entity::find_by_id(id.as_str()).count(&self.db).await?;
        Ok(n > 0)
    }
}

#[async_trait]
impl SkillRepository for SeaOrmSkillRepository {
    async fn find(&self, id: &Identifier) -> Result<Option<Skill>, ServiceError> {
        let found = skill::Entity::find_by_id(id.as_str()).one(&self.db).await?;
        found.map(Skill::try_from).transpose()
    }

    async fn find_many(&self, ids: &[Identifier]) -> Result<Vec<Skill>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = skill::Entity::find()
            .filter(skill::Column::Id.is_in(ids.iter().map(Identifier::as_str)))
            .order_by_asc(skill::Column::Name)
            .all(&self.db)
            .await?;
        rows.into_iter().map(Skill::try_from).collect()
    }

    async fn search(&self, term: &str) -> Result<Vec<Skill>, ServiceError> {
        let rows = skill::Entity::find()
            .filter(Expr::col(skill::Column::Name).like(LikeExpr::new(contains_pattern(term)).escape('\\')))
            .order_by_asc(skill::Column::Name)
            .all(&self.db)
            .await?;
        rows.into_iter().map(Skill::try_from).collect()
    }

    async fn upsert(&self, id: &Identifier, item: &Skill) -> Result<bool, ServiceError> {
        let am = skill::ActiveModel {
            id: Set(id.to_string()),
            name: Set(item.name.clone()),
            authorized: Set(item.authorized),
            added: Set(item.added.into()),
        };
        let rows = skill::Entity::insert(am)
            .on_conflict(
                OnConflict::column(skill::Column::Id)
                    .update_columns([skill::Column::Name, skill::Column::Authorized])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    ServiceError::invalid(format!("skill name already exists: {}", item.name))
                }
                _ => ServiceError::from(e),
            })?;
        Ok(rows > 0)
    }

    async fn delete(&self, id: &Identifier) -> Result<bool, ServiceError> {
        let res = skill::Entity::delete_by_id(id.as_str()).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

/// In-memory repository for tests and doc examples. Counts every call so
/// tests can assert that rejected input never reached storage.
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    #[derive(Default)]
    pub struct MockSkillRepository {
        skills: Mutex<BTreeMap<String, Skill>>, // key: id
        queries: AtomicUsize,
    }

    impl MockSkillRepository {
        /// Number of repository calls made so far.
        pub fn queries(&self) -> usize { self.queries.load(Ordering::SeqCst) }

        fn touch(&self) -> MutexGuard<'_, BTreeMap<String, Skill>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.skills.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    fn sorted(mut v: Vec<Skill>) -> Vec<Skill> {
        v.sort_by(|a, b| a.name.cmp(&b.name));
        v
    }

    #[async_trait]
    impl IdentifierLookup for MockSkillRepository {
        async fn exists(&self, id: &Identifier) -> Result<bool, ServiceError> {
            Ok(self.touch().contains_key(id.as_str()))
        }
    }

    #[async_trait]
    impl SkillRepository for MockSkillRepository {
        async fn find(&self, id: &Identifier) -> Result<Option<Skill>, ServiceError> {
            Ok(self.touch().get(id.as_str()).cloned())
        }

        async fn find_many(&self, ids: &[Identifier]) -> Result<Vec<Skill>, ServiceError> {
            let skills = self.touch();
            Ok(sorted(ids.iter().filter_map(|id| skills.get(id.as_str()).cloned()).collect()))
        }

        async fn search(&self, term: &str) -> Result<Vec<Skill>, ServiceError> {
            let skills = self.touch();
            Ok(sorted(skills.values().filter(|s| s.name.contains(term)).cloned().collect()))
        }

        async fn upsert(&self, id: &Identifier, skill: &Skill) -> Result<bool, ServiceError> {
            let mut skills = self.touch();
            let taken = skills
                .iter()
                .any(|(k, s)| k.as_str() != id.as_str() && s.name == skill.name);
            if taken {
                return Err(ServiceError::invalid(format!("skill name already exists: {}", skill.name)));
            }
            match skills.get_mut(id.as_str()) {
                Some(existing) => {
                    existing.name = skill.name.clone();
                    existing.authorized = skill.authorized;
                }
                None => {
                    let mut stored = skill.clone();
                    stored.id = Some(id.clone());
                    skills.insert(id.to_string(), stored);
                }
            }
            Ok(true)
        }

        async fn delete(&self, id: &Identifier) -> Result<bool, ServiceError> {
            Ok(self.touch().remove(id.as_str()).is_some())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::IdGenerator;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn seaorm_skill_roundtrip() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmSkillRepository { db };
        let id = IdGenerator::default().generate(&repo).await?;
        let mut s = Skill::new(format!("Rust {id}"));
        assert!(repo.upsert(&id, &s).await?);

        s.authorized = true;
        assert!(repo.upsert(&id, &s).await?);
        let found = repo.find(&id).await?.unwrap();
        assert!(found.authorized);
        assert_eq!(found.id.as_ref(), Some(&id));

        let hits = repo.search(&id.to_string()).await?;
        assert_eq!(hits.len(), 1);
        let many = repo.find_many(&[id.clone(), IdGenerator::candidate()]).await?;
        assert_eq!(many.len(), 1);

        let other = IdGenerator::default().generate(&repo).await?;
        let err = repo.upsert(&other, &s).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        assert!(repo.delete(&id).await?);
        assert!(!repo.exists(&id).await?);
        Ok(())
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(contains_pattern("Rust"), "%Rust%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }

    #[tokio::test]
    async fn seaorm_search_is_literal() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmSkillRepository { db };
        let plain_id = IdGenerator::default().generate(&repo).await?;
        let pct_id = IdGenerator::default().generate(&repo).await?;
        let plain = format!("search {plain_id} plain");
        let pct = format!("search {pct_id} 100% done_ok");
        repo.upsert(&plain_id, &Skill::new(plain.clone())).await?;
        repo.upsert(&pct_id, &Skill::new(pct.clone())).await?;

        let hits = repo.search("%").await?;
        assert!(hits.iter().all(|s| s.name.contains('%')));
        assert!(hits.iter().any(|s| s.name == pct));
        assert!(!hits.iter().any(|s| s.name == plain));

        assert!(repo.search("_").await?.iter().all(|s| s.name.contains('_')));
        assert!(repo.search(&format!("search {plain_id}%plain")).await?.is_empty());
        assert!(repo.search(&format!("{plain_id} p_ain")).await?.is_empty());
        assert_eq!(repo.search(&format!("{pct_id} 100%")).await?.len(), 1);

        repo.delete(&plain_id).await?;
        repo.delete(&pct_id).await?;
        Ok(())
    }
}
