use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use models::{partnership, Identifier};

use crate::errors::ServiceError;
use crate::identifier::IdentifierLookup;
use super::domain::Partnership;

#[async_trait]
pub trait PartnershipRepository: IdentifierLookup {
    /// Insert, or point an existing `id` at `mentor`. True when a row was written.
    async fn upsert(&self, id: &Identifier, mentor: &Identifier, apprentice: &Identifier) -> Result<bool, ServiceError>;
    async fn delete(&self, id: &Identifier) -> Result<bool, ServiceError>;
    async fn find(&self, id: &Identifier) -> Result<Option<Partnership>, ServiceError>;
    async fn find_by_mentor(&self, mentor: &Identifier) -> Result<Vec<Partnership>, ServiceError>;
    async fn find_by_apprentice(&self, apprentice: &Identifier) -> Result<Vec<Partnership>, ServiceError>;
}

pub struct SeaOrmPartnershipRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmPartnershipRepository {
    async fn find_where(&self, col: partnership::Column, id: &Identifier) -> Result<Vec<Partnership>, ServiceError> {
        partnership::Entity::find()
            .filter(col.eq(id.as_str()))
            .order_by_asc(partnership::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Partnership::try_from)
            .collect()
    }
}

#[async_trait]
impl IdentifierLookup for SeaOrmPartnershipRepository {
    async fn exists(&self, id: &Identifier) -> Result<bool, ServiceError> {
        let n = partnership::Entity::find_by_id(id.as_str()).count(&self.db).await?;
        Ok(n > 0)
    }
}

#[async_trait]
impl PartnershipRepository for SeaOrmPartnershipRepository {
    async fn upsert(&self, id: &Identifier, mentor: &Identifier, apprentice: &Identifier) -> Result<bool, ServiceError> {
        let am = partnership::ActiveModel {
            id: Set(id.to_string()),
            id_mentor: Set(mentor.to_string()),
            id_apprentice: Set(apprentice.to_string()),
        };
        let rows = partnership::Entity::insert(am)
            .on_conflict(
                OnConflict::column(partnership::Column::Id)
                    .update_column(partnership::Column::IdMentor)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(rows > 0)
    }

    async fn delete(&self, id: &Identifier) -> Result<bool, ServiceError> {
        let res = partnership::Entity::delete_by_id(id.as_str()).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn find(&self, id: &Identifier) -> Result<Option<Partnership>, ServiceError> {
        partnership::Entity::find_by_id(id.as_str())
            .one(&self.db)
            .await?
            .map(Partnership::try_from)
            .transpose()
    }

    async fn find_by_mentor(&self, mentor: &Identifier) -> Result<Vec<Partnership>, ServiceError> {
        self.find_where(partnership::Column::IdMentor, mentor).await
    }

    async fn find_by_apprentice(&self, apprentice: &Identifier) -> Result<Vec<Partnership>, ServiceError> {
        self.find_where(partnership::Column::IdApprentice, apprentice).await
    }
}

pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    #[derive(Default)]
    pub struct MockPartnershipRepository {
        rows: Mutex<BTreeMap<String, Partnership>>,
        queries: AtomicUsize,
    }

    impl MockPartnershipRepository {
        pub fn queries(&self) -> usize { self.queries.load(Ordering::SeqCst) }

        fn touch(&self) -> MutexGuard<'_, BTreeMap<String, Partnership>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.rows.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn matching(&self, pred: impl Fn(&Partnership) -> bool) -> Vec<Partnership> {
            self.touch().values().filter(|p| pred(p)).cloned().collect()
        }
    }

    #[async_trait]
    impl IdentifierLookup for MockPartnershipRepository {
        async fn exists(&self, id: &Identifier) -> Result<bool, ServiceError> {
            Ok(self.touch().contains_key(id.as_str()))
        }
    }

    #[async_trait]
    impl PartnershipRepository for MockPartnershipRepository {
        async fn upsert(&self, id: &Identifier, mentor: &Identifier, apprentice: &Identifier) -> Result<bool, ServiceError> {
            let mut rows = self.touch();
            match rows.get_mut(id.as_str()) {
                Some(existing) => existing.mentor = mentor.clone(),
                None => {
                    rows.insert(
                        id.to_string(),
                        Partnership { id: id.clone(), mentor: mentor.clone(), apprentice: apprentice.clone() },
                    );
                }
            }
            Ok(true)
        }

        async fn delete(&self, id: &Identifier) -> Result<bool, ServiceError> {
            Ok(self.touch().remove(id.as_str()).is_some())
        }

        async fn find(&self, id: &Identifier) -> Result<Option<Partnership>, ServiceError> {
            Ok(self.touch().get(id.as_str()).cloned())
        }

        async fn find_by_mentor(&self, mentor: &Identifier) -> Result<Vec<Partnership>, ServiceError> {
            Ok(self.matching(|p| &p.mentor == mentor))
        }

        async fn find_by_apprentice(&self, apprentice: &Identifier) -> Result<Vec<Partnership>, ServiceError> {
            Ok(self.matching(|p| &p.apprentice == apprentice))
        }
    }
}
