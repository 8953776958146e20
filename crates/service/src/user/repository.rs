use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use models::{user, user_skill, Identifier};

use crate::errors::ServiceError;
use crate::identifier::IdentifierLookup;
use super::domain::User;

/// Persistence for users and their skill links. A user row and its links are
/// always written together.
#[async_trait]
pub trait UserRepository: IdentifierLookup {
    async fn find(&self, id: &Identifier) -> Result<Option<User>, ServiceError>;
    /// All users ordered by last name, then first name.
    async fn find_all(&self) -> Result<Vec<User>, ServiceError>;
    async fn insert(&self, id: &Identifier, user: &User) -> Result<bool, ServiceError>;
    /// Replace profile fields and links. False when `id` is not stored.
    async fn update(&self, id: &Identifier, user: &User) -> Result<bool, ServiceError>;
    /// Remove the user and their links. Partnerships are left alone.
    async fn delete(&self, id: &Identifier) -> Result<bool, ServiceError>;
}

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

fn link_rows(id: &Identifier, u: &User) -> Vec<user_skill::ActiveModel> {
    u.skill_links()
        .map(|(skill, rel)| user_skill::ActiveModel {
            user_id: Set(id.to_string()),
            skill_id: Set(skill.to_string()),
            relation: Set(rel.as_str().to_string()),
        })
        .collect()
}

async fn write_links<C: ConnectionTrait>(conn: &C, id: &Identifier, u: &User) -> Result<(), ServiceError> {
    let rows = link_rows(id, u);
    // insert_many rejects an empty batch
    if !rows.is_empty() {
        user_skill::Entity::insert_many(rows).exec_without_returning(conn).await?;
    }
    Ok(())
}

async fn drop_links<C: ConnectionTrait>(conn: &C, id: &Identifier) -> Result<(), ServiceError> {
    user_skill::Entity::delete_many()
        .filter(user_skill::Column::UserId.eq(id.as_str()))
        .exec(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl IdentifierLookup for SeaOrmUserRepository {
    async fn exists(&self, id: &Identifier) -> Result<bool, ServiceError> {
        let n = user::Entity::find_by_id(id.as_str()).count(&self.db).await?;
        Ok(n > 0)
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find(&self, id: &Identifier) -> Result<Option<User>, ServiceError> {
        let Some(row) = user::Entity::find_by_id(id.as_str()).one(&self.db).await? else {
            return Ok(None);
        };
        let links = user_skill::Entity::find()
            .filter(user_skill::Column::UserId.eq(id.as_str()))
            .all(&self.db)
            .await?;
        Ok(Some(User::from_parts(row, links)))
    }

    async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        let rows = user::Entity::find()
            .order_by_asc(user::Column::LastName)
            .order_by_asc(user::Column::FirstName)
            .all(&self.db)
            .await?;
        let mut links: HashMap<String, Vec<user_skill::Model>> = HashMap::new();
        for link in user_skill::Entity::find().all(&self.db).await? {
            links.entry(link.user_id.clone()).or_default().push(link);
        }
        Ok(rows
            .into_iter()
            .map(|row| {
                let own = links.remove(&row.id).unwrap_or_default();
                User::from_parts(row, own)
            })
            .collect())
    }

    async fn insert(&self, id: &Identifier, u: &User) -> Result<bool, ServiceError> {
        let now = Utc::now();
        let am = user::ActiveModel {
            id: Set(id.to_string()),
            first_name: Set(u.first_name.clone()),
            last_name: Set(u.last_name.clone()),
            email: Set(u.email.clone()),
            github: Set(u.github.clone()),
            twitter: Set(u.twitter.clone()),
            irc: Set(u.irc.clone()),
            is_mentor: Set(u.is_mentor),
            is_apprentice: Set(u.is_apprentice),
            timezone: Set(u.timezone.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let txn = self.db.begin().await?;
        let rows = user::Entity::insert(am).exec_without_returning(&txn).await?;
        write_links(&txn, id, u).await?;
        txn.commit().await?;
        Ok(rows > 0)
    }

    async fn update(&self, id: &Identifier, u: &User) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await?;
        let Some(existing) = user::Entity::find_by_id(id.as_str()).one(&txn).await? else {
            return Ok(false);
        };
        let mut am: user::ActiveModel = existing.into();
        am.first_name = Set(u.first_name.clone());
        am.last_name = Set(u.last_name.clone());
        am.email = Set(u.email.clone());
        am.github = Set(u.github.clone());
        am.twitter = Set(u.twitter.clone());
        am.irc = Set(u.irc.clone());
        am.is_mentor = Set(u.is_mentor);
        am.is_apprentice = Set(u.is_apprentice);
        am.timezone = Set(u.timezone.clone());
        am.updated_at = Set(Utc::now().into());
        am.update(&txn).await?;
        drop_links(&txn, id).await?;
        write_links(&txn, id, u).await?;
        txn.commit().await?;
        Ok(true)
    }

    async fn delete(&self, id: &Identifier) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await?;
        drop_links(&txn, id).await?;
        let res = user::Entity::delete_by_id(id.as_str()).exec(&txn).await?;
        txn.commit().await?;
        Ok(res.rows_affected > 0)
    }
}

/// In-memory repository with a call counter.
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    #[derive(Default)]
    pub struct MockUserRepository {
        users: Mutex<BTreeMap<String, User>>,
        queries: AtomicUsize,
    }

    impl MockUserRepository {
        pub fn queries(&self) -> usize { self.queries.load(Ordering::SeqCst) }

        fn touch(&self) -> MutexGuard<'_, BTreeMap<String, User>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.users.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    #[async_trait]
    impl IdentifierLookup for MockUserRepository {
        async fn exists(&self, id: &Identifier) -> Result<bool, ServiceError> {
            Ok(self.touch().contains_key(id.as_str()))
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find(&self, id: &Identifier) -> Result<Option<User>, ServiceError> {
            Ok(self.touch().get(id.as_str()).cloned())
        }

        async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
            let mut all: Vec<User> = self.touch().values().cloned().collect();
            all.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
            Ok(all)
        }

        async fn insert(&self, id: &Identifier, u: &User) -> Result<bool, ServiceError> {
            let mut users = self.touch();
            if users.contains_key(id.as_str()) {
                return Err(ServiceError::Db(format!("duplicate key: {id}")));
            }
            let mut stored = u.clone();
            stored.id = Some(id.clone());
            users.insert(id.to_string(), stored);
            Ok(true)
        }

        async fn update(&self, id: &Identifier, u: &User) -> Result<bool, ServiceError> {
            let mut users = self.touch();
            let Some(existing) = users.get_mut(id.as_str()) else { return Ok(false) };
            *existing = u.clone();
            existing.id = Some(id.clone());
            Ok(true)
        }

        async fn delete(&self, id: &Identifier) -> Result<bool, ServiceError> {
            Ok(self.touch().remove(id.as_str()).is_some())
        }
    }
}
