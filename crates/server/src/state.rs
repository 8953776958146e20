use std::sync::Arc;

use sea_orm::DatabaseConnection;

use service::identifier::IdGenerator;
use service::partnership::repository::{mock::MockPartnershipRepository, PartnershipRepository, SeaOrmPartnershipRepository};
use service::partnership::PartnershipManager;
use service::skill::repository::{mock::MockSkillRepository, SeaOrmSkillRepository, SkillRepository};
use service::skill::SkillService;
use service::user::repository::{mock::MockUserRepository, SeaOrmUserRepository, UserRepository};
use service::user::UserService;

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService<dyn UserRepository>>,
    pub skills: Arc<SkillService<dyn SkillRepository>>,
    pub partnerships: Arc<PartnershipManager<dyn PartnershipRepository>>,
}

impl AppState {
    fn assemble(
        users: Arc<dyn UserRepository>,
        skills: Arc<dyn SkillRepository>,
        partnerships: Arc<dyn PartnershipRepository>,
        ids: IdGenerator,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(users, ids.clone())),
            skills: Arc::new(SkillService::new(skills, ids.clone())),
            partnerships: Arc::new(PartnershipManager::new(partnerships, ids)),
        }
    }

    /// Postgres-backed state. The pool is shared by the three repositories.
    pub fn from_db(db: DatabaseConnection, ids: IdGenerator) -> Self {
        Self::assemble(
            Arc::new(SeaOrmUserRepository { db: db.clone() }),
            Arc::new(SeaOrmSkillRepository { db: db.clone() }),
            Arc::new(SeaOrmPartnershipRepository { db }),
            ids,
        )
    }

    /// Process-local state, used by the router tests.
    pub fn in_memory(ids: IdGenerator) -> Self {
        Self::assemble(
            Arc::new(MockUserRepository::default()),
            Arc::new(MockSkillRepository::default()),
            Arc::new(MockPartnershipRepository::default()),
            ids,
        )
    }
}
