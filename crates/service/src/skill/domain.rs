use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use models::{skill, Identifier};

use crate::errors::ServiceError;

/// A skill as the service layer sees it. `id` is `None` until first saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: Option<Identifier>,
    pub name: String,
    pub authorized: bool,
    pub added: DateTime<Utc>,
}

impl Skill {
    /// A new, unauthorized skill added now.
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: None, name: name.into(), authorized: false, added: Utc::now() }
    }
}

impl TryFrom<skill::Model> for Skill {
    type Error = ServiceError;

    /// A stored row always carries a well-formed id; anything else is a data error.
    fn try_from(m: skill::Model) -> Result<Self, Self::Error> {
        let id = Identifier::try_parse(&m.id)
            .ok_or_else(|| ServiceError::Db(format!("skill {:?} has malformed id", m.id)))?;
        Ok(Self {
            id: Some(id),
            name: m.name,
            authorized: m.authorized,
            added: m.added.with_timezone(&Utc),
        })
    }
}
