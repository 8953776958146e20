use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use models::user_skill::{self, SkillRelation};
use models::{user, Identifier};

use crate::errors::ServiceError;

/// A user as the service layer sees it. `id` is `None` until created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<Identifier>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub irc: Option<String>,
    /// Available to mentor.
    pub is_mentor: bool,
    /// Looking for a mentor.
    pub is_apprentice: bool,
    pub timezone: String,
    /// Skill ids this user teaches.
    pub teaching: BTreeSet<Identifier>,
    /// Skill ids this user is learning.
    pub learning: BTreeSet<Identifier>,
}

impl User {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            github: None,
            twitter: None,
            irc: None,
            is_mentor: false,
            is_apprentice: false,
            timezone: timezone.into(),
            teaching: BTreeSet::new(),
            learning: BTreeSet::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        user::validate_name("first_name", &self.first_name)?;
        user::validate_name("last_name", &self.last_name)?;
        user::validate_email(&self.email)?;
        user::validate_timezone(&self.timezone)?;
        user::validate_handle("github", self.github.as_deref())?;
        user::validate_handle("twitter", self.twitter.as_deref())?;
        user::validate_handle("irc", self.irc.as_deref())?;
        Ok(())
    }

    /// Every (skill, relation) pair this user links to.
    pub fn skill_links(&self) -> impl Iterator<Item = (&Identifier, SkillRelation)> {
        self.teaching
            .iter()
            .map(|id| (id, SkillRelation::Teaching))
            .chain(self.learning.iter().map(|id| (id, SkillRelation::Learning)))
    }

    /// Rebuild from a stored row and its link rows. Links with unknown relations
    /// or malformed skill ids are skipped.
    pub fn from_parts(m: user::Model, links: impl IntoIterator<Item = user_skill::Model>) -> Self {
        let mut u = Self {
            id: Identifier::try_parse(&m.id),
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            github: m.github,
            twitter: m.twitter,
            irc: m.irc,
            is_mentor: m.is_mentor,
            is_apprentice: m.is_apprentice,
            timezone: m.timezone,
            teaching: BTreeSet::new(),
            learning: BTreeSet::new(),
        };
        for link in links {
            let (Some(skill), Some(rel)) = (Identifier::try_parse(&link.skill_id), SkillRelation::parse(&link.relation)) else {
                continue;
            };
            match rel {
                SkillRelation::Teaching => u.teaching.insert(skill),
                SkillRelation::Learning => u.learning.insert(skill),
            };
        }
        u
    }
}
