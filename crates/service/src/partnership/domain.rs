use serde::{Deserialize, Serialize};

use models::{partnership, Identifier};

use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partnership {
    pub id: Identifier,
    pub mentor: Identifier,
    pub apprentice: Identifier,
}

impl TryFrom<partnership::Model> for Partnership {
    type Error = ServiceError;

    /// Rows are written through [`Identifier`] only, so a bad id here means the
    /// table was edited out of band.
    fn try_from(m: partnership::Model) -> Result<Self, Self::Error> {
        let field = |name: &str, v: &str| {
            Identifier::try_parse(v).ok_or_else(|| ServiceError::Db(format!("partnership {} has malformed {name}: {v:?}", m.id)))
        };
        Ok(Self {
            id: field("id", &m.id)?,
            mentor: field("id_mentor", &m.id_mentor)?,
            apprentice: field("id_apprentice", &m.id_apprentice)?,
        })
    }
}

/// Which side of a partnership a user id is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Mentor,
    Apprentice,
}

impl Role {
    /// Case-insensitive. Anything but `mentor` or `apprentice` is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("mentor") {
            Some(Role::Mentor)
        } else if s.eq_ignore_ascii_case("apprentice") {
            Some(Role::Apprentice)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Mentor => "mentor",
            Role::Apprentice => "apprentice",
        }
    }
}
