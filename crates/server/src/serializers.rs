//! JSON shapes for requests and responses. Conversions only, no I/O.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use common::sanitize::{clean, clean_opt};
use models::Identifier;
use service::partnership::Partnership;
use service::skill::Skill;
use service::user::User;

use crate::errors::JsonApiError;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SkillOut {
    pub id: String,
    pub name: String,
    pub authorized: bool,
    /// RFC 3339.
    pub added: String,
}

impl From<&Skill> for SkillOut {
    fn from(s: &Skill) -> Self {
        Self {
            id: s.id.as_ref().map(Identifier::to_string).unwrap_or_default(),
            name: s.name.clone(),
            authorized: s.authorized,
            added: s.added.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserOut {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub irc: Option<String>,
    pub is_mentor: bool,
    pub is_apprentice: bool,
    pub timezone: String,
    pub teaching: Vec<String>,
    pub learning: Vec<String>,
}

impl From<&User> for UserOut {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.as_ref().map(Identifier::to_string).unwrap_or_default(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            email: u.email.clone(),
            github: u.github.clone(),
            twitter: u.twitter.clone(),
            irc: u.irc.clone(),
            is_mentor: u.is_mentor,
            is_apprentice: u.is_apprentice,
            timezone: u.timezone.clone(),
            teaching: u.teaching.iter().map(Identifier::to_string).collect(),
            learning: u.learning.iter().map(Identifier::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PartnershipOut {
    pub id: String,
    pub mentor: String,
    pub apprentice: String,
}

impl From<&Partnership> for PartnershipOut {
    fn from(p: &Partnership) -> Self {
        Self { id: p.id.to_string(), mentor: p.mentor.to_string(), apprentice: p.apprentice.to_string() }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSkillsOut {
    pub teaching: Vec<SkillOut>,
    pub learning: Vec<SkillOut>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserPartnershipsOut {
    pub mentoring: Vec<PartnershipOut>,
    pub apprenticing: Vec<PartnershipOut>,
}

/// A user with resolved skills and both sides of their partnerships.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDetailOut {
    #[serde(flatten)]
    pub user: UserOut,
    pub skills: UserSkillsOut,
    pub partnerships: UserPartnershipsOut,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Deleted {
    pub id: String,
}

/// Body of `POST /v1/users` and `PUT /v1/users/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UserInput {
    /// Optional on create; ignored on update where the path wins.
    #[serde(default)]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub irc: Option<String>,
    #[serde(default)]
    pub is_mentor: bool,
    #[serde(default)]
    pub is_apprentice: bool,
    pub timezone: String,
    #[serde(default)]
    pub teaching: Vec<String>,
    #[serde(default)]
    pub learning: Vec<String>,
}

fn skill_ids(field: &str, raw: &[String]) -> Result<std::collections::BTreeSet<Identifier>, JsonApiError> {
    raw.iter()
        .map(|s| {
            Identifier::parse(s.trim()).map_err(|_| JsonApiError::bad_request(format!("{field}: malformed skill id {s:?}")))
        })
        .collect()
}

impl UserInput {
    /// Sanitized domain user. `id` comes from the path on update.
    pub fn into_user(self, id: Option<Identifier>) -> Result<User, JsonApiError> {
        let mut u = User::new(clean(&self.first_name), clean(&self.last_name), clean(&self.email), clean(&self.timezone));
        u.id = id;
        u.github = clean_opt(self.github.as_deref());
        u.twitter = clean_opt(self.twitter.as_deref());
        u.irc = clean_opt(self.irc.as_deref());
        u.is_mentor = self.is_mentor;
        u.is_apprentice = self.is_apprentice;
        u.teaching = skill_ids("teaching", &self.teaching)?;
        u.learning = skill_ids("learning", &self.learning)?;
        Ok(u)
    }
}

/// Body of `POST /v1/skills` and `PUT /v1/skills/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SkillInput {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// `true`/`false` or `1`/`0`.
    #[serde(default, deserialize_with = "bool_or_int")]
    #[schema(value_type = bool)]
    pub authorized: bool,
    /// `YYYY-MM-DD` or RFC 3339; now when absent.
    #[serde(default)]
    pub added: Option<String>,
}

impl SkillInput {
    pub fn into_skill(self, id: Option<Identifier>) -> Result<Skill, JsonApiError> {
        let mut s = Skill::new(clean(&self.name));
        s.id = id;
        s.authorized = self.authorized;
        s.added = parse_added(self.added.as_deref())?;
        Ok(s)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PartnershipInput {
    pub mentor: String,
    pub apprentice: String,
}

fn bool_or_int<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }
    match Flag::deserialize(d)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(n) => Err(de::Error::custom(format!("authorized must be 0 or 1, got {n}"))),
    }
}

pub fn parse_added(raw: Option<&str>) -> Result<DateTime<Utc>, JsonApiError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(Utc::now()),
        Some(s) => s,
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| JsonApiError::bad_request(format!("added: expected YYYY-MM-DD or RFC 3339, got {raw:?}")))
}
