use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
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
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const EMAIL_MAX_LEN: usize = 255;
pub const HANDLE_MAX_LEN: usize = 64;
pub const TIMEZONE_MAX_LEN: usize = 64;

fn too_long(field: &str, value: &str, max: usize) -> Result<(), errors::ModelError> {
    if value.chars().count() > max {
        return Err(errors::ModelError::Validation(format!("{field} too long (<={max})")));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let trimmed = email.trim();
    too_long("email", trimmed, EMAIL_MAX_LEN)?;
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(errors::ModelError::Validation("invalid email".into())),
    }
}

pub fn validate_name(field: &str, value: &str) -> Result<(), errors::ModelError> {
    if value.trim().is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} required")));
    }
    if value.chars().count() > 128 {
        return Err(errors::ModelError::Validation(format!("{field} too long (<=128)")));
    }
    Ok(())
}

pub fn validate_timezone(tz: &str) -> Result<(), errors::ModelError> {
    if tz.trim().is_empty() {
        return Err(errors::ModelError::Validation("timezone required".into()));
    }
    too_long("timezone", tz, TIMEZONE_MAX_LEN)
}

/// Optional contact handle (github, twitter, irc).
pub fn validate_handle(field: &str, value: Option<&str>) -> Result<(), errors::ModelError> {
    match value {
        Some(v) => too_long(field, v, HANDLE_MAX_LEN),
        None => Ok(()),
    }
}
