//! Link rows between a user and the skills they teach or learn.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_skill")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub skill_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub relation: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Which side of the mentorship a linked skill is on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SkillRelation {
    Teaching,
    Learning,
}

impl SkillRelation {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillRelation::Teaching => "teaching",
            SkillRelation::Learning => "learning",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "teaching" => Some(SkillRelation::Teaching),
            "learning" => Some(SkillRelation::Learning),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SkillRelation;

    #[test]
    fn relation_strings_match_column_values() {
        for r in [SkillRelation::Teaching, SkillRelation::Learning] {
            assert_eq!(SkillRelation::parse(r.as_str()), Some(r));
        }
        assert_eq!(SkillRelation::parse("mentoring"), None);
    }
}
