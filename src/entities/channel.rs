//! Channel entity - A topic/language room

use serde::{Deserialize, Serialize};

use super::enums::{LanguageCode, ProficiencyLevel};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Channel {
    pub channel_id: i32,
    pub name: String,
    pub description: String,
    pub language: LanguageCode,
    pub level: ProficiencyLevel,
}
