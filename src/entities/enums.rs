//! Enumerations - Enumerated types used by the entities

use serde::{Deserialize, Serialize};

/// Languages a channel can be dedicated to, as two-letter codes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "language", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum LanguageCode {
    En,
    Es,
    Fr,
    De,
    It,
}

/// CEFR proficiency levels. `Native` is stored as 'N'.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "level", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ProficiencyLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
    #[sqlx(rename = "N")]
    #[serde(rename = "N")]
    Native,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelRole {
    User,
    Moderator,
    Admin,
}
