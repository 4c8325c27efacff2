//! AI-chat message model. The conversation lives in memory for the lifetime
//! of the app process and is never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    /// Plant the question was about, when asked from a plant detail screen.
    pub plant_id: Option<i64>,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>, plant_id: Option<i64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            plant_id,
            sent_at: Utc::now(),
        }
    }
}
