//! Discovery-catalog ("dex") entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexEntry {
    pub id: i64,
    pub species: String,
    pub display_name: String,
    pub discovered: bool,
    pub discovered_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
}
