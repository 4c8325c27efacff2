use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanRequest<'a> {
    /// Base64-encoded JPEG, already downscaled client-side.
    image_base64: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyResult {
    pub species: String,
    pub confidence: f64,
    /// Catalog entry unlocked by this scan, when the species is known.
    pub dex_entry_id: Option<i64>,
}

impl ApiClient {
    pub async fn identify_plant(&self, image_base64: &str) -> Result<IdentifyResult, ApiError> {
        self.post_json("/scans", &ScanRequest { image_base64 }).await
    }
}
