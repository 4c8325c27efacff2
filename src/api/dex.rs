use crate::api::{ApiClient, ApiError};
use crate::models::DexEntry;

impl ApiClient {
    pub async fn list_dex_entries(&self) -> Result<Vec<DexEntry>, ApiError> {
        self.get_json("/dex").await
    }

    pub async fn get_dex_entry(&self, entry_id: i64) -> Result<DexEntry, ApiError> {
        self.get_json(&format!("/dex/{entry_id}")).await
    }
}
