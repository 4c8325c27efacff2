use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError};

/// The backend sees one message at a time plus the optional plant context;
/// the running conversation lives client-side in `crate::chat`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    plant_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompletion {
    pub reply: String,
}

impl ApiClient {
    pub async fn send_chat(
        &self,
        message: &str,
        plant_id: Option<i64>,
    ) -> Result<ChatCompletion, ApiError> {
        self.post_json("/chat", &ChatRequest { message, plant_id })
            .await
    }
}
