//! Client for the remote plant-care API.
//!
//! One `ApiClient` lives in `AppState` for the whole process. Per-resource
//! calls are split across the submodules (`plants`, `sensors`, `chat`,
//! `dex`, `auth`, `scans`), each an `impl ApiClient` block. The backend is
//! an opaque collaborator: no retries here, callers decide what a failure
//! means (see `ApiError`).

pub mod auth;
pub mod chat;
pub mod dex;
pub mod error;
pub mod plants;
pub mod scans;
pub mod sensors;

pub use error::ApiError;
pub use scans::IdentifyResult;
pub use sensors::SensorReader;

use std::sync::RwLock;
use std::time::Duration;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("verdant/", env!("CARGO_PKG_VERSION"));

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

/// Error payload the backend uses for non-2xx answers.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(token),
        })
    }

    /// Swap the bearer token after login/logout. Persisting it is the
    /// caller's job (settings store).
    pub fn set_auth_token(&self, token: Option<String>) {
        *self.token.write().unwrap() = token;
    }

    pub fn has_auth_token(&self) -> bool {
        self.token.read().unwrap().is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.read().unwrap().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.authorize(self.http.get(self.url(path))).send().await?;
        Self::decode(response).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .authorize(self.http.post(self.url(path)).json(body))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub(crate) async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .authorize(self.http.patch(self.url(path)).json(body))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .authorize(self.http.delete(self.url(path)))
            .send()
            .await?;
        match Self::check_status(&response) {
            Ok(()) => Ok(()),
            Err(status) => Err(Self::status_error(status, response).await),
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        match Self::check_status(&response) {
            Ok(()) => Ok(response.json::<T>().await?),
            Err(status) => Err(Self::status_error(status, response).await),
        }
    }

    fn check_status(response: &reqwest::Response) -> Result<(), u16> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(status.as_u16())
        }
    }

    async fn status_error(status: u16, response: reqwest::Response) -> ApiError {
        let message = match response.json::<ErrorBody>().await {
            Ok(ErrorBody {
                message: Some(message),
            }) => message,
            _ => "request failed".to_string(),
        };
        ApiError::Status { status, message }
    }
}
