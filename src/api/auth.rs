//! Registration and login. The landing-page form posts the same
//! registration payload; in-app both calls leave token handling to the
//! caller (set on the client, persisted via settings).

use crate::api::{ApiClient, ApiError};
use crate::models::{AuthSession, LoginRequest, RegisterRequest};

impl ApiClient {
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, ApiError> {
        self.post_json("/auth/register", request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession, ApiError> {
        self.post_json("/auth/login", request).await
    }
}
