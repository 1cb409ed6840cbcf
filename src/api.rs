use crate::models::{
    AuthResponse, ErrorBody, LoginRequest, PasswordChange, ProfileResponse, ProfileUpdate,
    RegisterRequest, User,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|status| status.as_u16()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Client for the auth/profile backend. One attempt per call, no timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let req = self.request(Method::POST, "/api/auth/login", None).json(&body);
        self.execute(req, "Login failed").await
    }

    pub async fn register(&self, fields: &RegisterRequest) -> ApiResult<AuthResponse> {
        let req = self
            .request(Method::POST, "/api/auth/register", None)
            .json(fields);
        self.execute(req, "Registration failed").await
    }

    pub async fn get_profile(&self, token: &str) -> ApiResult<User> {
        let req = self.request(Method::GET, "/api/users/profile", Some(token));
        let body: ProfileResponse = self.execute(req, "Failed to fetch profile").await?;
        Ok(body.user)
    }

    pub async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> ApiResult<User> {
        let req = self
            .request(Method::PUT, "/api/users/profile", Some(token))
            .json(update);
        let body: ProfileResponse = self.execute(req, "Profile update failed").await?;
        Ok(body.user)
    }

    pub async fn change_password(&self, token: &str, change: &PasswordChange) -> ApiResult<()> {
        let req = self
            .request(Method::POST, "/api/users/change-password", Some(token))
            .json(change);
        let _: serde_json::Value = self.execute(req, "Password change failed").await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self.client.request(method, url);
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder, fallback: &str) -> ApiResult<T> {
        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.error)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| fallback.to_string());
            warn!(status = status.as_u16(), "backend rejected request: {message}");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn rejection_displays_the_backend_message() {
        let err = ApiError::Rejected {
            status: 401,
            message: "Invalid credentials".into(),
        };
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.status(), Some(401));
    }
}
