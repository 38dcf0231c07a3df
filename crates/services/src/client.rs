use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::{AuthToken, Credentials, LoginResponse};
use crate::config::ApiConfig;
use crate::error::ApiError;

const LOGIN_PATH: &str = "users/login/";

/// Thin JSON client for the FuturePath REST backend.
///
/// Every call except [`ApiClient::login`] is bearer-authenticated and fails
/// with `ApiError::MissingToken` before touching the network when no token is
/// set.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
    token: Option<AuthToken>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            config,
            token: None,
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: AuthToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn set_token(&mut self, token: Option<AuthToken>) {
        self.token = token;
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Exchange credentials for an access token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or a rejected login.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let url = self.config.endpoint(LOGIN_PATH)?;
        tracing::info!(email = %credentials.email, "logging in");
        self.send(self.client.post(url).json(credentials)).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` for missing token, transport failures or non-2xx replies.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authorized(Method::GET, path)?;
        self.send(request).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` for missing token, transport failures or non-2xx replies.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.authorized(Method::POST, path)?.json(body);
        self.send(request).await
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_ref().ok_or(ApiError::MissingToken)?;
        let url = self.config.endpoint(path)?;
        tracing::debug!(%method, %url, "sending API request");
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(token.expose()))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str(&text).unwrap_or(Value::Null);
            tracing::debug!(%status, "API request rejected");
            return Err(ApiError::Status { status, body });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn authenticated_calls_fail_fast_without_token() {
        // Port 9 (discard) is never contacted: the token check runs first.
        let config = ApiConfig::new("http://127.0.0.1:9/api/").unwrap();
        let client = ApiClient::new(config).unwrap();
        assert!(!client.has_token());

        let err = client
            .get_json::<Value>("questionnaire/questions/")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));

        let err = client
            .post_json::<_, Value>("questionnaire/submit/", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
    }

    #[test]
    fn token_can_be_set_and_cleared() {
        let mut client = ApiClient::new(ApiConfig::default())
            .unwrap()
            .with_token(AuthToken::new("t").unwrap());
        assert!(client.has_token());
        client.set_token(None);
        assert!(!client.has_token());
    }
}
