//! Minimal REST client scoped to one organization and project.
//!
//! This wraps a `reqwest::Client` and provides the three verbs the service
//! integration needs - `get`, `post`, `patch` - with the access token and
//! API version attached to every request. Header construction and JSON
//! envelope handling live here so the orchestration core never sees them.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;

use super::error::ApiError;

/// API version sent with every request.
const API_VERSION: &str = "7.1";

/// Content type required by the partial-update endpoint.
const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// A tracking-service REST client scoped to one organization and project.
///
/// All requests performed through this client target the same project and
/// carry the same personal access token.
#[derive(Clone)]
pub struct AzureClient {
    /// The underlying HTTP client.
    http: reqwest::Client,

    /// Base URL up to and including `_apis` for the scoped project.
    base_url: String,

    /// Personal access token; sent as basic-auth credentials with an empty
    /// username, which is the `:<token>` form the service expects.
    token: String,
}

impl AzureClient {
    /// Creates a client from a validated configuration.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(ApiError::from_transport)?;
        Ok(AzureClient {
            http,
            base_url: format!(
                "https://dev.azure.com/{}/{}/_apis",
                config.organization, config.project
            ),
            token: config.token.clone(),
        })
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a GET and decodes the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let request = self
            .http
            .get(self.url(path))
            .query(params)
            .query(&[("api-version", API_VERSION)])
            .basic_auth("", Some(&self.token));
        let response = Self::check(request.send().await).await?;
        Self::decode(response).await
    }

    /// Issues a POST with a JSON body and decodes the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let request = self
            .http
            .post(self.url(path))
            .query(&[("api-version", API_VERSION)])
            .basic_auth("", Some(&self.token))
            .json(body);
        let response = Self::check(request.send().await).await?;
        Self::decode(response).await
    }

    /// Issues a JSON Patch PATCH. The response body is discarded; the service
    /// echoes the updated item, which callers here never need.
    pub(crate) async fn patch(&self, path: &str, body: &impl Serialize) -> Result<(), ApiError> {
        let request = self
            .http
            .patch(self.url(path))
            .query(&[("api-version", API_VERSION)])
            .basic_auth("", Some(&self.token))
            .json(body)
            .header(reqwest::header::CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE);
        Self::check(request.send().await).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Turns transport errors and non-success statuses into `ApiError`.
    async fn check(
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<reqwest::Response, ApiError> {
        let response = result.map_err(ApiError::from_transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::decode("response body did not match the expected shape", e))
    }
}

impl std::fmt::Debug for AzureClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
