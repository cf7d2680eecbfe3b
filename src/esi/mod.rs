//! Typed ESI client used by the sync services.
//!
//! Wraps `reqwest` with the EVE-specific behaviors the sync pipeline needs:
//! server status checks with error limit extraction, bearer authentication,
//! X-Pages pagination, and EVE SSO token refresh. Endpoint methods are grouped
//! into one file per ESI route family (status, universe, corporation,
//! character) plus SSO, all as `impl EsiClient` blocks.

pub mod character;
pub mod corporation;
pub mod model;
pub mod oauth;
pub mod status;
pub mod universe;

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::esi::EsiError;

pub use status::EsiStatus;

/// Production ESI base URL.
const DEFAULT_ESI_URL: &str = "https://esi.evetech.net/latest";
/// Production EVE SSO token endpoint.
const DEFAULT_SSO_TOKEN_URL: &str = "https://login.eveonline.com/v2/oauth/token";

/// Connect timeout for every ESI request.
const CONNECT_TIMEOUT_SECONDS: u64 = 5;
/// Total request timeout, covers slow paginated asset responses.
const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// HTTP client for ESI and EVE SSO.
///
/// Cheap to clone, the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct EsiClient {
    http: reqwest::Client,
    esi_url: String,
    sso_token_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl EsiClient {
    /// Creates a builder for an [`EsiClient`].
    pub fn builder() -> EsiClientBuilder {
        EsiClientBuilder::default()
    }

    /// Performs a GET request against an ESI path and deserializes the body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: Option<&str>,
    ) -> Result<T, EsiError> {
        let response = self.get_response(path, access_token, None).await?;
        Ok(response.json().await?)
    }

    /// Performs a GET request, following ESI's `X-Pages` header across all
    /// pages and concatenating the results.
    pub(crate) async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: &str,
    ) -> Result<Vec<T>, EsiError> {
        let response = self.get_response(path, Some(access_token), Some(1)).await?;
        let pages = page_count(&response);

        let mut items: Vec<T> = response.json().await?;
        for page in 2..=pages {
            let response = self.get_response(path, Some(access_token), Some(page)).await?;
            let mut page_items: Vec<T> = response.json().await?;
            items.append(&mut page_items);
        }

        Ok(items)
    }

    async fn get_response(
        &self,
        path: &str,
        access_token: Option<&str>,
        page: Option<u32>,
    ) -> Result<reqwest::Response, EsiError> {
        let url = format!("{}{}", self.esi_url, path);

        let mut request = self.http.get(&url);
        if let Some(access_token) = access_token {
            request = request.bearer_auth(access_token);
        }
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }

        let response = request.send().await?;
        match response.status() {
            status if status.is_success() => Ok(response),
            reqwest::StatusCode::UNAUTHORIZED => Err(EsiError::Unauthorized {
                path: path.to_string(),
            }),
            reqwest::StatusCode::FORBIDDEN => Err(EsiError::Forbidden {
                path: path.to_string(),
            }),
            status => Err(EsiError::Http {
                status: status.as_u16(),
                path: path.to_string(),
            }),
        }
    }
}

/// Number of pages reported by ESI's `X-Pages` header, 1 when absent.
fn page_count(response: &reqwest::Response) -> u32 {
    response
        .headers()
        .get("x-pages")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(1)
}

/// Builder for [`EsiClient`].
///
/// A user agent identifying the application and a contact is mandatory per
/// CCP's developer guidelines. SSO credentials are only needed when tokens
/// will be refreshed through this client.
#[derive(Debug, Default)]
pub struct EsiClientBuilder {
    user_agent: Option<String>,
    esi_url: Option<String>,
    sso_token_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl EsiClientBuilder {
    /// Sets the `User-Agent` header sent with every request (required).
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    /// Overrides the ESI base URL, used by tests to point at a mock server.
    pub fn esi_url(mut self, esi_url: &str) -> Self {
        self.esi_url = Some(esi_url.to_string());
        self
    }

    /// Overrides the EVE SSO token endpoint URL.
    pub fn sso_token_url(mut self, sso_token_url: &str) -> Self {
        self.sso_token_url = Some(sso_token_url.to_string());
        self
    }

    /// Sets the EVE SSO application client ID.
    pub fn client_id(mut self, client_id: &str) -> Self {
        self.client_id = Some(client_id.to_string());
        self
    }

    /// Sets the EVE SSO application client secret.
    pub fn client_secret(mut self, client_secret: &str) -> Self {
        self.client_secret = Some(client_secret.to_string());
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<EsiClient, EsiError> {
        let user_agent = self
            .user_agent
            .ok_or_else(|| EsiError::Builder("user agent is required".to_string()))?;

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECONDS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;

        Ok(EsiClient {
            http,
            esi_url: self.esi_url.unwrap_or_else(|| DEFAULT_ESI_URL.to_string()),
            sso_token_url: self
                .sso_token_url
                .unwrap_or_else(|| DEFAULT_SSO_TOKEN_URL.to_string()),
            client_id: self.client_id,
            client_secret: self.client_secret,
        })
    }
}
