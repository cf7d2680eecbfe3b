//! EVE SSO token refresh.

use super::model::TokenResponse;
use super::EsiClient;
use crate::error::esi::EsiError;

impl EsiClient {
    /// Exchanges a refresh token for a fresh access token at EVE SSO.
    ///
    /// Uses the confidential client flow: application credentials go in a
    /// basic auth header, the grant in a form body. SSO may rotate the
    /// refresh token in its response.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenResponse, EsiError> {
        let (client_id, client_secret) = match (&self.client_id, &self.client_secret) {
            (Some(client_id), Some(client_secret)) => (client_id, client_secret),
            _ => return Err(EsiError::MissingCredentials),
        };

        let response = self
            .http
            .post(&self.sso_token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EsiError::OAuth {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use crate::error::esi::EsiError;
    use crate::util::test::setup::test_setup;

    /// Should post the refresh grant and deserialize the new token pair
    #[tokio::test]
    async fn refresh_access_token_success() {
        let mut test = test_setup().await;

        let mock = test
            .server
            .mock("POST", "/v2/oauth/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
                Matcher::UrlEncoded("refresh_token".into(), "refresh-1".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "access_token": "access-2",
                    "expires_in": 1199,
                    "token_type": "Bearer",
                    "refresh_token": "refresh-2"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let token = test
            .esi_client
            .refresh_access_token("refresh-1")
            .await
            .unwrap();
        mock.assert_async().await;

        assert_eq!(token.access_token, "access-2");
        assert_eq!(token.refresh_token.as_deref(), Some("refresh-2"));
    }

    /// Should surface SSO rejections with their status code
    #[tokio::test]
    async fn refresh_access_token_rejected() {
        let mut test = test_setup().await;

        test.server
            .mock("POST", "/v2/oauth/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;

        let result = test.esi_client.refresh_access_token("revoked").await;

        assert!(matches!(result, Err(EsiError::OAuth { status: 400 })));
    }
}
