//! Token resolution for owner sync cycles.
//!
//! Every authenticated sync starts here: [`TokenService::require_token`]
//! turns an owner row into a live access token or a [`TokenError`] naming
//! exactly what the owner must fix. Nothing downstream ever sees a maybe-
//! usable token.

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;

use crate::data::token::EsiTokenRepository;
use crate::data::user::user_character::UserCharacterRepository;
use crate::error::{esi::EsiError, token::TokenError, Error};
use crate::esi::EsiClient;
use crate::model::token::OwnerToken;

/// Tokens expiring within this margin count as expired, a sync cycle has to
/// outlive the token it starts with.
const EXPIRY_MARGIN_SECONDS: i64 = 60;

/// Outcome of readying one stored token for use.
#[derive(Debug)]
pub enum TokenAccess {
    /// A live token row, refreshed through SSO if it had to be
    Usable(entity::esi_token::Model),
    /// Expired with no refresh token to renew it
    Unrefreshable,
    /// SSO refused the refresh grant, the row has been deleted
    Revoked,
}

pub struct TokenService<'a> {
    db: &'a DatabaseConnection,
    esi_client: &'a EsiClient,
}

impl<'a> TokenService<'a> {
    pub fn new(db: &'a DatabaseConnection, esi_client: &'a EsiClient) -> Self {
        Self { db, esi_client }
    }

    /// Resolves a usable access token for an owner.
    ///
    /// Walks the stored tokens of the owner's linked character and returns
    /// the first one carrying every scope in `required_scopes`, preferring
    /// tokens that are still live and refreshing expired candidates through
    /// SSO otherwise.
    ///
    /// # Errors
    /// - [`TokenError::NoCharacterConfigured`]: the linked character is gone
    /// - [`TokenError::Invalid`]: no tokens stored, or SSO revoked the grant
    /// - [`TokenError::InsufficientPermission`]: tokens exist but none carry
    ///   the required scopes
    /// - [`TokenError::Expired`]: scoped tokens exist but none can be
    ///   refreshed
    pub async fn require_token(
        &self,
        owner: &entity::owner::Model,
        required_scopes: &[&str],
    ) -> Result<OwnerToken, Error> {
        let user_character = UserCharacterRepository::new(self.db)
            .get_by_id(owner.user_character_id)
            .await?
            .ok_or(TokenError::NoCharacterConfigured { owner_id: owner.id })?;
        let character_id = user_character.character_id;

        let tokens = EsiTokenRepository::new(self.db)
            .get_by_user_character_id(user_character.id)
            .await?;
        if tokens.is_empty() {
            return Err(TokenError::Invalid { character_id }.into());
        }

        let scoped: Vec<entity::esi_token::Model> = tokens
            .into_iter()
            .filter(|token| has_scopes(&token.scopes, required_scopes))
            .collect();
        if scoped.is_empty() {
            return Err(TokenError::InsufficientPermission { character_id }.into());
        }

        // Prefer a token that needs no refresh round trip
        let mut expired = Vec::new();
        for token in scoped {
            if !is_expired(&token) {
                return Ok(owner_token(token, character_id));
            }
            expired.push(token);
        }

        let mut any_revoked = false;
        for token in expired {
            match self.resolve_access(token).await? {
                TokenAccess::Usable(token) => return Ok(owner_token(token, character_id)),
                TokenAccess::Unrefreshable => {}
                TokenAccess::Revoked => any_revoked = true,
            }
        }

        if any_revoked {
            Err(TokenError::Invalid { character_id }.into())
        } else {
            Err(TokenError::Expired { character_id }.into())
        }
    }

    /// Readies one stored token, refreshing it through SSO when expired.
    ///
    /// A refusal from SSO means the grant is gone for good, so the row is
    /// deleted and later cycles stop retrying it. Transport failures
    /// propagate instead, the grant may still be fine.
    pub async fn resolve_access(
        &self,
        token: entity::esi_token::Model,
    ) -> Result<TokenAccess, Error> {
        if !is_expired(&token) {
            return Ok(TokenAccess::Usable(token));
        }

        let refresh_token = match &token.refresh_token {
            Some(refresh_token) => refresh_token,
            None => return Ok(TokenAccess::Unrefreshable),
        };

        match self.esi_client.refresh_access_token(refresh_token).await {
            Ok(response) => {
                let expires_at = Utc::now().naive_utc() + Duration::seconds(response.expires_in);
                let updated = EsiTokenRepository::new(self.db)
                    .update_after_refresh(
                        token.id,
                        &response.access_token,
                        response.refresh_token.as_deref(),
                        expires_at,
                    )
                    .await?;

                Ok(TokenAccess::Usable(updated))
            }
            Err(EsiError::OAuth { status }) => {
                tracing::warn!(
                    "SSO refused to refresh token {} (status {}), deleting it",
                    token.id,
                    status
                );
                EsiTokenRepository::new(self.db).delete(token.id).await?;

                Ok(TokenAccess::Revoked)
            }
            Err(error) => Err(error.into()),
        }
    }
}

fn owner_token(token: entity::esi_token::Model, character_id: i64) -> OwnerToken {
    OwnerToken {
        access_token: token.access_token,
        character_id,
        token_id: token.id,
    }
}

fn is_expired(token: &entity::esi_token::Model) -> bool {
    let cutoff = Utc::now().naive_utc() + Duration::seconds(EXPIRY_MARGIN_SECONDS);

    token.expires_at <= cutoff
}

/// True when a stored space-separated scope string covers every scope in
/// `required`.
fn has_scopes(granted: &str, required: &[&str]) -> bool {
    let granted: Vec<&str> = granted.split_whitespace().collect();

    required.iter().all(|scope| granted.contains(scope))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sea_orm::{ConnectionTrait, DbBackend, DbErr, EntityTrait, Schema};
    use serde_json::json;

    use crate::data::token::EsiTokenRepository;
    use crate::error::{token::TokenError, Error};
    use crate::model::token::NewEsiToken;
    use crate::service::token::TokenService;
    use crate::util::eve::PERSONAL_OWNER_SCOPES;
    use crate::util::test::{
        mock::mock_new_token,
        setup::{test_setup, test_setup_create_owner, test_setup_create_user_with_character, TestSetup},
    };

    async fn setup() -> Result<(TestSetup, entity::owner::Model, entity::user_character::Model), DbErr>
    {
        let test = test_setup().await;
        let db = &test.db;

        let schema = Schema::new(DbBackend::Sqlite);
        let stmts = vec![
            schema.create_table_from_entity(entity::prelude::EveCorporation),
            schema.create_table_from_entity(entity::prelude::EveCharacter),
            schema.create_table_from_entity(entity::prelude::User),
            schema.create_table_from_entity(entity::prelude::UserCharacter),
            schema.create_table_from_entity(entity::prelude::EsiToken),
            schema.create_table_from_entity(entity::prelude::Owner),
        ];

        for stmt in stmts {
            db.execute(&stmt).await?;
        }

        let (_, user_character) =
            test_setup_create_user_with_character(db, "Hyziri", 2_119_123_456, 98_784_257).await?;
        let owner = test_setup_create_owner(db, user_character.id, None).await?;

        Ok((test, owner, user_character))
    }

    fn personal_scopes_string() -> String {
        PERSONAL_OWNER_SCOPES.join(" ")
    }

    /// Should return a live scoped token without touching SSO
    #[tokio::test]
    async fn test_require_token_returns_live_token() -> Result<(), DbErr> {
        let (test, owner, user_character) = setup().await?;
        let stored = EsiTokenRepository::new(&test.db)
            .create(user_character.id, &mock_new_token(&personal_scopes_string()))
            .await?;

        let service = TokenService::new(&test.db, &test.esi_client);
        let token = service
            .require_token(&owner, &PERSONAL_OWNER_SCOPES)
            .await
            .unwrap();

        assert_eq!(token.access_token, "access-1");
        assert_eq!(token.character_id, 2_119_123_456);
        assert_eq!(token.token_id, stored.id);
        Ok(())
    }

    /// Should report a missing linked character as its own outcome
    #[tokio::test]
    async fn test_require_token_without_linked_character() -> Result<(), DbErr> {
        let (test, owner, user_character) = setup().await?;
        entity::prelude::UserCharacter::delete_by_id(user_character.id)
            .exec(&test.db)
            .await?;

        let service = TokenService::new(&test.db, &test.esi_client);
        let error = service
            .require_token(&owner, &PERSONAL_OWNER_SCOPES)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::TokenError(TokenError::NoCharacterConfigured { owner_id }) if owner_id == owner.id
        ));
        Ok(())
    }

    /// Should report a character with no stored tokens at all
    #[tokio::test]
    async fn test_require_token_with_no_tokens() -> Result<(), DbErr> {
        let (test, owner, _) = setup().await?;

        let service = TokenService::new(&test.db, &test.esi_client);
        let error = service
            .require_token(&owner, &PERSONAL_OWNER_SCOPES)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::TokenError(TokenError::Invalid { character_id }) if character_id == 2_119_123_456
        ));
        Ok(())
    }

    /// Should report tokens that exist but lack the required scopes
    #[tokio::test]
    async fn test_require_token_with_missing_scopes() -> Result<(), DbErr> {
        let (test, owner, user_character) = setup().await?;
        EsiTokenRepository::new(&test.db)
            .create(
                user_character.id,
                &mock_new_token("esi-characters.read_blueprints.v1"),
            )
            .await?;

        let service = TokenService::new(&test.db, &test.esi_client);
        let error = service
            .require_token(&owner, &PERSONAL_OWNER_SCOPES)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::TokenError(TokenError::InsufficientPermission { character_id })
                if character_id == 2_119_123_456
        ));
        Ok(())
    }

    /// Should refresh an expired token through SSO and store the result
    #[tokio::test]
    async fn test_require_token_refreshes_expired_token() -> Result<(), DbErr> {
        let (mut test, owner, user_character) = setup().await?;
        let expired = NewEsiToken {
            expires_at: Utc::now().naive_utc() - Duration::seconds(100),
            ..mock_new_token(&personal_scopes_string())
        };
        let stored = EsiTokenRepository::new(&test.db)
            .create(user_character.id, &expired)
            .await?;

        let mock = test
            .server
            .mock("POST", "/v2/oauth/token")
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
            .expect(1)
            .create_async()
            .await;

        let service = TokenService::new(&test.db, &test.esi_client);
        let token = service
            .require_token(&owner, &PERSONAL_OWNER_SCOPES)
            .await
            .unwrap();
        mock.assert_async().await;

        assert_eq!(token.access_token, "access-2");
        assert_eq!(token.token_id, stored.id);

        let updated = EsiTokenRepository::new(&test.db)
            .get_by_id(stored.id)
            .await?
            .unwrap();
        assert_eq!(updated.refresh_token.as_deref(), Some("refresh-2"));
        assert!(updated.expires_at > Utc::now().naive_utc());
        Ok(())
    }

    /// Should prefer a live token over refreshing an expired one
    #[tokio::test]
    async fn test_require_token_prefers_live_token() -> Result<(), DbErr> {
        let (mut test, owner, user_character) = setup().await?;
        let repository = EsiTokenRepository::new(&test.db);
        let expired = NewEsiToken {
            expires_at: Utc::now().naive_utc() - Duration::seconds(100),
            ..mock_new_token(&personal_scopes_string())
        };
        repository.create(user_character.id, &expired).await?;
        let live = NewEsiToken {
            access_token: "access-live".to_string(),
            ..mock_new_token(&personal_scopes_string())
        };
        let stored_live = repository.create(user_character.id, &live).await?;

        let sso = test
            .server
            .mock("POST", "/v2/oauth/token")
            .expect(0)
            .create_async()
            .await;

        let service = TokenService::new(&test.db, &test.esi_client);
        let token = service
            .require_token(&owner, &PERSONAL_OWNER_SCOPES)
            .await
            .unwrap();
        sso.assert_async().await;

        assert_eq!(token.access_token, "access-live");
        assert_eq!(token.token_id, stored_live.id);
        Ok(())
    }

    /// Should delete a token SSO refuses to refresh and report it invalid
    #[tokio::test]
    async fn test_require_token_deletes_refused_token() -> Result<(), DbErr> {
        let (mut test, owner, user_character) = setup().await?;
        let expired = NewEsiToken {
            expires_at: Utc::now().naive_utc() - Duration::seconds(100),
            ..mock_new_token(&personal_scopes_string())
        };
        let stored = EsiTokenRepository::new(&test.db)
            .create(user_character.id, &expired)
            .await?;

        test.server
            .mock("POST", "/v2/oauth/token")
            .with_status(400)
            .with_body(json!({ "error": "invalid_grant" }).to_string())
            .create_async()
            .await;

        let service = TokenService::new(&test.db, &test.esi_client);
        let error = service
            .require_token(&owner, &PERSONAL_OWNER_SCOPES)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::TokenError(TokenError::Invalid { .. })
        ));
        let remaining = EsiTokenRepository::new(&test.db).get_by_id(stored.id).await?;
        assert!(remaining.is_none(), "Refused token should be deleted");
        Ok(())
    }

    /// Should report expired when nothing is refreshable
    #[tokio::test]
    async fn test_require_token_expired_without_refresh_token() -> Result<(), DbErr> {
        let (test, owner, user_character) = setup().await?;
        let dead = NewEsiToken {
            refresh_token: None,
            expires_at: Utc::now().naive_utc() - Duration::seconds(100),
            ..mock_new_token(&personal_scopes_string())
        };
        EsiTokenRepository::new(&test.db)
            .create(user_character.id, &dead)
            .await?;

        let service = TokenService::new(&test.db, &test.esi_client);
        let error = service
            .require_token(&owner, &PERSONAL_OWNER_SCOPES)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::TokenError(TokenError::Expired { character_id }) if character_id == 2_119_123_456
        ));
        Ok(())
    }
}
