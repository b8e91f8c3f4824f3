use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{AccountId, Actor, ActorRole};

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,      // Subject (account id as string)
    pub actor_id: Uuid,   // Account UUID
    pub role: ActorRole,  // brand | creator | admin
    pub exp: i64,         // Expiration timestamp
    pub iat: i64,         // Issued at timestamp
    pub iss: String,      // Issuer
    pub jti: String,      // JWT ID (unique token identifier)
}

impl Claims {
    pub fn actor(&self) -> Actor {
        Actor::new(AccountId::from_uuid(self.actor_id), self.role)
    }
}

/// JWT Service - creates and verifies JWT tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Create new JWT service with secret and issuer
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create a token for an actor. Expires after 24 hours.
    pub fn create_token(&self, actor: &Actor) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(24);

        let claims = Claims {
            sub: actor.id.to_string(),
            actor_id: actor.id.into_uuid(),
            role: actor.role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a token; fails when expired, forged or from another issuer.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_carries_actor() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let actor = Actor::creator(AccountId::new());

        let token = service.create_token(&actor).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.actor(), actor);
        assert_eq!(claims.iss, "test_issuer");
        let expires_in = claims.exp - chrono::Utc::now().timestamp();
        assert!(expires_in > 23 * 3600 && expires_in <= 24 * 3600);
    }

    #[test]
    fn test_rejects_garbage_and_foreign_tokens() {
        let service = JwtService::new("secret1", "test_issuer".to_string());
        assert!(service.verify_token("invalid_token").is_err());

        let other_secret = JwtService::new("secret2", "test_issuer".to_string());
        let token = other_secret.create_token(&Actor::brand(AccountId::new())).unwrap();
        assert!(service.verify_token(&token).is_err());

        let other_issuer = JwtService::new("secret1", "someone_else".to_string());
        let token = other_issuer.create_token(&Actor::brand(AccountId::new())).unwrap();
        assert!(service.verify_token(&token).is_err());
    }
}
