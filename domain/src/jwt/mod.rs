//! This module provides functionality for handling JSON Web Tokens (JWTs) within the domain layer.
//! It includes the definition of claims used in access tokens, as well as functions for issuing
//! and verifying tokens.
//!
//! Tokens are signed with Ed25519. The key pair is configured as hex strings so the same
//! environment variables can hold either a raw 32-byte seed or a 64-byte keypair encoding
//! (seed followed by public key). The hex material is bridged to PEM internally because
//! `jsonwebtoken` consumes Ed25519 keys in PKCS#8 form.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::jwt::TokenKeys;
//!
//! let keys = TokenKeys::from_config(&config)?;
//! let token = keys.issue(&user)?;
//! let identity = keys.verify(&token)?;
//! ```

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use claims::AccessTokenClaims;
use ed25519_dalek::pkcs8::spki::der::pem::LineEnding;
use ed25519_dalek::pkcs8::{EncodePrivateKey, EncodePublicKey};
use ed25519_dalek::{SigningKey, VerifyingKey};
use entity::{users, Id};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use service::config::Config;

pub(crate) mod claims;

/// The authenticated caller extracted from a verified access token.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: Id,
    pub full_name: String,
}

/// Signing and verification keys for access tokens, plus the issue-time policy.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: i64,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("expiry_hours", &self.expiry_hours)
            .finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let private_hex = config.auth_private_key().ok_or_else(|| {
            warn!("Failed to get auth private key from config");
            Error::new(DomainErrorKind::Internal(InternalErrorKind::Config))
        })?;
        let public_hex = config.auth_public_key().ok_or_else(|| {
            warn!("Failed to get auth public key from config");
            Error::new(DomainErrorKind::Internal(InternalErrorKind::Config))
        })?;

        Self::from_hex(&private_hex, &public_hex, config.token_expiry_hours)
    }

    /// Builds keys from hex-encoded Ed25519 material. The private key may be a
    /// 32-byte seed or a 64-byte keypair encoding whose first half is the seed.
    pub fn from_hex(private_hex: &str, public_hex: &str, expiry_hours: i64) -> Result<Self, Error> {
        let private_bytes = hex::decode(private_hex).map_err(|err| {
            warn!("Auth private key is not valid hex: {err:?}");
            Error::new(DomainErrorKind::Internal(InternalErrorKind::Config))
        })?;
        let seed: [u8; 32] = private_bytes
            .get(..32)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| {
                warn!("Auth private key must decode to 32 or 64 bytes");
                Error::new(DomainErrorKind::Internal(InternalErrorKind::Config))
            })?;
        let signing_key = SigningKey::from_bytes(&seed);

        let public_bytes: [u8; 32] = hex::decode(public_hex)
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| {
                warn!("Auth public key must be hex decoding to 32 bytes");
                Error::new(DomainErrorKind::Internal(InternalErrorKind::Config))
            })?;
        let verifying_key = VerifyingKey::from_bytes(&public_bytes).map_err(|err| {
            warn!("Auth public key is not a valid Ed25519 point: {err:?}");
            Error::new(DomainErrorKind::Internal(InternalErrorKind::Config))
        })?;

        // jsonwebtoken only accepts Ed25519 keys as PKCS#8 PEM.
        let private_pem = signing_key.to_pkcs8_pem(LineEnding::LF).map_err(|err| {
            warn!("Failed to encode private key as PKCS#8: {err:?}");
            Error::new(DomainErrorKind::Internal(InternalErrorKind::Config))
        })?;
        let public_pem = verifying_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|err| {
                warn!("Failed to encode public key as SPKI: {err:?}");
                Error::new(DomainErrorKind::Internal(InternalErrorKind::Config))
            })?;

        Ok(Self {
            encoding: EncodingKey::from_ed_pem(private_pem.as_bytes())?,
            decoding: DecodingKey::from_ed_pem(public_pem.as_bytes())?,
            expiry_hours,
        })
    }

    /// Issues a signed access token for the given user.
    pub fn issue(&self, user: &users::Model) -> Result<String, Error> {
        let now = chrono::Utc::now().timestamp();
        let claims = AccessTokenClaims {
            sub: user.id.to_string(),
            name: user.full_name.clone(),
            iat: now,
            nbf: now,
            exp: now + self.expiry_hours * 3600,
        };

        Ok(encode(
            &Header::new(Algorithm::EdDSA),
            &claims,
            &self.encoding,
        )?)
    }

    /// Verifies a token's signature and time window and extracts the caller's
    /// identity. Every failure mode collapses to `Unauthenticated` so the
    /// response does not reveal why a token was rejected.
    pub fn verify(&self, token: &str) -> Result<Identity, Error> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        let token_data =
            decode::<AccessTokenClaims>(token, &self.decoding, &validation).map_err(|err| {
                debug!("Access token rejected: {err:?}");
                unauthenticated()
            })?;

        let user_id = Id::parse_str(&token_data.claims.sub).map_err(|_| {
            debug!("Access token subject is not a valid UUID");
            unauthenticated()
        })?;

        Ok(Identity {
            user_id,
            full_name: token_data.claims.name,
        })
    }
}

fn unauthenticated() -> Error {
    Error::new(DomainErrorKind::Internal(InternalErrorKind::Entity(
        EntityErrorKind::Unauthenticated,
    )))
}

/// Generates a fresh Ed25519 key pair, hex-encoded the way the configuration
/// expects it: a 64-byte keypair encoding (seed followed by public key) and
/// the 32-byte public key.
pub fn generate_hex_key_pair() -> (String, String) {
    let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
    (
        hex::encode(signing_key.to_keypair_bytes()),
        hex::encode(signing_key.verifying_key().to_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id: Id::new_v4(),
            email: "researcher@university.edu".to_string(),
            password: "hashed".to_string(),
            full_name: "Ada Lovelace".to_string(),
            institution: None,
            research_field: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn test_keys(expiry_hours: i64) -> TokenKeys {
        let (private_hex, public_hex) = generate_hex_key_pair();
        TokenKeys::from_hex(&private_hex, &public_hex, expiry_hours).unwrap()
    }

    #[test]
    fn issued_tokens_verify_back_to_the_same_identity() {
        let keys = test_keys(24);
        let user = test_user();

        let token = keys.issue(&user).unwrap();
        let identity = keys.verify(&token).unwrap();

        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.full_name, user.full_name);
    }

    #[test]
    fn tokens_signed_with_a_different_key_are_rejected() {
        let keys = test_keys(24);
        let other_keys = test_keys(24);

        let token = other_keys.issue(&test_user()).unwrap();
        let result = keys.verify(&token);

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Unauthenticated))
        );
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let keys = test_keys(-1);

        let token = keys.issue(&test_user()).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn tokens_with_a_non_uuid_subject_are_rejected() {
        let keys = test_keys(24);
        let now = chrono::Utc::now().timestamp();
        let claims = AccessTokenClaims {
            sub: "not-a-uuid".to_string(),
            name: "Ada Lovelace".to_string(),
            iat: now,
            nbf: now,
            exp: now + 3600,
        };
        let token = encode(&Header::new(Algorithm::EdDSA), &claims, &keys.encoding).unwrap();

        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let keys = test_keys(24);
        assert!(keys.verify("not.a.token").is_err());
    }

    #[test]
    fn from_hex_accepts_a_64_byte_keypair_encoding() {
        let (private_hex, public_hex) = generate_hex_key_pair();
        assert_eq!(private_hex.len(), 128);
        assert_eq!(public_hex.len(), 64);

        assert!(TokenKeys::from_hex(&private_hex, &public_hex, 24).is_ok());
    }

    #[test]
    fn from_hex_rejects_short_key_material() {
        let result = TokenKeys::from_hex("deadbeef", &"22".repeat(32), 24);
        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Config)
        );
    }
}
