use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

/// Represents the claims encoded within an issued token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier, string-encoded.
    pub sub: String,
    /// Email of the user at issuance time.
    pub email: String,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
}

/// Why a token was rejected.
///
/// Callers answer all three variants with the same 401, so none of this
/// distinction ever reaches the client.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    /// The token was once valid but its expiry lies in the past.
    Expired,
    /// The signature does not match the header and payload.
    InvalidSignature,
    /// Not a structurally valid token at all.
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

/// Issues and verifies signed, time-limited identity tokens.
///
/// The signing keys are derived from the server secret once, at construction.
/// Build a single `TokenService` at startup and share it via `web::Data`;
/// do not construct one per request.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, algorithm: Algorithm, ttl_minutes: i64) -> Self {
        let mut validation = Validation::new(algorithm);
        // No leeway: a token is rejected the second its expiry passes.
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            validation,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Builds the service from the process configuration.
    ///
    /// An unknown or asymmetric algorithm identifier is a configuration error
    /// and panics at startup rather than failing per request.
    pub fn from_config(config: &Config) -> Self {
        let algorithm: Algorithm = config
            .jwt_algorithm
            .parse()
            .expect("JWT_ALGORITHM must name a supported signature algorithm");
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {}
            _ => panic!("JWT_ALGORITHM must be a symmetric (HS*) algorithm"),
        }
        Self::new(
            &config.secret_key,
            algorithm,
            config.access_token_expire_minutes,
        )
    }

    /// Issues a signed token for the given user, expiring after the configured TTL.
    ///
    /// # Arguments
    /// * `user_id` - The ID of the user the token identifies.
    /// * `email` - The user's email, embedded alongside the subject.
    ///
    /// # Returns
    /// A `Result` containing the signed token string if successful.
    /// Returns `AppError::InternalServerError` if encoding fails.
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, AppError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(self.ttl)
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_owned(),
            exp: expiration,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to issue token: {}", e)))
    }

    /// Verifies a token's signature and expiry and decodes its claims.
    ///
    /// # Arguments
    /// * `token` - The token string to verify.
    ///
    /// # Returns
    /// A `Result` containing the decoded `Claims` if the token is valid, or a
    /// `TokenError` stating whether it was expired, tampered with, or malformed.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }
}
