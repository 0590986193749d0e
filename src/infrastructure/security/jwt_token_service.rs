use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::auth::entities::IssuedToken;
use crate::domain::auth::errors::TokenError;
use crate::domain::auth::ports::TokenService;
use crate::domain::auth::value_objects::PhoneNumber;

/// JWT claims carried by bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
  /// Subject (phone number)
  pub sub: String,
  /// Phone number, duplicated for clients that read it directly
  pub phone: String,
  /// Issued at
  pub iat: i64,
  /// Not before
  pub nbf: i64,
  /// Expiration time
  pub exp: i64,
  /// Issuer
  pub iss: String,
}

impl TokenClaims {
  pub fn new(
    phone: &PhoneNumber,
    issued_at: DateTime<Utc>,
    ttl: chrono::Duration,
    issuer: &str,
  ) -> Self {
    Self {
      sub: phone.as_str().to_string(),
      phone: phone.as_str().to_string(),
      iat: issued_at.timestamp(),
      nbf: issued_at.timestamp(),
      exp: (issued_at + ttl).timestamp(),
      iss: issuer.to_string(),
    }
  }
}

/// HS256 token service
///
/// Tokens are self-contained; nothing is stored server side, so a token
/// stays valid until `exp` passes.
#[derive(Clone)]
pub struct JwtTokenService {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  issuer: String,
  ttl: chrono::Duration,
  validation: Validation,
}

impl JwtTokenService {
  /// Create new token service with secret, issuer and token lifetime
  pub fn new(secret: &str, issuer: impl Into<String>, ttl: Duration) -> Self {
    let issuer = issuer.into();

    // Only HS256 is accepted, whatever the token header declares
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&issuer]);
    validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      issuer,
      ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::hours(24)),
      validation,
    }
  }

  fn sign(&self, claims: &TokenClaims) -> Result<String, TokenError> {
    encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
      .map_err(|e| TokenError::Signing(e.to_string()))
  }
}

impl TokenService for JwtTokenService {
  fn issue(&self, phone: &PhoneNumber) -> Result<IssuedToken, TokenError> {
    let now = Utc::now();
    let claims = TokenClaims::new(phone, now, self.ttl, &self.issuer);
    let token = self.sign(&claims)?;

    Ok(IssuedToken {
      token,
      expires_at: now + self.ttl,
    })
  }

  fn validate(&self, token: &str) -> Result<PhoneNumber, TokenError> {
    let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
    PhoneNumber::new(data.claims.sub).map_err(|_| TokenError::Malformed)
  }
}
