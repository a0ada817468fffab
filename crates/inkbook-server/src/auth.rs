//! Bearer-token gate for the `/api` routes.
//!
//! The server holds only the argon2 PHC hash of its API token; requests must
//! present the token itself as `Authorization: Bearer <token>`.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::Response,
};
use rand_core::{OsRng, RngCore as _};

use crate::error::Error;

/// Token accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub token_hash: String,
}

/// Verify the bearer token in `headers` against `config`.
pub fn verify_bearer(headers: &HeaderMap, config: &AuthConfig) -> Result<(), Error> {
  let token = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .ok_or(Error::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&config.token_hash).map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(token.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)
}

/// Middleware rejecting any request without a valid token.
pub async fn require_token(
  State(auth): State<Arc<AuthConfig>>,
  req: Request,
  next: Next,
) -> Result<Response, Error> {
  if let Err(e) = verify_bearer(req.headers(), &auth) {
    tracing::debug!(uri = %req.uri(), "rejected unauthenticated request");
    return Err(e);
  }
  Ok(next.run(req).await)
}

/// A fresh random token (hex) and its argon2 hash.
pub fn generate_token() -> Result<(String, String), argon2::password_hash::Error> {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  let token = hex::encode(bytes);

  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(token.as_bytes(), &salt)?
    .to_string();
  Ok((token, hash))
}
