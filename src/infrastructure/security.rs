use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Argon2 parameters for 50-150ms target latency
const ARGON2_M_COST: u32 = 19456; // 19 MB
const ARGON2_T_COST: u32 = 2; // 2 iterations
const ARGON2_P_COST: u32 = 1; // 1 parallelism

const TOKEN_LEEWAY_SECS: u64 = 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: String,
    exp: usize,
    iat: usize,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token lifetime of {0}s does not fit in an expiry timestamp")]
    TtlOverflow(u64),
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

fn argon2() -> Result<Argon2<'static>, argon2::password_hash::Error> {
    let params = argon2::Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, None)
        .map_err(argon2::password_hash::Error::from)?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = argon2()?.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// `Ok(false)` on a mismatch; `Err` only when `hash` is not a PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match argon2()?.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}

/// Signs `{id, iat, exp}` with HS256.
pub fn generate_token(
    user_id: &str,
    secret: &str,
    ttl_secs: u64,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp().max(0) as usize;
    let exp = usize::try_from(ttl_secs)
        .ok()
        .and_then(|ttl| now.checked_add(ttl))
        .ok_or(TokenError::TtlOverflow(ttl_secs))?;

    let claims = Claims {
        id: user_id.to_string(),
        exp,
        iat: now,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

/// Returns the user id carried by a valid, unexpired token.
pub fn validate_token(token: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = TOKEN_LEEWAY_SECS;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    Ok(token_data.claims.id)
}
