use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::models::user::User;
use crate::utils::time::{expiry_after_hours, now};

/// Signs an HS256 token carrying the user's id, email and account kind.
pub fn issue_token(user: &User, secret: &str, ttl_hours: i64) -> Result<String> {
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        kind: user.kind,
        iat: now().timestamp().max(0) as usize,
        exp: expiry_after_hours(ttl_hours),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}
