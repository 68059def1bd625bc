use std::sync::Arc;

use crate::database::Store;
use crate::dto::auth_dto::{AuthResponse, LoginPayload, RegisterPayload, UpdateProfilePayload};
use crate::error::{Error, Result};
use crate::models::user::{NewUser, User};
use crate::services::authorization::{self, Actor};
use crate::utils::{crypto, token};

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_secret: Arc<str>,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, jwt_secret: &str, token_ttl_hours: i64) -> Self {
        Self {
            store,
            jwt_secret: Arc::from(jwt_secret),
            token_ttl_hours,
        }
    }

    fn session(&self, user: User) -> Result<AuthResponse> {
        let token = token::issue_token(&user, &self.jwt_secret, self.token_ttl_hours)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<AuthResponse> {
        if payload.password != payload.confirm_password {
            return Err(Error::BadRequest("Passwords do not match".to_string()));
        }
        if self.store.get_user_by_email(&payload.email).await?.is_some() {
            return Err(Error::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password = crypto::hash_password(&payload.password)?;
        let user = self
            .store
            .create_user(NewUser {
                email: payload.email,
                password,
                name: payload.name,
                kind: payload.kind,
                company: payload.company,
                title: payload.title,
                location: payload.location,
                bio: payload.bio,
                avatar: payload.avatar,
            })
            .await?;
        tracing::info!(user_id = user.id, kind = %user.kind, "user registered");

        self.session(user)
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<AuthResponse> {
        let invalid = || Error::Unauthorized("Invalid credentials".to_string());

        let user = self
            .store
            .get_user_by_email(&payload.email)
            .await?
            .ok_or_else(invalid)?;
        if !crypto::verify_password(&payload.password, &user.password)? {
            tracing::warn!(user_id = user.id, "login rejected");
            return Err(invalid());
        }

        self.session(user)
    }

    /// Current snapshot from the store rather than the token's claims.
    pub async fn me(&self, actor: &Actor) -> Result<User> {
        self.store
            .get_user_by_id(actor.id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(&self, actor: &Actor, payload: UpdateProfilePayload) -> Result<User> {
        let actor = authorization::verify_actor(self.store.as_ref(), *actor).await?;
        let user = self
            .store
            .update_user(actor.id, payload.into())
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        tracing::info!(user_id = user.id, "profile updated");
        Ok(user)
    }
}
