use crate::domain::error::{DomainError, StoreError};
use crate::domain::repository::UserRepository;
use crate::domain::present;
use crate::domain::user::{
    AuthSession, LoginRequest, PublicUser, RegisterUser, UpdateUser, User, UserChanges,
};
use crate::infrastructure::config::TokenSettings;
use crate::infrastructure::security::{generate_token, hash_password, verify_password};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    token: TokenSettings,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, token: TokenSettings) -> Self {
        Self {
            user_repository,
            token,
        }
    }

    #[instrument(skip(self, req))]
    pub async fn register_user(&self, req: RegisterUser) -> Result<AuthSession> {
        trace!("Starting user registration");

        let (Some(name), Some(email), Some(phone), Some(password), Some(confirmation)) = (
            present(&req.name),
            present(&req.email),
            present(&req.phone),
            present(&req.password),
            present(&req.password_confirmation),
        ) else {
            warn!("Registration rejected: required fields missing");
            return Err(DomainError::Validation(
                "Required fields: name, email, phone, password, passwordConfirmation".to_string(),
            )
            .into());
        };

        if password != confirmation {
            warn!(email = %email, "Registration rejected: passwords do not match");
            return Err(DomainError::Validation("Passwords do not match".to_string()).into());
        }

        if self
            .user_repository
            .find_user_by_email(email)
            .await
            .map_err(internal)?
            .is_some()
        {
            warn!(email = %email, "User already exists");
            return Err(email_conflict("A user with this email already exists"));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password_hash: self.hash(password)?,
        };

        debug!(user_id = %user.id, "Saving user to repository");
        let user = self.user_repository.create_user(user).await.map_err(|e| match e {
            StoreError::UniqueViolation(_) => {
                warn!(email = %email, "Email claimed concurrently");
                email_conflict("A user with this email already exists")
            }
            other => internal(other),
        })?;

        info!(user_id = %user.id, email = %user.email, "User registered successfully");
        self.session(user)
    }

    #[instrument(skip(self, req))]
    pub async fn login(&self, req: LoginRequest) -> Result<AuthSession> {
        trace!("Starting login");

        let (Some(email), Some(password)) = (present(&req.email), present(&req.password)) else {
            warn!("Login rejected: email or password missing");
            return Err(
                DomainError::Validation("Email and password are required".to_string()).into(),
            );
        };

        let user = self
            .user_repository
            .find_user_by_email(email)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                warn!(email = %email, "User not found during login");
                DomainError::NotFound("User not found".to_string())
            })?;

        let is_valid = verify_password(password, &user.password_hash).map_err(|e| {
            error!(user_id = %user.id, error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::InvalidCredentials("Invalid password".to_string()).into());
        }

        info!(user_id = %user.id, "Login successful");
        self.session(user)
    }

    /// `user_id` comes from a verified token, never from the request body.
    #[instrument(skip(self, req), fields(user_id = user_id))]
    pub async fn update_user(&self, user_id: &str, req: UpdateUser) -> Result<AuthSession> {
        trace!("Starting user update");

        let mut changes = UserChanges {
            name: present(&req.name).map(String::from),
            email: present(&req.email).map(String::from),
            phone: present(&req.phone).map(String::from),
            password_hash: None,
        };

        match (present(&req.password), present(&req.password_confirmation)) {
            (None, None) => {}
            (Some(password), Some(confirmation)) => {
                if password != confirmation {
                    warn!("Update rejected: passwords do not match");
                    return Err(
                        DomainError::Validation("Passwords do not match".to_string()).into(),
                    );
                }
                debug!("Password change requested");
                changes.password_hash = Some(self.hash(password)?);
            }
            _ => {
                warn!("Update rejected: incomplete password change");
                return Err(DomainError::Validation(
                    "To change the password send both password and passwordConfirmation"
                        .to_string(),
                )
                .into());
            }
        }

        let user = self
            .user_repository
            .update_user(user_id, changes)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => {
                    warn!("User to update no longer exists");
                    anyhow::Error::from(DomainError::NotFound("User not found".to_string()))
                }
                StoreError::UniqueViolation(_) => {
                    warn!("Update rejected: email already in use");
                    email_conflict("This email is already in use")
                }
                other => internal(other),
            })?;

        info!(user_id = %user.id, "User updated successfully");
        self.session(user)
    }

    #[instrument(skip(self), fields(user_id = user_id))]
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        trace!("Starting user deletion");

        self.user_repository
            .delete_user(user_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => {
                    warn!("User to delete does not exist");
                    anyhow::Error::from(DomainError::NotFound("User not found".to_string()))
                }
                other => internal(other),
            })?;

        info!("User deleted successfully");
        Ok(())
    }

    fn hash(&self, password: &str) -> Result<String> {
        let hash = hash_password(password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;
        Ok(hash)
    }

    fn session(&self, user: User) -> Result<AuthSession> {
        let token = generate_token(&user.id, &self.token.secret, self.token.ttl_secs).map_err(
            |e| {
                error!(user_id = %user.id, error = %e, "Failed to generate token");
                DomainError::Internal(format!("Failed to generate token: {}", e))
            },
        )?;

        Ok(AuthSession {
            user: PublicUser::from(user),
            token,
        })
    }
}

fn email_conflict(message: &str) -> anyhow::Error {
    DomainError::Conflict(message.to_string()).into()
}

fn internal(err: StoreError) -> anyhow::Error {
    error!(error = %err, "User repository failure");
    DomainError::Internal(err.to_string()).into()
}
