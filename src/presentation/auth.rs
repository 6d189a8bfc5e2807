use crate::domain::user::{LoginRequest, RegisterUser, UpdateUser};
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use tracing::{info, instrument, warn};

// Request bodies are skipped in spans: they carry passwords.

#[instrument(skip(state, req))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterUser>,
) -> Result<HttpResponse, ApiError> {
    info!("Registration request received");

    let session = state
        .auth_service
        .register_user(req.into_inner())
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to register user");
            ApiError::from(e)
        })?;

    info!(user_id = %session.user.id, "User registered successfully");
    Ok(HttpResponse::Created().json(session))
}

#[instrument(skip(state, req))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    let session = state
        .auth_service
        .login(req.into_inner())
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to login");
            ApiError::from(e)
        })?;

    info!(user_id = %session.user.id, "Login successful");
    Ok(HttpResponse::Ok().json(session))
}

#[instrument(skip(state, user, req), fields(user_id = %user.user_id))]
pub async fn update_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateUser>,
) -> Result<HttpResponse, ApiError> {
    info!("Update request received");

    let session = state
        .auth_service
        .update_user(&user.user_id, req.into_inner())
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update user");
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(session))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn delete_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    info!("Delete request received");

    state
        .auth_service
        .delete_user(&user.user_id)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to delete user");
            ApiError::from(e)
        })?;

    Ok(HttpResponse::NoContent().finish())
}
