use crate::application::auth_service::AuthService;
use crate::application::production_service::ProductionService;
use crate::data::memory::InMemoryFarmStore;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError};
use chrono::Utc;
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub struct AppState {
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
    pub production_service: Arc<ProductionService<InMemoryFarmStore>>,
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("{0}")]
    Association(String),
    #[error("{0}")]
    ReferenceConflict(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("Internal server error")]
    Internal,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
            ApiError::Association(_) => StatusCode::BAD_REQUEST,
            ApiError::ReferenceConflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        if status.is_server_error() {
            error!(error = %error_msg, status = %status, "Request failed");
        } else {
            warn!(error = %error_msg, status = %status, "Request rejected");
        }

        HttpResponse::build(status).json(ErrorResponse { error: error_msg })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(DomainError::Validation(msg)) => ApiError::Validation(msg),
            Ok(DomainError::Conflict(msg)) => ApiError::Conflict(msg),
            Ok(DomainError::NotFound(msg)) => ApiError::NotFound(msg),
            Ok(DomainError::InvalidCredentials(msg)) => ApiError::InvalidCredentials(msg),
            Ok(DomainError::Association(msg)) => ApiError::Association(msg),
            Ok(DomainError::ReferenceConflict(msg)) => ApiError::ReferenceConflict(msg),
            // Details stay in the logs, never in the response body.
            Ok(DomainError::Internal(detail)) => {
                error!(detail = %detail, "Internal error");
                ApiError::Internal
            }
            Err(other) => {
                error!(error = %other, "Unexpected error");
                ApiError::Internal
            }
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        Box::pin(async move {
            user.ok_or_else(|| ApiError::Unauthenticated("User not authenticated".to_string()))
        })
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}
