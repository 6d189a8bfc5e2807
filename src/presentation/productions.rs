use crate::domain::production::{CreateProduction, ProductionMessage, UpdateProduction};
use crate::presentation::handlers::{ApiError, AppState};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument, warn};

#[instrument(skip(state))]
pub async fn list_productions(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    info!("Listing productions");
    let productions = state
        .production_service
        .list_productions()
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list productions");
            ApiError::from(e)
        })?;
    Ok(HttpResponse::Ok().json(productions))
}

#[instrument(skip(state), fields(production_id = %*path))]
pub async fn get_production(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let raw_id = path.into_inner();
    info!("Fetching production");
    let production = state
        .production_service
        .get_production(&raw_id)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch production");
            ApiError::from(e)
        })?;
    Ok(HttpResponse::Ok().json(production))
}

#[instrument(skip(state))]
pub async fn create_production(
    state: web::Data<AppState>,
    req: web::Json<CreateProduction>,
) -> Result<HttpResponse, ApiError> {
    info!("Creating production");
    let production = state
        .production_service
        .create_production(req.into_inner())
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create production");
            ApiError::from(e)
        })?;

    info!(production_id = production.id, "Production created");
    Ok(HttpResponse::Created().json(ProductionMessage {
        message: "Production registered successfully!".to_string(),
        production,
    }))
}

#[instrument(skip(state), fields(production_id = %*path))]
pub async fn update_production(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateProduction>,
) -> Result<HttpResponse, ApiError> {
    let raw_id = path.into_inner();
    info!("Updating production");
    let production = state
        .production_service
        .update_production(&raw_id, req.into_inner())
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update production");
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(ProductionMessage {
        message: "Production updated successfully!".to_string(),
        production,
    }))
}

#[instrument(skip(state), fields(production_id = %*path))]
pub async fn delete_production(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let raw_id = path.into_inner();
    info!("Deleting production");
    state
        .production_service
        .delete_production(&raw_id)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to delete production");
            ApiError::from(e)
        })?;
    Ok(HttpResponse::NoContent().finish())
}
