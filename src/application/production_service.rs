use crate::domain::error::{DomainError, StoreError};
use crate::domain::present;
use crate::domain::production::{
    CreateProduction, NewProduction, Production, ProductionChanges, UpdateProduction,
    parse_production_date,
};
use crate::domain::repository::ProductionRepository;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub struct ProductionService<R: ProductionRepository> {
    repository: Arc<R>,
}

impl<R: ProductionRepository> ProductionService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn list_productions(&self) -> Result<Vec<Production>> {
        let productions = self.repository.list_productions().await.map_err(internal)?;
        info!(count = productions.len(), "Productions listed");
        Ok(productions)
    }

    #[instrument(skip(self))]
    pub async fn get_production(&self, raw_id: &str) -> Result<Production> {
        let id = parse_production_id(raw_id)?;
        let production = self
            .repository
            .find_production(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                warn!(production_id = id, "Production not found");
                not_found(raw_id)
            })?;
        debug!(production_id = id, "Production found");
        Ok(production)
    }

    #[instrument(skip(self, req))]
    pub async fn create_production(&self, req: CreateProduction) -> Result<Production> {
        let (Some(safra), Some(production_area), Some(raw_date), Some(property_name), Some(crop)) = (
            present(&req.safra),
            req.production_area.filter(|area| *area > 0.0),
            present(&req.date),
            present(&req.property_name),
            present(&req.crop),
        ) else {
            warn!("Production rejected: required fields missing");
            return Err(DomainError::Validation(
                "Required fields: safra, productionArea, date, propertyName, crop".to_string(),
            )
            .into());
        };

        let new = NewProduction {
            safra: safra.to_string(),
            production_area,
            cultivated_area: req.cultivated_area,
            date: parse_date(raw_date)?,
            crop: crop.to_string(),
            property_name: property_name.to_string(),
        };

        let production = self
            .repository
            .create_production(new)
            .await
            .map_err(association_or_internal)?;

        info!(
            production_id = production.id,
            safra = %production.safra,
            property = %production.property.name,
            "Production created successfully"
        );
        Ok(production)
    }

    /// Only the supplied fields change; a new property name is resolved again.
    #[instrument(skip(self, req))]
    pub async fn update_production(
        &self,
        raw_id: &str,
        req: UpdateProduction,
    ) -> Result<Production> {
        let id = parse_production_id(raw_id)?;

        if req.production_area.is_some_and(|area| area <= 0.0) {
            warn!(production_id = id, "Update rejected: non-positive production area");
            return Err(DomainError::Validation(
                "productionArea must be greater than zero".to_string(),
            )
            .into());
        }

        let changes = ProductionChanges {
            safra: present(&req.safra).map(String::from),
            production_area: req.production_area,
            cultivated_area: req.cultivated_area,
            date: present(&req.date).map(parse_date).transpose()?,
            crop: present(&req.crop).map(String::from),
            property_name: present(&req.property_name).map(String::from),
        };

        let production = self
            .repository
            .update_production(id, changes)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => {
                    warn!(production_id = id, "Production to update not found");
                    not_found(raw_id)
                }
                other => association_or_internal(other),
            })?;

        info!(production_id = id, "Production updated successfully");
        Ok(production)
    }

    #[instrument(skip(self))]
    pub async fn delete_production(&self, raw_id: &str) -> Result<()> {
        let id = parse_production_id(raw_id)?;

        self.repository
            .delete_production(id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => {
                    warn!(production_id = id, "Production to delete not found");
                    not_found(raw_id)
                }
                StoreError::Restricted => {
                    warn!(production_id = id, "Production deletion blocked by references");
                    anyhow::Error::from(DomainError::ReferenceConflict(
                        "This production cannot be deleted while other records reference it"
                            .to_string(),
                    ))
                }
                other => internal(other),
            })?;

        info!(production_id = id, "Production deleted successfully");
        Ok(())
    }
}

fn parse_production_id(raw: &str) -> Result<u64, DomainError> {
    raw.trim().parse().map_err(|_| {
        warn!(raw_id = raw, "Invalid production id");
        DomainError::Validation("Invalid production id. It must be a number".to_string())
    })
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    parse_production_date(raw).ok_or_else(|| {
        warn!(date = raw, "Invalid production date");
        DomainError::Validation(format!("Invalid date \"{}\"", raw))
    })
}

fn not_found(raw_id: &str) -> anyhow::Error {
    DomainError::NotFound(format!("Production with id \"{}\" not found", raw_id)).into()
}

fn association_or_internal(err: StoreError) -> anyhow::Error {
    match err {
        StoreError::MissingAssociation { key, .. } => {
            warn!(property = %key, "Property does not exist");
            DomainError::Association(format!(
                "Property \"{}\" does not exist. Check the property name",
                key
            ))
            .into()
        }
        other => internal(other),
    }
}

fn internal(err: StoreError) -> anyhow::Error {
    error!(error = %err, "Production repository failure");
    DomainError::Internal(err.to_string()).into()
}
