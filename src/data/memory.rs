use crate::domain::error::StoreError;
use crate::domain::production::{NewProduction, Production, ProductionChanges, Property};
use crate::domain::repository::{ProductionRepository, PropertyRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

/// Properties and productions share one lock so that resolving a property
/// name and writing the production happen atomically.
#[derive(Clone, Default)]
pub struct InMemoryFarmStore {
    tables: Arc<RwLock<FarmTables>>,
}

#[derive(Default)]
struct FarmTables {
    properties: BTreeMap<u64, Property>,
    productions: BTreeMap<u64, ProductionRow>,
    last_property_id: u64,
    last_production_id: u64,
}

#[derive(Clone)]
struct ProductionRow {
    id: u64,
    safra: String,
    production_area: f64,
    cultivated_area: Option<f64>,
    date: DateTime<Utc>,
    crop: String,
    property_id: u64,
}

impl FarmTables {
    fn property_by_name(&self, name: &str) -> Option<&Property> {
        self.properties.values().find(|p| p.name == name)
    }

    fn resolve_property(&self, name: &str) -> Result<u64, StoreError> {
        self.property_by_name(name)
            .map(|p| p.id)
            .ok_or_else(|| StoreError::MissingAssociation {
                entity: "property",
                key: name.to_string(),
            })
    }

    fn join(&self, row: &ProductionRow) -> Result<Production, StoreError> {
        let property = self.properties.get(&row.property_id).cloned().ok_or_else(|| {
            StoreError::Backend(format!(
                "production {} references missing property {}",
                row.id, row.property_id
            ))
        })?;
        Ok(Production {
            id: row.id,
            safra: row.safra.clone(),
            production_area: row.production_area,
            cultivated_area: row.cultivated_area,
            date: row.date,
            crop: row.crop.clone(),
            property_id: row.property_id,
            property,
        })
    }
}

impl InMemoryFarmStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyRepository for InMemoryFarmStore {
    #[instrument(skip(self))]
    async fn save_property(&self, name: &str) -> Result<Property, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.property_by_name(name).is_some() {
            return Err(StoreError::UniqueViolation("name"));
        }
        tables.last_property_id += 1;
        let property = Property {
            id: tables.last_property_id,
            name: name.to_string(),
        };
        tables.properties.insert(property.id, property.clone());
        debug!(property_id = property.id, "Property saved to memory storage");
        Ok(property)
    }

    #[instrument(skip(self))]
    async fn find_property_by_name(&self, name: &str) -> Result<Option<Property>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.property_by_name(name).cloned())
    }
}

#[async_trait]
impl ProductionRepository for InMemoryFarmStore {
    #[instrument(skip(self))]
    async fn list_productions(&self) -> Result<Vec<Production>, StoreError> {
        let tables = self.tables.read().await;
        tables.productions.values().map(|row| tables.join(row)).collect()
    }

    #[instrument(skip(self))]
    async fn find_production(&self, id: u64) -> Result<Option<Production>, StoreError> {
        let tables = self.tables.read().await;
        tables.productions.get(&id).map(|row| tables.join(row)).transpose()
    }

    #[instrument(skip(self, new), fields(property = %new.property_name))]
    async fn create_production(&self, new: NewProduction) -> Result<Production, StoreError> {
        trace!("Acquiring write lock for farm storage");
        let mut tables = self.tables.write().await;
        let property_id = tables.resolve_property(&new.property_name)?;

        tables.last_production_id += 1;
        let row = ProductionRow {
            id: tables.last_production_id,
            safra: new.safra,
            production_area: new.production_area,
            cultivated_area: new.cultivated_area,
            date: new.date,
            crop: new.crop,
            property_id,
        };
        let production = tables.join(&row)?;
        tables.productions.insert(row.id, row);
        debug!(production_id = production.id, "Production saved to memory storage");
        Ok(production)
    }

    #[instrument(skip(self, changes))]
    async fn update_production(
        &self,
        id: u64,
        changes: ProductionChanges,
    ) -> Result<Production, StoreError> {
        trace!("Acquiring write lock for farm storage");
        let mut tables = self.tables.write().await;
        let mut row = tables.productions.get(&id).cloned().ok_or(StoreError::NotFound)?;

        if let Some(name) = changes.property_name.as_deref() {
            row.property_id = tables.resolve_property(name)?;
        }
        if let Some(safra) = changes.safra {
            row.safra = safra;
        }
        if let Some(area) = changes.production_area {
            row.production_area = area;
        }
        if let Some(area) = changes.cultivated_area {
            row.cultivated_area = Some(area);
        }
        if let Some(date) = changes.date {
            row.date = date;
        }
        if let Some(crop) = changes.crop {
            row.crop = crop;
        }

        let production = tables.join(&row)?;
        tables.productions.insert(id, row);
        debug!(production_id = id, "Production updated in memory storage");
        Ok(production)
    }

    #[instrument(skip(self))]
    async fn delete_production(&self, id: u64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        // Nothing references a production in this store, so deletion is never restricted.
        tables.productions.remove(&id).ok_or(StoreError::NotFound)?;
        debug!(production_id = id, "Production removed from memory storage");
        Ok(())
    }
}
