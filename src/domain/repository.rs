use crate::domain::error::StoreError;
use crate::domain::production::{NewProduction, Production, ProductionChanges, Property};
use crate::domain::user::{User, UserChanges};
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `UniqueViolation("email")` when the email is taken.
    async fn create_user(&self, user: User) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;
    /// Fails with `NotFound` for an unknown id and `UniqueViolation("email")`
    /// when the new email belongs to another user.
    async fn update_user(&self, id: &str, changes: UserChanges) -> Result<User, StoreError>;
    async fn delete_user(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn save_property(&self, name: &str) -> Result<Property, StoreError>;
    async fn find_property_by_name(&self, name: &str) -> Result<Option<Property>, StoreError>;
}

/// Productions are always read back with their property embedded. Writes that
/// name a property resolve it inside the same operation and fail with
/// `MissingAssociation` when it does not exist.
#[async_trait]
pub trait ProductionRepository: Send + Sync {
    async fn list_productions(&self) -> Result<Vec<Production>, StoreError>;
    async fn find_production(&self, id: u64) -> Result<Option<Production>, StoreError>;
    async fn create_production(&self, new: NewProduction) -> Result<Production, StoreError>;
    async fn update_production(
        &self,
        id: u64,
        changes: ProductionChanges,
    ) -> Result<Production, StoreError>;
    async fn delete_production(&self, id: u64) -> Result<(), StoreError>;
}
