use crate::domain::error::StoreError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{User, UserChanges};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn email_taken(storage: &HashMap<String, User>, email: &str, except_id: Option<&str>) -> bool {
    storage
        .values()
        .any(|u| u.email == email && Some(u.id.as_str()) != except_id)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        if email_taken(&storage, &user.email, None) {
            debug!("Email already present in storage");
            return Err(StoreError::UniqueViolation("email"));
        }
        storage.insert(user.id.clone(), user.clone());
        debug!(user_id = %user.id, "User saved to memory storage");
        Ok(user)
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.values().find(|u| u.email == email).cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, "User found in storage"),
            None => trace!("User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = id))]
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.get(id).cloned();
        if user.is_none() {
            trace!("User not found in storage");
        }
        Ok(user)
    }

    #[instrument(skip(self, changes), fields(user_id = id))]
    async fn update_user(&self, id: &str, changes: UserChanges) -> Result<User, StoreError> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        if !storage.contains_key(id) {
            trace!("User not found in storage");
            return Err(StoreError::NotFound);
        }
        if let Some(email) = changes.email.as_deref() {
            if email_taken(&storage, email, Some(id)) {
                debug!("New email belongs to another user");
                return Err(StoreError::UniqueViolation("email"));
            }
        }
        let user = storage.get_mut(id).ok_or(StoreError::NotFound)?;
        changes.apply_to(user);
        debug!("User updated in memory storage");
        Ok(user.clone())
    }

    #[instrument(skip(self), fields(user_id = id))]
    async fn delete_user(&self, id: &str) -> Result<(), StoreError> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        storage.remove(id).ok_or(StoreError::NotFound)?;
        debug!("User removed from memory storage");
        Ok(())
    }
}
