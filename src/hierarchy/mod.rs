//! Hierarchy manager: CRUD and listing over the Api → Resource → Operation tree
//! plus the sibling environments, plans and developers.
//!
//! Every call that addresses a nested entity resolves the full ancestor chain
//! first and fails with [`HierarchyError::NotFound`] before touching the store
//! for writes. An operation id that exists under a different resource or api
//! is treated as absent. Authorization happens before this layer.

mod apis;
mod operations;
mod resources;
mod siblings;


use std::sync::Arc;

use crate::{
    ids::IdGenerator,
    model::{Api, EntityKind, Resource, ValidationError},
    store::{Store, StoreError},
};

pub type HierarchyResult<T> = Result<T, HierarchyError>;

#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    #[error("{0} not found")]
    NotFound(EntityKind),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<ValidationError> for HierarchyError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.message().to_string())
    }
}

impl From<StoreError> for HierarchyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => Self::Conflict(message),
            StoreError::MissingParent(kind) => Self::NotFound(kind),
            other => Self::Store(other),
        }
    }
}

/// Entry point for every control-plane operation.
///
/// Cheap to clone; shared with request handlers through an axum `Extension`.
#[derive(Clone, Debug)]
pub struct HierarchyManager {
    store: Arc<dyn Store>,
    ids: Arc<dyn IdGenerator>,
}

impl HierarchyManager {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Reports whether the backing store answers.
    ///
    /// # Errors
    /// Returns the store error when the ping fails.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    fn next_id(&self) -> String {
        self.ids.next_id()
    }

    async fn resolve_api(&self, api_id: &str) -> HierarchyResult<Api> {
        self.store
            .find_api(api_id)
            .await?
            .ok_or(HierarchyError::NotFound(EntityKind::Api))
    }

    /// Resolves `api_id → resource_id`; a resource owned by another api is `NotFound`.
    async fn resolve_resource(&self, api_id: &str, resource_id: &str) -> HierarchyResult<Resource> {
        self.resolve_api(api_id).await?;
        self.store
            .find_resource(resource_id)
            .await?
            .filter(|resource| resource.api_id == api_id)
            .ok_or(HierarchyError::NotFound(EntityKind::Resource))
    }
}
