//! Persistence contract for the control plane.
//!
//! The store owns point lookups, ancestor-scoped listings (resources of an api,
//! operations of a resource or of an api), cascading deletes and uniqueness
//! constraints. Each call is a single all-or-nothing unit of work; the
//! hierarchy manager never holds a store lock across calls.
//!
//! Two adapters ship with the crate: [`MemoryStore`] for single-node and test
//! use, and [`PgStore`] backed by Postgres through `sqlx`.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::{
    model::{Api, Developer, EntityKind, Environment, Operation, Plan, Resource},
    pagination::{Page, PageBounds},
};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness or reference constraint would be violated.
    #[error("{0}")]
    Conflict(String),
    /// The api or resource a new row belongs to does not exist.
    #[error("{0} not found")]
    MissingParent(EntityKind),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Records keyed by id with ancestor-scoped indexes.
///
/// Update and delete methods return `false` when the id is absent. Reads of an
/// [`Api`] or [`Resource`] fill the derived `resources`/`operations` sets from
/// the ancestor index.
#[async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    async fn ping(&self) -> StoreResult<()>;

    async fn insert_api(&self, api: &Api) -> StoreResult<()>;
    async fn update_api(&self, api: &Api) -> StoreResult<bool>;
    async fn find_api(&self, id: &str) -> StoreResult<Option<Api>>;
    async fn list_apis(&self) -> StoreResult<Vec<Api>>;
    /// Apis whose base path equals `base_path`, served from the base-path index.
    async fn find_apis_by_base_path(&self, base_path: &str) -> StoreResult<Vec<Api>>;
    /// Removes the api together with its resources and operations.
    async fn delete_api(&self, id: &str) -> StoreResult<bool>;

    async fn insert_resource(&self, resource: &Resource) -> StoreResult<()>;
    async fn update_resource(&self, resource: &Resource) -> StoreResult<bool>;
    async fn find_resource(&self, id: &str) -> StoreResult<Option<Resource>>;
    /// Resources of an api in insertion order.
    async fn list_resources(&self, api_id: &str) -> StoreResult<Vec<Resource>>;
    /// Removes the resource together with its operations.
    async fn delete_resource(&self, id: &str) -> StoreResult<bool>;

    async fn page_resources(
        &self,
        api_id: &str,
        bounds: PageBounds,
    ) -> StoreResult<Page<Resource>> {
        let resources = self.list_resources(api_id).await?;
        Ok(Page::from_collection(resources, bounds))
    }

    async fn insert_operation(&self, operation: &Operation) -> StoreResult<()>;
    async fn update_operation(&self, operation: &Operation) -> StoreResult<bool>;
    async fn find_operation(&self, id: &str) -> StoreResult<Option<Operation>>;
    /// Operations of a resource in insertion order.
    async fn list_operations(&self, resource_id: &str) -> StoreResult<Vec<Operation>>;
    /// Operations across every resource of an api, grouped by resource.
    async fn list_operations_by_api(&self, api_id: &str) -> StoreResult<Vec<Operation>>;
    async fn delete_operation(&self, id: &str) -> StoreResult<bool>;

    async fn page_operations(
        &self,
        resource_id: &str,
        bounds: PageBounds,
    ) -> StoreResult<Page<Operation>> {
        let operations = self.list_operations(resource_id).await?;
        Ok(Page::from_collection(operations, bounds))
    }

    async fn insert_environment(&self, environment: &Environment) -> StoreResult<()>;
    async fn update_environment(&self, environment: &Environment) -> StoreResult<bool>;
    async fn find_environment(&self, id: &str) -> StoreResult<Option<Environment>>;
    async fn list_environments(&self) -> StoreResult<Vec<Environment>>;
    /// Fails with `Conflict` while an api still references the environment.
    async fn delete_environment(&self, id: &str) -> StoreResult<bool>;

    async fn insert_plan(&self, plan: &Plan) -> StoreResult<()>;
    async fn find_plan(&self, id: &str) -> StoreResult<Option<Plan>>;
    async fn list_plans(&self) -> StoreResult<Vec<Plan>>;
    /// Fails with `Conflict` while an api still references the plan.
    async fn delete_plan(&self, id: &str) -> StoreResult<bool>;

    async fn insert_developer(&self, developer: &Developer) -> StoreResult<()>;
    async fn find_developer(&self, id: &str) -> StoreResult<Option<Developer>>;
    /// `email` is compared as stored (lower-case).
    async fn find_developer_by_email(&self, email: &str) -> StoreResult<Option<Developer>>;
    async fn list_developers(&self) -> StoreResult<Vec<Developer>>;
    async fn delete_developer(&self, id: &str) -> StoreResult<bool>;
}
