//! In-process store.
//!
//! All tables live behind one `RwLock`, so every write is applied under a
//! single lock acquisition and readers never observe a half-applied cascade.
//! Rows carry an insertion sequence number; ancestor indexes are keyed by it,
//! so listings keep insertion order and removals stay logarithmic.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

use super::{Store, StoreError, StoreResult};
use crate::model::{
    Api, Developer, EntityKind, Environment, HttpMethod, Operation, Plan, Resource,
};

/// Child ids keyed by their row's sequence number.
type Children = BTreeMap<u64, String>;

type ResourceKey = (String, String);
type RouteKey = (String, HttpMethod, String);

fn resource_key(resource: &Resource) -> ResourceKey {
    (resource.api_id.clone(), resource.name.clone())
}

fn route_key(operation: &Operation) -> RouteKey {
    (
        operation.api_id.clone(),
        operation.method,
        operation.path.clone(),
    )
}

#[derive(Debug)]
struct Table<T> {
    rows: HashMap<String, (u64, T)>,
    order: BTreeMap<u64, String>,
    next: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            order: BTreeMap::new(),
            next: 0,
        }
    }
}

impl<T> Table<T> {
    fn get(&self, id: &str) -> Option<&T> {
        self.rows.get(id).map(|(_, row)| row)
    }

    fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    /// Inserts a new row and returns its sequence number; `None` when the id
    /// is taken.
    fn insert(&mut self, id: &str, row: T) -> Option<u64> {
        if self.rows.contains_key(id) {
            return None;
        }
        let seq = self.next;
        self.next += 1;
        self.rows.insert(id.to_string(), (seq, row));
        self.order.insert(seq, id.to_string());
        Some(seq)
    }

    /// Replaces an existing row in place; `false` when the id is absent.
    fn replace(&mut self, id: &str, row: T) -> bool {
        match self.rows.get_mut(id) {
            Some((_, slot)) => {
                *slot = row;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: &str) -> Option<(u64, T)> {
        let (seq, row) = self.rows.remove(id)?;
        self.order.remove(&seq);
        Some((seq, row))
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.order.values().filter_map(|id| self.get(id))
    }
}

#[derive(Debug, Default)]
struct Tables {
    apis: Table<Api>,
    resources: Table<Resource>,
    operations: Table<Operation>,
    environments: Table<Environment>,
    plans: Table<Plan>,
    developers: Table<Developer>,
    resources_by_api: HashMap<String, Children>,
    operations_by_resource: HashMap<String, Children>,
    apis_by_base_path: HashMap<String, Children>,
    resource_names: HashMap<ResourceKey, String>,
    operation_routes: HashMap<RouteKey, String>,
    developer_emails: HashMap<String, String>,
}

impl Tables {
    fn hydrate_api(&self, api: &Api) -> Api {
        let mut api = api.clone();
        api.resources = self
            .resources_by_api
            .get(&api.id)
            .map(|ids| ids.values().cloned().collect())
            .unwrap_or_default();
        api
    }

    fn hydrate_resource(&self, resource: &Resource) -> Resource {
        let mut resource = resource.clone();
        resource.operations = self
            .operations_by_resource
            .get(&resource.id)
            .map(|ids| ids.values().cloned().collect())
            .unwrap_or_default();
        resource
    }

    fn check_api_references(&self, api: &Api) -> StoreResult<()> {
        if let Some(id) = api
            .environments
            .iter()
            .find(|id| !self.environments.contains(id))
        {
            return Err(StoreError::Conflict(format!(
                "Environment {id} does not exist."
            )));
        }
        if let Some(id) = api.plans.iter().find(|id| !self.plans.contains(id)) {
            return Err(StoreError::Conflict(format!("Plan {id} does not exist.")));
        }
        Ok(())
    }

    fn check_resource_name(&self, resource: &Resource) -> StoreResult<()> {
        match self.resource_names.get(&resource_key(resource)) {
            Some(owner) if *owner != resource.id => Err(StoreError::Conflict(
                "Resource name already exists for this api.".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn check_operation_route(&self, operation: &Operation) -> StoreResult<()> {
        match self.operation_routes.get(&route_key(operation)) {
            Some(owner) if *owner != operation.id => Err(StoreError::Conflict(format!(
                "Operation {} {} already exists for this api.",
                operation.method, operation.path
            ))),
            _ => Ok(()),
        }
    }

    fn remove_operations_of(&mut self, resource_id: &str) {
        for operation_id in self
            .operations_by_resource
            .remove(resource_id)
            .unwrap_or_default()
            .into_values()
        {
            if let Some((_, operation)) = self.operations.remove(&operation_id) {
                self.operation_routes.remove(&route_key(&operation));
            }
        }
    }

    fn remove_resource(&mut self, resource_id: &str) -> bool {
        let Some((seq, resource)) = self.resources.remove(resource_id) else {
            return false;
        };
        self.remove_operations_of(resource_id);
        if let Some(ids) = self.resources_by_api.get_mut(&resource.api_id) {
            ids.remove(&seq);
        }
        self.resource_names.remove(&resource_key(&resource));
        true
    }

    fn index_base_path(&mut self, base_path: &str, seq: u64, api_id: &str) {
        self.apis_by_base_path
            .entry(base_path.to_string())
            .or_default()
            .insert(seq, api_id.to_string());
    }

    fn unindex_base_path(&mut self, base_path: &str, seq: u64) {
        if let Some(ids) = self.apis_by_base_path.get_mut(base_path) {
            ids.remove(&seq);
            if ids.is_empty() {
                self.apis_by_base_path.remove(base_path);
            }
        }
    }
}

/// Store that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate_id(kind: &str, id: &str) -> StoreError {
    StoreError::Conflict(format!("{kind} {id} already exists."))
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        let _tables = self.tables.read().await;
        Ok(())
    }

    async fn insert_api(&self, api: &Api) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.check_api_references(api)?;
        let mut row = api.clone();
        row.resources.clear();
        let Some(seq) = tables.apis.insert(&api.id, row) else {
            return Err(duplicate_id("Api", &api.id));
        };
        tables.index_base_path(&api.base_path, seq, &api.id);
        debug!(api_id = %api.id, "memory store: api inserted");
        Ok(())
    }

    async fn update_api(&self, api: &Api) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some((seq, previous_base_path)) = tables
            .apis
            .rows
            .get(&api.id)
            .map(|(seq, row)| (*seq, row.base_path.clone()))
        else {
            return Ok(false);
        };
        tables.check_api_references(api)?;
        let mut row = api.clone();
        row.resources.clear();
        tables.apis.replace(&api.id, row);
        if previous_base_path != api.base_path {
            tables.unindex_base_path(&previous_base_path, seq);
            tables.index_base_path(&api.base_path, seq, &api.id);
        }
        Ok(true)
    }

    async fn find_api(&self, id: &str) -> StoreResult<Option<Api>> {
        let tables = self.tables.read().await;
        Ok(tables.apis.get(id).map(|api| tables.hydrate_api(api)))
    }

    async fn list_apis(&self) -> StoreResult<Vec<Api>> {
        let tables = self.tables.read().await;
        Ok(tables.apis.values().map(|api| tables.hydrate_api(api)).collect())
    }

    async fn find_apis_by_base_path(&self, base_path: &str) -> StoreResult<Vec<Api>> {
        let tables = self.tables.read().await;
        Ok(tables
            .apis_by_base_path
            .get(base_path)
            .map(|ids| {
                ids.values()
                    .filter_map(|id| tables.apis.get(id))
                    .map(|api| tables.hydrate_api(api))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_api(&self, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some((seq, api)) = tables.apis.remove(id) else {
            return Ok(false);
        };
        for resource_id in tables
            .resources_by_api
            .remove(id)
            .unwrap_or_default()
            .into_values()
        {
            tables.remove_operations_of(&resource_id);
            if let Some((_, resource)) = tables.resources.remove(&resource_id) {
                tables.resource_names.remove(&resource_key(&resource));
            }
        }
        tables.unindex_base_path(&api.base_path, seq);
        debug!(api_id = %id, "memory store: api deleted with its resources");
        Ok(true)
    }

    async fn insert_resource(&self, resource: &Resource) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.apis.contains(&resource.api_id) {
            return Err(StoreError::MissingParent(EntityKind::Api));
        }
        tables.check_resource_name(resource)?;
        let mut row = resource.clone();
        row.operations.clear();
        let Some(seq) = tables.resources.insert(&resource.id, row) else {
            return Err(duplicate_id("Resource", &resource.id));
        };
        tables
            .resources_by_api
            .entry(resource.api_id.clone())
            .or_default()
            .insert(seq, resource.id.clone());
        tables
            .resource_names
            .insert(resource_key(resource), resource.id.clone());
        Ok(())
    }

    async fn update_resource(&self, resource: &Resource) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(previous_key) = tables.resources.get(&resource.id).map(resource_key) else {
            return Ok(false);
        };
        tables.check_resource_name(resource)?;
        let mut row = resource.clone();
        row.operations.clear();
        tables.resources.replace(&resource.id, row);
        tables.resource_names.remove(&previous_key);
        tables
            .resource_names
            .insert(resource_key(resource), resource.id.clone());
        Ok(true)
    }

    async fn find_resource(&self, id: &str) -> StoreResult<Option<Resource>> {
        let tables = self.tables.read().await;
        Ok(tables
            .resources
            .get(id)
            .map(|resource| tables.hydrate_resource(resource)))
    }

    async fn list_resources(&self, api_id: &str) -> StoreResult<Vec<Resource>> {
        let tables = self.tables.read().await;
        Ok(tables
            .resources_by_api
            .get(api_id)
            .map(|ids| {
                ids.values()
                    .filter_map(|id| tables.resources.get(id))
                    .map(|resource| tables.hydrate_resource(resource))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_resource(&self, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.remove_resource(id))
    }

    async fn insert_operation(&self, operation: &Operation) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.apis.contains(&operation.api_id) {
            return Err(StoreError::MissingParent(EntityKind::Api));
        }
        let owned = tables
            .resources
            .get(&operation.resource_id)
            .is_some_and(|resource| resource.api_id == operation.api_id);
        if !owned {
            return Err(StoreError::MissingParent(EntityKind::Resource));
        }
        tables.check_operation_route(operation)?;
        let Some(seq) = tables.operations.insert(&operation.id, operation.clone()) else {
            return Err(duplicate_id("Operation", &operation.id));
        };
        tables
            .operations_by_resource
            .entry(operation.resource_id.clone())
            .or_default()
            .insert(seq, operation.id.clone());
        tables
            .operation_routes
            .insert(route_key(operation), operation.id.clone());
        Ok(())
    }

    async fn update_operation(&self, operation: &Operation) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(previous_key) = tables.operations.get(&operation.id).map(route_key) else {
            return Ok(false);
        };
        tables.check_operation_route(operation)?;
        tables.operations.replace(&operation.id, operation.clone());
        tables.operation_routes.remove(&previous_key);
        tables
            .operation_routes
            .insert(route_key(operation), operation.id.clone());
        Ok(true)
    }

    async fn find_operation(&self, id: &str) -> StoreResult<Option<Operation>> {
        let tables = self.tables.read().await;
        Ok(tables.operations.get(id).cloned())
    }

    async fn list_operations(&self, resource_id: &str) -> StoreResult<Vec<Operation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .operations_by_resource
            .get(resource_id)
            .map(|ids| {
                ids.values()
                    .filter_map(|id| tables.operations.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_operations_by_api(&self, api_id: &str) -> StoreResult<Vec<Operation>> {
        let tables = self.tables.read().await;
        let resource_ids = tables.resources_by_api.get(api_id);
        Ok(resource_ids
            .into_iter()
            .flat_map(BTreeMap::values)
            .filter_map(|resource_id| tables.operations_by_resource.get(resource_id))
            .flat_map(BTreeMap::values)
            .filter_map(|id| tables.operations.get(id))
            .cloned()
            .collect())
    }

    async fn delete_operation(&self, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some((seq, operation)) = tables.operations.remove(id) else {
            return Ok(false);
        };
        if let Some(ids) = tables.operations_by_resource.get_mut(&operation.resource_id) {
            ids.remove(&seq);
        }
        tables.operation_routes.remove(&route_key(&operation));
        Ok(true)
    }

    async fn insert_environment(&self, environment: &Environment) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .environments
            .insert(&environment.id, environment.clone())
            .is_none()
        {
            return Err(duplicate_id("Environment", &environment.id));
        }
        Ok(())
    }

    async fn update_environment(&self, environment: &Environment) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .environments
            .replace(&environment.id, environment.clone()))
    }

    async fn find_environment(&self, id: &str) -> StoreResult<Option<Environment>> {
        let tables = self.tables.read().await;
        Ok(tables.environments.get(id).cloned())
    }

    async fn list_environments(&self) -> StoreResult<Vec<Environment>> {
        let tables = self.tables.read().await;
        Ok(tables.environments.values().cloned().collect())
    }

    async fn delete_environment(&self, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if let Some(api) = tables
            .apis
            .values()
            .find(|api| api.environments.iter().any(|env| env == id))
        {
            return Err(StoreError::Conflict(format!(
                "Environment is referenced by api {}.",
                api.id
            )));
        }
        Ok(tables.environments.remove(id).is_some())
    }

    async fn insert_plan(&self, plan: &Plan) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.plans.insert(&plan.id, plan.clone()).is_none() {
            return Err(duplicate_id("Plan", &plan.id));
        }
        Ok(())
    }

    async fn find_plan(&self, id: &str) -> StoreResult<Option<Plan>> {
        let tables = self.tables.read().await;
        Ok(tables.plans.get(id).cloned())
    }

    async fn list_plans(&self) -> StoreResult<Vec<Plan>> {
        let tables = self.tables.read().await;
        Ok(tables.plans.values().cloned().collect())
    }

    async fn delete_plan(&self, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if let Some(api) = tables
            .apis
            .values()
            .find(|api| api.plans.iter().any(|plan| plan == id))
        {
            return Err(StoreError::Conflict(format!(
                "Plan is referenced by api {}.",
                api.id
            )));
        }
        Ok(tables.plans.remove(id).is_some())
    }

    async fn insert_developer(&self, developer: &Developer) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.developer_emails.contains_key(&developer.email) {
            return Err(StoreError::Conflict(
                "Developer email already exists.".to_string(),
            ));
        }
        if tables
            .developers
            .insert(&developer.id, developer.clone())
            .is_none()
        {
            return Err(duplicate_id("Developer", &developer.id));
        }
        tables
            .developer_emails
            .insert(developer.email.clone(), developer.id.clone());
        Ok(())
    }

    async fn find_developer(&self, id: &str) -> StoreResult<Option<Developer>> {
        let tables = self.tables.read().await;
        Ok(tables.developers.get(id).cloned())
    }

    async fn find_developer_by_email(&self, email: &str) -> StoreResult<Option<Developer>> {
        let tables = self.tables.read().await;
        let found = tables
            .developer_emails
            .get(email)
            .and_then(|id| tables.developers.get(id))
            .cloned();
        Ok(found)
    }

    async fn list_developers(&self) -> StoreResult<Vec<Developer>> {
        let tables = self.tables.read().await;
        Ok(tables.developers.values().cloned().collect())
    }

    async fn delete_developer(&self, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some((_, developer)) = tables.developers.remove(id) else {
            return Ok(false);
        };
        tables.developer_emails.remove(&developer.email);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpMethod, Status};
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn api(id: &str, base_path: &str) -> Api {
        Api {
            id: id.to_string(),
            name: format!("api {id}"),
            version: "1".to_string(),
            description: None,
            base_path: base_path.to_string(),
            cors: false,
            creation_date: Utc::now(),
            status: Status::Active,
            environments: Vec::new(),
            plans: Vec::new(),
            resources: BTreeSet::new(),
        }
    }

    fn resource(id: &str, api_id: &str) -> Resource {
        Resource {
            id: id.to_string(),
            api_id: api_id.to_string(),
            name: format!("resource {id}"),
            description: None,
            operations: BTreeSet::new(),
        }
    }

    fn operation(id: &str, api_id: &str, resource_id: &str, path: &str) -> Operation {
        Operation {
            id: id.to_string(),
            resource_id: resource_id.to_string(),
            api_id: api_id.to_string(),
            method: HttpMethod::Get,
            path: path.to_string(),
            description: None,
        }
    }

    async fn seeded() -> StoreResult<MemoryStore> {
        let store = MemoryStore::new();
        store.insert_api(&api("a1", "/orders")).await?;
        store.insert_resource(&resource("r1", "a1")).await?;
        store.insert_resource(&resource("r2", "a1")).await?;
        store
            .insert_operation(&operation("o1", "a1", "r1", "/one"))
            .await?;
        store
            .insert_operation(&operation("o2", "a1", "r2", "/two"))
            .await?;
        store
            .insert_operation(&operation("o3", "a1", "r1", "/three"))
            .await?;
        Ok(store)
    }

    #[tokio::test]
    async fn reads_fill_derived_membership() -> StoreResult<()> {
        let store = seeded().await?;
        let api = store.find_api("a1").await?;
        assert_eq!(
            api.map(|api| api.resources.into_iter().collect::<Vec<_>>()),
            Some(vec!["r1".to_string(), "r2".to_string()])
        );
        let resource = store.find_resource("r1").await?;
        assert_eq!(
            resource.map(|resource| resource.operations.len()),
            Some(2)
        );
        Ok(())
    }

    #[tokio::test]
    async fn listings_keep_insertion_order() -> StoreResult<()> {
        let store = seeded().await?;
        let ids: Vec<String> = store
            .list_operations("r1")
            .await?
            .into_iter()
            .map(|operation| operation.id)
            .collect();
        assert_eq!(ids, vec!["o1", "o3"]);

        let by_api: Vec<String> = store
            .list_operations_by_api("a1")
            .await?
            .into_iter()
            .map(|operation| operation.id)
            .collect();
        assert_eq!(by_api, vec!["o1", "o3", "o2"]);
        Ok(())
    }

    #[tokio::test]
    async fn deleting_an_api_cascades() -> StoreResult<()> {
        let store = seeded().await?;
        assert!(store.delete_api("a1").await?);
        assert!(store.find_resource("r1").await?.is_none());
        assert!(store.find_operation("o2").await?.is_none());
        assert!(store.find_apis_by_base_path("/orders").await?.is_empty());
        assert!(!store.delete_api("a1").await?);
        Ok(())
    }

    #[tokio::test]
    async fn deleting_a_resource_cascades_to_its_operations_only() -> StoreResult<()> {
        let store = seeded().await?;
        assert!(store.delete_resource("r1").await?);
        assert!(store.find_operation("o1").await?.is_none());
        assert!(store.find_operation("o2").await?.is_some());
        let api = store.find_api("a1").await?;
        assert_eq!(api.map(|api| api.resources.len()), Some(1));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_route_within_api_conflicts() -> StoreResult<()> {
        let store = seeded().await?;
        let result = store
            .insert_operation(&operation("o4", "a1", "r2", "/one"))
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn operation_must_match_resource_owner() -> StoreResult<()> {
        let store = seeded().await?;
        store.insert_api(&api("a2", "/billing")).await?;
        let result = store
            .insert_operation(&operation("o9", "a2", "r1", "/x"))
            .await;
        assert!(matches!(
            result,
            Err(StoreError::MissingParent(EntityKind::Resource))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn base_path_index_follows_updates() -> StoreResult<()> {
        let store = seeded().await?;
        store.insert_api(&api("a2", "/orders")).await?;
        assert_eq!(store.find_apis_by_base_path("/orders").await?.len(), 2);

        let mut moved = api("a2", "/billing");
        moved.name = "billing".to_string();
        assert!(store.update_api(&moved).await?);
        assert_eq!(store.find_apis_by_base_path("/orders").await?.len(), 1);
        assert_eq!(store.find_apis_by_base_path("/billing").await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn order_survives_removal_and_reinsert() -> StoreResult<()> {
        let store = seeded().await?;
        store.insert_resource(&resource("r3", "a1")).await?;
        assert!(store.delete_resource("r2").await?);
        store.insert_resource(&resource("r2", "a1")).await?;

        let ids: Vec<String> = store
            .list_resources("a1")
            .await?
            .into_iter()
            .map(|resource| resource.id)
            .collect();
        assert_eq!(ids, vec!["r1", "r3", "r2"]);

        assert!(store.delete_operation("o1").await?);
        store
            .insert_operation(&operation("o1", "a1", "r1", "/one"))
            .await?;
        let ids: Vec<String> = store
            .list_operations("r1")
            .await?
            .into_iter()
            .map(|operation| operation.id)
            .collect();
        assert_eq!(ids, vec!["o3", "o1"]);
        Ok(())
    }

    #[tokio::test]
    async fn unique_keys_follow_updates_and_deletes() -> StoreResult<()> {
        let store = seeded().await?;

        let mut renamed = resource("r1", "a1");
        renamed.name = "orders".to_string();
        assert!(store.update_resource(&renamed).await?);
        let mut reuse = resource("r9", "a1");
        reuse.name = "resource r1".to_string();
        store.insert_resource(&reuse).await?;
        let mut clash = resource("r10", "a1");
        clash.name = "orders".to_string();
        let result = store.insert_resource(&clash).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert!(store.update_resource(&renamed).await?);

        let mut moved = operation("o1", "a1", "r1", "/moved");
        moved.description = Some("moved".to_string());
        assert!(store.update_operation(&moved).await?);
        store
            .insert_operation(&operation("o4", "a1", "r2", "/one"))
            .await?;
        let result = store
            .insert_operation(&operation("o5", "a1", "r2", "/moved"))
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        assert!(store.delete_resource("r2").await?);
        store
            .insert_operation(&operation("o6", "a1", "r1", "/two"))
            .await?;
        store.insert_resource(&resource("r2", "a1")).await?;

        assert!(store.delete_api("a1").await?);
        store.insert_api(&api("a1", "/orders")).await?;
        store.insert_resource(&resource("r1", "a1")).await?;
        store
            .insert_operation(&operation("o1", "a1", "r1", "/one"))
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn developer_email_index_follows_deletes() -> StoreResult<()> {
        let store = MemoryStore::new();
        let developer = Developer {
            id: "d1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            status: Status::Active,
            creation_date: Utc::now(),
        };
        store.insert_developer(&developer).await?;
        let found = store.find_developer_by_email("ada@example.com").await?;
        assert_eq!(found.map(|d| d.id), Some("d1".to_string()));

        let mut twin = developer.clone();
        twin.id = "d2".to_string();
        let result = store.insert_developer(&twin).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        assert!(store.delete_developer("d1").await?);
        assert!(store.find_developer_by_email("ada@example.com").await?.is_none());
        store.insert_developer(&twin).await?;
        Ok(())
    }

    #[tokio::test]
    async fn children_of_a_missing_parent_are_rejected() -> StoreResult<()> {
        let store = seeded().await?;
        let result = store.insert_resource(&resource("r5", "gone")).await;
        assert!(matches!(
            result,
            Err(StoreError::MissingParent(EntityKind::Api))
        ));

        let result = store
            .insert_operation(&operation("o5", "gone", "r1", "/x"))
            .await;
        assert!(matches!(
            result,
            Err(StoreError::MissingParent(EntityKind::Api))
        ));

        assert!(store.delete_resource("r1").await?);
        let result = store
            .insert_operation(&operation("o5", "a1", "r1", "/x"))
            .await;
        assert!(matches!(
            result,
            Err(StoreError::MissingParent(EntityKind::Resource))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn referenced_environment_cannot_be_deleted() -> StoreResult<()> {
        let store = MemoryStore::new();
        let environment = Environment {
            id: "e1".to_string(),
            name: "production".to_string(),
            description: None,
            inbound_url: "https://gw.example.com".to_string(),
            outbound_url: "https://backend.internal".to_string(),
            status: Status::Active,
            creation_date: Utc::now(),
        };
        store.insert_environment(&environment).await?;
        let mut with_env = api("a1", "/orders");
        with_env.environments.push("e1".to_string());
        store.insert_api(&with_env).await?;

        let result = store.delete_environment("e1").await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        store.delete_api("a1").await?;
        assert!(store.delete_environment("e1").await?);
        Ok(())
    }
}
