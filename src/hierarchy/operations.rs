use tracing::{info, instrument};

use super::{HierarchyError, HierarchyManager, HierarchyResult};
use crate::{
    model::{EntityKind, Operation, OperationInput},
    pagination::{Listing, PageParams},
};

impl HierarchyManager {
    /// Returns the operation only when it sits under `resource_id`, which in turn
    /// sits under `api_id`.
    ///
    /// # Errors
    /// `NotFound` when any link of the chain does not resolve.
    #[instrument(skip(self))]
    pub async fn find_operation(
        &self,
        api_id: &str,
        resource_id: &str,
        operation_id: &str,
    ) -> HierarchyResult<Operation> {
        self.resolve_resource(api_id, resource_id).await?;
        self.store
            .find_operation(operation_id)
            .await?
            .filter(|operation| operation.resource_id == resource_id && operation.api_id == api_id)
            .ok_or(HierarchyError::NotFound(EntityKind::Operation))
    }

    /// Operations of a resource, paged when `params` carries `page` or `limit`.
    ///
    /// # Errors
    /// `Validation` for bad paging input, `NotFound` when the chain does not resolve.
    #[instrument(skip(self))]
    pub async fn list_operations(
        &self,
        api_id: &str,
        resource_id: &str,
        params: PageParams,
    ) -> HierarchyResult<Listing<Operation>> {
        let bounds = params.bounds()?;
        self.resolve_resource(api_id, resource_id).await?;
        let listing = match bounds {
            Some(bounds) => Listing::Paged(self.store.page_operations(resource_id, bounds).await?),
            None => Listing::Full(self.store.list_operations(resource_id).await?),
        };
        Ok(listing)
    }

    /// Every operation of an api, grouped by resource in insertion order.
    ///
    /// # Errors
    /// `NotFound` when the api does not exist.
    #[instrument(skip(self))]
    pub async fn list_operations_by_api(&self, api_id: &str) -> HierarchyResult<Vec<Operation>> {
        self.resolve_api(api_id).await?;
        Ok(self.store.list_operations_by_api(api_id).await?)
    }

    /// # Errors
    /// `Validation` for malformed input, `NotFound` when the chain does not
    /// resolve, `Conflict` when the method and path are already routed in the api.
    #[instrument(skip(self, input))]
    pub async fn create_operation(
        &self,
        api_id: &str,
        resource_id: &str,
        input: OperationInput,
    ) -> HierarchyResult<Operation> {
        let fields = input.validate()?;
        self.resolve_resource(api_id, resource_id).await?;
        let operation = Operation::new(
            self.next_id(),
            api_id.to_string(),
            resource_id.to_string(),
            fields,
        );
        self.store.insert_operation(&operation).await?;
        info!(operation_id = %operation.id, method = %operation.method, path = %operation.path, "operation created");
        Ok(operation)
    }

    /// Replaces method, path and description; id and parents are kept.
    ///
    /// # Errors
    /// `NotFound` when the chain does not resolve, `Validation` for malformed
    /// input, `Conflict` on a duplicate route.
    #[instrument(skip(self, input))]
    pub async fn update_operation(
        &self,
        api_id: &str,
        resource_id: &str,
        operation_id: &str,
        input: OperationInput,
    ) -> HierarchyResult<Operation> {
        let current = self.find_operation(api_id, resource_id, operation_id).await?;
        let operation = current.with_fields(input.validate()?);
        if !self.store.update_operation(&operation).await? {
            return Err(HierarchyError::NotFound(EntityKind::Operation));
        }
        info!(operation_id = %operation.id, "operation updated");
        Ok(operation)
    }

    /// Deletes the operation if present. Deleting an operation that does not
    /// exist under the resource succeeds without effect.
    ///
    /// # Errors
    /// `NotFound` when the api or resource does not resolve.
    #[instrument(skip(self))]
    pub async fn delete_operation(
        &self,
        api_id: &str,
        resource_id: &str,
        operation_id: &str,
    ) -> HierarchyResult<()> {
        self.resolve_resource(api_id, resource_id).await?;
        let owned = self
            .store
            .find_operation(operation_id)
            .await?
            .is_some_and(|operation| operation.resource_id == resource_id);
        if owned && self.store.delete_operation(operation_id).await? {
            info!(operation_id, "operation deleted");
        }
        Ok(())
    }
}
