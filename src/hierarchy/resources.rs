use tracing::{info, instrument};

use super::{HierarchyError, HierarchyManager, HierarchyResult};
use crate::{
    model::{EntityKind, Resource, ResourceInput},
    pagination::{Listing, PageParams},
};

impl HierarchyManager {
    /// # Errors
    /// `Validation` for malformed input, `NotFound` when the api does not exist,
    /// `Conflict` when the name is taken within the api.
    #[instrument(skip(self, input))]
    pub async fn create_resource(
        &self,
        api_id: &str,
        input: ResourceInput,
    ) -> HierarchyResult<Resource> {
        let fields = input.validate()?;
        self.resolve_api(api_id).await?;
        let resource = Resource::new(self.next_id(), api_id.to_string(), fields);
        self.store.insert_resource(&resource).await?;
        info!(resource_id = %resource.id, api_id, "resource created");
        Ok(resource)
    }

    /// # Errors
    /// `NotFound` when the api does not exist or does not own the resource.
    #[instrument(skip(self))]
    pub async fn find_resource(&self, api_id: &str, resource_id: &str) -> HierarchyResult<Resource> {
        self.resolve_resource(api_id, resource_id).await
    }

    /// # Errors
    /// `Validation` for bad paging input, `NotFound` when the api does not exist.
    #[instrument(skip(self))]
    pub async fn list_resources(
        &self,
        api_id: &str,
        params: PageParams,
    ) -> HierarchyResult<Listing<Resource>> {
        let bounds = params.bounds()?;
        self.resolve_api(api_id).await?;
        let listing = match bounds {
            Some(bounds) => Listing::Paged(self.store.page_resources(api_id, bounds).await?),
            None => Listing::Full(self.store.list_resources(api_id).await?),
        };
        Ok(listing)
    }

    /// # Errors
    /// `NotFound` when the chain does not resolve, `Validation` for malformed
    /// input, `Conflict` when the new name is taken.
    #[instrument(skip(self, input))]
    pub async fn update_resource(
        &self,
        api_id: &str,
        resource_id: &str,
        input: ResourceInput,
    ) -> HierarchyResult<Resource> {
        let current = self.resolve_resource(api_id, resource_id).await?;
        let resource = current.with_fields(input.validate()?);
        if !self.store.update_resource(&resource).await? {
            return Err(HierarchyError::NotFound(EntityKind::Resource));
        }
        info!(resource_id, "resource updated");
        Ok(resource)
    }

    /// Deletes the resource together with its operations.
    ///
    /// # Errors
    /// `NotFound` when the chain does not resolve.
    #[instrument(skip(self))]
    pub async fn delete_resource(&self, api_id: &str, resource_id: &str) -> HierarchyResult<()> {
        self.resolve_resource(api_id, resource_id).await?;
        if !self.store.delete_resource(resource_id).await? {
            return Err(HierarchyError::NotFound(EntityKind::Resource));
        }
        info!(resource_id, "resource deleted");
        Ok(())
    }
}
