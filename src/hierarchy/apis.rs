use chrono::Utc;
use tracing::{info, instrument};

use super::{HierarchyError, HierarchyManager, HierarchyResult};
use crate::{
    model::{normalize_base_path, Api, ApiFields, ApiInput, EntityKind},
    pagination::{Listing, PageParams},
};

impl HierarchyManager {
    /// Rejects references to environments or plans that do not exist.
    async fn check_references(&self, fields: &ApiFields) -> HierarchyResult<()> {
        for id in &fields.environments {
            if self.store.find_environment(id).await?.is_none() {
                return Err(HierarchyError::Validation(format!(
                    "unknown environment id: {id}"
                )));
            }
        }
        for id in &fields.plans {
            if self.store.find_plan(id).await?.is_none() {
                return Err(HierarchyError::Validation(format!("unknown plan id: {id}")));
            }
        }
        Ok(())
    }

    /// # Errors
    /// `Validation` for malformed input or unknown environment/plan references.
    #[instrument(skip(self, input))]
    pub async fn create_api(&self, input: ApiInput) -> HierarchyResult<Api> {
        let fields = input.validate()?;
        self.check_references(&fields).await?;
        let api = Api::new(self.next_id(), fields, Utc::now());
        self.store.insert_api(&api).await?;
        info!(api_id = %api.id, base_path = %api.base_path, "api created");
        Ok(api)
    }

    /// # Errors
    /// `NotFound` when the api does not exist.
    #[instrument(skip(self))]
    pub async fn find_api(&self, api_id: &str) -> HierarchyResult<Api> {
        self.resolve_api(api_id).await
    }

    /// Apis in creation order, optionally restricted to one base path.
    ///
    /// # Errors
    /// `Validation` for bad paging input or a malformed base path.
    #[instrument(skip(self))]
    pub async fn list_apis(
        &self,
        base_path: Option<&str>,
        params: PageParams,
    ) -> HierarchyResult<Listing<Api>> {
        let bounds = params.bounds()?;
        let apis = match base_path {
            Some(base_path) => {
                let base_path = normalize_base_path(base_path)?;
                self.store.find_apis_by_base_path(&base_path).await?
            }
            None => self.store.list_apis().await?,
        };
        Ok(Listing::from_collection(apis, bounds))
    }

    /// Replaces scalar fields and reference lists; id, creation date and resources are kept.
    ///
    /// # Errors
    /// `NotFound` when the api does not exist, `Validation` for malformed input.
    #[instrument(skip(self, input))]
    pub async fn update_api(&self, api_id: &str, input: ApiInput) -> HierarchyResult<Api> {
        let current = self.resolve_api(api_id).await?;
        let fields = input.validate()?;
        self.check_references(&fields).await?;
        let api = current.with_fields(fields);
        if !self.store.update_api(&api).await? {
            return Err(HierarchyError::NotFound(EntityKind::Api));
        }
        info!(api_id = %api.id, "api updated");
        Ok(api)
    }

    /// Deletes the api with all of its resources and operations.
    ///
    /// # Errors
    /// `NotFound` when the api does not exist.
    #[instrument(skip(self))]
    pub async fn delete_api(&self, api_id: &str) -> HierarchyResult<()> {
        if !self.store.delete_api(api_id).await? {
            return Err(HierarchyError::NotFound(EntityKind::Api));
        }
        info!(api_id, "api deleted");
        Ok(())
    }
}
