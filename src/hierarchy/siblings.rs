//! Environments, plans and developers. None of them sit in the resource tree,
//! so there is no chain to resolve, only point lookups.

use chrono::Utc;
use tracing::{info, instrument};

use super::{HierarchyError, HierarchyManager, HierarchyResult};
use crate::{
    model::{
        Developer, DeveloperCredentials, DeveloperInput, EntityKind,
        Environment, EnvironmentInput, Plan, PlanInput,
    },
    pagination::{Listing, PageParams},
};

impl HierarchyManager {
    /// # Errors
    /// `Validation` for malformed input.
    #[instrument(skip(self, input))]
    pub async fn create_environment(&self, input: EnvironmentInput) -> HierarchyResult<Environment> {
        let environment = Environment::new(self.next_id(), input.validate()?, Utc::now());
        self.store.insert_environment(&environment).await?;
        info!(environment_id = %environment.id, "environment created");
        Ok(environment)
    }

    /// # Errors
    /// `NotFound` when absent.
    #[instrument(skip(self))]
    pub async fn find_environment(&self, environment_id: &str) -> HierarchyResult<Environment> {
        self.store
            .find_environment(environment_id)
            .await?
            .ok_or(HierarchyError::NotFound(EntityKind::Environment))
    }

    /// # Errors
    /// `Validation` for bad paging input.
    #[instrument(skip(self))]
    pub async fn list_environments(
        &self,
        params: PageParams,
    ) -> HierarchyResult<Listing<Environment>> {
        let bounds = params.bounds()?;
        let environments = self.store.list_environments().await?;
        Ok(Listing::from_collection(environments, bounds))
    }

    /// # Errors
    /// `NotFound` when absent, `Validation` for malformed input.
    #[instrument(skip(self, input))]
    pub async fn update_environment(
        &self,
        environment_id: &str,
        input: EnvironmentInput,
    ) -> HierarchyResult<Environment> {
        let current = self.find_environment(environment_id).await?;
        let environment = current.with_fields(input.validate()?);
        if !self.store.update_environment(&environment).await? {
            return Err(HierarchyError::NotFound(EntityKind::Environment));
        }
        info!(environment_id, "environment updated");
        Ok(environment)
    }

    /// # Errors
    /// `NotFound` when absent, `Conflict` while an api references it.
    #[instrument(skip(self))]
    pub async fn delete_environment(&self, environment_id: &str) -> HierarchyResult<()> {
        if !self.store.delete_environment(environment_id).await? {
            return Err(HierarchyError::NotFound(EntityKind::Environment));
        }
        info!(environment_id, "environment deleted");
        Ok(())
    }

    /// # Errors
    /// `Validation` for malformed input.
    #[instrument(skip(self, input))]
    pub async fn create_plan(&self, input: PlanInput) -> HierarchyResult<Plan> {
        let plan = Plan::new(self.next_id(), input.validate()?, Utc::now());
        self.store.insert_plan(&plan).await?;
        info!(plan_id = %plan.id, "plan created");
        Ok(plan)
    }

    /// # Errors
    /// `NotFound` when absent.
    #[instrument(skip(self))]
    pub async fn find_plan(&self, plan_id: &str) -> HierarchyResult<Plan> {
        self.store
            .find_plan(plan_id)
            .await?
            .ok_or(HierarchyError::NotFound(EntityKind::Plan))
    }

    /// # Errors
    /// `Validation` for bad paging input.
    #[instrument(skip(self))]
    pub async fn list_plans(&self, params: PageParams) -> HierarchyResult<Listing<Plan>> {
        let bounds = params.bounds()?;
        Ok(Listing::from_collection(self.store.list_plans().await?, bounds))
    }

    /// # Errors
    /// `NotFound` when absent, `Conflict` while an api references it.
    #[instrument(skip(self))]
    pub async fn delete_plan(&self, plan_id: &str) -> HierarchyResult<()> {
        if !self.store.delete_plan(plan_id).await? {
            return Err(HierarchyError::NotFound(EntityKind::Plan));
        }
        info!(plan_id, "plan deleted");
        Ok(())
    }

    /// # Errors
    /// `Validation` for malformed input, `Conflict` on a duplicate email.
    #[instrument(skip(self, input))]
    pub async fn create_developer(&self, input: DeveloperInput) -> HierarchyResult<Developer> {
        let developer = Developer::new(self.next_id(), input.validate()?, Utc::now());
        self.store.insert_developer(&developer).await?;
        info!(developer_id = %developer.id, "developer created");
        Ok(developer)
    }

    /// # Errors
    /// `NotFound` when absent.
    #[instrument(skip(self))]
    pub async fn find_developer(&self, developer_id: &str) -> HierarchyResult<Developer> {
        self.store
            .find_developer(developer_id)
            .await?
            .ok_or(HierarchyError::NotFound(EntityKind::Developer))
    }

    /// # Errors
    /// `Validation` for bad paging input.
    #[instrument(skip(self))]
    pub async fn list_developers(&self, params: PageParams) -> HierarchyResult<Listing<Developer>> {
        let bounds = params.bounds()?;
        Ok(Listing::from_collection(
            self.store.list_developers().await?,
            bounds,
        ))
    }

    /// # Errors
    /// `NotFound` when absent.
    #[instrument(skip(self))]
    pub async fn delete_developer(&self, developer_id: &str) -> HierarchyResult<()> {
        if !self.store.delete_developer(developer_id).await? {
            return Err(HierarchyError::NotFound(EntityKind::Developer));
        }
        info!(developer_id, "developer deleted");
        Ok(())
    }

    /// Looks a developer up by email, then checks the password against the stored hash.
    ///
    /// # Errors
    /// `NotFound` when either the email or the password does not match.
    #[instrument(skip(self, credentials))]
    pub async fn authenticate_developer(
        &self,
        credentials: DeveloperCredentials,
    ) -> HierarchyResult<Developer> {
        let email = credentials.email.trim().to_lowercase();
        self.store
            .find_developer_by_email(&email)
            .await?
            .filter(|developer| developer.verify_password(&credentials.password))
            .ok_or(HierarchyError::NotFound(EntityKind::Developer))
    }
}
