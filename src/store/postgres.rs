//! Postgres-backed store.
//!
//! Queries are built at runtime so the crate compiles without a live
//! database. Derived membership (`Api::resources`, `Resource::operations`) and
//! ordered reference lists are aggregated in the same statement that reads the
//! parent row. Cascades are enforced by `ON DELETE CASCADE` in `sql/schema.sql`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    Connection, PgPool, Postgres, Row, Transaction,
};
use std::{collections::BTreeSet, time::Duration};
use tracing::{debug, info, info_span, Instrument};

use super::{Store, StoreError, StoreResult};
use crate::{
    model::{
        Api, Developer, EntityKind, Environment, HttpMethod, Operation, Plan, Resource, Status,
    },
    pagination::{Page, PageBounds},
};

const SCHEMA: &str = include_str!("../../sql/schema.sql");

const API_COLUMNS: &str = r"
    a.id, a.name, a.version, a.description, a.base_path, a.cors, a.status, a.creation_date,
    COALESCE(
        (SELECT array_agg(ae.environment_id ORDER BY ae.position)
           FROM api_environments ae WHERE ae.api_id = a.id),
        '{}'
    ) AS environments,
    COALESCE(
        (SELECT array_agg(ap.plan_id ORDER BY ap.position)
           FROM api_plans ap WHERE ap.api_id = a.id),
        '{}'
    ) AS plans,
    COALESCE(
        (SELECT array_agg(r.id ORDER BY r.seq) FROM resources r WHERE r.api_id = a.id),
        '{}'
    ) AS resources
";

const RESOURCE_COLUMNS: &str = r"
    r.id, r.api_id, r.name, r.description,
    COALESCE(
        (SELECT array_agg(o.id ORDER BY o.seq) FROM operations o WHERE o.resource_id = r.id),
        '{}'
    ) AS operations
";

const OPERATION_COLUMNS: &str = "o.id, o.resource_id, o.api_id, o.method, o.path, o.description";

const ENVIRONMENT_COLUMNS: &str =
    "id, name, description, inbound_url, outbound_url, status, creation_date";

const PLAN_COLUMNS: &str = "id, name, description, is_default, status, creation_date";

const DEVELOPER_COLUMNS: &str = "id, name, email, password_hash, status, creation_date";

/// Store backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool for `dsn`.
    ///
    /// # Errors
    /// Returns an error if the database is unreachable.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        Ok(Self::new(pool))
    }

    /// Applies `sql/schema.sql`.
    ///
    /// # Errors
    /// Returns an error if any schema statement fails.
    pub async fn migrate(&self) -> Result<()> {
        for statement in split_sql_statements(SCHEMA) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to apply schema statement: {statement}"))?;
        }
        info!("Database schema applied");
        Ok(())
    }

    async fn write_api_references(
        tx: &mut Transaction<'_, Postgres>,
        api: &Api,
    ) -> StoreResult<()> {
        sqlx::query("DELETE FROM api_environments WHERE api_id = $1")
            .bind(&api.id)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM api_plans WHERE api_id = $1")
            .bind(&api.id)
            .execute(&mut **tx)
            .await?;

        for (position, environment_id) in (0_i32..).zip(&api.environments) {
            sqlx::query(
                "INSERT INTO api_environments (api_id, environment_id, position) VALUES ($1, $2, $3)",
            )
            .bind(&api.id)
            .bind(environment_id)
            .bind(position)
            .execute(&mut **tx)
            .await
            .map_err(constraint_error)?;
        }
        for (position, plan_id) in (0_i32..).zip(&api.plans) {
            sqlx::query("INSERT INTO api_plans (api_id, plan_id, position) VALUES ($1, $2, $3)")
                .bind(&api.id)
                .bind(plan_id)
                .bind(position)
                .execute(&mut **tx)
                .await
                .map_err(constraint_error)?;
        }
        Ok(())
    }
}

/// Splits a schema file into executable statements on trailing semicolons.
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|code| code.to_string()),
        _ => None,
    }
}

fn constraint_name(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

/// Maps unique (`23505`) and foreign-key (`23503`) violations to `Conflict`,
/// except a vanished parent api or resource, which is `MissingParent`.
fn constraint_error(err: sqlx::Error) -> StoreError {
    let message = match (sqlstate(&err).as_deref(), constraint_name(&err)) {
        (Some("23503"), Some("operations_resource_fkey")) => {
            return StoreError::MissingParent(EntityKind::Resource)
        }
        (Some("23503"), Some(name)) if name.ends_with("_api_id_fkey") => {
            return StoreError::MissingParent(EntityKind::Api)
        }
        (Some("23505"), Some("resources_api_name_key")) => {
            "Resource name already exists for this api."
        }
        (Some("23505"), Some("operations_api_route_key")) => {
            "Operation method and path already exist for this api."
        }
        (Some("23505"), Some("developers_email_key")) => "Developer email already exists.",
        (Some("23505"), _) => "Entity already exists.",
        (Some("23503"), Some(name)) if name.starts_with("api_environments") => {
            "Environment is referenced by an api or does not exist."
        }
        (Some("23503"), Some(name)) if name.starts_with("api_plans") => {
            "Plan is referenced by an api or does not exist."
        }
        (Some("23503"), _) => "Referenced entity does not exist.",
        _ => return StoreError::Database(err),
    };
    StoreError::Conflict(message.to_string())
}

fn decode_error(err: crate::model::ValidationError) -> StoreError {
    StoreError::Database(sqlx::Error::Decode(Box::new(err)))
}

fn status_column(row: &PgRow) -> StoreResult<Status> {
    let status: String = row.try_get("status")?;
    status.parse().map_err(decode_error)
}

fn api_from_row(row: &PgRow) -> StoreResult<Api> {
    let resources: Vec<String> = row.try_get("resources")?;
    Ok(Api {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        version: row.try_get("version")?,
        description: row.try_get("description")?,
        base_path: row.try_get("base_path")?,
        cors: row.try_get("cors")?,
        creation_date: row.try_get("creation_date")?,
        status: status_column(row)?,
        environments: row.try_get("environments")?,
        plans: row.try_get("plans")?,
        resources: resources.into_iter().collect(),
    })
}

fn resource_from_row(row: &PgRow) -> StoreResult<Resource> {
    let operations: Vec<String> = row.try_get("operations")?;
    Ok(Resource {
        id: row.try_get("id")?,
        api_id: row.try_get("api_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        operations: operations.into_iter().collect::<BTreeSet<_>>(),
    })
}

fn operation_from_row(row: &PgRow) -> StoreResult<Operation> {
    let method: String = row.try_get("method")?;
    Ok(Operation {
        id: row.try_get("id")?,
        resource_id: row.try_get("resource_id")?,
        api_id: row.try_get("api_id")?,
        method: method.parse::<HttpMethod>().map_err(decode_error)?,
        path: row.try_get("path")?,
        description: row.try_get("description")?,
    })
}

fn environment_from_row(row: &PgRow) -> StoreResult<Environment> {
    Ok(Environment {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        inbound_url: row.try_get("inbound_url")?,
        outbound_url: row.try_get("outbound_url")?,
        status: status_column(row)?,
        creation_date: row.try_get("creation_date")?,
    })
}

fn plan_from_row(row: &PgRow) -> StoreResult<Plan> {
    Ok(Plan {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        is_default: row.try_get("is_default")?,
        status: status_column(row)?,
        creation_date: row.try_get("creation_date")?,
    })
}

fn developer_from_row(row: &PgRow) -> StoreResult<Developer> {
    Ok(Developer {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        status: status_column(row)?,
        creation_date: row.try_get("creation_date")?,
    })
}

fn sql_offset(bounds: PageBounds) -> (i64, i64) {
    let limit = i64::try_from(bounds.limit()).unwrap_or(i64::MAX);
    let offset = i64::try_from(bounds.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

fn sql_count(total: i64) -> u64 {
    u64::try_from(total).unwrap_or(0)
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping()
            .instrument(ping_span)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }

    async fn insert_api(&self, api: &Api) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r"
            INSERT INTO apis (id, name, version, description, base_path, cors, status, creation_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&api.id)
        .bind(&api.name)
        .bind(&api.version)
        .bind(&api.description)
        .bind(&api.base_path)
        .bind(api.cors)
        .bind(api.status.as_str())
        .bind(api.creation_date)
        .execute(&mut *tx)
        .await
        .map_err(constraint_error)?;
        Self::write_api_references(&mut tx, api).await?;
        tx.commit().await?;
        debug!(api_id = %api.id, "api inserted");
        Ok(())
    }

    async fn update_api(&self, api: &Api) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r"
            UPDATE apis
               SET name = $2, version = $3, description = $4, base_path = $5, cors = $6, status = $7
             WHERE id = $1
            ",
        )
        .bind(&api.id)
        .bind(&api.name)
        .bind(&api.version)
        .bind(&api.description)
        .bind(&api.base_path)
        .bind(api.cors)
        .bind(api.status.as_str())
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }
        Self::write_api_references(&mut tx, api).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn find_api(&self, id: &str) -> StoreResult<Option<Api>> {
        let query = format!("SELECT {API_COLUMNS} FROM apis a WHERE a.id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(api_from_row).transpose()
    }

    async fn list_apis(&self) -> StoreResult<Vec<Api>> {
        let query = format!("SELECT {API_COLUMNS} FROM apis a ORDER BY a.seq");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(api_from_row).collect()
    }

    async fn find_apis_by_base_path(&self, base_path: &str) -> StoreResult<Vec<Api>> {
        let query = format!("SELECT {API_COLUMNS} FROM apis a WHERE a.base_path = $1 ORDER BY a.seq");
        let rows = sqlx::query(&query)
            .bind(base_path)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(api_from_row).collect()
    }

    async fn delete_api(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM apis WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_resource(&self, resource: &Resource) -> StoreResult<()> {
        sqlx::query("INSERT INTO resources (id, api_id, name, description) VALUES ($1, $2, $3, $4)")
            .bind(&resource.id)
            .bind(&resource.api_id)
            .bind(&resource.name)
            .bind(&resource.description)
            .execute(&self.pool)
            .await
            .map_err(constraint_error)?;
        Ok(())
    }

    async fn update_resource(&self, resource: &Resource) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE resources SET name = $2, description = $3 WHERE id = $1")
            .bind(&resource.id)
            .bind(&resource.name)
            .bind(&resource.description)
            .execute(&self.pool)
            .await
            .map_err(constraint_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_resource(&self, id: &str) -> StoreResult<Option<Resource>> {
        let query = format!("SELECT {RESOURCE_COLUMNS} FROM resources r WHERE r.id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(resource_from_row).transpose()
    }

    async fn list_resources(&self, api_id: &str) -> StoreResult<Vec<Resource>> {
        let query =
            format!("SELECT {RESOURCE_COLUMNS} FROM resources r WHERE r.api_id = $1 ORDER BY r.seq");
        let rows = sqlx::query(&query)
            .bind(api_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(resource_from_row).collect()
    }

    async fn delete_resource(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn page_resources(&self, api_id: &str, bounds: PageBounds) -> StoreResult<Page<Resource>> {
        let (limit, offset) = sql_offset(bounds);
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resources WHERE api_id = $1")
            .bind(api_id)
            .fetch_one(&self.pool)
            .await?;
        let query = format!(
            "SELECT {RESOURCE_COLUMNS} FROM resources r WHERE r.api_id = $1 ORDER BY r.seq LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&query)
            .bind(api_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        let content = rows
            .iter()
            .map(resource_from_row)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Page::from_parts(content, sql_count(total), bounds))
    }

    async fn insert_operation(&self, operation: &Operation) -> StoreResult<()> {
        sqlx::query(
            r"
            INSERT INTO operations (id, api_id, resource_id, method, path, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&operation.id)
        .bind(&operation.api_id)
        .bind(&operation.resource_id)
        .bind(operation.method.as_str())
        .bind(&operation.path)
        .bind(&operation.description)
        .execute(&self.pool)
        .await
        .map_err(constraint_error)?;
        Ok(())
    }

    async fn update_operation(&self, operation: &Operation) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE operations SET method = $2, path = $3, description = $4 WHERE id = $1",
        )
        .bind(&operation.id)
        .bind(operation.method.as_str())
        .bind(&operation.path)
        .bind(&operation.description)
        .execute(&self.pool)
        .await
        .map_err(constraint_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_operation(&self, id: &str) -> StoreResult<Option<Operation>> {
        let query = format!("SELECT {OPERATION_COLUMNS} FROM operations o WHERE o.id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(operation_from_row).transpose()
    }

    async fn list_operations(&self, resource_id: &str) -> StoreResult<Vec<Operation>> {
        let query = format!(
            "SELECT {OPERATION_COLUMNS} FROM operations o WHERE o.resource_id = $1 ORDER BY o.seq"
        );
        let rows = sqlx::query(&query)
            .bind(resource_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(operation_from_row).collect()
    }

    async fn list_operations_by_api(&self, api_id: &str) -> StoreResult<Vec<Operation>> {
        let query = format!(
            r"
            SELECT {OPERATION_COLUMNS}
              FROM operations o
              JOIN resources r ON r.id = o.resource_id
             WHERE o.api_id = $1
             ORDER BY r.seq, o.seq
            "
        );
        let rows = sqlx::query(&query)
            .bind(api_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(operation_from_row).collect()
    }

    async fn delete_operation(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM operations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn page_operations(
        &self,
        resource_id: &str,
        bounds: PageBounds,
    ) -> StoreResult<Page<Operation>> {
        let (limit, offset) = sql_offset(bounds);
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM operations WHERE resource_id = $1")
            .bind(resource_id)
            .fetch_one(&self.pool)
            .await?;
        let query = format!(
            "SELECT {OPERATION_COLUMNS} FROM operations o WHERE o.resource_id = $1 ORDER BY o.seq LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&query)
            .bind(resource_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        let content = rows
            .iter()
            .map(operation_from_row)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Page::from_parts(content, sql_count(total), bounds))
    }

    async fn insert_environment(&self, environment: &Environment) -> StoreResult<()> {
        sqlx::query(
            r"
            INSERT INTO environments (id, name, description, inbound_url, outbound_url, status, creation_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&environment.id)
        .bind(&environment.name)
        .bind(&environment.description)
        .bind(&environment.inbound_url)
        .bind(&environment.outbound_url)
        .bind(environment.status.as_str())
        .bind(environment.creation_date)
        .execute(&self.pool)
        .await
        .map_err(constraint_error)?;
        Ok(())
    }

    async fn update_environment(&self, environment: &Environment) -> StoreResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE environments
               SET name = $2, description = $3, inbound_url = $4, outbound_url = $5, status = $6
             WHERE id = $1
            ",
        )
        .bind(&environment.id)
        .bind(&environment.name)
        .bind(&environment.description)
        .bind(&environment.inbound_url)
        .bind(&environment.outbound_url)
        .bind(environment.status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_environment(&self, id: &str) -> StoreResult<Option<Environment>> {
        let query = format!("SELECT {ENVIRONMENT_COLUMNS} FROM environments WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(environment_from_row).transpose()
    }

    async fn list_environments(&self) -> StoreResult<Vec<Environment>> {
        let query = format!("SELECT {ENVIRONMENT_COLUMNS} FROM environments ORDER BY seq");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(environment_from_row).collect()
    }

    async fn delete_environment(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM environments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(constraint_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_plan(&self, plan: &Plan) -> StoreResult<()> {
        sqlx::query(
            r"
            INSERT INTO plans (id, name, description, is_default, status, creation_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&plan.id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.is_default)
        .bind(plan.status.as_str())
        .bind(plan.creation_date)
        .execute(&self.pool)
        .await
        .map_err(constraint_error)?;
        Ok(())
    }

    async fn find_plan(&self, id: &str) -> StoreResult<Option<Plan>> {
        let query = format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(plan_from_row).transpose()
    }

    async fn list_plans(&self) -> StoreResult<Vec<Plan>> {
        let query = format!("SELECT {PLAN_COLUMNS} FROM plans ORDER BY seq");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(plan_from_row).collect()
    }

    async fn delete_plan(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(constraint_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_developer(&self, developer: &Developer) -> StoreResult<()> {
        sqlx::query(
            r"
            INSERT INTO developers (id, name, email, password_hash, status, creation_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&developer.id)
        .bind(&developer.name)
        .bind(&developer.email)
        .bind(&developer.password_hash)
        .bind(developer.status.as_str())
        .bind(developer.creation_date)
        .execute(&self.pool)
        .await
        .map_err(constraint_error)?;
        Ok(())
    }

    async fn find_developer(&self, id: &str) -> StoreResult<Option<Developer>> {
        let query = format!("SELECT {DEVELOPER_COLUMNS} FROM developers WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(developer_from_row).transpose()
    }

    async fn find_developer_by_email(&self, email: &str) -> StoreResult<Option<Developer>> {
        let query = format!("SELECT {DEVELOPER_COLUMNS} FROM developers WHERE email = $1");
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(developer_from_row).transpose()
    }

    async fn list_developers(&self) -> StoreResult<Vec<Developer>> {
        let query = format!("SELECT {DEVELOPER_COLUMNS} FROM developers ORDER BY seq");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(developer_from_row).collect()
    }

    async fn delete_developer(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM developers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
