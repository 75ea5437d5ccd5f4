//! Workflow repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::models::Workflow;
use chrono::Utc;

/// Workflow repository for managing workflow database operations
pub struct WorkflowRepository;

impl WorkflowRepository {
    /// Create a new workflow
    pub async fn create(
        pool: &DatabasePool,
        id: String,
        name: String,
        definition: String,
    ) -> Result<Workflow, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query_as::<_, Workflow>(
            "INSERT INTO workflows (id, name, definition, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
        .bind(&id)
        .bind(&name)
        .bind(&definition)
        .bind("draft")
        .bind(&now)
        .bind(&now)
        .fetch_one(pool)
        .await
    }

    /// Get a workflow by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> Result<Option<Workflow>, sqlx::Error> {
        sqlx::query_as::<_, Workflow>("SELECT * FROM workflows WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Get a workflow by name
    pub async fn find_by_name(
        pool: &DatabasePool,
        name: &str,
    ) -> Result<Option<Workflow>, sqlx::Error> {
        sqlx::query_as::<_, Workflow>("SELECT * FROM workflows WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all workflows
    pub async fn list(pool: &DatabasePool) -> Result<Vec<Workflow>, sqlx::Error> {
        sqlx::query_as::<_, Workflow>("SELECT * FROM workflows ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
    }

    /// List workflows by status
    pub async fn list_by_status(
        pool: &DatabasePool,
        status: &str,
    ) -> Result<Vec<Workflow>, sqlx::Error> {
        sqlx::query_as::<_, Workflow>(
            "SELECT * FROM workflows WHERE status = ? ORDER BY created_at DESC"
        )
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// Update workflow status
    pub async fn update_status(
        pool: &DatabasePool,
        id: &str,
        status: &str,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE workflows SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(&now)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Update workflow definition
    pub async fn update_definition(
        pool: &DatabasePool,
        id: &str,
        definition: &str,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE workflows SET definition = ?, updated_at = ? WHERE id = ?")
            .bind(definition)
            .bind(&now)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Update workflow description
    pub async fn update_description(
        pool: &DatabasePool,
        id: &str,
        description: &str,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE workflows SET description = ?, updated_at = ? WHERE id = ?")
            .bind(description)
            .bind(&now)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Delete a workflow
    pub async fn delete(pool: &DatabasePool, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM workflows WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Count total workflows
    pub async fn count(pool: &DatabasePool) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workflows")
            .fetch_one(pool)
            .await?;

        Ok(result.0)
    }

    /// Count workflows by status
    pub async fn count_by_status(
        pool: &DatabasePool,
        status: &str,
    ) -> Result<i64, sqlx::Error> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM workflows WHERE status = ?")
                .bind(status)
                .fetch_one(pool)
                .await?;

        Ok(result.0)
    }
}
