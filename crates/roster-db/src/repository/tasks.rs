//! Task operations

use chrono::Utc;

use crate::error::DbError;
use crate::models::{NewTask, Task};
use crate::utils::new_id;

use super::Database;

impl Database {
    /// Insert a new task owned by `task.user`
    pub async fn insert_task(&self, task: NewTask) -> Result<Task, DbError> {
        let now = Utc::now();
        let id = new_id();

        sqlx::query(
            r#"
            INSERT INTO tasks (id, user_id, details, done, created_at)
            VALUES (?, ?, ?, 0, ?)
            "#,
        )
        .bind(&id)
        .bind(&task.user)
        .bind(&task.details)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Task {
            id,
            user: task.user,
            details: task.details,
            done: false,
            created_at: now,
        })
    }

    /// List the tasks owned by a user, oldest first
    pub async fn list_tasks_by_user(&self, user_id: &str) -> Result<Vec<Task>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, details, done, created_at
            FROM tasks
            WHERE user_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Task::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Delete every task owned by a user, returning how many were removed
    pub async fn delete_tasks_by_user(&self, user_id: &str) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
