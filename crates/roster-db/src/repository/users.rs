//! User operations

use chrono::Utc;

use crate::error::DbError;
use crate::models::{NewUser, UpdateUser, User};
use crate::repository::Database;
use crate::utils::new_id;

/// Users joined with the ids of the tasks they own
const SELECT_USERS: &str = r#"
    SELECT u.id, u.email, u.password_hash, u.role, u.created_at, u.updated_at,
           GROUP_CONCAT(t.id) AS task_ids
    FROM users u
    LEFT JOIN tasks t ON t.user_id = u.id
"#;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// Fails with `DbError::Duplicate` when the email is already taken.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();
        let id = new_id();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, format!("User '{}' already exists", user.email)))?;

        Ok(User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let query = format!("{SELECT_USERS} WHERE u.email = ? GROUP BY u.id");
        let result = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, DbError> {
        let query = format!("{SELECT_USERS} WHERE u.id = ? GROUP BY u.id");
        let result = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let query = format!("{SELECT_USERS} GROUP BY u.id ORDER BY u.created_at, u.email");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update to a user
    ///
    /// Returns `None` when no user has the given id.
    pub async fn update_user(&self, id: &str, update: UpdateUser) -> Result<Option<User>, DbError> {
        let now = Utc::now();
        let conflict = format!(
            "User '{}' already exists",
            update.email.as_deref().unwrap_or_default()
        );

        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = COALESCE(?, email),
                password_hash = COALESCE(?, password_hash),
                role = COALESCE(?, role),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(update.email.as_deref())
        .bind(update.password_hash.as_deref())
        .bind(update.role.map(|r| r.as_str()))
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, conflict))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_user_by_id(id).await
    }

    /// Delete a user
    ///
    /// Tasks owned by the user are left untouched; see `delete_tasks_by_user`.
    pub async fn delete_user(&self, id: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTask, UserRole};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = Database::in_memory().await.unwrap();
        let user = db.insert_user(new_user("a@b.com")).await.unwrap();

        let by_email = db.get_user_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.role, UserRole::User);
        assert!(by_email.tasks.is_empty());

        let by_id = db.get_user_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@b.com");
        assert!(db.get_user_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::in_memory().await.unwrap();
        db.insert_user(new_user("a@b.com")).await.unwrap();

        let err = db.insert_user(new_user("a@b.com")).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_user_lists_owned_task_ids() {
        let db = Database::in_memory().await.unwrap();
        let user = db.insert_user(new_user("a@b.com")).await.unwrap();
        let task = db
            .insert_task(NewTask {
                user: user.id.clone(),
                details: "write report".to_string(),
            })
            .await
            .unwrap();

        let loaded = db.get_user_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(loaded.tasks, vec![task.id]);
    }

    #[tokio::test]
    async fn test_update_user() {
        let db = Database::in_memory().await.unwrap();
        let user = db.insert_user(new_user("a@b.com")).await.unwrap();
        db.insert_user(new_user("taken@b.com")).await.unwrap();

        let updated = db
            .update_user(
                &user.id,
                UpdateUser {
                    role: Some(UserRole::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, UserRole::Admin);
        assert_eq!(updated.email, "a@b.com");

        let conflict = db
            .update_user(
                &user.id,
                UpdateUser {
                    email: Some("taken@b.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(conflict, DbError::Duplicate(_)));

        let rehashed = db
            .update_user(
                &user.id,
                UpdateUser {
                    password_hash: Some("new-hash".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rehashed.password_hash, "new-hash");
        assert_eq!(rehashed.role, UserRole::Admin);

        let missing = db.update_user("missing", UpdateUser::default()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let db = Database::in_memory().await.unwrap();
        let user = db.insert_user(new_user("a@b.com")).await.unwrap();
        db.insert_user(new_user("c@d.com")).await.unwrap();

        assert!(db.delete_user(&user.id).await.unwrap());
        assert!(!db.delete_user(&user.id).await.unwrap());

        let remaining = db.list_users().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].email, "c@d.com");
    }
}
