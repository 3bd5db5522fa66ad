use async_trait::async_trait;
use log::debug;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;
use yamdb_core::error::{AppError, Result};
use yamdb_core::models::{IdentityRecord, Role, User};
use yamdb_core::traits::UserRepo;

use crate::{col, db_err, uuid_col, uuid_to_blob, SqliteRepo};

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, password, \
    is_superuser, is_staff, is_active, date_joined, last_login, bio, role, confirmation_code";

fn row_to_user(row: &SqliteRow) -> Result<User> {
    let role: String = col(row, "role")?;
    Ok(User {
        identity: IdentityRecord {
            id: uuid_col(row, "id")?,
            username: col(row, "username")?,
            email: col(row, "email")?,
            first_name: col(row, "first_name")?,
            last_name: col(row, "last_name")?,
            password: col(row, "password")?,
            is_superuser: col(row, "is_superuser")?,
            is_staff: col(row, "is_staff")?,
            is_active: col(row, "is_active")?,
            date_joined: col(row, "date_joined")?,
            last_login: col(row, "last_login")?,
        },
        bio: col(row, "bio")?,
        role: role
            .parse::<Role>()
            .map_err(|e| AppError::Internal(format!("stored role is invalid: {e}")))?,
        confirmation_code: col(row, "confirmation_code")?,
    })
}

#[async_trait]
impl UserRepo for SqliteRepo {
    async fn create_user(&self, user: User) -> Result<()> {
        let identity = &user.identity;
        sqlx::query(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(uuid_to_blob(identity.id))
        .bind(&identity.username)
        .bind(&identity.email)
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(&identity.password)
        .bind(identity.is_superuser)
        .bind(identity.is_staff)
        .bind(identity.is_active)
        .bind(identity.date_joined)
        .bind(identity.last_login)
        .bind(&user.bio)
        .bind(user.role.as_str())
        .bind(&user.confirmation_code)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        debug!("created user {}", identity.username);
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY username");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(row_to_user).collect()
    }

    /// Rewrites everything except the id and `date_joined`.
    async fn update_user(&self, user: User) -> Result<()> {
        let identity = &user.identity;
        let done = sqlx::query(
            "UPDATE users SET username = ?, email = ?, first_name = ?, last_name = ?, \
             password = ?, is_superuser = ?, is_staff = ?, is_active = ?, last_login = ?, \
             bio = ?, role = ?, confirmation_code = ? WHERE id = ?",
        )
        .bind(&identity.username)
        .bind(&identity.email)
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(&identity.password)
        .bind(identity.is_superuser)
        .bind(identity.is_staff)
        .bind(identity.is_active)
        .bind(identity.last_login)
        .bind(&user.bio)
        .bind(user.role.as_str())
        .bind(&user.confirmation_code)
        .bind(uuid_to_blob(identity.id))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if done.rows_affected() == 0 {
            return Err(AppError::not_found("User", identity.id));
        }
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(done.rows_affected() > 0)
    }
}
