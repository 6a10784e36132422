use spell_core::model::{Email, Role};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, email_from_str, role_from_str, ser};
use crate::repository::{AccountRepository, CredentialRecord, StorageError};

#[async_trait::async_trait]
impl AccountRepository for SqliteRepository {
    async fn insert_credentials(&self, email: &Email, password: &str) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO credentials (email, password)
            VALUES (?1, ?2)
            ON CONFLICT(email) DO NOTHING
            ",
        )
        .bind(email.as_str())
        .bind(password)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(())
    }

    async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<CredentialRecord>, StorageError> {
        let row = sqlx::query("SELECT email, password FROM credentials WHERE email = ?1")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        row.map(|row| {
            Ok(CredentialRecord {
                email: email_from_str(&row.try_get::<String, _>("email").map_err(ser)?)?,
                password: row.try_get("password").map_err(ser)?,
            })
        })
        .transpose()
    }

    async fn set_role(&self, email: &Email, role: Role) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO user_roles (email, role)
            VALUES (?1, ?2)
            ON CONFLICT(email) DO UPDATE SET role = excluded.role
            ",
        )
        .bind(email.as_str())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn create_account(
        &self,
        email: &Email,
        password: &str,
        role: Role,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        let res = sqlx::query(
            r"
            INSERT INTO credentials (email, password)
            VALUES (?1, ?2)
            ON CONFLICT(email) DO NOTHING
            ",
        )
        .bind(email.as_str())
        .bind(password)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;
        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        sqlx::query(
            r"
            INSERT INTO user_roles (email, role)
            VALUES (?1, ?2)
            ON CONFLICT(email) DO UPDATE SET role = excluded.role
            ",
        )
        .bind(email.as_str())
        .bind(role.as_str())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;
        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn get_role(&self, email: &Email) -> Result<Option<Role>, StorageError> {
        let row = sqlx::query("SELECT role FROM user_roles WHERE email = ?1")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        row.map(|row| role_from_str(&row.try_get::<String, _>("role").map_err(ser)?))
            .transpose()
    }
}
