/// User identity mapping repository
///
/// `user_mapping(uuid, model_user_id)` links an auth user to the string id
/// the factor model was trained with (`user_{n}`).
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::{IdentityStore, UserMappingStore};
use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserMapping {
    pub uuid: String,
    pub model_user_id: String,
}

pub struct UserMappingRepo {
    pool: PgPool,
}

impl UserMappingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for UserMappingRepo {
    async fn lookup(&self, uuid: Uuid) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT model_user_id
            FROM user_mapping
            WHERE uuid = $1
            LIMIT 1
            "#,
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to look up user mapping: {}", e);
            AppError::Database(e.to_string())
        })
    }
}

#[async_trait]
impl UserMappingStore for UserMappingRepo {
    async fn list_mappings(&self) -> Result<Vec<UserMapping>> {
        sqlx::query_as::<_, UserMapping>(
            r#"
            SELECT uuid::TEXT AS uuid, model_user_id
            FROM user_mapping
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to list user mappings: {}", e);
            AppError::Database(e.to_string())
        })
    }

    async fn list_auth_user_ids(&self) -> Result<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM auth.users
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to list auth users: {}", e);
            AppError::Database(e.to_string())
        })
    }

    async fn insert_mapping(&self, mapping: &UserMapping) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_mapping (uuid, model_user_id)
            VALUES ($1::UUID, $2)
            "#,
        )
        .bind(&mapping.uuid)
        .bind(&mapping.model_user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert user mapping: {}", e);
            AppError::Database(e.to_string())
        })?;

        Ok(())
    }
}
