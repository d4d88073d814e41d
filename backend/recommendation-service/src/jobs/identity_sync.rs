//! Identity Sync Job
//!
//! Gives every auth user without a `user_mapping` row a model user id.
//! New ids take the lowest free `user_{n}` index, so gaps left by deleted
//! rows are reused. Run once via the `sync-user-mapping` binary.

use crate::db::UserMappingStore;
use crate::error::Result;
use crate::services::plan_new_mappings;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub auth_users: usize,
    pub existing_mappings: usize,
    pub created: usize,
}

pub async fn sync_user_mappings(store: &dyn UserMappingStore) -> Result<SyncReport> {
    let started = Instant::now();

    let existing = store.list_mappings().await?;
    let auth_users = store.list_auth_user_ids().await?;
    let planned = plan_new_mappings(&existing, &auth_users);

    for mapping in &planned {
        store.insert_mapping(mapping).await?;
        tracing::debug!(
            uuid = %mapping.uuid,
            model_user_id = %mapping.model_user_id,
            "Created user mapping"
        );
    }

    let report = SyncReport {
        auth_users: auth_users.len(),
        existing_mappings: existing.len(),
        created: planned.len(),
    };

    tracing::info!(
        auth_users = report.auth_users,
        existing_mappings = report.existing_mappings,
        created = report.created,
        duration_ms = started.elapsed().as_millis() as u64,
        "User mapping sync completed"
    );

    Ok(report)
}
