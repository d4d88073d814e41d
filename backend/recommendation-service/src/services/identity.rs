//! Identity Resolver
//!
//! Maps an external auth UUID to the `user_{n}` id the factor model was
//! trained with. A missing mapping is a data-setup gap and surfaces as
//! `NotFound`, never as a fallback.

use crate::db::{IdentityStore, UserMapping};
use crate::error::{AppError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub const MODEL_USER_PREFIX: &str = "user_";

const MAPPING_NOT_FOUND: &str = "User UUID not mapped to model_user_id";

pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, uuid: &str) -> Result<String> {
        // Malformed ids can never have a mapping row
        let parsed = match Uuid::parse_str(uuid.trim()) {
            Ok(parsed) => parsed,
            Err(_) => {
                debug!(uuid = %uuid, "Malformed user UUID");
                return Err(AppError::NotFound(MAPPING_NOT_FOUND.to_string()));
            }
        };

        match self.store.lookup(parsed).await? {
            Some(model_user_id) => Ok(model_user_id),
            None => {
                debug!(uuid = %uuid, "No model user mapping");
                Err(AppError::NotFound(MAPPING_NOT_FOUND.to_string()))
            }
        }
    }
}

pub fn model_user_id(index: u32) -> String {
    format!("{}{}", MODEL_USER_PREFIX, index)
}

/// `user_12` → 12. Ids in any other form yield `None`.
pub fn parse_model_index(model_user_id: &str) -> Option<u32> {
    model_user_id
        .strip_prefix(MODEL_USER_PREFIX)
        .and_then(|suffix| suffix.parse().ok())
}

/// Smallest non-negative index not in `used`
pub fn next_available_index(used: &HashSet<u32>) -> u32 {
    (0..).find(|idx| !used.contains(idx)).unwrap_or(u32::MAX)
}

/// Mappings to create for auth users that have none yet.
///
/// Each new user gets the lowest free `user_{n}`, filling gaps left by
/// deleted rows. Existing ids not in `user_{n}` form do not reserve an index.
pub fn plan_new_mappings(existing: &[UserMapping], auth_user_ids: &[Uuid]) -> Vec<UserMapping> {
    let mut mapped: HashSet<String> = existing
        .iter()
        .map(|mapping| mapping.uuid.to_ascii_lowercase())
        .collect();

    let mut used: HashSet<u32> = existing
        .iter()
        .filter_map(|mapping| parse_model_index(&mapping.model_user_id))
        .collect();

    let mut planned = Vec::new();
    for id in auth_user_ids {
        let uuid = id.to_string();
        if !mapped.insert(uuid.clone()) {
            continue;
        }

        let index = next_available_index(&used);
        used.insert(index);
        planned.push(UserMapping {
            uuid,
            model_user_id: model_user_id(index),
        });
    }

    planned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockIdentityStore;

    const KNOWN: &str = "6f1c2a8e-3b4d-4e5f-8a9b-0c1d2e3f4a5b";

    fn mapping(uuid: &str, model_user_id: &str) -> UserMapping {
        UserMapping {
            uuid: uuid.to_string(),
            model_user_id: model_user_id.to_string(),
        }
    }

    #[test]
    fn test_parse_model_index() {
        assert_eq!(parse_model_index("user_0"), Some(0));
        assert_eq!(parse_model_index("user_42"), Some(42));
        assert_eq!(parse_model_index("admin"), None);
        assert_eq!(parse_model_index("user_x"), None);
    }

    #[test]
    fn test_next_available_index_fills_gaps() {
        let used: HashSet<u32> = [0, 1, 3].into_iter().collect();
        assert_eq!(next_available_index(&used), 2);
        assert_eq!(next_available_index(&HashSet::new()), 0);
    }

    #[test]
    fn test_plan_skips_mapped_users_and_fills_gaps() {
        let mapped = Uuid::parse_str(KNOWN).unwrap();
        let first = Uuid::from_u128(1);
        let second = Uuid::from_u128(2);

        let existing = vec![
            mapping(KNOWN, "user_0"),
            mapping("00000000-0000-0000-0000-0000000000ff", "user_2"),
            mapping("00000000-0000-0000-0000-0000000000fe", "legacy"),
        ];

        let planned = plan_new_mappings(&existing, &[mapped, first, second, first]);

        assert_eq!(
            planned,
            vec![
                mapping(&first.to_string(), "user_1"),
                mapping(&second.to_string(), "user_3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_resolve_known_uuid() {
        let mut store = MockIdentityStore::new();
        store
            .expect_lookup()
            .returning(|_| Ok(Some("user_7".to_string())));

        let resolver = IdentityResolver::new(Arc::new(store));
        assert_eq!(resolver.resolve(KNOWN).await.unwrap(), "user_7");
    }

    #[tokio::test]
    async fn test_resolve_is_case_insensitive() {
        let expected = Uuid::parse_str(KNOWN).unwrap();
        let mut store = MockIdentityStore::new();
        store
            .expect_lookup()
            .withf(move |uuid: &Uuid| *uuid == expected)
            .times(2)
            .returning(|_| Ok(Some("user_7".to_string())));

        let resolver = IdentityResolver::new(Arc::new(store));
        assert_eq!(
            resolver.resolve(&KNOWN.to_uppercase()).await.unwrap(),
            "user_7"
        );
        assert_eq!(
            resolver.resolve("6F1c2A8e-3b4D-4e5F-8a9B-0c1D2e3F4a5B").await.unwrap(),
            "user_7"
        );
    }

    #[tokio::test]
    async fn test_missing_mapping_is_not_found() {
        let mut store = MockIdentityStore::new();
        store.expect_lookup().returning(|_| Ok(None));

        let resolver = IdentityResolver::new(Arc::new(store));
        assert!(matches!(
            resolver.resolve(KNOWN).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_uuid_skips_lookup() {
        let mut store = MockIdentityStore::new();
        store.expect_lookup().never();

        let resolver = IdentityResolver::new(Arc::new(store));
        assert!(matches!(
            resolver.resolve("not-a-uuid").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockIdentityStore::new();
        store
            .expect_lookup()
            .returning(|_| Err(AppError::Database("timeout".to_string())));

        let resolver = IdentityResolver::new(Arc::new(store));
        assert!(matches!(
            resolver.resolve(KNOWN).await,
            Err(AppError::Database(_))
        ));
    }
}
