//! Storage collaborators
//!
//! Services depend on these traits only; the PostgreSQL repositories below
//! are wired in by `main` and the sync job.

pub mod booking_repo;
pub mod hotel_repo;
pub mod user_mapping_repo;

pub use booking_repo::BookingRepo;
pub use hotel_repo::HotelRepo;
pub use user_mapping_repo::{UserMapping, UserMappingRepo};

use crate::error::Result;
use crate::models::HotelRecord;
use async_trait::async_trait;
use uuid::Uuid;

/// Source of the full hotel catalog, read once per snapshot build
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HotelSource: Send + Sync {
    /// Every usable hotel record, ordered by hotel id
    async fn fetch_all_hotels(&self) -> Result<Vec<HotelRecord>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Hotel ids the user has booked; duplicates allowed
    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<i64>>;
}

/// External UUID → model user id lookup
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn lookup(&self, uuid: Uuid) -> Result<Option<String>>;
}

/// Queries used by the identity sync job
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserMappingStore: Send + Sync {
    async fn list_mappings(&self) -> Result<Vec<UserMapping>>;

    async fn list_auth_user_ids(&self) -> Result<Vec<Uuid>>;

    async fn insert_mapping(&self, mapping: &UserMapping) -> Result<()>;
}
