pub mod identity_sync;

pub use identity_sync::{sync_user_mappings, SyncReport};
