//! Process-wide default store handle
//!
//! Every constructor in this workspace takes an explicit store handle; the
//! global is an optional convenience for processes that share a single
//! connection. It is installed at most once and never required.

use std::sync::{Arc, OnceLock};

use crate::client::StoreClient;

static GLOBAL_STORE: OnceLock<Arc<dyn StoreClient>> = OnceLock::new();

/// Install the process-wide default store.
///
/// Only the first call wins; a later call returns the rejected handle.
pub fn set_global_store(store: Arc<dyn StoreClient>) -> Result<(), Arc<dyn StoreClient>> {
    GLOBAL_STORE.set(store)
}

/// The installed default store, if any.
pub fn global_store() -> Option<Arc<dyn StoreClient>> {
    GLOBAL_STORE.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn test_global_store_install_once() {
        assert!(global_store().is_none());

        assert!(set_global_store(Arc::new(MemoryStore::new())).is_ok());
        let store = global_store().expect("store was installed");
        store.set_if_absent("k", "v").await.unwrap();

        // Second install is rejected; the first handle stays in place
        assert!(set_global_store(Arc::new(MemoryStore::new())).is_err());
        let same = global_store().expect("store still installed");
        assert_eq!(same.get("k").await.unwrap(), Some("v".to_string()));
    }
}
