//! Collection store port.

use fortiprov_types::error::StoreError;
use serde_json::Value;

/// Loads and replaces the collection document.
///
/// `load` returns the raw document so callers that only pass it through keep
/// every field. `save` replaces the whole document; readers never observe a
/// partially written file.
pub trait CollectionStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<Value, StoreError>> + Send;

    fn save(
        &self,
        document: &Value,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
