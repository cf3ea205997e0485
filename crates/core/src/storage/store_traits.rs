use crate::errors::Result;

/// Client-local key/value storage for small serialized blobs.
///
/// Blobs are opaque strings; versioning lives one layer up in
/// [`super::versioned`].
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}
