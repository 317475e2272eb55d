//! Cache key schema
//!
//! Key format: {resource-type}:{index-type}:{value}
//!
//! The resource-type prefix keeps entity kinds sharing one backend apart and
//! lets a prefix scan enumerate exactly one kind's entries.

use crate::error::{CacheError, CacheResult};
use crate::store::ProjectRef;

/// Resource-type prefix for project cache entries.
pub const RESOURCE_TYPE_PROJECT: &str = "project";

/// Cache key builder for one resource type.
///
/// Keys are pure functions of (resource type, index, value), so independent
/// callers agree on cache addressing without coordination.
#[derive(Debug, Clone)]
pub struct ObjectKey {
    resource_type: &'static str,
}

impl ObjectKey {
    pub fn new(resource_type: &'static str) -> Self {
        Self { resource_type }
    }

    pub fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    /// Prefix shared by every key of this resource type.
    pub fn prefix(&self) -> String {
        format!("{}:", self.resource_type)
    }

    /// Build the cache key for one index of an entity.
    ///
    /// A zero id and an empty name are rejected: neither addresses a single
    /// entity, and an empty value would collide under a prefix scan.
    pub fn format(&self, index: &ProjectRef) -> CacheResult<String> {
        match index {
            ProjectRef::Id(0) => Err(CacheError::InvalidIndex(
                "id must be non-zero".to_string(),
            )),
            ProjectRef::Id(id) => Ok(format!("{}:id:{}", self.resource_type, id)),
            ProjectRef::Name(name) if name.is_empty() => Err(CacheError::InvalidIndex(
                "name must be non-empty".to_string(),
            )),
            ProjectRef::Name(name) => Ok(format!("{}:name:{}", self.resource_type, name)),
        }
    }
}
