//! Cache error types

use std::fmt;

use thiserror::Error;

/// Errors produced by the cache side of the manager.
///
/// Only the administrative operations surface these to callers; on the
/// read-through and invalidation paths they are logged and absorbed.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key not present in the cache backend.
    #[error("Cache miss")]
    Miss,

    /// Key-builder input that would produce a colliding or empty key.
    #[error("Invalid cache index: {0}")]
    InvalidIndex(String),

    /// Combined per-key failures from a flush.
    #[error("{0}")]
    Aggregate(ErrorList),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Ordered collection of individual errors. Empty means success.
#[derive(Debug, Default)]
pub struct ErrorList(Vec<CacheError>);

impl ErrorList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, err: CacheError) {
        self.0.push(err);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[CacheError] {
        &self.0
    }

    /// `Ok` when nothing was collected, otherwise the aggregate error.
    pub fn into_result(self) -> CacheResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(CacheError::Aggregate(self))
        }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "no errors");
        }

        let joined = self
            .0
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{} error(s): {}", self.0.len(), joined)
    }
}
