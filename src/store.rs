//! Authoritative project store boundary
//!
//! The store owns project records; the cache only ever holds transient
//! serialized snapshots of them.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Project metadata as owned by the authoritative store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: i64,
    pub name: String,
    pub owner_id: i64,
    pub creation_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

/// Filter for count/list queries. Result sets of these queries are never
/// cached.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub public: Option<bool>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// A single-project lookup argument: exactly one of the two unique indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRef {
    Id(i64),
    Name(String),
}

impl From<i64> for ProjectRef {
    fn from(id: i64) -> Self {
        ProjectRef::Id(id)
    }
}

impl From<&str> for ProjectRef {
    fn from(name: &str) -> Self {
        ProjectRef::Name(name.to_string())
    }
}

impl From<String> for ProjectRef {
    fn from(name: String) -> Self {
        ProjectRef::Name(name)
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectRef::Id(id) => write!(f, "{id}"),
            ProjectRef::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Authoritative store errors. These always reach the caller unchanged.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("project {0} not found")]
    NotFound(String),

    #[error("project name {0} already exists")]
    Conflict(String),

    /// The lookup argument resolves to neither a usable id nor a name.
    #[error("invalid project id or name: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Authoritative CRUD and query operations for projects.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Persist a new project, returning its assigned id.
    async fn create(&self, project: &Project) -> StoreResult<i64>;

    async fn count(&self, query: &Query) -> StoreResult<i64>;

    async fn list(&self, query: &Query) -> StoreResult<Vec<Project>>;

    /// Role codes the user holds on the project, directly or via groups.
    async fn list_roles(
        &self,
        project_id: i64,
        user_id: i64,
        group_ids: &[i64],
    ) -> StoreResult<Vec<i32>>;

    async fn delete(&self, id: i64) -> StoreResult<()>;

    /// Look a project up by either unique index.
    async fn get(&self, id_or_name: ProjectRef) -> StoreResult<Project>;
}
