// crates/geoadmin-core/src/client.rs

//! # Persistence Client Set
//!
//! One client per entity kind, all speaking the same contract:
//!
//! | call                         | HTTP                                  |
//! |------------------------------|---------------------------------------|
//! | [`EntityClient::list`]       | `GET /<collection>`                   |
//! | [`EntityClient::list_by_parent`] | `GET /<collection>/by-parent/<id>` |
//! | [`EntityClient::create`]     | `POST /<collection>`                  |
//! | [`EntityClient::update`]     | `PUT /<collection>/<id>`              |
//! | [`EntityClient::delete`]     | `DELETE /<collection>/<id>`           |
//!
//! Implementations: [`http::HttpCollection`] (reqwest) and
//! [`crate::memory::MemoryApi`] (in-process, records calls).

use crate::error::{GeoAdminError, Result};
use crate::model::{City, Country, Department, Entity, EntityDraft, EntityId, EntityKind};
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(feature = "http")]
pub mod http;

#[async_trait]
pub trait EntityClient<E: Entity>: Send + Sync {
    async fn list(&self) -> Result<Vec<E>>;

    /// Records whose parent id equals `parent_id`.
    async fn list_by_parent(&self, parent_id: EntityId) -> Result<Vec<E>> {
        let _ = parent_id;
        Err(GeoAdminError::Unscoped(E::KIND))
    }

    async fn create(&self, draft: &EntityDraft) -> Result<E>;

    async fn update(&self, id: EntityId, draft: &EntityDraft) -> Result<()>;

    async fn delete(&self, id: EntityId) -> Result<()>;
}

/// The three clients, bundled so callers can dispatch by [`EntityKind`].
#[derive(Clone)]
pub struct PersistenceClients {
    pub countries: Arc<dyn EntityClient<Country>>,
    pub departments: Arc<dyn EntityClient<Department>>,
    pub cities: Arc<dyn EntityClient<City>>,
}

impl PersistenceClients {
    pub fn new(
        countries: Arc<dyn EntityClient<Country>>,
        departments: Arc<dyn EntityClient<Department>>,
        cities: Arc<dyn EntityClient<City>>,
    ) -> Self {
        Self {
            countries,
            departments,
            cities,
        }
    }

    /// Create a record of `kind` and return the id the store assigned.
    pub async fn create(&self, kind: EntityKind, draft: &EntityDraft) -> Result<EntityId> {
        match kind {
            EntityKind::Country => self.countries.create(draft).await.map(|c| c.id),
            EntityKind::Department => self.departments.create(draft).await.map(|d| d.id),
            EntityKind::City => self.cities.create(draft).await.map(|c| c.id),
        }
    }

    pub async fn update(&self, kind: EntityKind, id: EntityId, draft: &EntityDraft) -> Result<()> {
        match kind {
            EntityKind::Country => self.countries.update(id, draft).await,
            EntityKind::Department => self.departments.update(id, draft).await,
            EntityKind::City => self.cities.update(id, draft).await,
        }
    }

    pub async fn delete(&self, kind: EntityKind, id: EntityId) -> Result<()> {
        match kind {
            EntityKind::Country => self.countries.delete(id).await,
            EntityKind::Department => self.departments.delete(id).await,
            EntityKind::City => self.cities.delete(id).await,
        }
    }
}

impl std::fmt::Debug for PersistenceClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceClients").finish_non_exhaustive()
    }
}
