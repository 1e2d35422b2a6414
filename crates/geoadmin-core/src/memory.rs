// crates/geoadmin-core/src/memory.rs

//! In-process persistence API.
//!
//! Behaves like the remote store (ids assigned on create, deletes do not
//! cascade server-side) and keeps a log of every call in issue order. Calls can
//! be armed to fail, which is how cascade and update failure paths are driven
//! in tests and demos.

use crate::client::{EntityClient, PersistenceClients};
use crate::error::{GeoAdminError, Result};
use crate::model::{City, Country, Department, Entity, EntityDraft, EntityId, EntityKind};
use async_trait::async_trait;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One recorded call against the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RemoteCall {
    List(EntityKind),
    ListByParent(EntityKind, EntityId),
    Create(EntityKind, String),
    Update(EntityKind, EntityId, String),
    Delete(EntityKind, EntityId),
}

impl RemoteCall {
    pub fn kind(&self) -> EntityKind {
        match self {
            RemoteCall::List(k)
            | RemoteCall::ListByParent(k, _)
            | RemoteCall::Create(k, _)
            | RemoteCall::Update(k, _, _)
            | RemoteCall::Delete(k, _) => *k,
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, RemoteCall::List(_) | RemoteCall::ListByParent(..))
    }
}

#[derive(Debug, Clone)]
struct StoredRecord {
    id: EntityId,
    name: String,
    parent_id: Option<EntityId>,
}

#[derive(Debug, Default)]
struct Table {
    next_id: EntityId,
    records: Vec<StoredRecord>,
}

impl Table {
    fn insert(&mut self, name: String, parent_id: Option<EntityId>) -> StoredRecord {
        self.next_id += 1;
        let record = StoredRecord {
            id: self.next_id,
            name,
            parent_id,
        };
        self.records.push(record.clone());
        record
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    countries: Table,
    departments: Table,
    cities: Table,
    calls: Vec<RemoteCall>,
    armed_failures: HashSet<RemoteCall>,
    fail_kinds: HashSet<EntityKind>,
}

impl MemoryState {
    fn table(&mut self, kind: EntityKind) -> &mut Table {
        match kind {
            EntityKind::Country => &mut self.countries,
            EntityKind::Department => &mut self.departments,
            EntityKind::City => &mut self.cities,
        }
    }

    /// Log the call, then decide whether it should fail.
    fn record(&mut self, call: RemoteCall) -> Result<()> {
        self.calls.push(call.clone());
        if self.fail_kinds.contains(&call.kind()) || self.armed_failures.contains(&call) {
            return Err(GeoAdminError::Rejected(format!("{call:?}")));
        }
        Ok(())
    }
}

/// Shared handle; clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryApi {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persistence clients backed by this store.
    pub fn clients(&self) -> PersistenceClients {
        PersistenceClients::new(
            Arc::new(MemoryCollection::<Country>::new(self.clone())),
            Arc::new(MemoryCollection::<Department>::new(self.clone())),
            Arc::new(MemoryCollection::<City>::new(self.clone())),
        )
    }

    // --- Seeding (not recorded) ---

    pub fn seed_country(&self, name: &str) -> EntityId {
        self.lock().countries.insert(name.to_owned(), None).id
    }

    pub fn seed_department(&self, name: &str, country_id: EntityId) -> EntityId {
        self.lock()
            .departments
            .insert(name.to_owned(), Some(country_id))
            .id
    }

    pub fn seed_city(&self, name: &str, department_id: EntityId) -> EntityId {
        self.lock()
            .cities
            .insert(name.to_owned(), Some(department_id))
            .id
    }

    // --- Inspection ---

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.lock().calls.clone()
    }

    /// Calls that change data, in issue order.
    pub fn mutations(&self) -> Vec<RemoteCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.lock().table(kind).records.len()
    }

    pub fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        self.lock().table(kind).records.iter().any(|r| r.id == id)
    }

    // --- Failure injection ---

    /// Make exactly this call fail (it is still recorded).
    pub fn fail_on(&self, call: RemoteCall) {
        self.lock().armed_failures.insert(call);
    }

    /// Make every call touching `kind` fail.
    pub fn fail_all(&self, kind: EntityKind) {
        self.lock().fail_kinds.insert(kind);
    }

    pub fn heal(&self) {
        let mut state = self.lock();
        state.armed_failures.clear();
        state.fail_kinds.clear();
    }
}

struct MemoryCollection<E> {
    api: MemoryApi,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> MemoryCollection<E> {
    fn new(api: MemoryApi) -> Self {
        Self {
            api,
            _entity: PhantomData,
        }
    }
}

fn to_entity<E: Entity>(record: &StoredRecord) -> E {
    E::from_parts(record.id, record.name.clone(), record.parent_id)
}

#[async_trait]
impl<E: Entity> EntityClient<E> for MemoryCollection<E> {
    async fn list(&self) -> Result<Vec<E>> {
        let mut state = self.api.lock();
        state.record(RemoteCall::List(E::KIND))?;
        Ok(state.table(E::KIND).records.iter().map(to_entity).collect())
    }

    async fn list_by_parent(&self, parent_id: EntityId) -> Result<Vec<E>> {
        if E::KIND.parent().is_none() {
            return Err(GeoAdminError::Unscoped(E::KIND));
        }
        let mut state = self.api.lock();
        state.record(RemoteCall::ListByParent(E::KIND, parent_id))?;
        Ok(state
            .table(E::KIND)
            .records
            .iter()
            .filter(|r| r.parent_id == Some(parent_id))
            .map(to_entity)
            .collect())
    }

    async fn create(&self, draft: &EntityDraft) -> Result<E> {
        let mut state = self.api.lock();
        state.record(RemoteCall::Create(E::KIND, draft.name.clone()))?;
        let parent = E::KIND.parent().and(draft.parent_id);
        let record = state.table(E::KIND).insert(draft.name.clone(), parent);
        Ok(to_entity(&record))
    }

    async fn update(&self, id: EntityId, draft: &EntityDraft) -> Result<()> {
        let mut state = self.api.lock();
        state.record(RemoteCall::Update(E::KIND, id, draft.name.clone()))?;
        let record = state
            .table(E::KIND)
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(GeoAdminError::NotFound { kind: E::KIND, id })?;
        record.name = draft.name.clone();
        if E::KIND.parent().is_some() && draft.parent_id.is_some() {
            record.parent_id = draft.parent_id;
        }
        Ok(())
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        let mut state = self.api.lock();
        state.record(RemoteCall::Delete(E::KIND, id))?;
        let table = state.table(E::KIND);
        let before = table.records.len();
        table.records.retain(|r| r.id != id);
        if table.records.len() == before {
            return Err(GeoAdminError::NotFound { kind: E::KIND, id });
        }
        Ok(())
    }
}
