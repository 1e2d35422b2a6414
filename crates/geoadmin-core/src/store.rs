// crates/geoadmin-core/src/store.rs

//! # Hierarchy Store
//!
//! In-memory copy of the three collections. A full [`HierarchyStore::refresh`]
//! replaces all three together or nothing at all, so readers never see a mix
//! of old and new collections.

use crate::client::PersistenceClients;
use crate::error::Result;
use crate::model::{City, Country, Department, EntityId, EntityKind};
use serde::Serialize;
use tracing::{debug, info};

/// The three collections as last loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HierarchySnapshot {
    pub countries: Vec<Country>,
    pub departments: Vec<Department>,
    pub cities: Vec<City>,
}

impl HierarchySnapshot {
    pub fn new(countries: Vec<Country>, departments: Vec<Department>, cities: Vec<City>) -> Self {
        Self {
            countries,
            departments,
            cities,
        }
    }

    pub fn country(&self, id: EntityId) -> Option<&Country> {
        self.countries.iter().find(|c| c.id == id)
    }

    pub fn department(&self, id: EntityId) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub fn city(&self, id: EntityId) -> Option<&City> {
        self.cities.iter().find(|c| c.id == id)
    }

    /// Current name of the record, if loaded.
    pub fn name_of(&self, kind: EntityKind, id: EntityId) -> Option<&str> {
        match kind {
            EntityKind::Country => self.country(id).map(|c| c.name.as_str()),
            EntityKind::Department => self.department(id).map(|d| d.name.as_str()),
            EntityKind::City => self.city(id).map(|c| c.name.as_str()),
        }
    }

    /// Parent id of the record, if loaded and not a country.
    pub fn parent_of(&self, kind: EntityKind, id: EntityId) -> Option<EntityId> {
        match kind {
            EntityKind::Country => None,
            EntityKind::Department => self.department(id).map(|d| d.country_id),
            EntityKind::City => self.city(id).map(|c| c.department_id),
        }
    }

    pub fn departments_in(&self, country_id: EntityId) -> impl Iterator<Item = &Department> {
        self.departments
            .iter()
            .filter(move |d| d.country_id == country_id)
    }

    pub fn cities_in(&self, department_id: EntityId) -> impl Iterator<Item = &City> {
        self.cities
            .iter()
            .filter(move |c| c.department_id == department_id)
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (self.countries.len(), self.departments.len(), self.cities.len())
    }
}

#[derive(Debug)]
pub struct HierarchyStore {
    clients: PersistenceClients,
    snapshot: HierarchySnapshot,
    generation: u64,
}

impl HierarchyStore {
    pub fn new(clients: PersistenceClients) -> Self {
        Self {
            clients,
            snapshot: HierarchySnapshot::default(),
            generation: 0,
        }
    }

    pub fn clients(&self) -> &PersistenceClients {
        &self.clients
    }

    pub fn snapshot(&self) -> &HierarchySnapshot {
        &self.snapshot
    }

    /// Number of successful full refreshes so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Load all three collections concurrently and swap them in together.
    ///
    /// On any failure the previous snapshot is kept untouched.
    pub async fn refresh(&mut self) -> Result<()> {
        let (countries, departments, cities) = futures::try_join!(
            self.clients.countries.list(),
            self.clients.departments.list(),
            self.clients.cities.list(),
        )?;
        self.snapshot = HierarchySnapshot::new(countries, departments, cities);
        self.generation += 1;
        let (c, d, ci) = self.snapshot.counts();
        info!(countries = c, departments = d, cities = ci, generation = self.generation, "hierarchy refreshed");
        Ok(())
    }

    /// Replace only the department collection with the departments of one country.
    pub async fn departments_of(&mut self, country_id: EntityId) -> Result<&[Department]> {
        let departments = self.clients.departments.list_by_parent(country_id).await?;
        debug!(country_id, count = departments.len(), "scoped departments loaded");
        self.snapshot.departments = departments;
        Ok(&self.snapshot.departments)
    }

    /// Replace only the city collection with the cities of one department.
    pub async fn cities_of(&mut self, department_id: EntityId) -> Result<&[City]> {
        let cities = self.clients.cities.list_by_parent(department_id).await?;
        debug!(department_id, count = cities.len(), "scoped cities loaded");
        self.snapshot.cities = cities;
        Ok(&self.snapshot.cities)
    }
}
