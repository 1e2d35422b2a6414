// crates/geoadmin-core/src/guard.rs

//! # Validation & Uniqueness Guard
//!
//! Checked against the loaded snapshot, never the remote store. Two operators
//! mutating concurrently can still race past each other; the store is not
//! re-read before a write.

use crate::error::MutationError;
use crate::model::{EntityId, EntityKind};
use crate::store::HierarchySnapshot;
use crate::text::{is_valid_name, same_name};

/// Trim and validate a candidate name for `kind`.
pub fn check_name(kind: EntityKind, raw: &str) -> Result<String, MutationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MutationError::EmptyName(kind));
    }
    if !is_valid_name(trimmed) {
        return Err(MutationError::InvalidCharacters(kind));
    }
    Ok(trimmed.to_owned())
}

fn not_excluded(id: EntityId, exclude: Option<EntityId>) -> bool {
    exclude != Some(id)
}

impl HierarchySnapshot {
    /// Country names are unique across the whole store.
    pub fn exists_country(&self, name: &str, exclude: Option<EntityId>) -> bool {
        self.countries
            .iter()
            .any(|c| not_excluded(c.id, exclude) && same_name(&c.name, name))
    }

    /// Department names are unique within their country.
    pub fn exists_department(&self, name: &str, country_id: EntityId, exclude: Option<EntityId>) -> bool {
        self.departments_in(country_id)
            .any(|d| not_excluded(d.id, exclude) && same_name(&d.name, name))
    }

    /// City names are unique within their department.
    pub fn exists_city(&self, name: &str, department_id: EntityId, exclude: Option<EntityId>) -> bool {
        self.cities_in(department_id)
            .any(|c| not_excluded(c.id, exclude) && same_name(&c.name, name))
    }

    /// Dispatch on `kind`. `parent_id` is ignored for countries.
    pub fn name_taken(
        &self,
        kind: EntityKind,
        name: &str,
        parent_id: Option<EntityId>,
        exclude: Option<EntityId>,
    ) -> bool {
        match (kind, parent_id) {
            (EntityKind::Country, _) => self.exists_country(name, exclude),
            (EntityKind::Department, Some(country)) => self.exists_department(name, country, exclude),
            (EntityKind::City, Some(department)) => self.exists_city(name, department, exclude),
            // No scope known, nothing to collide with.
            (_, None) => false,
        }
    }
}
