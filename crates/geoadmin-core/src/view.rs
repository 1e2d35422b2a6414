// crates/geoadmin-core/src/view.rs

//! # View Projector
//!
//! Flattens the snapshot into one [`JoinedRow`] per city, in city order.
//! A city whose department (or whose department's country) is missing still
//! gets a row, with the missing parent fields left blank.

use crate::enrich::FlagSet;
use crate::model::{Country, Department, EntityId, JoinedRow};
use crate::store::HierarchySnapshot;
use crate::text::search_key;
use std::collections::HashMap;

/// First record wins on duplicate ids, like a linear `find` would.
fn index_by_id<'a, T>(items: &'a [T], id_of: impl Fn(&T) -> EntityId) -> HashMap<EntityId, &'a T> {
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        index.entry(id_of(item)).or_insert(item);
    }
    index
}

/// Pure projection of the snapshot plus the current flags.
pub fn project(snapshot: &HierarchySnapshot, flags: &FlagSet) -> Vec<JoinedRow> {
    let departments: HashMap<EntityId, &Department> = index_by_id(&snapshot.departments, |d| d.id);
    let countries: HashMap<EntityId, &Country> = index_by_id(&snapshot.countries, |c| c.id);

    snapshot
        .cities
        .iter()
        .map(|city| {
            let department = departments.get(&city.department_id).copied();
            let country = department.and_then(|d| countries.get(&d.country_id).copied());
            JoinedRow {
                country_id: country.map(|c| c.id),
                country_name: country.map(|c| c.name.clone()).unwrap_or_default(),
                country_flag: country.and_then(|c| flags.url_for(c)).map(str::to_owned),
                department_id: department.map(|d| d.id),
                department_name: department.map(|d| d.name.clone()).unwrap_or_default(),
                city_id: Some(city.id),
                city_name: city.name.clone(),
            }
        })
        .collect()
}

/// Case-insensitive substring match on any of the three names; Latin
/// accents are ignored on both sides.
pub fn row_matches(row: &JoinedRow, query: &str) -> bool {
    let q = search_key(query.trim());
    if q.is_empty() {
        return true;
    }
    [&row.country_name, &row.department_name, &row.city_name]
        .iter()
        .any(|name| search_key(name).contains(&q))
}

/// Rows matching `query`; an empty query keeps everything.
pub fn filter_rows(rows: &[JoinedRow], query: &str) -> Vec<JoinedRow> {
    rows.iter()
        .filter(|row| row_matches(row, query))
        .cloned()
        .collect()
}

/// The displayed table: last projection, last query and last flag batch.
///
/// Re-projecting keeps the query, so the filter is re-applied after every
/// refresh. It also drops flags of countries that were deleted or renamed
/// since their batch ran.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    rows: Vec<JoinedRow>,
    visible: Vec<JoinedRow>,
    query: String,
    flags: FlagSet,
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reproject(&mut self, snapshot: &HierarchySnapshot) {
        self.flags.retain_current(&snapshot.countries);
        self.rows = project(snapshot, &self.flags);
        self.visible = filter_rows(&self.rows, &self.query);
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_owned();
        self.visible = filter_rows(&self.rows, &self.query);
    }

    /// Replace the flags with a finished batch and re-render. Countries the
    /// batch missed show no flag.
    pub fn apply_flags(&mut self, flags: FlagSet, snapshot: &HierarchySnapshot) {
        self.flags = flags;
        self.reproject(snapshot);
    }

    /// All rows, unfiltered.
    pub fn rows(&self) -> &[JoinedRow] {
        &self.rows
    }

    /// Rows passing the current query.
    pub fn visible(&self) -> &[JoinedRow] {
        &self.visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }
}
