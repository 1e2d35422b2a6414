// crates/geoadmin-core/src/model.rs

//! # Domain Model
//!
//! Three persisted levels, parent -> child:
//! `Country` -> `Department` -> `City`.
//!
//! The remote API is loose about field casing (`countryId` vs `CountryId`), so
//! every record decodes through serde aliases into one canonical shape. Writes
//! always use the lower-camel keys (see [`EntityDraft::to_wire`]).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier assigned by the remote store.
pub type EntityId = i64;

/// The three hierarchy levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Country,
    Department,
    City,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Country, EntityKind::Department, EntityKind::City];

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Country => "country",
            EntityKind::Department => "department",
            EntityKind::City => "city",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::Country => "countries",
            EntityKind::Department => "departments",
            EntityKind::City => "cities",
        }
    }

    pub fn parent(self) -> Option<EntityKind> {
        match self {
            EntityKind::Country => None,
            EntityKind::Department => Some(EntityKind::Country),
            EntityKind::City => Some(EntityKind::Department),
        }
    }

    /// Wire key carrying the parent id, in the canonical (lower-camel) casing.
    pub fn parent_field(self) -> Option<&'static str> {
        match self {
            EntityKind::Country => None,
            EntityKind::Department => Some("countryId"),
            EntityKind::City => Some("departmentId"),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `null` names show up from some backends; treat them as empty.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Root of the hierarchy.
///
/// Flag images are not part of the record; they live in a
/// [`FlagSet`](crate::enrich::FlagSet) next to the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    #[serde(alias = "Id")]
    pub id: EntityId,
    #[serde(alias = "Name", default, deserialize_with = "null_as_empty")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(alias = "Id")]
    pub id: EntityId,
    #[serde(alias = "Name", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(alias = "CountryId")]
    pub country_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    #[serde(alias = "Id")]
    pub id: EntityId,
    #[serde(alias = "Name", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(alias = "DepartmentId")]
    pub department_id: EntityId,
}

/// Shared view over the three record types so the persistence clients can be
/// written once.
pub trait Entity: DeserializeOwned + Serialize + Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> EntityId;
    fn name(&self) -> &str;
    fn parent_id(&self) -> Option<EntityId>;

    /// Rebuild a record from its stored parts (used by in-process stores).
    fn from_parts(id: EntityId, name: String, parent_id: Option<EntityId>) -> Self;
}

impl Entity for Country {
    const KIND: EntityKind = EntityKind::Country;

    fn id(&self) -> EntityId {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn parent_id(&self) -> Option<EntityId> {
        None
    }
    fn from_parts(id: EntityId, name: String, _parent_id: Option<EntityId>) -> Self {
        Country { id, name }
    }
}

impl Entity for Department {
    const KIND: EntityKind = EntityKind::Department;

    fn id(&self) -> EntityId {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn parent_id(&self) -> Option<EntityId> {
        Some(self.country_id)
    }
    fn from_parts(id: EntityId, name: String, parent_id: Option<EntityId>) -> Self {
        Department {
            id,
            name,
            country_id: parent_id.unwrap_or_default(),
        }
    }
}

impl Entity for City {
    const KIND: EntityKind = EntityKind::City;

    fn id(&self) -> EntityId {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn parent_id(&self) -> Option<EntityId> {
        Some(self.department_id)
    }
    fn from_parts(id: EntityId, name: String, parent_id: Option<EntityId>) -> Self {
        City {
            id,
            name,
            department_id: parent_id.unwrap_or_default(),
        }
    }
}

/// Body of a create or update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDraft {
    pub name: String,
    pub parent_id: Option<EntityId>,
}

impl EntityDraft {
    pub fn new(name: impl Into<String>, parent_id: Option<EntityId>) -> Self {
        Self {
            name: name.into(),
            parent_id,
        }
    }

    /// JSON body for `POST` (no id) or `PUT` (with id).
    ///
    /// `{ "id"?, "name", "countryId" | "departmentId"? }`
    pub fn to_wire(&self, kind: EntityKind, id: Option<EntityId>) -> Value {
        let mut body = Map::new();
        if let Some(id) = id {
            body.insert("id".into(), Value::from(id));
        }
        body.insert("name".into(), Value::from(self.name.clone()));
        if let (Some(field), Some(parent)) = (kind.parent_field(), self.parent_id) {
            body.insert(field.into(), Value::from(parent));
        }
        Value::Object(body)
    }
}

/// One denormalized table row. Exactly one per city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRow {
    pub country_id: Option<EntityId>,
    pub country_name: String,
    pub country_flag: Option<String>,
    pub department_id: Option<EntityId>,
    pub department_name: String,
    pub city_id: Option<EntityId>,
    pub city_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_lower_camel_and_capitalized_fields() {
        let lower: Department =
            serde_json::from_value(json!({"id": 3, "name": "Biobío", "countryId": 1})).unwrap();
        let upper: Department =
            serde_json::from_value(json!({"Id": 3, "Name": "Biobío", "CountryId": 1})).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper.country_id, 1);

        let city: City =
            serde_json::from_value(json!({"Id": 9, "Name": "Concepción", "DepartmentId": 3}))
                .unwrap();
        assert_eq!(city.department_id, 3);
    }

    #[test]
    fn null_or_missing_name_decodes_empty() {
        let c: Country = serde_json::from_value(json!({"id": 1, "name": null})).unwrap();
        assert_eq!(c.name, "");
        let c: Country = serde_json::from_value(json!({"Id": 2})).unwrap();
        assert_eq!(c.name, "");
    }

    #[test]
    fn serializes_lower_camel_only() {
        let d = Department {
            id: 3,
            name: "Centro".into(),
            country_id: 1,
        };
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!({"id": 3, "name": "Centro", "countryId": 1})
        );
    }

    #[test]
    fn wire_bodies_carry_parent_key_per_kind() {
        let draft = EntityDraft::new("Centro", Some(1));
        assert_eq!(
            draft.to_wire(EntityKind::Department, None),
            json!({"name": "Centro", "countryId": 1})
        );
        assert_eq!(
            draft.to_wire(EntityKind::City, Some(7)),
            json!({"id": 7, "name": "Centro", "departmentId": 1})
        );
        assert_eq!(
            EntityDraft::new("Chile", None).to_wire(EntityKind::Country, Some(2)),
            json!({"id": 2, "name": "Chile"})
        );
    }
}
