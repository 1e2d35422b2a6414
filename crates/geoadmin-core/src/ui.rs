// crates/geoadmin-core/src/ui.rs

//! Explicit UI state handed through the coordinator's operations, plus the
//! transient banners the operations produce.

use crate::model::{EntityId, EntityKind, JoinedRow};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inputs of the three creation forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateForms {
    pub country_name: String,

    pub department_name: String,
    /// Country chosen for the new department.
    pub department_country: Option<EntityId>,

    pub city_name: String,
    /// First level of the city form's cascading select.
    pub city_country: Option<EntityId>,
    /// Department chosen for the new city.
    pub city_department: Option<EntityId>,
}

impl CreateForms {
    pub fn name(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Country => &self.country_name,
            EntityKind::Department => &self.department_name,
            EntityKind::City => &self.city_name,
        }
    }

    pub fn clear_name(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Country => self.country_name.clear(),
            EntityKind::Department => self.department_name.clear(),
            EntityKind::City => self.city_name.clear(),
        }
    }

    /// Selected parent for a new record of `kind`.
    pub fn parent(&self, kind: EntityKind) -> Option<EntityId> {
        match kind {
            EntityKind::Country => None,
            EntityKind::Department => self.department_country,
            EntityKind::City => self.city_department,
        }
    }
}

/// Per-kind "request in flight" flags; a set flag disables that form's submit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyFlags {
    pub country: bool,
    pub department: bool,
    pub city: bool,
}

impl BusyFlags {
    pub fn is_busy(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Country => self.country,
            EntityKind::Department => self.department,
            EntityKind::City => self.city,
        }
    }

    pub fn set(&mut self, kind: EntityKind, busy: bool) {
        match kind {
            EntityKind::Country => self.country = busy,
            EntityKind::Department => self.department = busy,
            EntityKind::City => self.city = busy,
        }
    }
}

/// One editable name in the edit modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditField {
    pub id: EntityId,
    /// Name at the time the editor was opened.
    pub original: String,
    /// Current input.
    pub name: String,
}

impl EditField {
    fn new(id: EntityId, name: &str) -> Self {
        Self {
            id,
            original: name.to_owned(),
            name: name.to_owned(),
        }
    }
}

/// Snapshot of a table row taken when the edit modal opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSession {
    pub country: Option<EditField>,
    pub department: Option<EditField>,
    pub city: Option<EditField>,
}

impl EditSession {
    pub fn from_row(row: &JoinedRow) -> Self {
        Self {
            country: row.country_id.map(|id| EditField::new(id, &row.country_name)),
            department: row
                .department_id
                .map(|id| EditField::new(id, &row.department_name)),
            city: row.city_id.map(|id| EditField::new(id, &row.city_name)),
        }
    }

    pub fn field_mut(&mut self, kind: EntityKind) -> Option<&mut EditField> {
        match kind {
            EntityKind::Country => self.country.as_mut(),
            EntityKind::Department => self.department.as_mut(),
            EntityKind::City => self.city.as_mut(),
        }
    }

    /// Set the input for `kind`; ignored when the row has no such level.
    pub fn set_name(&mut self, kind: EntityKind, name: &str) {
        if let Some(field) = self.field_mut(kind) {
            field.name = name.to_owned();
        }
    }
}

/// Everything the screen holds between operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub forms: CreateForms,
    pub search: String,
    pub editor: Option<EditSession>,
    pub busy: BusyFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient banner. Dismissed after `ttl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub ttl: Duration,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            level,
            message: message.into(),
            ttl,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
