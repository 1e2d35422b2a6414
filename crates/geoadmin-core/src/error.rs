// crates/geoadmin-core/src/error.rs

//! # Errors
//!
//! Two layers:
//! - [`GeoAdminError`] is the transport / infrastructure failure of a single
//!   remote call, a config load or a decode step.
//! - [`MutationError`] is what the operator sees. Its `Display` text is the
//!   banner message, so every remote failure ends up here before it leaves the
//!   coordinator.

use crate::model::{EntityId, EntityKind};
use thiserror::Error;

/// Result type for remote calls and infrastructure.
pub type Result<T> = std::result::Result<T, GeoAdminError>;

#[derive(Debug, Error)]
pub enum GeoAdminError {
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Countries are the root of the hierarchy and have no scoped listing.
    #[error("{0} records cannot be listed by parent")]
    Unscoped(EntityKind),

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: EntityId },

    /// Raised by [`crate::memory::MemoryApi`] when a call was armed to fail.
    #[error("remote call rejected: {0}")]
    Rejected(String),
}

/// Operator-facing failure of a coordinator operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("The {0} name cannot be empty")]
    EmptyName(EntityKind),

    #[error("The {0} name contains invalid characters; only letters and spaces are allowed")]
    InvalidCharacters(EntityKind),

    #[error("A {0} with that name already exists")]
    AlreadyExists(EntityKind),

    #[error("Select a {parent} for the new {kind}")]
    MissingParent {
        kind: EntityKind,
        parent: EntityKind,
    },

    #[error("The selected {kind} ({id}) no longer exists")]
    NotFound { kind: EntityKind, id: EntityId },

    #[error("Failed to save {0}")]
    SaveFailed(EntityKind),

    /// A cascade stage failed. Earlier stages stay deleted.
    #[error("{}", delete_message(*target, *stage))]
    DeleteFailed {
        target: EntityKind,
        stage: EntityKind,
        id: EntityId,
    },

    #[error("Failed to update the record")]
    UpdateFailed,

    #[error("Failed to load countries, departments and cities")]
    RefreshFailed,
}

fn delete_message(target: EntityKind, stage: EntityKind) -> String {
    if target == stage {
        format!("Failed to delete {target}")
    } else {
        format!("Failed to delete the {} of the {target}", stage.plural())
    }
}

impl MutationError {
    /// Validation and duplicate errors are caught before any remote call.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            MutationError::EmptyName(_)
                | MutationError::InvalidCharacters(_)
                | MutationError::AlreadyExists(_)
                | MutationError::MissingParent { .. }
        )
    }
}
