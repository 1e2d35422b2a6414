// crates/geoadmin-core/src/lib.rs

//! # geoadmin-core
//!
//! Administration engine for a three-level geography: countries, departments
//! and cities, kept in a remote REST store.
//!
//! - [`client`]: the persistence contract, HTTP and in-memory implementations
//! - [`store`]: the in-memory snapshot, refreshed as one unit
//! - [`view`]: the flattened, searchable country x department x city table
//! - [`guard`]: name rules and per-scope duplicate checks
//! - [`cascade`]: staged cascading deletes
//! - [`coordinator`]: [`GeoAdmin`], which runs every operator action
//! - [`enrich`]: best-effort flag images for countries
//!
//! ```
//! use geoadmin_core::memory::MemoryApi;
//! use geoadmin_core::{GeoAdmin, Outcome, UiState};
//!
//! # async fn demo() {
//! let api = MemoryApi::new();
//! let mut admin = GeoAdmin::without_flags(api.clients());
//! let mut ui = UiState::default();
//!
//! admin.refresh().await;
//! ui.forms.country_name = "Chile".into();
//! assert!(matches!(admin.create_country(&mut ui).await, Outcome::Created { .. }));
//! assert_eq!(admin.snapshot().countries.len(), 1);
//! # }
//! ```

pub mod cascade;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod enrich;
pub mod error;
pub mod guard;
pub mod memory;
pub mod model;
pub mod store;
pub mod text;
pub mod ui;
pub mod view;

// Re-exports
pub use crate::cascade::{CascadePlan, DeleteTarget};
pub use crate::client::{EntityClient, PersistenceClients};
pub use crate::config::AdminConfig;
pub use crate::coordinator::{Confirm, GeoAdmin, NameEdit, Outcome, UpdateRequest};
pub use crate::enrich::{EnrichmentJob, FlagLookup, FlagSet};
pub use crate::error::{GeoAdminError, MutationError, Result};
pub use crate::model::{City, Country, Department, EntityId, EntityKind, JoinedRow};
pub use crate::store::{HierarchySnapshot, HierarchyStore};
pub use crate::ui::{Notice, NoticeLevel, UiState};
pub use crate::view::TableView;
