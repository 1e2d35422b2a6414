// crates/geoadmin-core/src/coordinator.rs

//! # Mutation Coordinator
//!
//! [`GeoAdmin`] owns the store and the table view and runs every operator
//! action: create, cascading delete, diff-based update and the edit modal.
//!
//! Every operation returns an [`Outcome`]. Remote failures are logged and
//! turned into `Outcome::Failed`; nothing is retried and nothing propagates
//! further. Validation and duplicate errors short-circuit before any call.
//! A successful mutation is followed by a full store refresh; entities only
//! appear locally once that refresh lands.

use crate::cascade::{CascadePlan, DeleteTarget};
use crate::client::PersistenceClients;
use crate::enrich::{EnrichmentJob, FlagLookup, FlagSet, NoFlags};
use crate::error::MutationError;
use crate::guard::check_name;
use crate::model::{Department, EntityDraft, EntityId, EntityKind, JoinedRow};
use crate::store::{HierarchySnapshot, HierarchyStore};
use crate::ui::{EditSession, Notice, NoticeLevel, UiState};
use crate::view::TableView;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

/// Result of one operator action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Refreshed,
    Created { kind: EntityKind, id: EntityId },
    Deleted(EntityKind),
    Updated { calls: usize },
    /// Nothing differed from the loaded snapshot; no call was made.
    NoChanges,
    /// The operator declined the confirmation.
    Cancelled,
    Failed(MutationError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failed(_))
    }

    pub fn error(&self) -> Option<&MutationError> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Banner to show, if any.
    pub fn notice(&self, ttl: Duration) -> Option<Notice> {
        let (level, message) = match self {
            Outcome::Refreshed | Outcome::Cancelled => return None,
            Outcome::Created { kind, .. } => (NoticeLevel::Success, format!("{} saved", capitalize(kind.label()))),
            Outcome::Deleted(kind) => (NoticeLevel::Success, format!("{} deleted", capitalize(kind.label()))),
            Outcome::Updated { .. } => (NoticeLevel::Success, "Changes saved".to_owned()),
            Outcome::NoChanges => (NoticeLevel::Info, "No changes to save".to_owned()),
            Outcome::Failed(err) => (NoticeLevel::Error, err.to_string()),
        };
        Some(Notice::new(level, message, ttl))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Operator confirmation for deletes.
pub trait Confirm {
    fn confirm(&self, plan: &CascadePlan) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&CascadePlan) -> bool,
{
    fn confirm(&self, plan: &CascadePlan) -> bool {
        self(plan)
    }
}

/// Edited names for a diff-based update. Absent levels are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    pub country: Option<NameEdit>,
    pub department: Option<NameEdit>,
    pub city: Option<NameEdit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEdit {
    pub id: EntityId,
    pub name: String,
    /// Explicit parent; falls back to the snapshot record's parent.
    pub parent_id: Option<EntityId>,
}

impl NameEdit {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: EntityId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

impl UpdateRequest {
    fn edits(&self) -> impl Iterator<Item = (EntityKind, &NameEdit)> {
        [
            (EntityKind::Country, self.country.as_ref()),
            (EntityKind::Department, self.department.as_ref()),
            (EntityKind::City, self.city.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, edit)| edit.map(|e| (kind, e)))
    }

    pub fn from_session(session: &EditSession) -> Self {
        let edit = |f: &crate::ui::EditField| NameEdit::new(f.id, f.name.clone());
        Self {
            country: session.country.as_ref().map(edit),
            department: session.department.as_ref().map(edit),
            city: session.city.as_ref().map(edit),
        }
    }
}

/// One queued `PUT`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingUpdate {
    kind: EntityKind,
    id: EntityId,
    draft: EntityDraft,
}

pub struct GeoAdmin {
    store: HierarchyStore,
    view: TableView,
    flags: Arc<dyn FlagLookup>,
    pending_enrichment: Option<EnrichmentJob>,
    notice_ttl: Duration,
}

impl GeoAdmin {
    pub fn new(clients: PersistenceClients, flags: Arc<dyn FlagLookup>) -> Self {
        Self {
            store: HierarchyStore::new(clients),
            view: TableView::new(),
            flags,
            pending_enrichment: None,
            notice_ttl: DEFAULT_NOTICE_TTL,
        }
    }

    /// Without flag enrichment.
    pub fn without_flags(clients: PersistenceClients) -> Self {
        Self::new(clients, Arc::new(NoFlags))
    }

    /// HTTP persistence and, unless disabled, the configured flag directory.
    #[cfg(feature = "http")]
    pub fn from_config(config: &crate::config::AdminConfig) -> crate::error::Result<Self> {
        config.validate()?;
        let clients = PersistenceClients::http(config)?;
        let flags: Arc<dyn FlagLookup> = if config.enrich_flags {
            Arc::new(crate::enrich::RestCountriesClient::from_config(config)?)
        } else {
            Arc::new(NoFlags)
        };
        Ok(Self::new(clients, flags).with_notice_ttl(config.notice_ttl()))
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    pub fn notice_ttl(&self) -> Duration {
        self.notice_ttl
    }

    pub fn notice(&self, outcome: &Outcome) -> Option<Notice> {
        outcome.notice(self.notice_ttl)
    }

    pub fn snapshot(&self) -> &HierarchySnapshot {
        self.store.snapshot()
    }

    pub fn store(&self) -> &HierarchyStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut HierarchyStore {
        &mut self.store
    }

    pub fn table(&self) -> &TableView {
        &self.view
    }

    // -----------------------------------------------------------------------
    // Refresh / enrichment / search
    // -----------------------------------------------------------------------

    /// Full store refresh followed by re-projection. On success a lookup batch
    /// for the new snapshot is queued; see [`GeoAdmin::take_enrichment`].
    pub async fn refresh(&mut self) -> Outcome {
        match self.store.refresh().await {
            Ok(()) => {
                self.view.reproject(self.store.snapshot());
                self.pending_enrichment = Some(self.enrichment());
                Outcome::Refreshed
            }
            Err(err) => {
                warn!(error = %err, "refresh failed, keeping previous snapshot");
                Outcome::Failed(MutationError::RefreshFailed)
            }
        }
    }

    /// Flag lookups for the countries currently loaded. Run it anywhere
    /// (e.g. a spawned task) and hand the result to [`GeoAdmin::apply_flags`].
    pub fn enrichment(&self) -> EnrichmentJob {
        EnrichmentJob::new(self.flags.clone(), &self.store.snapshot().countries)
    }

    /// Batch queued by the last successful refresh, including the refresh
    /// that follows every mutation. `None` once taken.
    pub fn take_enrichment(&mut self) -> Option<EnrichmentJob> {
        self.pending_enrichment.take()
    }

    pub fn apply_flags(&mut self, flags: FlagSet) {
        self.view.apply_flags(flags, self.store.snapshot());
    }

    /// Convenience: run the queued batch (or a fresh one) inline and re-project.
    pub async fn enrich(&mut self) {
        let job = match self.take_enrichment() {
            Some(job) => job,
            None => self.enrichment(),
        };
        let flags = job.run().await;
        self.apply_flags(flags);
    }

    pub fn search(&mut self, ui: &mut UiState, query: &str) {
        ui.search = query.to_owned();
        self.view.set_query(query);
    }

    // -----------------------------------------------------------------------
    // Cascading selects
    // -----------------------------------------------------------------------

    /// Departments offered once `country_id` is chosen.
    pub fn department_options(&self, country_id: EntityId) -> Vec<&Department> {
        self.snapshot().departments_in(country_id).collect()
    }

    /// First level of the city form; resets the department choice.
    pub fn select_city_country(&self, ui: &mut UiState, country_id: Option<EntityId>) {
        ui.forms.city_country = country_id;
        ui.forms.city_department = None;
    }

    pub fn select_city_department(&self, ui: &mut UiState, department_id: Option<EntityId>) {
        ui.forms.city_department = department_id;
        if let Some(department) = department_id.and_then(|id| self.snapshot().department(id)) {
            ui.forms.city_country = Some(department.country_id);
        }
    }

    pub fn select_department_country(&self, ui: &mut UiState, country_id: Option<EntityId>) {
        ui.forms.department_country = country_id;
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    pub async fn create_country(&mut self, ui: &mut UiState) -> Outcome {
        self.create(EntityKind::Country, ui).await
    }

    pub async fn create_department(&mut self, ui: &mut UiState) -> Outcome {
        self.create(EntityKind::Department, ui).await
    }

    pub async fn create_city(&mut self, ui: &mut UiState) -> Outcome {
        self.create(EntityKind::City, ui).await
    }

    async fn create(&mut self, kind: EntityKind, ui: &mut UiState) -> Outcome {
        let name = match check_name(kind, ui.forms.name(kind)) {
            Ok(name) => name,
            Err(err) => return Outcome::Failed(err),
        };
        let parent_id = match kind.parent() {
            None => None,
            Some(parent) => match ui.forms.parent(kind) {
                Some(id) => Some(id),
                None => return Outcome::Failed(MutationError::MissingParent { kind, parent }),
            },
        };
        if self.snapshot().name_taken(kind, &name, parent_id, None) {
            return Outcome::Failed(MutationError::AlreadyExists(kind));
        }

        let draft = EntityDraft::new(name, parent_id);
        ui.busy.set(kind, true);
        let result = self.store.clients().create(kind, &draft).await;
        ui.busy.set(kind, false);

        match result {
            Ok(id) => {
                info!(%kind, id, name = %draft.name, "created");
                ui.forms.clear_name(kind);
                self.refresh_after_mutation().await;
                Outcome::Created { kind, id }
            }
            Err(err) => {
                warn!(%kind, error = %err, "create failed");
                Outcome::Failed(MutationError::SaveFailed(kind))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// What a delete of `target` would remove, from the current snapshot.
    pub fn plan_delete(&self, target: DeleteTarget) -> Option<CascadePlan> {
        CascadePlan::build(self.snapshot(), target)
    }

    pub async fn delete(&mut self, target: DeleteTarget, confirm: &dyn Confirm) -> Outcome {
        let Some(plan) = self.plan_delete(target) else {
            return Outcome::Failed(MutationError::NotFound {
                kind: target.kind(),
                id: target.id(),
            });
        };
        if !confirm.confirm(&plan) {
            return Outcome::Cancelled;
        }

        let kind = target.kind();
        match plan.execute(self.store.clients()).await {
            Ok(()) => {
                info!(%kind, id = target.id(), stages = plan.stages.len(), "deleted");
                self.refresh_after_mutation().await;
                Outcome::Deleted(kind)
            }
            Err(failure) => {
                // Whatever was deleted stays deleted; show what is left.
                self.refresh_after_mutation().await;
                Outcome::Failed(MutationError::DeleteFailed {
                    target: kind,
                    stage: failure.stage,
                    id: failure.id,
                })
            }
        }
    }

    // -----------------------------------------------------------------------
    // Diff-based update
    // -----------------------------------------------------------------------

    /// Send only the names that differ from the snapshot.
    pub async fn update(&mut self, request: &UpdateRequest) -> Outcome {
        let pending = match self.diff(request) {
            Ok(pending) => pending,
            Err(err) => return Outcome::Failed(err),
        };
        if pending.is_empty() {
            return Outcome::NoChanges;
        }

        let clients = self.store.clients();
        let results = join_all(
            pending
                .iter()
                .map(|p| clients.update(p.kind, p.id, &p.draft)),
        )
        .await;

        let mut failed = false;
        for (p, result) in pending.iter().zip(results) {
            if let Err(err) = result {
                warn!(kind = %p.kind, id = p.id, error = %err, "update failed");
                failed = true;
            }
        }
        if failed {
            return Outcome::Failed(MutationError::UpdateFailed);
        }

        info!(calls = pending.len(), "updated");
        self.refresh_after_mutation().await;
        Outcome::Updated {
            calls: pending.len(),
        }
    }

    /// Validate everything first, then queue one call per changed name.
    fn diff(&self, request: &UpdateRequest) -> Result<Vec<PendingUpdate>, MutationError> {
        let snapshot = self.snapshot();

        for (kind, edit) in request.edits() {
            if !edit.name.trim().is_empty() {
                check_name(kind, &edit.name)?;
            }
        }

        let mut pending = Vec::new();
        for (kind, edit) in request.edits() {
            let current = snapshot
                .name_of(kind, edit.id)
                .ok_or(MutationError::NotFound { kind, id: edit.id })?;
            let candidate = edit.name.trim();
            if candidate.is_empty() || candidate == current.trim() {
                continue;
            }
            let parent_id = match kind.parent() {
                Some(_) => edit.parent_id.or_else(|| snapshot.parent_of(kind, edit.id)),
                None => None,
            };
            if snapshot.name_taken(kind, candidate, parent_id, Some(edit.id)) {
                return Err(MutationError::AlreadyExists(kind));
            }
            pending.push(PendingUpdate {
                kind,
                id: edit.id,
                draft: EntityDraft::new(candidate, parent_id),
            });
        }
        Ok(pending)
    }

    // -----------------------------------------------------------------------
    // Edit modal
    // -----------------------------------------------------------------------

    pub fn open_editor(&self, ui: &mut UiState, row: &JoinedRow) {
        ui.editor = Some(EditSession::from_row(row));
    }

    /// Save the open editor. Closes it unless the save failed.
    pub async fn save_editor(&mut self, ui: &mut UiState) -> Outcome {
        let Some(session) = ui.editor.as_ref() else {
            return Outcome::NoChanges;
        };
        let request = UpdateRequest::from_session(session);
        let outcome = self.update(&request).await;
        if outcome.is_success() {
            Self::close_editor(ui);
        }
        outcome
    }

    pub fn close_editor(ui: &mut UiState) {
        ui.editor = None;
    }

    /// The mutation already succeeded; a failed reload only leaves the old
    /// table on screen.
    async fn refresh_after_mutation(&mut self) {
        if let Outcome::Failed(err) = self.refresh().await {
            warn!(error = %err, "reload after mutation failed");
        }
    }
}

impl std::fmt::Debug for GeoAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoAdmin")
            .field("store", &self.store)
            .field("view", &self.view)
            .field("pending_enrichment", &self.pending_enrichment.as_ref().map(EnrichmentJob::len))
            .field("notice_ttl", &self.notice_ttl)
            .finish_non_exhaustive()
    }
}
