// crates/geoadmin-core/src/cascade.rs

//! # Cascading Delete
//!
//! A delete is an ordered pipeline of stages (cities, then departments, then
//! the country). Each stage fires all its deletes concurrently and waits for
//! every one to settle; one failure fails the stage and no later stage starts.
//! Nothing is rolled back.
//!
//! Child sets come from the snapshot at planning time; the store is not
//! re-read mid-cascade.

use crate::client::PersistenceClients;
use crate::model::{EntityId, EntityKind};
use crate::store::HierarchySnapshot;
use futures::future::join_all;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteTarget {
    Country(EntityId),
    Department(EntityId),
    City(EntityId),
}

impl DeleteTarget {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        match kind {
            EntityKind::Country => DeleteTarget::Country(id),
            EntityKind::Department => DeleteTarget::Department(id),
            EntityKind::City => DeleteTarget::City(id),
        }
    }

    pub fn kind(self) -> EntityKind {
        match self {
            DeleteTarget::Country(_) => EntityKind::Country,
            DeleteTarget::Department(_) => EntityKind::Department,
            DeleteTarget::City(_) => EntityKind::City,
        }
    }

    pub fn id(self) -> EntityId {
        match self {
            DeleteTarget::Country(id) | DeleteTarget::Department(id) | DeleteTarget::City(id) => id,
        }
    }
}

/// One all-or-nothing batch of deletes of a single kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStage {
    pub kind: EntityKind,
    pub ids: Vec<EntityId>,
}

/// First failing call of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: EntityKind,
    pub id: EntityId,
}

/// Ordered stages for one delete, computed from the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePlan {
    pub target: DeleteTarget,
    pub target_name: String,
    pub stages: Vec<DeleteStage>,
}

impl CascadePlan {
    /// `None` when the target is not in the snapshot.
    pub fn build(snapshot: &HierarchySnapshot, target: DeleteTarget) -> Option<Self> {
        let kind = target.kind();
        let id = target.id();
        let target_name = snapshot.name_of(kind, id)?.to_owned();

        let mut stages = Vec::with_capacity(3);
        match target {
            DeleteTarget::City(_) => {}
            DeleteTarget::Department(department_id) => {
                let cities: Vec<EntityId> = snapshot.cities_in(department_id).map(|c| c.id).collect();
                push_stage(&mut stages, EntityKind::City, cities);
            }
            DeleteTarget::Country(country_id) => {
                let departments: Vec<EntityId> =
                    snapshot.departments_in(country_id).map(|d| d.id).collect();
                let cities: Vec<EntityId> = departments
                    .iter()
                    .flat_map(|d| snapshot.cities_in(*d).map(|c| c.id))
                    .collect();
                push_stage(&mut stages, EntityKind::City, cities);
                push_stage(&mut stages, EntityKind::Department, departments);
            }
        }
        stages.push(DeleteStage { kind, ids: vec![id] });

        Some(Self {
            target,
            target_name,
            stages,
        })
    }

    /// Number of deletes of `kind` this plan will issue.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.stages
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.ids.len())
            .sum()
    }

    pub fn is_multi_entity(&self) -> bool {
        self.stages.len() > 1
    }

    /// Confirmation question for the operator.
    pub fn prompt(&self) -> String {
        format!("Delete {} \"{}\"?", self.target.kind(), self.target_name)
    }

    /// Extra warning shown when descendants go too.
    pub fn warning(&self) -> Option<String> {
        if !self.is_multi_entity() {
            return None;
        }
        let mut parts = Vec::new();
        for kind in [EntityKind::Department, EntityKind::City] {
            let n = self.count(kind);
            if n > 0 {
                let noun = if n == 1 { kind.label() } else { kind.plural() };
                parts.push(format!("{n} {noun}"));
            }
        }
        Some(format!(
            "This also deletes {} and cannot be undone.",
            parts.join(" and ")
        ))
    }

    /// Run the stages in order. Stops at the first failing stage.
    pub async fn execute(&self, clients: &PersistenceClients) -> Result<(), StageFailure> {
        for stage in &self.stages {
            run_stage(clients, stage).await?;
        }
        Ok(())
    }
}

fn push_stage(stages: &mut Vec<DeleteStage>, kind: EntityKind, ids: Vec<EntityId>) {
    if !ids.is_empty() {
        stages.push(DeleteStage { kind, ids });
    }
}

async fn run_stage(clients: &PersistenceClients, stage: &DeleteStage) -> Result<(), StageFailure> {
    debug!(kind = %stage.kind, count = stage.ids.len(), "delete stage");
    let results = join_all(stage.ids.iter().map(|id| async move {
        clients.delete(stage.kind, *id).await.map_err(|err| (*id, err))
    }))
    .await;

    let mut first_failure = None;
    for result in results {
        if let Err((id, err)) = result {
            warn!(kind = %stage.kind, id, error = %err, "delete failed");
            first_failure.get_or_insert(StageFailure {
                stage: stage.kind,
                id,
            });
        }
    }
    match first_failure {
        Some(failure) => Err(failure),
        None => Ok(()),
    }
}
