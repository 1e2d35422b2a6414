mod common;

use common::{loaded_admin, seed, StaticFlags};
use geoadmin_core::memory::{MemoryApi, RemoteCall};
use geoadmin_core::ui::NoticeLevel;
use geoadmin_core::{
    CascadePlan, DeleteTarget, EntityKind, GeoAdmin, MutationError, NameEdit, Outcome, UiState,
    UpdateRequest,
};
use pretty_assertions::assert_eq;

fn yes(_: &CascadePlan) -> bool {
    true
}

fn no(_: &CascadePlan) -> bool {
    false
}

// ── Create ──────────────────────────────────────────────────────

#[tokio::test]
async fn chile_biobio_concepcion_scenario() {
    let api = MemoryApi::new();
    let mut admin = GeoAdmin::without_flags(api.clients());
    let mut ui = UiState::default();
    assert_eq!(admin.refresh().await, Outcome::Refreshed);

    ui.forms.country_name = "Chile".into();
    let Outcome::Created { id: chile, .. } = admin.create_country(&mut ui).await else {
        panic!("country not created");
    };
    assert_eq!(admin.snapshot().country(chile).unwrap().name, "Chile");
    assert_eq!(ui.forms.country_name, "");

    ui.forms.department_name = "Biobío".into();
    admin.select_department_country(&mut ui, Some(chile));
    let Outcome::Created { id: biobio, .. } = admin.create_department(&mut ui).await else {
        panic!("department not created");
    };

    admin.select_city_country(&mut ui, Some(chile));
    assert_eq!(admin.department_options(chile).len(), 1);
    admin.select_city_department(&mut ui, Some(biobio));
    ui.forms.city_name = "Concepción".into();
    assert!(matches!(
        admin.create_city(&mut ui).await,
        Outcome::Created { kind: EntityKind::City, .. }
    ));

    let rows = admin.table().rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].country_name, "Chile");
    assert_eq!(rows[0].department_name, "Biobío");
    assert_eq!(rows[0].city_name, "Concepción");
}

#[tokio::test]
async fn invalid_name_is_rejected_before_any_call() {
    let (api, mut admin, _) = loaded_admin().await;
    let mut ui = UiState::default();
    ui.forms.country_name = "Peru2".into();

    let outcome = admin.create_country(&mut ui).await;
    assert_eq!(outcome, Outcome::Failed(MutationError::InvalidCharacters(EntityKind::Country)));
    assert!(api.calls().is_empty());
    assert_eq!(ui.forms.country_name, "Peru2");

    let notice = admin.notice(&outcome).unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("invalid characters"));
}

#[tokio::test]
async fn empty_name_is_rejected_before_any_call() {
    let (api, mut admin, _) = loaded_admin().await;
    let mut ui = UiState::default();
    ui.forms.city_name = "   ".into();
    assert_eq!(
        admin.create_city(&mut ui).await,
        Outcome::Failed(MutationError::EmptyName(EntityKind::City))
    );
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn duplicate_department_in_same_country_is_rejected() {
    let (api, mut admin, ids) = loaded_admin().await;
    let mut ui = UiState::default();
    ui.forms.department_name = " centro ".into();
    ui.forms.department_country = Some(ids.chile);
    assert_eq!(
        admin.create_department(&mut ui).await,
        Outcome::Failed(MutationError::AlreadyExists(EntityKind::Department))
    );
    assert!(api.calls().is_empty());

    // Same name under another country is fine.
    ui.forms.department_country = Some(ids.peru);
    assert!(admin.create_department(&mut ui).await.is_success());
}

#[tokio::test]
async fn department_needs_a_country() {
    let (api, mut admin, _) = loaded_admin().await;
    let mut ui = UiState::default();
    ui.forms.department_name = "Maule".into();
    assert_eq!(
        admin.create_department(&mut ui).await,
        Outcome::Failed(MutationError::MissingParent {
            kind: EntityKind::Department,
            parent: EntityKind::Country
        })
    );
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn failed_create_keeps_input_and_clears_busy_flag() {
    let (api, mut admin, ids) = loaded_admin().await;
    api.fail_all(EntityKind::City);
    let mut ui = UiState::default();
    ui.forms.city_department = Some(ids.biobio);
    ui.forms.city_name = "Coronel".into();

    let outcome = admin.create_city(&mut ui).await;
    assert_eq!(outcome, Outcome::Failed(MutationError::SaveFailed(EntityKind::City)));
    assert_eq!(admin.notice(&outcome).unwrap().message, "Failed to save city");
    assert!(!ui.busy.is_busy(EntityKind::City));
    assert_eq!(ui.forms.city_name, "Coronel");
    assert_eq!(api.calls(), vec![RemoteCall::Create(EntityKind::City, "Coronel".into())]);
}

#[tokio::test]
async fn create_sends_trimmed_name_and_refreshes() {
    let (api, mut admin, ids) = loaded_admin().await;
    let mut ui = UiState::default();
    ui.forms.city_department = Some(ids.centro);
    ui.forms.city_name = "  Maipú ".into();

    assert!(admin.create_city(&mut ui).await.is_success());
    let calls = api.calls();
    assert_eq!(calls[0], RemoteCall::Create(EntityKind::City, "Maipú".into()));
    assert!(calls[1..].iter().all(|c| !c.is_mutation()));
    assert_eq!(admin.table().rows().len(), 5);
}

#[tokio::test]
async fn city_country_choice_resets_department() {
    let (_api, admin, ids) = loaded_admin().await;
    let mut ui = UiState::default();
    admin.select_city_department(&mut ui, Some(ids.lima));
    assert_eq!(ui.forms.city_country, Some(ids.peru));

    admin.select_city_country(&mut ui, Some(ids.chile));
    assert_eq!(ui.forms.city_department, None);
    let options: Vec<&str> = admin
        .department_options(ids.chile)
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(options, vec!["Biobío", "Centro"]);
}

#[tokio::test]
async fn refresh_after_create_queues_a_lookup_for_the_new_country() {
    let api = MemoryApi::new();
    seed(&api);
    let flags = StaticFlags::default().with("Uruguay", "https://flags/uy.png").shared();
    let mut admin = GeoAdmin::new(api.clients(), flags);
    admin.refresh().await;
    let initial = admin.take_enrichment().unwrap();
    assert_eq!(initial.len(), 2);

    let mut ui = UiState::default();
    ui.forms.country_name = "Uruguay".into();
    let Outcome::Created { id: uruguay, .. } = admin.create_country(&mut ui).await else {
        panic!("country not created");
    };

    let job = admin.take_enrichment().unwrap();
    assert_eq!(job.len(), 3);
    admin.apply_flags(job.run().await);
    let country = admin.snapshot().country(uruguay).unwrap().clone();
    assert_eq!(admin.table().flags().url_for(&country), Some("https://flags/uy.png"));
    assert!(admin.take_enrichment().is_none());
}

#[tokio::test]
async fn rejected_create_queues_no_lookup() {
    let (_api, mut admin, _) = loaded_admin().await;
    admin.take_enrichment();
    let mut ui = UiState::default();
    ui.forms.country_name = "Peru2".into();
    admin.create_country(&mut ui).await;
    assert!(admin.take_enrichment().is_none());
}

// ── Cascading delete ────────────────────────────────────────────

#[tokio::test]
async fn city_delete_removes_only_the_city() {
    let (api, mut admin, ids) = loaded_admin().await;
    let outcome = admin.delete(DeleteTarget::City(ids.santiago), &yes).await;
    assert_eq!(outcome, Outcome::Deleted(EntityKind::City));
    assert_eq!(api.mutations(), vec![RemoteCall::Delete(EntityKind::City, ids.santiago)]);
    assert!(admin.snapshot().department(ids.centro).is_some());
}

#[tokio::test]
async fn declined_confirmation_issues_nothing() {
    let (api, mut admin, ids) = loaded_admin().await;
    assert_eq!(admin.delete(DeleteTarget::Country(ids.chile), &no).await, Outcome::Cancelled);
    assert!(api.calls().is_empty());
    assert!(admin.notice(&Outcome::Cancelled).is_none());
}

#[tokio::test]
async fn department_delete_removes_cities_first() {
    let (api, mut admin, ids) = loaded_admin().await;
    let outcome = admin.delete(DeleteTarget::Department(ids.biobio), &yes).await;
    assert_eq!(outcome, Outcome::Deleted(EntityKind::Department));
    assert_eq!(
        api.mutations(),
        vec![
            RemoteCall::Delete(EntityKind::City, ids.concepcion),
            RemoteCall::Delete(EntityKind::City, ids.talcahuano),
            RemoteCall::Delete(EntityKind::Department, ids.biobio),
        ]
    );
    assert_eq!(admin.table().rows().len(), 2);
}

#[tokio::test]
async fn failed_city_stage_never_deletes_the_department() {
    let (api, mut admin, ids) = loaded_admin().await;
    api.fail_on(RemoteCall::Delete(EntityKind::City, ids.talcahuano));

    let outcome = admin.delete(DeleteTarget::Department(ids.biobio), &yes).await;
    assert_eq!(
        outcome,
        Outcome::Failed(MutationError::DeleteFailed {
            target: EntityKind::Department,
            stage: EntityKind::City,
            id: ids.talcahuano,
        })
    );
    assert_eq!(
        api.mutations(),
        vec![
            RemoteCall::Delete(EntityKind::City, ids.concepcion),
            RemoteCall::Delete(EntityKind::City, ids.talcahuano),
        ]
    );
    // No rollback: the first city stays deleted.
    assert!(!api.contains(EntityKind::City, ids.concepcion));
    assert!(api.contains(EntityKind::Department, ids.biobio));
    assert!(admin.snapshot().city(ids.concepcion).is_none());
}

#[tokio::test]
async fn failed_department_stage_leaves_cities_deleted() {
    let (api, mut admin, ids) = loaded_admin().await;
    api.fail_on(RemoteCall::Delete(EntityKind::Department, ids.biobio));

    let outcome = admin.delete(DeleteTarget::Department(ids.biobio), &yes).await;
    let err = outcome.error().unwrap();
    assert_eq!(err.to_string(), "Failed to delete department");
    assert_eq!(api.count(EntityKind::City), 2);
    assert!(api.contains(EntityKind::Department, ids.biobio));
}

#[tokio::test]
async fn country_delete_runs_city_department_country_stages() {
    let (api, mut admin, ids) = loaded_admin().await;
    let plan = admin.plan_delete(DeleteTarget::Country(ids.chile)).unwrap();
    assert_eq!(plan.count(EntityKind::City), 3);
    assert_eq!(plan.count(EntityKind::Department), 2);
    assert_eq!(
        plan.warning().as_deref(),
        Some("This also deletes 2 departments and 3 cities and cannot be undone.")
    );

    let outcome = admin.delete(DeleteTarget::Country(ids.chile), &yes).await;
    assert_eq!(outcome, Outcome::Deleted(EntityKind::Country));
    assert_eq!(
        api.mutations(),
        vec![
            RemoteCall::Delete(EntityKind::City, ids.concepcion),
            RemoteCall::Delete(EntityKind::City, ids.talcahuano),
            RemoteCall::Delete(EntityKind::City, ids.santiago),
            RemoteCall::Delete(EntityKind::Department, ids.biobio),
            RemoteCall::Delete(EntityKind::Department, ids.centro),
            RemoteCall::Delete(EntityKind::Country, ids.chile),
        ]
    );
    let rows = admin.table().rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].country_name, "Perú");
}

#[tokio::test]
async fn country_cascade_stops_at_failing_department_stage() {
    let (api, mut admin, ids) = loaded_admin().await;
    api.fail_on(RemoteCall::Delete(EntityKind::Department, ids.centro));

    let outcome = admin.delete(DeleteTarget::Country(ids.chile), &yes).await;
    assert_eq!(
        outcome.error().map(ToString::to_string).as_deref(),
        Some("Failed to delete the departments of the country")
    );
    assert!(!api
        .mutations()
        .contains(&RemoteCall::Delete(EntityKind::Country, ids.chile)));
    // Both departments were attempted; the sibling stays deleted.
    assert!(!api.contains(EntityKind::Department, ids.biobio));
    assert!(api.contains(EntityKind::Country, ids.chile));
}

#[tokio::test]
async fn single_city_plan_has_no_warning() {
    let (_api, admin, ids) = loaded_admin().await;
    let plan = admin.plan_delete(DeleteTarget::City(ids.miraflores)).unwrap();
    assert_eq!(plan.warning(), None);
    assert_eq!(plan.prompt(), "Delete city \"Miraflores\"?");
}

#[tokio::test]
async fn deleting_unknown_target_reports_not_found() {
    let (api, mut admin, _) = loaded_admin().await;
    let outcome = admin.delete(DeleteTarget::Department(404), &yes).await;
    assert_eq!(
        outcome,
        Outcome::Failed(MutationError::NotFound {
            kind: EntityKind::Department,
            id: 404
        })
    );
    assert!(api.calls().is_empty());
}

// ── Diff-based update ───────────────────────────────────────────

#[tokio::test]
async fn unchanged_name_is_no_changes_without_calls() {
    let api = MemoryApi::new();
    let ids = seed(&api);
    let springfield = api.seed_city("Springfield", ids.centro);
    let mut admin = GeoAdmin::without_flags(api.clients());
    admin.refresh().await;
    api.clear_calls();

    let request = UpdateRequest {
        city: Some(NameEdit::new(springfield, "  Springfield  ")),
        ..Default::default()
    };
    let outcome = admin.update(&request).await;
    assert_eq!(outcome, Outcome::NoChanges);
    assert!(api.calls().is_empty());
    assert_eq!(admin.notice(&outcome).unwrap().level, NoticeLevel::Info);
}

#[tokio::test]
async fn only_changed_names_are_sent() {
    let (api, mut admin, ids) = loaded_admin().await;
    let request = UpdateRequest {
        country: Some(NameEdit::new(ids.chile, "Chile")),
        department: Some(NameEdit::new(ids.biobio, "Bío Bío")),
        city: Some(NameEdit::new(ids.concepcion, "")),
    };
    assert_eq!(admin.update(&request).await, Outcome::Updated { calls: 1 });
    assert_eq!(
        api.mutations(),
        vec![RemoteCall::Update(EntityKind::Department, ids.biobio, "Bío Bío".into())]
    );
    assert_eq!(admin.snapshot().department(ids.biobio).unwrap().name, "Bío Bío");
    assert_eq!(admin.snapshot().department(ids.biobio).unwrap().country_id, ids.chile);
}

#[tokio::test]
async fn explicit_parent_moves_the_record() {
    let (_api, mut admin, ids) = loaded_admin().await;
    let request = UpdateRequest {
        city: Some(NameEdit::new(ids.santiago, "Santiago Centro").with_parent(ids.biobio)),
        ..Default::default()
    };
    assert!(admin.update(&request).await.is_success());
    assert_eq!(admin.snapshot().city(ids.santiago).unwrap().department_id, ids.biobio);
}

#[tokio::test]
async fn invalid_candidate_aborts_whole_update() {
    let (api, mut admin, ids) = loaded_admin().await;
    let request = UpdateRequest {
        country: Some(NameEdit::new(ids.chile, "Chile Continental")),
        city: Some(NameEdit::new(ids.concepcion, "Conce 2")),
        ..Default::default()
    };
    assert_eq!(
        admin.update(&request).await,
        Outcome::Failed(MutationError::InvalidCharacters(EntityKind::City))
    );
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn rename_colliding_with_sibling_aborts() {
    let (api, mut admin, ids) = loaded_admin().await;
    let request = UpdateRequest {
        city: Some(NameEdit::new(ids.concepcion, "talcahuano")),
        ..Default::default()
    };
    assert_eq!(
        admin.update(&request).await,
        Outcome::Failed(MutationError::AlreadyExists(EntityKind::City))
    );
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn case_only_rename_is_a_change_and_not_a_collision() {
    let (api, mut admin, ids) = loaded_admin().await;
    let request = UpdateRequest {
        country: Some(NameEdit::new(ids.chile, "CHILE")),
        ..Default::default()
    };
    assert_eq!(admin.update(&request).await, Outcome::Updated { calls: 1 });
    assert_eq!(
        api.mutations(),
        vec![RemoteCall::Update(EntityKind::Country, ids.chile, "CHILE".into())]
    );
}

#[tokio::test]
async fn any_failed_call_reports_generic_update_error() {
    let (api, mut admin, ids) = loaded_admin().await;
    api.fail_all(EntityKind::Country);
    let request = UpdateRequest {
        country: Some(NameEdit::new(ids.chile, "Chilito")),
        city: Some(NameEdit::new(ids.concepcion, "Conce")),
        ..Default::default()
    };
    let outcome = admin.update(&request).await;
    assert_eq!(outcome, Outcome::Failed(MutationError::UpdateFailed));
    // Both calls were issued concurrently.
    assert_eq!(api.mutations().len(), 2);
}

// ── Edit modal ──────────────────────────────────────────────────

#[tokio::test]
async fn editor_round_trip_closes_on_success() {
    let (api, mut admin, ids) = loaded_admin().await;
    let mut ui = UiState::default();
    let row = admin
        .table()
        .rows()
        .iter()
        .find(|r| r.city_id == Some(ids.miraflores))
        .cloned()
        .unwrap();

    admin.open_editor(&mut ui, &row);
    let editor = ui.editor.as_mut().unwrap();
    assert_eq!(editor.country.as_ref().unwrap().original, "Perú");
    editor.set_name(EntityKind::City, "Barranco");

    assert_eq!(admin.save_editor(&mut ui).await, Outcome::Updated { calls: 1 });
    assert!(ui.editor.is_none());
    assert_eq!(
        api.mutations(),
        vec![RemoteCall::Update(EntityKind::City, ids.miraflores, "Barranco".into())]
    );
}

#[tokio::test]
async fn editor_stays_open_on_validation_error() {
    let (_api, mut admin, _) = loaded_admin().await;
    let mut ui = UiState::default();
    let row = admin.table().rows()[0].clone();
    admin.open_editor(&mut ui, &row);
    ui.editor.as_mut().unwrap().set_name(EntityKind::Department, "Región 8");

    assert!(!admin.save_editor(&mut ui).await.is_success());
    assert!(ui.editor.is_some());

    GeoAdmin::close_editor(&mut ui);
    assert!(ui.editor.is_none());
}

// ── Refresh ─────────────────────────────────────────────────────

#[tokio::test]
async fn search_survives_refresh() {
    let (_api, mut admin, _) = loaded_admin().await;
    let mut ui = UiState::default();
    admin.search(&mut ui, "chile");
    assert_eq!(admin.table().visible().len(), 3);
    admin.refresh().await;
    assert_eq!(admin.table().visible().len(), 3);
    assert_eq!(ui.search, "chile");
}
