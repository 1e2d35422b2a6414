//! Walkthrough for geoadmin-rs
//!
//! This demo runs an operator session against the in-process store:
//! - Create a country, a department and a city
//! - Reject invalid and duplicate names
//! - Search the joined table
//! - Rename through the edit modal
//! - Delete a department together with its cities

use geoadmin_core::memory::MemoryApi;
use geoadmin_core::{CascadePlan, DeleteTarget, GeoAdmin, Outcome, UiState};

fn show(admin: &GeoAdmin, outcome: &Outcome) {
    match admin.notice(outcome) {
        Some(notice) => println!("[{:?}] {}", notice.level, notice.message),
        None => println!("({outcome:?})"),
    }
}

fn print_table(admin: &GeoAdmin) {
    for row in admin.table().visible() {
        println!(
            "  {} / {} / {}",
            row.country_name, row.department_name, row.city_name
        );
    }
}

#[tokio::main]
async fn main() {
    println!("=== geoadmin-rs Walkthrough ===\n");

    let api = MemoryApi::new();
    let mut admin = GeoAdmin::without_flags(api.clients());
    let mut ui = UiState::default();
    admin.refresh().await;

    // Example 1: build Chile -> Biobío -> Concepción
    println!("--- Example 1: Create the hierarchy ---");
    ui.forms.country_name = "Chile".into();
    let outcome = admin.create_country(&mut ui).await;
    show(&admin, &outcome);
    let Outcome::Created { id: chile, .. } = outcome else {
        return;
    };

    ui.forms.department_name = "Biobío".into();
    admin.select_department_country(&mut ui, Some(chile));
    let outcome = admin.create_department(&mut ui).await;
    show(&admin, &outcome);
    let Outcome::Created { id: biobio, .. } = outcome else {
        return;
    };

    admin.select_city_country(&mut ui, Some(chile));
    admin.select_city_department(&mut ui, Some(biobio));
    for city in ["Concepción", "Talcahuano"] {
        ui.forms.city_name = city.into();
        let outcome = admin.create_city(&mut ui).await;
        show(&admin, &outcome);
    }
    print_table(&admin);
    println!();

    // Example 2: validation happens before any remote call
    println!("--- Example 2: Rejected input ---");
    api.clear_calls();
    ui.forms.country_name = "Peru2".into();
    let outcome = admin.create_country(&mut ui).await;
    show(&admin, &outcome);
    ui.forms.country_name = " chile ".into();
    let outcome = admin.create_country(&mut ui).await;
    show(&admin, &outcome);
    println!("Remote calls made: {}\n", api.calls().len());

    // Example 3: search ignores case and accents
    println!("--- Example 3: Search for \"biobio\" ---");
    admin.search(&mut ui, "biobio");
    print_table(&admin);
    admin.search(&mut ui, "");
    println!();

    // Example 4: rename through the edit modal
    println!("--- Example 4: Edit a row ---");
    if let Some(row) = admin.table().rows().first().cloned() {
        admin.open_editor(&mut ui, &row);
        if let Some(editor) = ui.editor.as_mut() {
            editor.set_name(geoadmin_core::EntityKind::City, "Conce");
        }
        let outcome = admin.save_editor(&mut ui).await;
        show(&admin, &outcome);
        print_table(&admin);
    }
    println!();

    // Example 5: cascading delete
    println!("--- Example 5: Delete the department ---");
    let target = DeleteTarget::Department(biobio);
    if let Some(plan) = admin.plan_delete(target) {
        println!("{}", plan.prompt());
        if let Some(warning) = plan.warning() {
            println!("{warning}");
        }
    }
    api.clear_calls();
    let outcome = admin.delete(target, &|_: &CascadePlan| true).await;
    show(&admin, &outcome);
    for call in api.mutations() {
        println!("  {call:?}");
    }
    println!("Rows left: {}", admin.table().rows().len());
}
