//! Failure handling example for geoadmin-rs
//!
//! This demo shows what the operator sees when the remote store fails:
//! - A failed create keeps the form input
//! - A cascade stops at the failing stage and nothing is rolled back
//! - A failed refresh keeps the last good table

use geoadmin_core::memory::{MemoryApi, RemoteCall};
use geoadmin_core::{CascadePlan, DeleteTarget, EntityKind, GeoAdmin, UiState};

#[tokio::main]
async fn main() {
    println!("=== geoadmin-rs Failure Injection Example ===\n");

    let api = MemoryApi::new();
    let peru = api.seed_country("Perú");
    let lima = api.seed_department("Lima", peru);
    let miraflores = api.seed_city("Miraflores", lima);
    let barranco = api.seed_city("Barranco", lima);

    let mut admin = GeoAdmin::without_flags(api.clients());
    let mut ui = UiState::default();
    admin.refresh().await;

    println!("--- Example 1: Create while the city collection is down ---");
    api.fail_all(EntityKind::City);
    ui.forms.city_department = Some(lima);
    ui.forms.city_name = "Callao".into();
    let outcome = admin.create_city(&mut ui).await;
    if let Some(err) = outcome.error() {
        println!("Error: {err}");
    }
    println!("Form still holds: {:?}\n", ui.forms.city_name);
    api.heal();

    println!("--- Example 2: Cascade stopped by one failing city ---");
    api.fail_on(RemoteCall::Delete(EntityKind::City, barranco));
    let outcome = admin
        .delete(DeleteTarget::Department(lima), &|_: &CascadePlan| true)
        .await;
    if let Some(err) = outcome.error() {
        println!("Error: {err}");
    }
    println!("Miraflores still stored: {}", api.contains(EntityKind::City, miraflores));
    println!("Lima still stored: {}\n", api.contains(EntityKind::Department, lima));
    api.heal();

    println!("--- Example 3: Refresh failure keeps the old table ---");
    let before = admin.table().rows().len();
    api.fail_all(EntityKind::Country);
    let outcome = admin.refresh().await;
    if let Some(err) = outcome.error() {
        println!("Error: {err}");
    }
    println!("Rows before: {before}, rows now: {}", admin.table().rows().len());
}
