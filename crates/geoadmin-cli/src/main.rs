//! geoadmin - operator console for geoadmin-core
//!
//! Loads the whole hierarchy from the persistence API, runs one command
//! against it and prints the outcome. Commands that change data print the
//! refreshed table afterwards.
//!
//! Usage examples
//! --------------
//!
//! - Show the table, optionally filtered (accent- and case-insensitive)
//!   $ geoadmin list
//!   $ geoadmin list --search biobio
//!
//! - Create records
//!   $ geoadmin add-country Chile
//!   $ geoadmin add-department "Biobío" --country 1
//!   $ geoadmin add-city "Concepción" --department 1
//!
//! - Rename by id, or through a table row
//!   $ geoadmin edit --department 1="Bío Bío"
//!   $ geoadmin edit-row 3 --city Conce
//!
//! - Delete with cascade (asks first unless --yes)
//!   $ geoadmin delete country 1
mod args;
mod prompt;
mod render;

use crate::args::{CliArgs, Commands};
use crate::prompt::StdinConfirm;
use anyhow::Context;
use clap::Parser;
use geoadmin_core::{
    AdminConfig, DeleteTarget, EntityKind, FlagSet, GeoAdmin, NameEdit, Outcome, UiState,
    UpdateRequest,
};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// defaults < --config < --api-url / GEOADMIN_API_URL < --no-flags
fn load_config(args: &CliArgs) -> anyhow::Result<AdminConfig> {
    let mut config = match &args.config {
        Some(path) => AdminConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AdminConfig::default(),
    };
    if let Some(url) = &args.api_url {
        config.api_base_url = url.clone();
    }
    if args.no_flags {
        config.enrich_flags = false;
    }
    config.validate()?;
    debug!(api = %config.api_base_url, flags = config.enrich_flags, "configuration");
    Ok(config)
}

/// Run the batch queued by the last refresh on its own task, then fold it in.
async fn load_flags(admin: &mut GeoAdmin) {
    let Some(job) = admin.take_enrichment() else {
        return;
    };
    let task: JoinHandle<FlagSet> = tokio::spawn(job.run());
    match task.await {
        Ok(flags) => admin.apply_flags(flags),
        Err(err) => warn!(error = %err, "flag lookup task failed"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    let mut admin = GeoAdmin::from_config(&config)?;
    let mut ui = UiState::default();

    if let Outcome::Failed(err) = admin.refresh().await {
        anyhow::bail!("{err} from {}", config.api_base_url);
    }
    let outcome = match args.command {
        Commands::List { search } => {
            load_flags(&mut admin).await;
            if let Some(query) = search {
                admin.search(&mut ui, &query);
            }
            let visible = admin.table().visible();
            if visible.is_empty() {
                println!("No rows");
            } else {
                print!("{}", render::table(visible));
            }
            return Ok(());
        }

        Commands::Countries => {
            for c in &admin.snapshot().countries {
                println!("{:>5}  {}", c.id, c.name);
            }
            return Ok(());
        }

        Commands::Departments { country_id } => {
            let name = admin
                .snapshot()
                .country(country_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("country {country_id}"));
            let departments = admin.store_mut().departments_of(country_id).await?;
            println!("Departments in {name}:");
            for d in departments {
                println!("{:>5}  {}", d.id, d.name);
            }
            return Ok(());
        }

        Commands::Cities { department_id } => {
            let name = admin
                .snapshot()
                .department(department_id)
                .map(|d| d.name.clone())
                .unwrap_or_else(|| format!("department {department_id}"));
            let cities = admin.store_mut().cities_of(department_id).await?;
            println!("Cities in {name}:");
            for c in cities {
                println!("{:>5}  {}", c.id, c.name);
            }
            return Ok(());
        }

        Commands::AddCountry { name } => {
            ui.forms.country_name = name;
            admin.create_country(&mut ui).await
        }

        Commands::AddDepartment { name, country } => {
            ui.forms.department_name = name;
            admin.select_department_country(&mut ui, country);
            admin.create_department(&mut ui).await
        }

        Commands::AddCity { name, department } => {
            ui.forms.city_name = name;
            admin.select_city_department(&mut ui, department);
            admin.create_city(&mut ui).await
        }

        Commands::Edit {
            country,
            department,
            city,
            department_country,
            city_department,
        } => {
            let request = UpdateRequest {
                country: country.map(|(id, name)| NameEdit::new(id, name)),
                department: department.map(|(id, name)| {
                    let edit = NameEdit::new(id, name);
                    match department_country {
                        Some(parent) => edit.with_parent(parent),
                        None => edit,
                    }
                }),
                city: city.map(|(id, name)| {
                    let edit = NameEdit::new(id, name);
                    match city_department {
                        Some(parent) => edit.with_parent(parent),
                        None => edit,
                    }
                }),
            };
            admin.update(&request).await
        }

        Commands::EditRow {
            city_id,
            country,
            department,
            city,
        } => {
            let row = admin
                .table()
                .rows()
                .iter()
                .find(|r| r.city_id == Some(city_id))
                .cloned()
                .with_context(|| format!("no table row for city {city_id}"))?;
            admin.open_editor(&mut ui, &row);
            if let Some(editor) = ui.editor.as_mut() {
                for (kind, name) in [
                    (EntityKind::Country, country),
                    (EntityKind::Department, department),
                    (EntityKind::City, city),
                ] {
                    if let Some(name) = name {
                        editor.set_name(kind, &name);
                    }
                }
            }
            admin.save_editor(&mut ui).await
        }

        Commands::Delete { kind, id, yes } => {
            let target = DeleteTarget::new(kind.into(), id);
            admin
                .delete(target, &StdinConfirm { assume_yes: yes })
                .await
        }
    };

    if let Some(err) = outcome.error() {
        anyhow::bail!("{err}");
    }
    if let Some(notice) = admin.notice(&outcome) {
        render::notice(&notice);
    }
    if matches!(outcome, Outcome::Cancelled) {
        return Ok(());
    }

    // The batch queued by the post-mutation refresh, so new or renamed
    // countries are looked up under their current names.
    load_flags(&mut admin).await;
    print!("{}", render::table(admin.table().visible()));
    Ok(())
}
