use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use geoadmin_core::{EntityId, EntityKind};
use std::path::PathBuf;

/// CLI arguments for geoadmin
#[derive(Debug, Parser)]
#[command(
    name = "geoadmin",
    version,
    about = "Manage countries, departments and cities in a remote geoadmin store"
)]
pub struct CliArgs {
    /// Path to a TOML config file
    #[arg(short = 'c', long = "config", env = "GEOADMIN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Root of the persistence API (e.g. http://localhost:5000/api)
    #[arg(long = "api-url", env = "GEOADMIN_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Do not look up country flags
    #[arg(long = "no-flags", global = true)]
    pub no_flags: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the joined country / department / city table
    List {
        /// Only rows whose country, department or city contains this text
        #[arg(short = 's', long = "search")]
        search: Option<String>,
    },

    /// List all countries
    Countries,

    /// List the departments of one country (asks the server)
    Departments {
        /// Country id
        country_id: EntityId,
    },

    /// List the cities of one department (asks the server)
    Cities {
        /// Department id
        department_id: EntityId,
    },

    /// Create a country
    AddCountry {
        name: String,
    },

    /// Create a department inside a country
    AddDepartment {
        name: String,

        /// Id of the owning country
        #[arg(long = "country")]
        country: Option<EntityId>,
    },

    /// Create a city inside a department
    AddCity {
        name: String,

        /// Id of the owning department
        #[arg(long = "department")]
        department: Option<EntityId>,
    },

    /// Rename records by id; only names that changed are sent
    Edit {
        /// Country rename as ID=NAME
        #[arg(long = "country", value_name = "ID=NAME", value_parser = parse_rename)]
        country: Option<(EntityId, String)>,

        /// Department rename as ID=NAME
        #[arg(long = "department", value_name = "ID=NAME", value_parser = parse_rename)]
        department: Option<(EntityId, String)>,

        /// City rename as ID=NAME
        #[arg(long = "city", value_name = "ID=NAME", value_parser = parse_rename)]
        city: Option<(EntityId, String)>,

        /// Move the edited department to this country
        #[arg(long = "department-country", requires = "department")]
        department_country: Option<EntityId>,

        /// Move the edited city to this department
        #[arg(long = "city-department", requires = "city")]
        city_department: Option<EntityId>,
    },

    /// Edit the table row of one city (country, department and city names)
    EditRow {
        /// City id of the row
        city_id: EntityId,

        /// New country name
        #[arg(long = "country")]
        country: Option<String>,

        /// New department name
        #[arg(long = "department")]
        department: Option<String>,

        /// New city name
        #[arg(long = "city")]
        city: Option<String>,
    },

    /// Delete a record and everything below it
    Delete {
        kind: KindArg,

        id: EntityId,

        /// Do not ask for confirmation
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Country,
    Department,
    City,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Country => EntityKind::Country,
            KindArg::Department => EntityKind::Department,
            KindArg::City => EntityKind::City,
        }
    }
}

/// `ID=NAME`; the name may be empty (meaning "leave unchanged").
fn parse_rename(s: &str) -> Result<(EntityId, String), String> {
    let (id, name) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=NAME, got `{s}`"))?;
    let id = id
        .trim()
        .parse::<EntityId>()
        .map_err(|e| format!("invalid id `{id}`: {e}"))?;
    Ok((id, name.to_owned()))
}
