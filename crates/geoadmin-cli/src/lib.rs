//! geoadmin-cli
//! ============
//!
//! Operator console for the `geoadmin-core` country / department / city store.
//!
//! This crate primarily provides a binary (`geoadmin`). The library target
//! only exists so that the overview below renders as documentation.
//!
//! Quick start
//! -----------
//!
//! ```text
//! geoadmin --api-url http://localhost:5000/api list
//! geoadmin list --search biobio
//! geoadmin add-country Chile
//! geoadmin add-department "Biobío" --country 1
//! geoadmin add-city "Concepción" --department 1
//! geoadmin edit --city 1=Conce
//! geoadmin delete department 1
//! ```
//!
//! Configuration
//! -------------
//!
//! Settings are layered: built-in defaults, then `--config <file.toml>`
//! (or `GEOADMIN_CONFIG`), then `--api-url` (or `GEOADMIN_API_URL`), then
//! `--no-flags`. Logging goes to stderr; raise it with `-v` or `RUST_LOG`.
//!
//! For programmatic access use the `geoadmin-core` crate directly.
