// crates/geoadmin-core/src/enrich.rs

//! # Flag Enrichment
//!
//! Best-effort: every country is looked up on its own, concurrently, and any
//! miss (error, timeout, empty result, empty name) is dropped silently. The
//! caller shows the table first and swaps the [`FlagSet`] in once the batch
//! settles. Each batch replaces the previous one.

use crate::error::Result;
use crate::model::{Country, EntityId};
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Flag image URLs by country id, each remembering the trimmed name it was
/// found under. A renamed country no longer matches its old entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    entries: HashMap<EntityId, FlagEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FlagEntry {
    looked_up_as: String,
    url: String,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: EntityId, looked_up_as: &str, url: impl Into<String>) {
        self.entries.insert(
            id,
            FlagEntry {
                looked_up_as: looked_up_as.trim().to_owned(),
                url: url.into(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flag for `country`, only while it still carries the name it was found under.
    pub fn url_for(&self, country: &Country) -> Option<&str> {
        self.entries
            .get(&country.id)
            .filter(|e| e.looked_up_as == country.name.trim())
            .map(|e| e.url.as_str())
    }

    /// Drop entries for countries that are gone or were renamed.
    pub fn retain_current(&mut self, countries: &[Country]) {
        let current: HashMap<EntityId, &str> =
            countries.iter().map(|c| (c.id, c.name.trim())).collect();
        self.entries
            .retain(|id, e| current.get(id).is_some_and(|name| *name == e.looked_up_as));
    }
}

impl<N: AsRef<str>, U: Into<String>> FromIterator<(EntityId, N, U)> for FlagSet {
    fn from_iter<I: IntoIterator<Item = (EntityId, N, U)>>(iter: I) -> Self {
        let mut set = FlagSet::new();
        for (id, name, url) in iter {
            set.insert(id, name.as_ref(), url);
        }
        set
    }
}

/// Maps a country display name to a flag image URL.
#[async_trait]
pub trait FlagLookup: Send + Sync {
    /// `Ok(None)` when the directory has no match.
    async fn flag_url(&self, country_name: &str) -> Result<Option<String>>;
}

/// Used when enrichment is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFlags;

#[async_trait]
impl FlagLookup for NoFlags {
    async fn flag_url(&self, _country_name: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// A batch of lookups detached from the store, so it can run on its own task
/// while the table is already on screen.
pub struct EnrichmentJob {
    lookup: Arc<dyn FlagLookup>,
    targets: Vec<(EntityId, String)>,
}

impl EnrichmentJob {
    /// Countries with an empty (trimmed) name are skipped up front.
    pub fn new(lookup: Arc<dyn FlagLookup>, countries: &[Country]) -> Self {
        let targets = countries
            .iter()
            .map(|c| (c.id, c.name.trim().to_owned()))
            .filter(|(_, name)| !name.is_empty())
            .collect();
        Self { lookup, targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Run every lookup concurrently and keep the hits.
    pub async fn run(self) -> FlagSet {
        let lookup = &self.lookup;
        let results = join_all(self.targets.iter().map(|(id, name)| async move {
            match lookup.flag_url(name).await {
                Ok(Some(url)) if !url.is_empty() => Some((*id, name.as_str(), url)),
                Ok(_) => {
                    debug!(country = %name, "no flag found");
                    None
                }
                Err(err) => {
                    debug!(country = %name, error = %err, "flag lookup failed");
                    None
                }
            }
        }))
        .await;
        results.into_iter().flatten().collect()
    }
}

#[cfg(feature = "http")]
pub use self::rest::RestCountriesClient;

#[cfg(feature = "http")]
mod rest {
    use super::FlagLookup;
    use crate::config::AdminConfig;
    use crate::error::{GeoAdminError, Result};
    use async_trait::async_trait;
    use reqwest::Client;
    use serde::Deserialize;
    use url::Url;

    #[derive(Debug, Deserialize)]
    struct DirectoryEntry {
        #[serde(default)]
        flags: Option<FlagImages>,
    }

    #[derive(Debug, Deserialize)]
    struct FlagImages {
        png: Option<String>,
        svg: Option<String>,
    }

    impl FlagImages {
        /// Raster first, vector as fallback.
        fn best(self) -> Option<String> {
            self.png
                .filter(|s| !s.is_empty())
                .or(self.svg.filter(|s| !s.is_empty()))
        }
    }

    /// Lookup against a REST Countries style directory:
    /// `GET <base>/name/<name>?fields=flags,name`.
    #[derive(Debug, Clone)]
    pub struct RestCountriesClient {
        client: Client,
        base: Url,
    }

    impl RestCountriesClient {
        pub fn new(client: Client, base: Url) -> Result<Self> {
            if base.cannot_be_a_base() {
                return Err(GeoAdminError::Config(format!("{base} cannot be used as a flag directory")));
            }
            Ok(Self { client, base })
        }

        pub fn from_config(config: &AdminConfig) -> Result<Self> {
            let client = crate::client::http::build_client(config)?;
            Self::new(client, Url::parse(&config.flag_api_base_url)?)
        }

        fn lookup_url(&self, country_name: &str) -> Url {
            let mut url = self.base.clone();
            if let Ok(mut segments) = url.path_segments_mut() {
                // push() percent-encodes the name
                segments.pop_if_empty().push("name").push(country_name);
            }
            url.query_pairs_mut().append_pair("fields", "flags,name");
            url
        }
    }

    #[async_trait]
    impl FlagLookup for RestCountriesClient {
        async fn flag_url(&self, country_name: &str) -> Result<Option<String>> {
            let response = self.client.get(self.lookup_url(country_name)).send().await?;
            if !response.status().is_success() {
                return Ok(None);
            }
            let entries: Vec<DirectoryEntry> = response.json().await?;
            Ok(entries
                .into_iter()
                .next()
                .and_then(|e| e.flags)
                .and_then(FlagImages::best))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn lookup_url_encodes_name() {
            let client = RestCountriesClient::new(
                Client::new(),
                Url::parse("https://restcountries.com/v3.1").unwrap(),
            )
            .unwrap();
            assert_eq!(
                client.lookup_url("Costa Rica").as_str(),
                "https://restcountries.com/v3.1/name/Costa%20Rica?fields=flags%2Cname"
            );
        }

        #[test]
        fn svg_is_the_fallback() {
            let images = FlagImages {
                png: None,
                svg: Some("https://flags/cl.svg".into()),
            };
            assert_eq!(images.best().as_deref(), Some("https://flags/cl.svg"));
        }
    }
}
