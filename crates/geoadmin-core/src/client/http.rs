// crates/geoadmin-core/src/client/http.rs
#![cfg(feature = "http")]

use super::{EntityClient, PersistenceClients};
use crate::config::AdminConfig;
use crate::error::{GeoAdminError, Result};
use crate::model::{City, Country, Department, Entity, EntityDraft, EntityId};
use async_trait::async_trait;
use reqwest::Client;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Persistence client for one collection of the remote REST API.
pub struct HttpCollection<E> {
    client: Client,
    base: Url,
    collection: Vec<String>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> HttpCollection<E> {
    /// `base` is the API root, `collection` the path below it
    /// (e.g. `"countries"` or `"v2/countries"`).
    pub fn new(client: Client, base: Url, collection: &str) -> Result<Self> {
        if base.cannot_be_a_base() {
            return Err(GeoAdminError::Config(format!("{base} cannot be used as an API base")));
        }
        let collection: Vec<String> = collection
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
        if collection.is_empty() {
            return Err(GeoAdminError::Config(format!(
                "empty collection path for {}",
                E::KIND.plural()
            )));
        }
        Ok(Self {
            client,
            base,
            collection,
            _entity: PhantomData,
        })
    }

    fn url(&self, tail: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(self.collection.iter().map(String::as_str))
                .extend(tail);
        }
        url
    }
}

#[async_trait]
impl<E: Entity> EntityClient<E> for HttpCollection<E> {
    async fn list(&self) -> Result<Vec<E>> {
        let url = self.url(&[]);
        debug!(kind = %E::KIND, %url, "list");
        let records = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<E>>()
            .await?;
        Ok(records)
    }

    async fn list_by_parent(&self, parent_id: EntityId) -> Result<Vec<E>> {
        if E::KIND.parent().is_none() {
            return Err(GeoAdminError::Unscoped(E::KIND));
        }
        let parent = parent_id.to_string();
        let url = self.url(&["by-parent", &parent]);
        debug!(kind = %E::KIND, %url, "list by parent");
        let records = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<E>>()
            .await?;
        Ok(records)
    }

    async fn create(&self, draft: &EntityDraft) -> Result<E> {
        let url = self.url(&[]);
        debug!(kind = %E::KIND, %url, name = %draft.name, "create");
        let created = self
            .client
            .post(url)
            .json(&draft.to_wire(E::KIND, None))
            .send()
            .await?
            .error_for_status()?
            .json::<E>()
            .await?;
        Ok(created)
    }

    async fn update(&self, id: EntityId, draft: &EntityDraft) -> Result<()> {
        let id_segment = id.to_string();
        let url = self.url(&[&id_segment]);
        debug!(kind = %E::KIND, %url, name = %draft.name, "update");
        self.client
            .put(url)
            .json(&draft.to_wire(E::KIND, Some(id)))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        let id_segment = id.to_string();
        let url = self.url(&[&id_segment]);
        debug!(kind = %E::KIND, %url, "delete");
        self.client.delete(url).send().await?.error_for_status()?;
        Ok(())
    }
}

/// Shared reqwest client honoring the configured timeout.
pub fn build_client(config: &AdminConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    Ok(client)
}

impl PersistenceClients {
    /// HTTP clients for the three collections described by `config`.
    pub fn http(config: &AdminConfig) -> Result<Self> {
        let client = build_client(config)?;
        let base = Url::parse(&config.api_base_url)?;
        let paths = &config.collections;
        Ok(Self::new(
            Arc::new(HttpCollection::<Country>::new(client.clone(), base.clone(), &paths.countries)?),
            Arc::new(HttpCollection::<Department>::new(client.clone(), base.clone(), &paths.departments)?),
            Arc::new(HttpCollection::<City>::new(client, base, &paths.cities)?),
        ))
    }
}
