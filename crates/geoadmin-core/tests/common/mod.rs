#![allow(dead_code)]

use async_trait::async_trait;
use geoadmin_core::memory::MemoryApi;
use geoadmin_core::{EntityId, FlagLookup, GeoAdmin, GeoAdminError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Ids of the standard fixture.
pub struct Seeded {
    pub chile: EntityId,
    pub peru: EntityId,
    pub biobio: EntityId,
    pub centro: EntityId,
    pub lima: EntityId,
    pub concepcion: EntityId,
    pub talcahuano: EntityId,
    pub santiago: EntityId,
    pub miraflores: EntityId,
}

/// Chile -> Biobío -> {Concepción, Talcahuano}
/// Chile -> Centro -> {Santiago}
/// Perú  -> Lima   -> {Miraflores}
pub fn seed(api: &MemoryApi) -> Seeded {
    let chile = api.seed_country("Chile");
    let peru = api.seed_country("Perú");
    let biobio = api.seed_department("Biobío", chile);
    let centro = api.seed_department("Centro", chile);
    let lima = api.seed_department("Lima", peru);
    let concepcion = api.seed_city("Concepción", biobio);
    let talcahuano = api.seed_city("Talcahuano", biobio);
    let santiago = api.seed_city("Santiago", centro);
    let miraflores = api.seed_city("Miraflores", lima);
    Seeded {
        chile,
        peru,
        biobio,
        centro,
        lima,
        concepcion,
        talcahuano,
        santiago,
        miraflores,
    }
}

/// Seeded store, loaded admin, call log cleared.
pub async fn loaded_admin() -> (MemoryApi, GeoAdmin, Seeded) {
    let api = MemoryApi::new();
    let ids = seed(&api);
    let mut admin = GeoAdmin::without_flags(api.clients());
    assert!(admin.refresh().await.is_success());
    api.clear_calls();
    (api, admin, ids)
}

/// Canned flag directory: `Ok(url)`, `Ok(None)` for unknown names, and an
/// error for names registered as failing.
#[derive(Default)]
pub struct StaticFlags {
    pub hits: HashMap<String, String>,
    pub failing: Vec<String>,
}

impl StaticFlags {
    pub fn with(mut self, name: &str, url: &str) -> Self {
        self.hits.insert(name.to_owned(), url.to_owned());
        self
    }

    pub fn failing(mut self, name: &str) -> Self {
        self.failing.push(name.to_owned());
        self
    }

    pub fn shared(self) -> Arc<dyn FlagLookup> {
        Arc::new(self)
    }
}

#[async_trait]
impl FlagLookup for StaticFlags {
    async fn flag_url(&self, country_name: &str) -> Result<Option<String>> {
        if self.failing.iter().any(|n| n == country_name) {
            return Err(GeoAdminError::Rejected(format!("lookup {country_name}")));
        }
        Ok(self.hits.get(country_name).cloned())
    }
}
