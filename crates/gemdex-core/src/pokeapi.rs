//! PokeAPI access: the HTTP client and the two fetch operations the views use.

use async_trait::async_trait;
use futures_util::future::try_join_all;
use reqwest::Client;
use serde_json::Value;

use crate::error::SpeciesError;
use crate::generation::Generation;
use crate::species::{detail_endpoint, SpeciesPage, SpeciesRecord};

pub const DEFAULT_POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Where species payloads come from.
#[async_trait]
pub trait SpeciesSource: Send + Sync {
    /// Detail payload by (already normalised) name.
    async fn species_by_name(&self, name: &str) -> Result<Value, SpeciesError>;

    /// Detail payload by the `url` handed out by the list endpoint.
    async fn species_by_url(&self, url: &str) -> Result<Value, SpeciesError>;

    async fn species_page(&self, offset: u32, limit: u32) -> Result<SpeciesPage, SpeciesError>;
}

#[derive(Clone)]
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, url: &str) -> Result<Value, SpeciesError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(SpeciesError::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl SpeciesSource for PokeApiClient {
    async fn species_by_name(&self, name: &str) -> Result<Value, SpeciesError> {
        let url = detail_endpoint(&self.base_url, name);
        match self.get_json(&url).await {
            Err(SpeciesError::Status { .. }) => Err(SpeciesError::NotFound {
                name: name.to_string(),
            }),
            other => other,
        }
    }

    async fn species_by_url(&self, url: &str) -> Result<Value, SpeciesError> {
        self.get_json(url).await
    }

    async fn species_page(&self, offset: u32, limit: u32) -> Result<SpeciesPage, SpeciesError> {
        let url = format!("{}/pokemon", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SpeciesError::Status {
                status: response.status(),
                url,
            });
        }

        Ok(response.json::<SpeciesPage>().await?)
    }
}

/// Normalise a search string into a lookup key.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Fetch one species by name.
pub async fn fetch_species(source: &dyn SpeciesSource, name: &str) -> Result<SpeciesRecord, SpeciesError> {
    let key = normalize_name(name);
    tracing::info!(name = %key, "fetching species");

    let payload = source.species_by_name(&key).await?;
    SpeciesRecord::from_payload(payload)
}

/// Fetch every species of a generation.
///
/// Lists the references first, then resolves all of them concurrently.
/// The output follows list order whatever order the lookups finish in,
/// and a single failed lookup fails the whole batch.
pub async fn fetch_generation(
    source: &dyn SpeciesSource,
    generation: Generation,
) -> Result<Vec<SpeciesRecord>, SpeciesError> {
    tracing::info!(
        generation = generation.label,
        offset = generation.offset,
        limit = generation.count,
        "fetching generation"
    );

    let page = source.species_page(generation.offset, generation.count).await?;

    let lookups = page.results.iter().map(|reference| async move {
        let payload = source.species_by_url(&reference.url).await?;
        SpeciesRecord::from_payload(payload)
    });

    let records = try_join_all(lookups).await?;
    tracing::info!(generation = generation.label, count = records.len(), "generation loaded");
    Ok(records)
}


#[cfg(test)]
mod tests {
    use super::fake::{url_for, FakeDex};
    use super::*;

    fn generation(offset: u32, count: u32) -> Generation {
        Generation { label: "Test", offset, count }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  PiKaChU "), "pikachu");
    }

    #[tokio::test]
    async fn test_fetch_species_lowercases_before_lookup() {
        let dex = FakeDex::with_species(&["pikachu"]);
        let record = fetch_species(&dex, "PIKACHU").await.unwrap();
        assert_eq!(record.name, "pikachu");
    }

    #[tokio::test]
    async fn test_fetch_species_unknown_name_is_not_found() {
        let dex = FakeDex::with_species(&["pikachu"]);
        let err = fetch_species(&dex, "agumon").await.unwrap_err();
        assert!(matches!(err, SpeciesError::NotFound { .. }));
        assert_eq!(err.to_string(), "Pokémon not found");
    }

    #[tokio::test]
    async fn test_generation_returns_count_entries_in_list_order() {
        let dex = FakeDex::with_species(&["bulbasaur", "ivysaur", "venusaur", "charmander", "charmeleon"]);
        let records = fetch_generation(&dex, generation(1, 3)).await.unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ivysaur", "venusaur", "charmander"]);
        assert_eq!(*dex.page_requests.lock().unwrap(), vec![(1, 3)]);
    }

    #[tokio::test]
    async fn test_generation_order_survives_out_of_order_completion() {
        let mut dex = FakeDex::with_species(&["bulbasaur", "ivysaur", "venusaur"]);
        // The first lookup cannot finish until the second one has.
        dex.hold = Some(("bulbasaur".to_string(), "ivysaur".to_string()));

        let records = fetch_generation(&dex, generation(0, 3)).await.unwrap();

        let completed = dex.completion_order.lock().unwrap().clone();
        let pos = |n: &str| completed.iter().position(|c| c == n).unwrap();
        assert!(pos("ivysaur") < pos("bulbasaur"));

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["bulbasaur", "ivysaur", "venusaur"]);
    }

    #[tokio::test]
    async fn test_generation_fails_when_any_lookup_fails() {
        let mut dex = FakeDex::with_species(&["bulbasaur", "ivysaur", "venusaur"]);
        dex.failing_urls.push(url_for("venusaur"));

        let result = fetch_generation(&dex, generation(0, 3)).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_client_trims_base_url() {
        let client = PokeApiClient::new("https://pokeapi.co/api/v2/");
        assert_eq!(client.base_url(), "https://pokeapi.co/api/v2");
    }
}
