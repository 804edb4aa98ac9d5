//! Single-species lookup view.

use crate::error::SpeciesError;
use crate::input::TextInput;
use crate::pokeapi::{fetch_species, normalize_name, SpeciesSource};
use crate::species::SpeciesRecord;
use crate::ticket::{ApplyPolicy, Ticket, TicketCounter};

pub const DEFAULT_SEARCH: &str = "pikachu";
pub const NOT_FOUND_TEXT: &str = "Pokémon not found";

/// A lookup that has been started and not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFetch {
    pub ticket: Ticket,
    pub name: String,
}

#[derive(Debug)]
pub struct DetailView {
    search: TextInput,
    record: Option<SpeciesRecord>,
    error: Option<String>,
    loading: bool,
    show_raw: bool,
    tickets: TicketCounter,
}

impl DetailView {
    pub fn new(default_search: &str, policy: ApplyPolicy) -> Self {
        Self {
            search: TextInput::new(default_search),
            record: None,
            error: None,
            loading: false,
            show_raw: false,
            tickets: TicketCounter::new(policy),
        }
    }

    pub fn search(&self) -> &TextInput {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut TextInput {
        &mut self.search
    }

    pub fn record(&self) -> Option<&SpeciesRecord> {
        self.record.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn show_raw(&self) -> bool {
        self.show_raw
    }

    pub fn toggle_raw(&mut self) {
        self.show_raw = !self.show_raw;
    }

    /// Leave the view: forget everything and ignore lookups still in flight.
    pub fn reset(&mut self, default_search: &str) {
        self.tickets.retire_all();
        self.search.set(default_search);
        self.record = None;
        self.error = None;
        self.loading = false;
        self.show_raw = false;
    }

    /// Start a lookup for the current search text.
    ///
    /// Clears the previous record and error. Returns `None` for a blank search.
    pub fn begin_fetch(&mut self) -> Option<DetailFetch> {
        if self.search.is_blank() {
            return None;
        }

        self.record = None;
        self.error = None;
        self.loading = true;

        Some(DetailFetch {
            ticket: self.tickets.issue(),
            name: normalize_name(self.search.as_str()),
        })
    }

    /// Apply a finished lookup. Returns whether it was still current.
    pub fn apply(&mut self, fetch: &DetailFetch, result: Result<SpeciesRecord, SpeciesError>) -> bool {
        if !self.tickets.accepts(fetch.ticket) {
            tracing::debug!(ticket = fetch.ticket.value(), name = %fetch.name, "discarding stale species lookup");
            return false;
        }

        match result {
            Ok(record) => {
                tracing::info!(name = %record.name, "species loaded");
                self.record = Some(record);
                self.error = None;
            }
            Err(err) => {
                tracing::error!(name = %fetch.name, "species lookup failed: {}", err);
                self.record = None;
                self.error = Some(NOT_FOUND_TEXT.to_string());
            }
        }
        self.loading = false;
        true
    }

    /// Look up the current search text and apply the result.
    pub async fn fetch(&mut self, source: &dyn SpeciesSource) {
        let Some(fetch) = self.begin_fetch() else {
            return;
        };
        let result = fetch_species(source, &fetch.name).await;
        self.apply(&fetch, result);
    }
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH, ApplyPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokeapi::fake::FakeDex;
    use crate::species::fixtures::payload;

    fn pikachu_dex() -> FakeDex {
        FakeDex {
            species: vec![
                ("pikachu".to_string(), payload("pikachu", 4, 60, &["electric"])),
                ("charizard".to_string(), payload("charizard", 17, 905, &["fire", "flying"])),
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_default_search_fetches_pikachu() {
        let dex = pikachu_dex();
        let mut view = DetailView::default();
        view.fetch(&dex).await;

        let record = view.record().unwrap();
        assert_eq!(record.heading(), "PIKACHU");
        assert_eq!(record.height, 4);
        assert_eq!(record.weight, 60);
        assert_eq!(record.types_joined(), "electric");
        assert!(!view.is_loading());
        assert_eq!(view.error(), None);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let dex = pikachu_dex();
        let mut view = DetailView::default();
        view.search_mut().set("ChArIzArD");
        view.fetch(&dex).await;

        let record = view.record().unwrap();
        assert_eq!(record.types_joined(), "fire, flying");
    }

    #[tokio::test]
    async fn test_not_found_clears_record_and_sets_error() {
        let dex = pikachu_dex();
        let mut view = DetailView::default();
        view.fetch(&dex).await;
        assert!(view.record().is_some());

        view.search_mut().set("digimon");
        view.fetch(&dex).await;

        assert!(view.record().is_none());
        assert_eq!(view.error(), Some(NOT_FOUND_TEXT));
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn test_success_after_error_clears_error() {
        let dex = pikachu_dex();
        let mut view = DetailView::new("missingno", ApplyPolicy::LatestRequest);
        view.fetch(&dex).await;
        assert!(view.error().is_some());

        view.search_mut().set("pikachu");
        view.fetch(&dex).await;
        assert_eq!(view.error(), None);
        assert!(view.record().is_some());
    }

    #[test]
    fn test_blank_search_is_noop() {
        let mut view = DetailView::new("   ", ApplyPolicy::LatestRequest);
        assert!(view.begin_fetch().is_none());
        assert!(!view.is_loading());
    }

    #[test]
    fn test_fetch_start_discards_previous_record() {
        let mut view = DetailView::default();
        let first = view.begin_fetch().unwrap();
        let record = SpeciesRecord::from_payload(payload("pikachu", 4, 60, &["electric"])).unwrap();
        assert!(view.apply(&first, Ok(record)));

        view.begin_fetch().unwrap();
        assert!(view.record().is_none());
        assert!(view.is_loading());
    }

    #[test]
    fn test_stale_lookup_is_discarded_under_latest_request() {
        let mut view = DetailView::default();
        let slow = view.begin_fetch().unwrap();
        view.search_mut().set("charizard");
        let fast = view.begin_fetch().unwrap();

        let charizard = SpeciesRecord::from_payload(payload("charizard", 17, 905, &["fire"])).unwrap();
        let pikachu = SpeciesRecord::from_payload(payload("pikachu", 4, 60, &["electric"])).unwrap();

        assert!(view.apply(&fast, Ok(charizard)));
        assert!(!view.apply(&slow, Ok(pikachu)));
        assert_eq!(view.record().map(|r| r.name.as_str()), Some("charizard"));
    }

    #[test]
    fn test_reset_ignores_lookups_in_flight() {
        let mut view = DetailView::new("pikachu", ApplyPolicy::LatestResponse);
        let pending = view.begin_fetch().unwrap();
        view.reset(DEFAULT_SEARCH);

        let record = SpeciesRecord::from_payload(payload("pikachu", 4, 60, &["electric"])).unwrap();
        assert!(!view.apply(&pending, Ok(record)));
        assert!(view.record().is_none());
        assert_eq!(view.search().as_str(), DEFAULT_SEARCH);
    }
}
