//! Generation batch view.

use crate::error::SpeciesError;
use crate::generation::Generation;
use crate::pokeapi::{fetch_generation, SpeciesSource};
use crate::species::SpeciesRecord;
use crate::ticket::{ApplyPolicy, Ticket, TicketCounter};

pub const BATCH_ERROR_TEXT: &str = "Error fetching data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchFetch {
    pub ticket: Ticket,
    pub generation: Generation,
}

#[derive(Debug)]
pub struct BatchView {
    generation: Generation,
    /// Generation whose records are currently held.
    shown: Option<Generation>,
    records: Vec<SpeciesRecord>,
    error: Option<String>,
    loading: bool,
    tickets: TicketCounter,
}

impl BatchView {
    pub fn new(policy: ApplyPolicy) -> Self {
        Self {
            generation: Generation::default(),
            shown: None,
            records: Vec::new(),
            error: None,
            loading: false,
            tickets: TicketCounter::new(policy),
        }
    }

    /// The selected generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The generation the displayed records belong to, if any are loaded.
    pub fn shown_generation(&self) -> Option<Generation> {
        self.shown
    }

    pub fn records(&self) -> &[SpeciesRecord] {
        &self.records
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Leave the view: back to the first generation, nothing loaded.
    pub fn reset(&mut self) {
        self.tickets.retire_all();
        self.generation = Generation::default();
        self.shown = None;
        self.records.clear();
        self.error = None;
        self.loading = false;
    }

    /// (Re)load the selected generation.
    pub fn load(&mut self) -> BatchFetch {
        self.error = None;
        self.loading = true;
        BatchFetch {
            ticket: self.tickets.issue(),
            generation: self.generation,
        }
    }

    /// Switch generation. Selecting the one already selected does nothing.
    pub fn select_generation(&mut self, generation: Generation) -> Option<BatchFetch> {
        if generation == self.generation {
            return None;
        }
        self.generation = generation;
        Some(self.load())
    }

    /// Apply a finished batch. Returns whether it was still current.
    ///
    /// A failure keeps the previously displayed records.
    pub fn apply(&mut self, fetch: &BatchFetch, result: Result<Vec<SpeciesRecord>, SpeciesError>) -> bool {
        if !self.tickets.accepts(fetch.ticket) {
            tracing::debug!(
                ticket = fetch.ticket.value(),
                generation = fetch.generation.label,
                "discarding stale generation batch"
            );
            return false;
        }

        match result {
            Ok(records) => {
                self.records = records;
                self.shown = Some(fetch.generation);
                self.error = None;
            }
            Err(err) => {
                tracing::error!(generation = fetch.generation.label, "generation fetch failed: {}", err);
                self.error = Some(BATCH_ERROR_TEXT.to_string());
            }
        }
        self.loading = false;
        true
    }

    /// Fetch the selected generation and apply the result.
    pub async fn fetch(&mut self, source: &dyn SpeciesSource) {
        let fetch = self.load();
        let result = fetch_generation(source, fetch.generation).await;
        self.apply(&fetch, result);
    }
}

impl Default for BatchView {
    fn default() -> Self {
        Self::new(ApplyPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GENERATIONS;
    use crate::pokeapi::fake::{url_for, FakeDex};
    use crate::species::fixtures::payload;

    fn record(name: &str) -> SpeciesRecord {
        SpeciesRecord::from_payload(payload(name, 1, 1, &["normal"])).unwrap()
    }

    fn names(view: &BatchView) -> Vec<&str> {
        view.records().iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_initial_load_uses_first_generation() {
        let dex = FakeDex::with_species(&["bulbasaur", "ivysaur", "venusaur"]);
        let mut view = BatchView::default();
        view.fetch(&dex).await;

        assert_eq!(view.generation(), GENERATIONS[0]);
        assert_eq!(*dex.page_requests.lock().unwrap(), vec![(0, 151)]);
        assert_eq!(names(&view), vec!["bulbasaur", "ivysaur", "venusaur"]);
        assert_eq!(view.shown_generation(), Some(GENERATIONS[0]));
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn test_failed_batch_keeps_previous_records() {
        let mut dex = FakeDex::with_species(&["bulbasaur", "ivysaur"]);
        let mut view = BatchView::default();
        view.fetch(&dex).await;

        dex.failing_urls.push(url_for("ivysaur"));
        view.fetch(&dex).await;

        assert_eq!(view.error(), Some(BATCH_ERROR_TEXT));
        assert_eq!(names(&view), vec!["bulbasaur", "ivysaur"]);
        assert!(!view.is_loading());
    }

    #[test]
    fn test_error_clears_on_next_fetch_start() {
        let mut view = BatchView::default();
        let fetch = view.load();
        view.apply(&fetch, Err(SpeciesError::NotFound { name: "x".into() }));
        assert!(view.error().is_some());

        view.select_generation(GENERATIONS[1]).unwrap();
        assert_eq!(view.error(), None);
        assert!(view.is_loading());
    }

    #[test]
    fn test_selecting_current_generation_is_noop() {
        let mut view = BatchView::default();
        assert!(view.select_generation(GENERATIONS[0]).is_none());
        let fetch = view.select_generation(GENERATIONS[3]).unwrap();
        assert_eq!(fetch.generation, GENERATIONS[3]);
        assert!(view.select_generation(GENERATIONS[3]).is_none());
    }

    #[test]
    fn test_overlapping_switches_last_response_wins() {
        let mut view = BatchView::new(ApplyPolicy::LatestResponse);
        let first = view.load();
        let second = view.select_generation(GENERATIONS[1]).unwrap();

        // The newer request finishes first; the older, slower one lands last.
        assert!(view.apply(&second, Ok(vec![record("chikorita")])));
        assert!(view.apply(&first, Ok(vec![record("bulbasaur")])));

        assert_eq!(names(&view), vec!["bulbasaur"]);
        assert_eq!(view.shown_generation(), Some(GENERATIONS[0]));
        assert_eq!(view.generation(), GENERATIONS[1]);
    }

    #[test]
    fn test_overlapping_switches_latest_request_wins() {
        let mut view = BatchView::new(ApplyPolicy::LatestRequest);
        let first = view.load();
        let second = view.select_generation(GENERATIONS[1]).unwrap();

        assert!(view.apply(&second, Ok(vec![record("chikorita")])));
        assert!(!view.apply(&first, Ok(vec![record("bulbasaur")])));

        assert_eq!(names(&view), vec!["chikorita"]);
        assert_eq!(view.shown_generation(), Some(GENERATIONS[1]));
    }

    #[test]
    fn test_stale_result_does_not_clear_loading() {
        let mut view = BatchView::new(ApplyPolicy::LatestRequest);
        let first = view.load();
        let _second = view.select_generation(GENERATIONS[2]).unwrap();

        view.apply(&first, Ok(vec![record("bulbasaur")]));
        assert!(view.is_loading());
        assert!(view.records().is_empty());
    }

    #[test]
    fn test_reset_returns_to_first_generation() {
        let mut view = BatchView::default();
        let fetch = view.select_generation(GENERATIONS[4]).unwrap();
        view.reset();
        assert_eq!(view.generation(), GENERATIONS[0]);
        assert!(!view.apply(&fetch, Ok(vec![record("victini")])));
        assert!(view.records().is_empty());
    }
}
