use std::sync::Arc;

use gemdex_core::{
    fetch_generation, fetch_species, ApplyPolicy, BatchFetch, BatchView, ChatSession, Config, DetailView,
    Generation, SpeciesSource, TextGenerator, GENERATIONS,
};
use ratatui::widgets::{ListState, TableState};
use tokio::sync::mpsc::UnboundedSender;

use crate::tui::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Chat,
    Detail,
    Batch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,

    // Chat state
    pub chat: ChatSession,
    pub chat_scroll: u16,
    pub chat_follow: bool, // keep the newest message in view

    // Pokédex search state
    pub detail: DetailView,
    pub detail_scroll: u16,

    // Generation browser state
    pub batch: BatchView,
    pub generation_state: ListState,
    pub table_state: TableState,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Settings shown in the UI
    pub model: String,
    pub has_api_key: bool,
    pub pokeapi_base_url: String,
    pub default_species: String,

    // Remote services and the channel their results come back on
    generator: Arc<dyn TextGenerator>,
    species: Arc<dyn SpeciesSource>,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        config: &Config,
        generator: Arc<dyn TextGenerator>,
        species: Arc<dyn SpeciesSource>,
        events: UnboundedSender<AppEvent>,
        screen: Screen,
    ) -> Self {
        let mut generation_state = ListState::default();
        generation_state.select(Some(0));

        Self {
            should_quit: false,
            screen,
            input_mode: InputMode::Normal,

            chat: ChatSession::new(),
            chat_scroll: 0,
            chat_follow: true,

            detail: DetailView::new(config.default_species(), ApplyPolicy::LatestRequest),
            detail_scroll: 0,

            batch: BatchView::new(ApplyPolicy::LatestRequest),
            generation_state,
            table_state: TableState::default(),

            animation_frame: 0,

            model: config.gemini_model().to_string(),
            has_api_key: config.resolve_api_key().is_some(),
            pokeapi_base_url: config.pokeapi_base_url().to_string(),
            default_species: config.default_species().to_string(),

            generator,
            species,
            events,
        }
    }

    /// Enter the starting screen, running whatever that screen loads on mount.
    pub fn start(&mut self) {
        self.switch_screen(self.screen);
    }

    /// Show a screen. The Pokédex screens start fresh every time, like remounting a page.
    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        match screen {
            Screen::Chat => {
                self.input_mode = InputMode::Editing;
            }
            Screen::Detail => {
                self.input_mode = InputMode::Normal;
                self.detail.reset(&self.default_species);
                self.detail_scroll = 0;
                self.search_species();
            }
            Screen::Batch => {
                self.input_mode = InputMode::Normal;
                self.batch.reset();
                self.generation_state.select(Some(0));
                self.table_state = TableState::default();
                let fetch = self.batch.load();
                self.spawn_generation(fetch);
            }
        }
    }

    // Chat

    /// Send the chat input. Ignored while a reply is pending.
    pub fn send_chat(&mut self) {
        if self.chat.is_loading() {
            return;
        }
        let Some(pending) = self.chat.begin_send() else {
            return;
        };
        self.chat_follow = true;

        tracing::info!(send = pending.id(), "sending chat message");
        let generator = self.generator.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = generator.generate(pending.prompt()).await;
            let _ = tx.send(AppEvent::ChatReply { pending, result });
        });
    }

    pub fn scroll_chat_down(&mut self) {
        self.chat_follow = false;
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    pub fn scroll_chat_up(&mut self) {
        self.chat_follow = false;
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    // Pokédex search

    pub fn search_species(&mut self) {
        let Some(fetch) = self.detail.begin_fetch() else {
            return;
        };
        self.detail_scroll = 0;

        let species = self.species.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = fetch_species(species.as_ref(), &fetch.name).await;
            let _ = tx.send(AppEvent::SpeciesLoaded { fetch, result });
        });
    }

    pub fn scroll_detail_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    pub fn scroll_detail_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    // Generation browser

    pub fn highlighted_generation(&self) -> Generation {
        self.generation_state
            .selected()
            .and_then(|i| GENERATIONS.get(i).copied())
            .unwrap_or_default()
    }

    pub fn generation_nav_down(&mut self) {
        let i = self.generation_state.selected().map_or(0, |i| (i + 1).min(GENERATIONS.len() - 1));
        self.generation_state.select(Some(i));
    }

    pub fn generation_nav_up(&mut self) {
        let i = self.generation_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.generation_state.select(Some(i));
    }

    /// Load the highlighted generation if it is not the selected one already.
    pub fn choose_generation(&mut self) {
        let generation = self.highlighted_generation();
        if let Some(fetch) = self.batch.select_generation(generation) {
            self.table_state = TableState::default();
            self.spawn_generation(fetch);
        }
    }

    fn spawn_generation(&mut self, fetch: BatchFetch) {
        let species = self.species.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = fetch_generation(species.as_ref(), fetch.generation).await;
            let _ = tx.send(AppEvent::GenerationLoaded { fetch, result });
        });
    }

    pub fn table_nav_down(&mut self) {
        let len = self.batch.records().len();
        if len == 0 {
            return;
        }
        let i = self.table_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.table_state.select(Some(i));
    }

    pub fn table_nav_up(&mut self) {
        if self.batch.records().is_empty() {
            return;
        }
        let i = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(i));
    }

    // Results from background tasks

    pub fn apply_result(&mut self, event: AppEvent) {
        match event {
            AppEvent::ChatReply { pending, result } => {
                self.chat.finish_send(pending, result);
            }
            AppEvent::SpeciesLoaded { fetch, result } => {
                self.detail.apply(&fetch, result);
            }
            AppEvent::GenerationLoaded { fetch, result } => {
                if self.batch.apply(&fetch, result) {
                    let first = (!self.batch.records().is_empty()).then_some(0);
                    self.table_state.select(first);
                }
            }
            AppEvent::Key(_) | AppEvent::Resize(_, _) | AppEvent::Tick => {}
        }
    }

    pub fn tick_animation(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % 3;
    }

    pub fn is_busy(&self) -> bool {
        match self.screen {
            Screen::Chat => self.chat.is_loading(),
            Screen::Detail => self.detail.is_loading(),
            Screen::Batch => self.batch.is_loading(),
        }
    }
}
