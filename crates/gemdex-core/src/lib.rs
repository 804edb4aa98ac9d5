pub mod ai;
pub mod batch;
pub mod chat;
pub mod config;
pub mod detail;
pub mod error;
pub mod generation;
pub mod input;
pub mod pokeapi;
pub mod species;
pub mod ticket;

// Re-export main types for convenience
pub use ai::{GeminiClient, GenerateResponse, TextGenerator};
pub use batch::{BatchFetch, BatchView};
pub use chat::{ChatLog, ChatSession, Message, PendingSend, Sender};
pub use config::Config;
pub use detail::{DetailFetch, DetailView};
pub use error::{GeminiError, SpeciesError};
pub use generation::{Generation, GENERATIONS};
pub use input::TextInput;
pub use pokeapi::{fetch_generation, fetch_species, PokeApiClient, SpeciesSource};
pub use species::{SpeciesPage, SpeciesRecord, SpeciesRef};
pub use ticket::{ApplyPolicy, Ticket, TicketCounter};
