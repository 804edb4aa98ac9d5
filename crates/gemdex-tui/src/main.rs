use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use gemdex_core::{
    fetch_generation, BatchView, ChatSession, Config, DetailView, Generation, Sender, SpeciesRecord, GENERATIONS,
};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::{App, Screen};
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "gemdex")]
#[command(about = "Chat with Gemini and browse the Pokédex from your terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive terminal UI (default)
    Tui {
        /// Screen to start on
        #[arg(short, long, value_enum, default_value_t = StartScreen::Chat)]
        screen: StartScreen,
    },
    /// Send one message to Gemini and print the reply
    Ask {
        /// Message text
        text: String,
    },
    /// Look up a Pokémon by name
    Pokemon {
        /// Pokémon name (case-insensitive)
        name: String,
        /// Also print the raw JSON returned by the API
        #[arg(short, long)]
        raw: bool,
    },
    /// List every Pokémon of a generation
    Generation {
        /// Generation number (1-8)
        number: usize,
    },
    /// List the available generations
    Generations,
    /// Show or update the config file
    Config {
        /// Store a Gemini API key
        #[arg(long)]
        api_key: Option<String>,
        /// Gemini model to use
        #[arg(long)]
        model: Option<String>,
        /// Species the Pokédex search starts with
        #[arg(long)]
        default_species: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StartScreen {
    Chat,
    Dex,
    Generations,
}

impl From<StartScreen> for Screen {
    fn from(screen: StartScreen) -> Self {
        match screen {
            StartScreen::Chat => Screen::Chat,
            StartScreen::Dex => Screen::Detail,
            StartScreen::Generations => Screen::Batch,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;

    let command = cli.command.unwrap_or(Commands::Tui { screen: StartScreen::Chat });
    if !matches!(command, Commands::Tui { .. }) {
        logging::init_stderr();
    }

    match command {
        Commands::Tui { screen } => run_tui(&config, screen.into()).await?,
        Commands::Ask { text } => ask(&config, &text).await?,
        Commands::Pokemon { name, raw } => show_pokemon(&config, &name, raw).await?,
        Commands::Generation { number } => show_generation(&config, number).await?,
        Commands::Generations => list_generations(),
        Commands::Config { api_key, model, default_species } => {
            configure(config, api_key, model, default_species)?
        }
    }

    Ok(())
}

async fn run_tui(config: &Config, screen: Screen) -> Result<()> {
    let log_path = logging::init_file(&Config::get_data_dir()?)?;
    tracing::info!(log = %log_path.display(), "starting gemdex");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let mut app = App::new(
        config,
        Arc::new(config.gemini_client()),
        Arc::new(config.pokeapi_client()),
        events.sender(),
        screen,
    );
    app.start();

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}

async fn ask(config: &Config, text: &str) -> Result<()> {
    let client = config.gemini_client();
    if !client.has_api_key() {
        println!("{}", "No Gemini API key found.".yellow());
        println!("Set {} or run: {}", "GEMINI_API_KEY".bold(), "gemdex config --api-key <KEY>".bold());
    }

    let mut session = ChatSession::new();
    session.set_input(text);
    session.send_message(&client).await;

    if session.log().is_empty() {
        println!("{}", "Nothing to send".red());
        return Ok(());
    }

    for message in session.log() {
        match message.sender {
            Sender::User => println!("{} {}", "You:".bold().cyan(), message.text),
            Sender::Bot => println!("{} {}", "Gemini:".bold().yellow(), message.text),
        }
    }

    Ok(())
}

async fn show_pokemon(config: &Config, name: &str, raw: bool) -> Result<()> {
    let client = config.pokeapi_client();

    let mut view = DetailView::new(name, Default::default());
    println!("{}", "Fetching data from Pokémon API...".dimmed());
    view.fetch(&client).await;

    if let Some(error) = view.error() {
        println!("{}", error.red());
        return Ok(());
    }

    let Some(record) = view.record() else {
        println!("{}", "Enter a Pokémon name".red());
        return Ok(());
    };

    println!("\n{}", record.heading().bold().yellow());
    println!("{}", "=".repeat(30).dimmed());
    print_record_fields(record);
    println!("{} GET (retrieve data)", "HTTP Method Used:".bold());
    println!("{} {}", "Endpoint Used:".bold(), record.endpoint(client.base_url()));

    if raw {
        println!("\n{}", "Raw JSON Data".bold().blue());
        println!("{}", record.raw_pretty());
    }

    Ok(())
}

fn print_record_fields(record: &SpeciesRecord) {
    println!(
        "{} {}",
        "Image:".bold(),
        record.image_url.as_deref().unwrap_or("(none)").blue()
    );
    println!("{} {}", "Height:".bold(), record.height);
    println!("{} {}", "Weight:".bold(), record.weight);
    println!("{} {}", "Types:".bold(), record.types_joined());
}

async fn show_generation(config: &Config, number: usize) -> Result<()> {
    let generation = Generation::by_number(number)
        .ok_or_else(|| anyhow!("Generation must be between 1 and {}", GENERATIONS.len()))?;
    let client = config.pokeapi_client();

    let mut view = BatchView::default();
    let fetch = view.select_generation(generation).unwrap_or_else(|| view.load());

    println!("{}", format!("Loading {} ({} Pokémon)...", generation.label, generation.count).dimmed());
    let result = fetch_generation(&client, fetch.generation).await;
    view.apply(&fetch, result);

    if let Some(error) = view.error() {
        println!("{}", error.red());
        return Ok(());
    }

    println!("\n{}", format!("{} Pokémon", generation.label).bold().blue());
    println!("{}", "=".repeat(60).dimmed());
    println!(
        "{}",
        format!("{:<4} {:<14} {:>6} {:>6}  {}", "#", "Name", "Height", "Weight", "Type").bold()
    );

    for (i, record) in view.records().iter().enumerate() {
        println!(
            "{:<4} {:<14} {:>6} {:>6}  {}",
            (generation.offset as usize + i + 1).to_string().dimmed(),
            record.heading().yellow(),
            record.height,
            record.weight,
            record.types_joined()
        );
    }

    println!("\n{} Pokémon displayed", view.records().len().to_string().bold());
    Ok(())
}

fn list_generations() {
    println!("\n{}", "Generations".bold().blue());
    println!("{}", "=".repeat(40).dimmed());

    for (i, generation) in GENERATIONS.iter().enumerate() {
        println!(
            "  {} {:<16} {}",
            (i + 1).to_string().bold(),
            generation.label.green(),
            format!("#{}-#{}", generation.offset + 1, generation.offset + generation.count).dimmed()
        );
    }
}

fn configure(
    mut config: Config,
    api_key: Option<String>,
    model: Option<String>,
    default_species: Option<String>,
) -> Result<()> {
    let path = Config::get_config_path()?;
    let changed = api_key.is_some() || model.is_some() || default_species.is_some();

    if let Some(key) = api_key {
        config.gemini_api_key = Some(key);
    }
    if let Some(model) = model {
        config.gemini_model = Some(model);
    }
    if let Some(species) = default_species {
        config.default_species = Some(species);
    }

    if changed {
        config.save()?;
        println!("{} {}", "Saved".green(), path.display());
    } else {
        println!("{} {}", "Config file:".bold(), path.display());
    }

    let key_source = if std::env::var(gemdex_core::config::API_KEY_ENV).is_ok() {
        "environment"
    } else if config.gemini_api_key.is_some() {
        "config file"
    } else {
        "not set"
    };

    println!("  {} {}", "Gemini model:".bold(), config.gemini_model());
    println!("  {} {}", "Gemini API key:".bold(), key_source);
    println!("  {} {}", "PokeAPI:".bold(), config.pokeapi_base_url());
    println!("  {} {}", "Default Pokémon:".bold(), config.default_species());

    Ok(())
}
