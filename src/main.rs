use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiss_pairer::calculate::compute_standings;
use swiss_pairer::config::AppConfig;
use swiss_pairer::engine;
use swiss_pairer::models::{Color, Player, PlayerId, Section};
use swiss_pairer::storage::{SectionStore, StorageConfig};

#[derive(Parser)]
#[command(name = "swiss-pairer")]
#[command(about = "Swiss-system chess tournament pairing and scoring")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new section
    Create {
        /// Section name
        name: String,

        /// Number of rounds (defaults from config)
        #[arg(long)]
        rounds: Option<u32>,

        /// Collect USCF attributes for this section
        #[arg(long)]
        uscf: bool,
    },

    /// Register a player in an open section
    Register {
        /// Section name
        section: String,

        /// Player name
        name: String,

        /// Player rating (0 = unrated)
        #[arg(long, default_value = "0")]
        rating: u32,

        /// USCF membership id
        #[arg(long)]
        uscf_id: Option<String>,
    },

    /// Withdraw a player from future rounds
    Withdraw {
        section: String,

        /// Player name
        player: String,
    },

    /// Lock a section's roster
    Lock { section: String },

    /// Reopen a section, clearing rounds and scores
    Reset { section: String },

    /// Pair the next round
    Pair { section: String },

    /// Record or correct a game result
    Result {
        section: String,

        /// Round number
        round: u32,

        /// Board number
        board: u32,

        /// Result token: 1-0, 0-1, 0.5-0.5 (or ½-½)
        result: String,
    },

    /// Print current standings with tiebreaks
    Standings { section: String },

    /// Print a section's rounds and pairings
    Show { section: String },

    /// List stored sections
    List,

    /// Director overrides on a single board
    Td {
        #[command(subcommand)]
        action: TdAction,
    },
}

#[derive(Subcommand)]
enum TdAction {
    /// Swap colors on a board
    Swap {
        section: String,
        round: u32,
        board: u32,
    },

    /// Replace a player on one side of a board
    Replace {
        section: String,
        round: u32,
        board: u32,

        /// Side to replace: white or black
        side: String,

        /// Replacement player name
        player: String,
    },

    /// Force a player to hold White on a board
    ForceColor {
        section: String,
        round: u32,
        board: u32,

        /// Player name
        player: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("Starting swiss-pairer v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_or_default(std::path::Path::new(&cli.config))
        .context("loading configuration")?;
    let data_dir = cli
        .data_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_dir.clone());
    let store = SectionStore::new(&StorageConfig::new(data_dir));

    match cli.command {
        Commands::Create { name, rounds, uscf } => {
            if store.exists(&name) {
                bail!("section {:?} already exists", name);
            }
            let rounds = rounds.unwrap_or(config.sections.planned_rounds);
            let section =
                Section::new(name.clone(), rounds).with_uscf_mode(uscf || config.sections.uscf_mode);
            store.save(&section)?;
            println!("Created section {:?} with {} rounds", name, rounds);
        }
        Commands::Register {
            section,
            name,
            rating,
            uscf_id,
        } => {
            let mut s = store.load(&section)?;
            let mut player = Player::new(&s.name, name.clone()).with_rating(rating);
            if let Some(uscf_id) = uscf_id {
                player = player.with_uscf_id(uscf_id);
            }
            engine::register_player(&mut s, player)?;
            store.save(&s)?;
            println!("Registered {:?} ({} players)", name, s.players.len());
        }
        Commands::Withdraw { section, player } => {
            let mut s = store.load(&section)?;
            let id = resolve_player(&s, &player)?;
            engine::withdraw_player(&mut s, &id)?;
            store.save(&s)?;
            println!("Withdrew {:?}", player);
        }
        Commands::Lock { section } => {
            let mut s = store.load(&section)?;
            s.lock();
            store.save(&s)?;
            println!("Locked section {:?}", s.name);
        }
        Commands::Reset { section } => {
            let mut s = store.load(&section)?;
            s.reset();
            store.save(&s)?;
            println!("Reset section {:?}", s.name);
        }
        Commands::Pair { section } => {
            let mut s = store.load(&section)?;
            let number = engine::pair_next_round(&mut s)?.number;
            store.save(&s)?;
            print_round(&s, number);
        }
        Commands::Result {
            section,
            round,
            board,
            result,
        } => {
            let mut s = store.load(&section)?;
            engine::apply_result(&mut s, round, board, &result)?;
            store.save(&s)?;
            println!("Round {} board {}: {}", round, board, result);
        }
        Commands::Standings { section } => {
            let s = store.load(&section)?;
            print_standings(&s);
        }
        Commands::Show { section } => {
            let s = store.load(&section)?;
            print_section(&s);
        }
        Commands::List => {
            for name in store.list()? {
                println!("{}", name);
            }
        }
        Commands::Td { action } => match action {
            TdAction::Swap {
                section,
                round,
                board,
            } => {
                let mut s = store.load(&section)?;
                engine::td_swap(&mut s, round, board)?;
                store.save(&s)?;
                println!("Swapped colors on round {} board {}", round, board);
            }
            TdAction::Replace {
                section,
                round,
                board,
                side,
                player,
            } => {
                let mut s = store.load(&section)?;
                let side = parse_side(&side)?;
                let id = resolve_player(&s, &player)?;
                engine::td_replace(&mut s, round, board, side, id)?;
                store.save(&s)?;
                println!(
                    "Replaced {} on round {} board {} with {:?}",
                    side, round, board, player
                );
            }
            TdAction::ForceColor {
                section,
                round,
                board,
                player,
            } => {
                let mut s = store.load(&section)?;
                let id = resolve_player(&s, &player)?;
                engine::td_force_color(&mut s, round, board, id)?;
                store.save(&s)?;
                println!("Forced {:?} to White on round {} board {}", player, round, board);
            }
        },
    }

    Ok(())
}

fn resolve_player(section: &Section, name: &str) -> Result<PlayerId> {
    section
        .player_by_name(name)
        .map(|p| p.id.clone())
        .with_context(|| format!("no player named {:?} in section {:?}", name, section.name))
}

fn parse_side(side: &str) -> Result<Color> {
    match side.to_ascii_lowercase().as_str() {
        "white" | "w" => Ok(Color::White),
        "black" | "b" => Ok(Color::Black),
        other => bail!("side must be white or black, got {:?}", other),
    }
}

fn print_round(section: &Section, number: u32) {
    println!("=== Round {} ===", number);
    let Some(round) = section.round(number) else {
        return;
    };
    for pairing in &round.pairings {
        let white = player_name(section, &pairing.white_id);
        if pairing.is_bye {
            println!("Board {}: {} has a bye", pairing.board, white);
        } else {
            let black = pairing
                .black_id
                .as_ref()
                .map(|id| player_name(section, id))
                .unwrap_or_else(|| "?".to_string());
            let result = pairing
                .result
                .map(|r| r.to_string())
                .unwrap_or_else(|| "*".to_string());
            println!("Board {}: {} - {}  {}", pairing.board, white, black, result);
        }
    }
}

fn print_standings(section: &Section) {
    println!("=== Standings: {} ===", section.name);
    println!(
        "{:<4} {:<24} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6}",
        "#", "Player", "Rtg", "Score", "Buch", "Median", "S-B", "Cum"
    );
    for row in compute_standings(section) {
        println!(
            "{:<4} {:<24} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6}",
            row.rank,
            row.name,
            row.rating,
            row.score.to_string(),
            row.tiebreaks.buchholz.to_string(),
            row.tiebreaks.median.to_string(),
            row.tiebreaks.sonneborn_berger.to_string(),
            row.tiebreaks.cumulative.to_string(),
        );
    }
}

fn print_section(section: &Section) {
    println!(
        "Section {:?}: {} players, {}/{} rounds, {}",
        section.name,
        section.players.len(),
        section.rounds.len(),
        section.planned_rounds,
        if section.locked { "locked" } else { "open" }
    );
    for round in &section.rounds {
        print_round(section, round.number);
    }
}

fn player_name(section: &Section, id: &PlayerId) -> String {
    section
        .player(id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string())
}
