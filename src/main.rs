//! Gomoku engine command line
//!
//! ## Usage
//!
//! - `gomoku best --moves "9,9 9,10"` - Print the engine's reply to a game
//! - `gomoku play` - Play against the engine on stdin
//! - `gomoku config` - Print the default configuration as JSON

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use gomoku::{AiEngine, EngineConfig, GameStatus, Pos, Position, Stone};

/// Read when `--config` is not given; defaults apply if it is missing.
const DEFAULT_CONFIG: &str = "gomoku.json";

/// Ninuki-renju search engine
#[derive(Parser)]
#[command(name = "gomoku")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file [default: gomoku.json if present]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Board size (overrides the configuration)
    #[arg(long, global = true)]
    size: Option<usize>,

    /// Time per move in milliseconds (overrides the configuration)
    #[arg(long, global = true)]
    time_ms: Option<u64>,

    /// Maximum search depth (overrides the configuration)
    #[arg(long, global = true)]
    depth: Option<u8>,

    /// Log search progress to stderr (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a move list and print the engine's reply for the side to move
    Best {
        /// Moves as "row,col" separated by spaces, black first
        #[arg(short, long, default_value = "")]
        moves: String,
    },
    /// Play against the engine; enter moves as "row col"
    Play {
        /// Let the engine play black
        #[arg(long)]
        engine_first: bool,
    },
    /// Print the default configuration
    Config,
}

/// Minimal stderr backend for the `log` facade.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::load_or_default(Path::new(DEFAULT_CONFIG))
            .with_context(|| format!("loading {}", DEFAULT_CONFIG))?,
    };
    if let Some(size) = cli.size {
        config.game.board_size = size;
    }
    if let Some(ms) = cli.time_ms {
        config.search.time_limit_ms = ms;
    }
    if let Some(depth) = cli.depth {
        config.search.max_depth = depth;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn parse_move(text: &str) -> Result<Pos> {
    let mut parts = text.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty());
    let (Some(r), Some(c), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected \"row,col\", got {:?}", text);
    };
    let row = r.parse().with_context(|| format!("bad row in {:?}", text))?;
    let col = c.parse().with_context(|| format!("bad column in {:?}", text))?;
    Pos::new_checked(row, col).with_context(|| format!("{:?} is off the board", text))
}

fn side_to_move(moves_played: usize) -> Stone {
    if moves_played % 2 == 0 {
        Stone::Black
    } else {
        Stone::White
    }
}

fn run_best(engine: &AiEngine, moves: &str) -> Result<()> {
    let mut position = engine.new_game();
    let mut played = 0;
    for text in moves.split_whitespace() {
        let pos = parse_move(text)?;
        let player = side_to_move(played);
        position
            .play(pos, player)
            .with_context(|| format!("move {} ({} at {})", played + 1, player, pos))?;
        played += 1;
    }

    println!("{}", position.board());
    if let GameStatus::Won { winner, by } = position.status() {
        println!("game over: {} won ({:?})", winner, by);
        return Ok(());
    }

    let player = side_to_move(played);
    let decision = engine.get_best_move(&mut position, player, engine.time_budget());
    match decision.best_move {
        Some(pos) => println!(
            "{} plays {}  score={} depth={} nodes={} time={}ms",
            player,
            pos,
            decision.score,
            decision.depth,
            decision.nodes,
            decision.elapsed.as_millis()
        ),
        None => println!("{} has no move", player),
    }
    Ok(())
}

fn run_play(engine: &AiEngine, engine_first: bool) -> Result<()> {
    let mut position: Position = engine.new_game();
    let engine_side = if engine_first { Stone::Black } else { Stone::White };
    let mut player = Stone::Black;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !position.status().is_over() {
        println!("{}", position.board());
        let pos = if player == engine_side {
            let decision = engine.get_best_move(&mut position, player, engine.time_budget());
            let Some(pos) = decision.best_move else {
                println!("{} has no move", player);
                break;
            };
            println!("engine ({}) plays {}", player, pos);
            pos
        } else {
            print!("{} to move> ", player);
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                return Ok(());
            };
            match parse_move(&line?) {
                Ok(pos) => pos,
                Err(e) => {
                    println!("{:#}", e);
                    continue;
                }
            }
        };

        match position.play(pos, player) {
            Ok(_) => player = player.opponent(),
            Err(e) => println!("illegal move: {}", e),
        }
    }

    println!("{}", position.board());
    if let Some(winner) = position.status().winner() {
        println!("{} wins", winner);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::Config) => {
            println!("{}", EngineConfig::default().to_json_pretty()?);
            Ok(())
        }
        Some(Commands::Best { moves }) => {
            let engine = AiEngine::new(load_config(&cli)?)?;
            run_best(&engine, moves)
        }
        Some(Commands::Play { engine_first }) => {
            let engine = AiEngine::new(load_config(&cli)?)?;
            run_play(&engine, *engine_first)
        }
        None => {
            let engine = AiEngine::new(load_config(&cli)?)?;
            run_best(&engine, "")
        }
    }
}
