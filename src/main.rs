//! Tic-tac-toe engine CLI
//!
//! Asks the engine for one move on a given board, or plays a full game of
//! the engine against itself.

use std::error::Error;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tictactoe::{
    apply_aging_move, check_terminal, AIEngine, Board, Geometry, Mark, MoveHistory, MoveRequest,
    Outcome, TranspositionCache, Variant,
};

/// Pick tic-tac-toe moves for classic, infinite, blitz and mega games
#[derive(Parser, Debug)]
#[command(name = "tictactoe", version, about)]
struct Cli {
    /// Board as X/O/. squares in row-major order, rows may be split by `/`
    #[arg(short, long)]
    board: Option<String>,

    /// Side to move
    #[arg(short, long, default_value = "X")]
    mover: Mark,

    /// easy, normal, hard or impossible
    #[arg(short, long, default_value = "impossible")]
    difficulty: String,

    /// classic, infinite, blitz or mega
    #[arg(short, long, default_value = "classic")]
    variant: String,

    /// Board size when no board is given
    #[arg(long, default_value_t = 3)]
    size: usize,

    #[arg(short, long, default_value_t = 3)]
    win_length: usize,

    /// Thinking time for mega searches
    #[arg(long)]
    time_budget_ms: Option<u64>,

    /// Answer classic requests with the blitz heuristic
    #[arg(long)]
    blitz: bool,

    /// Seed for reproducible random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Play the engine against itself from the given (or empty) board
    #[arg(long)]
    self_play: bool,
}

impl Cli {
    fn request(&self, board: Board, mover: Mark, history: MoveHistory) -> MoveRequest {
        let mut request = MoveRequest::from_tags(board, mover, &self.difficulty, &self.variant)
            .history(history)
            .blitz(self.blitz)
            .win_length(self.win_length);
        if let Some(ms) = self.time_budget_ms {
            request = request.time_budget(Duration::from_millis(ms));
        }
        request
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let board = match &cli.board {
        Some(s) => s.parse::<Board>()?,
        None => Board::new(cli.size),
    };
    let mut engine = match cli.seed {
        Some(seed) => AIEngine::seeded(seed),
        None => AIEngine::new(),
    };

    if cli.self_play {
        self_play(&cli, &mut engine, board)
    } else {
        let request = cli.request(board, cli.mover, MoveHistory::new());
        request.validate()?;
        let result = engine.get_move_with_stats(&request, None);
        info!(
            strategy = ?result.strategy,
            nodes = result.nodes,
            time_ms = result.time_ms,
            "decision"
        );
        println!("{}", result.index());
        Ok(())
    }
}

fn self_play(cli: &Cli, engine: &mut AIEngine, mut board: Board) -> Result<(), Box<dyn Error>> {
    let geometry = Geometry::new(board.size(), cli.win_length);
    let aging = cli.variant.eq_ignore_ascii_case(Variant::Infinite.as_str());
    let mut cache = TranspositionCache::new();
    let mut history = MoveHistory::new();
    let mut mover = cli.mover;

    // Infinite games can cycle forever, so cap the number of plies
    let max_plies = if aging { 60 } else { board.cell_count() };

    for ply in 0..max_plies {
        let outcome = check_terminal(&board, &geometry);
        if outcome.is_terminal() {
            break;
        }
        let request = cli.request(board.clone(), mover, history.clone());
        request.validate()?;
        let result = engine.get_move_with_stats(&request, Some(&mut cache));
        let Some(index) = result.best_move else {
            break;
        };

        if aging {
            (board, history) = apply_aging_move(&board, &history, index, mover);
        } else {
            board = board.with_move(index, mover);
        }
        info!(ply, %mover, index, strategy = ?result.strategy, time_ms = result.time_ms, "move");
        print_board(&board);
        mover = mover.opponent();
    }

    match check_terminal(&board, &geometry) {
        Outcome::Winner(mark) => println!("{mark} wins"),
        Outcome::Draw => println!("draw"),
        Outcome::Ongoing => println!("no result"),
    }
    Ok(())
}

fn print_board(board: &Board) {
    let key = board.to_string();
    let chars: Vec<char> = key.chars().collect();
    for row in chars.chunks(board.size()) {
        let line: String = row.iter().map(|c| format!("{c} ")).collect();
        println!("{}", line.trim_end());
    }
    println!();
}
