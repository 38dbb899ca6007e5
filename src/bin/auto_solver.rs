use clap::Parser;
use linkup_solver::board::Board;
use linkup_solver::search::{count_turns, SearchEngine, Strategy};
use std::cell::RefCell;
use std::process;
use std::rc::Rc;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of board rows
    #[clap(long, default_value_t = 8)]
    rows: usize,

    /// Number of board columns
    #[clap(long, default_value_t = 12)]
    cols: usize,

    /// Symbol alphabet size
    #[clap(short, long, default_value_t = 12)]
    symbols: u8,

    /// Search strategy: dfs, bfs, ucs, astar or greedy
    #[clap(short, long, default_value = "bfs")]
    algorithm: String,

    /// RNG seed for a reproducible board
    #[clap(long)]
    seed: Option<u64>,

    /// Reshuffles allowed before giving up on a stuck board
    #[clap(long, default_value_t = 5)]
    max_reshuffles: u32,
}

fn main() {
    let args = Args::parse();
    let strategy: Strategy = args.algorithm.parse().unwrap_or_else(|e: String| {
        eprintln!("{}", e);
        process::exit(2);
    });

    let mut board = Board::new(args.rows, args.cols);
    let populated = match args.seed {
        Some(seed) => board.populate_with_seed(args.symbols, seed),
        None => board.populate(args.symbols),
    };
    if let Err(e) = populated {
        eprintln!("cannot populate board: {}", e);
        process::exit(2);
    }

    let board = Rc::new(RefCell::new(board));
    let mut engine = SearchEngine::new(Rc::clone(&board));

    println!("Initial board ({}):\n{}\n", strategy, board.borrow());

    let mut moves = 0u32;
    let mut reshuffles = 0u32;
    loop {
        if board.borrow().occupied_cells().is_empty() {
            println!("\nBoard cleared in {} moves ({} reshuffles).", moves, reshuffles);
            break;
        }

        match engine.find_first_matchable_pair(strategy) {
            Some((a, b, path)) => {
                let stats = engine.stats().clone();
                board
                    .borrow_mut()
                    .clear_pair(a, b)
                    .expect("pair coordinates come from the board");
                moves += 1;
                println!(
                    "Move {:3}: {:?} -> {:?}  edges={} turns={} visited={} generated={} time={:.2}ms",
                    moves,
                    a,
                    b,
                    path.len() - 1,
                    count_turns(&path),
                    stats.visited,
                    stats.generated,
                    stats.time_ms
                );
            }
            None => {
                if reshuffles >= args.max_reshuffles {
                    println!(
                        "\nNo matchable pair after {} reshuffles; giving up with {} tiles left.",
                        reshuffles,
                        board.borrow().occupied_cells().len()
                    );
                    break;
                }
                reshuffles += 1;
                println!("No matchable pair; reshuffling ({}/{}).", reshuffles, args.max_reshuffles);
                board.borrow_mut().reshuffle_remaining();
            }
        }
    }

    println!("\nFinal board:\n{}", board.borrow());
}
