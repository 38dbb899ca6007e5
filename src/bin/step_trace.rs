use clap::Parser;
use linkup_solver::search::{SearchEngine, StepEvent, Strategy};
use linkup_solver::utils::board_from_str_array;
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search strategy: dfs, bfs, ucs, astar or greedy
    #[clap(short, long, default_value = "astar")]
    algorithm: String,

    /// Start cell as "row,col"
    #[clap(long)]
    start: String,

    /// Goal cell as "row,col"
    #[clap(long)]
    goal: String,

    /// Path to the board file (one row per line, digits 0-9 and '.')
    board_file: PathBuf,
}

fn parse_coord(s: &str) -> Result<(usize, usize), String> {
    let (r, c) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'row,col', got '{}'", s))?;
    let r = r.trim().parse().map_err(|e| format!("bad row '{}': {}", r, e))?;
    let c = c.trim().parse().map_err(|e| format!("bad col '{}': {}", c, e))?;
    Ok((r, c))
}

fn main() {
    let args = Args::parse();
    let strategy: Strategy = args.algorithm.parse().unwrap_or_else(|e: String| {
        eprintln!("{}", e);
        process::exit(2);
    });
    let start = parse_coord(&args.start).expect("invalid --start");
    let goal = parse_coord(&args.goal).expect("invalid --goal");

    let content = fs::read_to_string(&args.board_file)
        .unwrap_or_else(|e| {
            eprintln!("failed to read {}: {}", args.board_file.display(), e);
            process::exit(2);
        });
    let lines: Vec<&str> = content
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let board = board_from_str_array(&lines).unwrap_or_else(|e| {
        eprintln!("invalid board format: {}", e);
        process::exit(2);
    });

    println!("Board:\n{}\n", board);
    let board = Rc::new(RefCell::new(board));
    let mut engine = SearchEngine::new(board);

    engine
        .start_simulation(start, goal, strategy)
        .unwrap_or_else(|e| {
            eprintln!("{}", e);
            process::exit(2);
        });

    let mut step = 0;
    while let Some(event) = engine.advance_step() {
        step += 1;
        match event {
            StepEvent::Visit { node, path, turns } => {
                println!("{:4}  visit  {:?} depth={} turns={}", step, node, path.len() - 1, turns)
            }
            StepEvent::Expand { node, path, turns } => {
                println!("{:4}  expand {:?} depth={} turns={}", step, node, path.len() - 1, turns)
            }
            StepEvent::Goal { node, path, turns } => {
                println!("{:4}  goal   {:?} turns={}", step, node, turns);
                println!("\nPath: {:?}", path);
            }
            StepEvent::Exhausted => println!("{:4}  exhausted (no path)", step),
        }
    }

    let stats = engine.stats();
    println!(
        "\n{}: steps={} visited={} generated={} time={:.2}ms",
        strategy, stats.steps, stats.visited, stats.generated, stats.time_ms
    );
}
