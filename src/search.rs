//! Turn-limited path search between board cells.
//!
//! A pair of same-symbol cells may be cleared only if a connecting path
//! exists that crosses nothing but currently-empty cells (the two endpoints
//! excepted), changes direction at most twice, and stays within a coordinate
//! ceiling. This module provides:
//! - `SearchEngine`: the search entry points, bound to a shared read-only
//!   board handle.
//! - `Strategy`: five interchangeable search disciplines sharing one
//!   contract (DFS, BFS, uniform-cost, best-first, greedy local).
//! - `SearchStats`: per-call telemetry, overwritten on every invocation.
//! - `StepEvent` / simulation mode: a recorded trace of every expansion,
//!   replayable one event at a time for external animation.
use crate::board::{Board, Cell, Coord};
use std::cell::RefCell;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;

/// An ordered coordinate sequence from a start cell to a goal cell,
/// inclusive. Interior coordinates are empty cells at query time.
pub type Path = Vec<Coord>;

/// Maximum direction changes a path may make ("three straight segments").
pub const DEFAULT_MAX_TURNS: u8 = 2;

/// Maximum coordinate count of an accepted path (6 coordinates = 5 edges).
pub const DEFAULT_MAX_PATH_LEN: usize = 6;

/// Neighbor scan order: down, up, right, left.
const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// The five search disciplines.
///
/// They differ only in frontier ordering (and, for `GreedyLocal`, in giving
/// up completeness); path validity, telemetry, and the simulation protocol
/// are identical across all of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Exhaustive depth-first search (LIFO stack).
    ExhaustiveDfs,
    /// Breadth-first search (FIFO queue), shortest edge count first.
    BreadthFirst,
    /// Uniform-cost search, priority = edges so far.
    UniformCost,
    /// Best-first search, priority = edges so far + Manhattan distance.
    HeuristicBestFirst,
    /// Hill climb toward the goal; fails at any local optimum.
    GreedyLocal,
}

impl Strategy {
    /// All strategies, in their canonical order.
    pub const ALL: [Strategy; 5] = [
        Strategy::ExhaustiveDfs,
        Strategy::BreadthFirst,
        Strategy::UniformCost,
        Strategy::HeuristicBestFirst,
        Strategy::GreedyLocal,
    ];

    /// Short lower-case name, also accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::ExhaustiveDfs => "dfs",
            Strategy::BreadthFirst => "bfs",
            Strategy::UniformCost => "ucs",
            Strategy::HeuristicBestFirst => "astar",
            Strategy::GreedyLocal => "greedy",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dfs" => Ok(Strategy::ExhaustiveDfs),
            "bfs" => Ok(Strategy::BreadthFirst),
            "ucs" => Ok(Strategy::UniformCost),
            "astar" => Ok(Strategy::HeuristicBestFirst),
            "greedy" => Ok(Strategy::GreedyLocal),
            other => Err(format!(
                "unknown strategy '{}' (expected dfs, bfs, ucs, astar or greedy)",
                other
            )),
        }
    }
}

/// Telemetry for a single search invocation.
///
/// Recomputed from scratch on every call; read it via
/// [`SearchEngine::stats`] immediately after the call it belongs to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchStats {
    /// Edge count of the returned path, 0 when no path was returned.
    pub steps: usize,
    /// Distinct coordinates expanded (dequeued and processed).
    pub visited: usize,
    /// Distinct coordinates ever pushed to the frontier, start included.
    pub generated: usize,
    /// Wall-clock duration of the call in milliseconds.
    pub time_ms: f64,
}

/// One recorded step of a simulated search.
#[derive(Clone, Debug, PartialEq)]
pub enum StepEvent {
    /// A node was taken off the frontier and expanded.
    Visit { node: Coord, path: Path, turns: u8 },
    /// A turn-valid extension was accepted onto the frontier.
    Expand { node: Coord, path: Path, turns: u8 },
    /// Terminal: the goal was reached with a within-ceiling path.
    Goal { node: Coord, path: Path, turns: u8 },
    /// Terminal: the strategy ran out of candidates (or hit a greedy local
    /// optimum, or the only result exceeded the length ceiling).
    Exhausted,
}

/// Errors raised by engine entry points that take coordinates.
///
/// Search misses are not errors; they come back as `None` results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A start or goal coordinate fell outside the board.
    #[error("coordinate ({0}, {1}) is outside a {2}x{3} board")]
    OutOfBounds(usize, usize, usize, usize),
}

/// Number of turns along `path`: a turn at interior index `i` is a change
/// between the direction vectors entering and leaving `path[i]`.
pub fn count_turns(path: &[Coord]) -> u8 {
    if path.len() < 3 {
        return 0;
    }
    let mut turns = 0u8;
    for i in 1..path.len() - 1 {
        let prev = (
            path[i].0 as isize - path[i - 1].0 as isize,
            path[i].1 as isize - path[i - 1].1 as isize,
        );
        let next = (
            path[i + 1].0 as isize - path[i].0 as isize,
            path[i + 1].1 as isize - path[i].1 as isize,
        );
        if prev != next {
            turns += 1;
        }
    }
    turns
}

/// Manhattan distance between two coordinates.
pub fn manhattan(a: Coord, b: Coord) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

fn neighbors(board: &Board, (r, c): Coord) -> impl Iterator<Item = Coord> + '_ {
    NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
        let nr = r as isize + dr;
        let nc = c as isize + dc;
        if nr >= 0 && (nr as usize) < board.rows() && nc >= 0 && (nc as usize) < board.cols() {
            Some((nr as usize, nc as usize))
        } else {
            None
        }
    })
}

fn traversable(board: &Board, coord: Coord, goal: Coord) -> bool {
    board.cell(coord.0, coord.1) == Cell::Empty || coord == goal
}

/// A frontier entry: the head coordinate plus the whole path that led there.
#[derive(Clone, Debug)]
struct Node {
    coord: Coord,
    path: Path,
    turns: u8,
    cost: usize,
}

/// Heap entry ordered by (priority, insertion sequence). The sequence
/// number makes tie-breaking deterministic: equal priorities pop in
/// insertion order.
#[derive(Debug)]
struct RankedNode {
    rank: usize,
    seq: u64,
    node: Node,
}

impl PartialEq for RankedNode {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.seq == other.seq
    }
}

impl Eq for RankedNode {}

impl PartialOrd for RankedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.rank, self.seq).cmp(&(other.rank, other.seq))
    }
}

fn rank_cost(node: &Node, _goal: Coord) -> usize {
    node.cost
}

fn rank_cost_plus_heuristic(node: &Node, goal: Coord) -> usize {
    node.cost + manhattan(node.coord, goal)
}

/// Frontier discipline for the four systematic strategies. The search loop
/// is identical for all of them; only push/pop ordering differs.
enum Frontier {
    Lifo(Vec<Node>),
    Fifo(VecDeque<Node>),
    Priority {
        heap: BinaryHeap<Reverse<RankedNode>>,
        seq: u64,
        rank: fn(&Node, Coord) -> usize,
    },
}

impl Frontier {
    fn lifo() -> Self {
        Frontier::Lifo(Vec::new())
    }

    fn fifo() -> Self {
        Frontier::Fifo(VecDeque::new())
    }

    fn priority(rank: fn(&Node, Coord) -> usize) -> Self {
        Frontier::Priority {
            heap: BinaryHeap::new(),
            seq: 0,
            rank,
        }
    }

    fn push(&mut self, node: Node, goal: Coord) {
        match self {
            Frontier::Lifo(stack) => stack.push(node),
            Frontier::Fifo(queue) => queue.push_back(node),
            Frontier::Priority { heap, seq, rank } => {
                let ranked = RankedNode {
                    rank: rank(&node, goal),
                    seq: *seq,
                    node,
                };
                *seq += 1;
                heap.push(Reverse(ranked));
            }
        }
    }

    fn pop(&mut self) -> Option<Node> {
        match self {
            Frontier::Lifo(stack) => stack.pop(),
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Priority { heap, .. } => heap.pop().map(|Reverse(ranked)| ranked.node),
        }
    }
}

/// Optional step-trace sink. Direct-mode searches pass an inactive recorder
/// so no event (or path clone) is ever materialized.
struct Recorder<'a>(Option<&'a mut Vec<StepEvent>>);

impl Recorder<'_> {
    fn record_with(&mut self, event: impl FnOnce() -> StepEvent) {
        if let Some(trace) = self.0.as_mut() {
            trace.push(event());
        }
    }
}

/// Shared loop for the stack/queue/heap strategies.
///
/// Pops until the goal comes off the frontier with a turn-valid path, or the
/// frontier empties. Extensions are pruned as soon as their turn count would
/// exceed `max_turns`; the length ceiling is applied by the caller.
fn run_frontier(
    board: &Board,
    start: Coord,
    goal: Coord,
    mut frontier: Frontier,
    max_turns: u8,
    stats: &mut SearchStats,
    recorder: &mut Recorder<'_>,
) -> Option<(Path, u8)> {
    let mut visited: HashSet<Coord> = HashSet::new();
    let mut generated: HashSet<Coord> = HashSet::new();

    generated.insert(start);
    frontier.push(
        Node {
            coord: start,
            path: vec![start],
            turns: 0,
            cost: 0,
        },
        goal,
    );

    let result = loop {
        let Some(node) = frontier.pop() else {
            break None;
        };

        if node.coord == goal && node.turns <= max_turns {
            break Some((node.path, node.turns));
        }
        if !visited.insert(node.coord) {
            continue;
        }
        recorder.record_with(|| StepEvent::Visit {
            node: node.coord,
            path: node.path.clone(),
            turns: node.turns,
        });

        for next in neighbors(board, node.coord) {
            if !traversable(board, next, goal) {
                continue;
            }
            let mut new_path = node.path.clone();
            new_path.push(next);
            let new_turns = count_turns(&new_path);
            if new_turns > max_turns {
                continue;
            }
            generated.insert(next);
            recorder.record_with(|| StepEvent::Expand {
                node: next,
                path: new_path.clone(),
                turns: new_turns,
            });
            frontier.push(
                Node {
                    coord: next,
                    path: new_path,
                    turns: new_turns,
                    cost: node.cost + 1,
                },
                goal,
            );
        }
    };

    stats.visited = visited.len();
    stats.generated = generated.len();
    result
}

/// Greedy hill climb: always advance to the single turn-valid, unvisited
/// neighbor closest to the goal; never backtrack.
///
/// Fails when no candidate exists, or when the best candidate is not
/// strictly closer than the current cell (a local optimum), even though a
/// systematic strategy might still find a path.
fn run_greedy(
    board: &Board,
    start: Coord,
    goal: Coord,
    max_turns: u8,
    stats: &mut SearchStats,
    recorder: &mut Recorder<'_>,
) -> Option<(Path, u8)> {
    let mut visited: HashSet<Coord> = HashSet::new();
    visited.insert(start);
    let mut current = start;
    let mut path = vec![start];
    let mut turns = 0u8;
    let mut generated = 1usize;
    let mut expanded = 0usize;

    let result = loop {
        if current == goal {
            break Some((path, turns));
        }
        expanded += 1;
        recorder.record_with(|| StepEvent::Visit {
            node: current,
            path: path.clone(),
            turns,
        });

        let mut best: Option<(usize, Coord, Path, u8)> = None;
        for next in neighbors(board, current) {
            if visited.contains(&next) || !traversable(board, next, goal) {
                continue;
            }
            let mut candidate = path.clone();
            candidate.push(next);
            let candidate_turns = count_turns(&candidate);
            if candidate_turns > max_turns {
                continue;
            }
            let h = manhattan(next, goal);
            // First candidate wins ties, keeping neighbor order decisive.
            if best.as_ref().map_or(true, |(best_h, ..)| h < *best_h) {
                best = Some((h, next, candidate, candidate_turns));
            }
        }

        let Some((h, next, next_path, next_turns)) = best else {
            break None;
        };
        if h >= manhattan(current, goal) {
            // Local optimum: the move would not bring us strictly closer.
            break None;
        }

        visited.insert(next);
        generated += 1;
        recorder.record_with(|| StepEvent::Expand {
            node: next,
            path: next_path.clone(),
            turns: next_turns,
        });
        current = next;
        path = next_path;
        turns = next_turns;
    };

    stats.visited = expanded;
    stats.generated = generated;
    result
}

fn dispatch(
    board: &Board,
    strategy: Strategy,
    start: Coord,
    goal: Coord,
    max_turns: u8,
    stats: &mut SearchStats,
    recorder: &mut Recorder<'_>,
) -> Option<(Path, u8)> {
    match strategy {
        Strategy::ExhaustiveDfs => {
            run_frontier(board, start, goal, Frontier::lifo(), max_turns, stats, recorder)
        }
        Strategy::BreadthFirst => {
            run_frontier(board, start, goal, Frontier::fifo(), max_turns, stats, recorder)
        }
        Strategy::UniformCost => run_frontier(
            board,
            start,
            goal,
            Frontier::priority(rank_cost),
            max_turns,
            stats,
            recorder,
        ),
        Strategy::HeuristicBestFirst => run_frontier(
            board,
            start,
            goal,
            Frontier::priority(rank_cost_plus_heuristic),
            max_turns,
            stats,
            recorder,
        ),
        Strategy::GreedyLocal => run_greedy(board, start, goal, max_turns, stats, recorder),
    }
}

/// Path search over a shared board view.
///
/// The engine holds an `Rc<RefCell<Board>>` handle and borrows it immutably
/// for the duration of each call only, so the driving code mutates the board
/// between calls (pair removal, reshuffle) without any resynchronization.
/// Everything is single-threaded and synchronous: even a simulated search
/// runs eagerly to completion, deferring only the consumption of its trace.
pub struct SearchEngine {
    board: Rc<RefCell<Board>>,
    stats: SearchStats,
    max_turns: u8,
    max_path_len: usize,
    trace: Vec<StepEvent>,
    cursor: usize,
    simulating: bool,
}

impl SearchEngine {
    /// Creates an engine over the shared board handle with the default
    /// limits (2 turns, 6 coordinates).
    pub fn new(board: Rc<RefCell<Board>>) -> Self {
        SearchEngine {
            board,
            stats: SearchStats::default(),
            max_turns: DEFAULT_MAX_TURNS,
            max_path_len: DEFAULT_MAX_PATH_LEN,
            trace: Vec::new(),
            cursor: 0,
            simulating: false,
        }
    }

    /// Telemetry of the most recent search call.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// The turn ceiling applied inside the search loop.
    pub fn max_turns(&self) -> u8 {
        self.max_turns
    }

    /// Sets the turn ceiling.
    pub fn set_max_turns(&mut self, max_turns: u8) {
        self.max_turns = max_turns;
    }

    /// The coordinate-count ceiling applied to accepted results.
    pub fn max_path_len(&self) -> usize {
        self.max_path_len
    }

    /// Sets the coordinate-count ceiling.
    pub fn set_max_path_len(&mut self, max_path_len: usize) {
        self.max_path_len = max_path_len;
    }

    /// Whether a simulation trace is currently loaded.
    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    fn check_bounds(&self, board: &Board, coord: Coord) -> Result<(), SearchError> {
        if board.in_bounds(coord) {
            Ok(())
        } else {
            Err(SearchError::OutOfBounds(
                coord.0,
                coord.1,
                board.rows(),
                board.cols(),
            ))
        }
    }

    /// Applies the length ceiling: over-long results count as "no path".
    fn apply_ceiling(&self, outcome: Option<(Path, u8)>) -> Option<(Path, u8)> {
        match outcome {
            Some((path, turns)) if path.len() <= self.max_path_len => Some((path, turns)),
            _ => None,
        }
    }

    /// Runs a strategy in direct mode and returns the found path, if any.
    ///
    /// `None` means exhaustion, a greedy local optimum, or a result beyond
    /// the length ceiling; none of those are errors. Stats are overwritten.
    ///
    /// # Errors
    /// `SearchError::OutOfBounds` if either coordinate is outside the board.
    pub fn run_strategy(
        &mut self,
        strategy: Strategy,
        start: Coord,
        goal: Coord,
    ) -> Result<Option<Path>, SearchError> {
        {
            let board = self.board.borrow();
            self.check_bounds(&board, start)?;
            self.check_bounds(&board, goal)?;
        }

        let started_at = Instant::now();
        self.stats = SearchStats::default();
        let outcome = {
            let board = self.board.borrow();
            let mut recorder = Recorder(None);
            dispatch(
                &board,
                strategy,
                start,
                goal,
                self.max_turns,
                &mut self.stats,
                &mut recorder,
            )
        };

        let accepted = self.apply_ceiling(outcome);
        self.stats.steps = accepted.as_ref().map_or(0, |(path, _)| path.len() - 1);
        self.stats.time_ms = started_at.elapsed().as_secs_f64() * 1000.0;
        Ok(accepted.map(|(path, _)| path))
    }

    /// Runs a strategy in simulation mode, recording the full step trace.
    ///
    /// The search executes eagerly; only consumption is deferred. The trace
    /// holds one `Visit` per expansion, one `Expand` per accepted frontier
    /// insertion, and exactly one terminal event: `Goal` on an in-ceiling
    /// success, `Exhausted` otherwise. Results are retrieved through
    /// [`SearchEngine::advance_step`]; stats are updated exactly as in
    /// direct mode.
    ///
    /// # Errors
    /// `SearchError::OutOfBounds` if either coordinate is outside the board;
    /// any previous trace is left untouched in that case.
    pub fn start_simulation(
        &mut self,
        start: Coord,
        goal: Coord,
        strategy: Strategy,
    ) -> Result<(), SearchError> {
        {
            let board = self.board.borrow();
            self.check_bounds(&board, start)?;
            self.check_bounds(&board, goal)?;
        }

        let started_at = Instant::now();
        self.trace.clear();
        self.cursor = 0;
        self.simulating = true;
        self.stats = SearchStats::default();

        let outcome = {
            let board = self.board.borrow();
            let mut recorder = Recorder(Some(&mut self.trace));
            dispatch(
                &board,
                strategy,
                start,
                goal,
                self.max_turns,
                &mut self.stats,
                &mut recorder,
            )
        };

        match self.apply_ceiling(outcome) {
            Some((path, turns)) => {
                self.stats.steps = path.len() - 1;
                self.trace.push(StepEvent::Goal {
                    node: goal,
                    path,
                    turns,
                });
            }
            None => {
                self.stats.steps = 0;
                self.trace.push(StepEvent::Exhausted);
            }
        }
        self.stats.time_ms = started_at.elapsed().as_secs_f64() * 1000.0;
        Ok(())
    }

    /// Returns the next recorded event and advances the replay cursor.
    ///
    /// Returns `None` once the trace is exhausted (repeatedly, and also when
    /// no simulation was ever started or it has been reset).
    pub fn advance_step(&mut self) -> Option<StepEvent> {
        let event = self.trace.get(self.cursor).cloned();
        if event.is_some() {
            self.cursor += 1;
        }
        event
    }

    /// Drops the trace, resets the cursor, and leaves simulation mode.
    pub fn reset_simulation(&mut self) {
        self.trace.clear();
        self.cursor = 0;
        self.simulating = false;
    }

    /// Finds the first clearable pair in row-major enumeration order.
    ///
    /// Scans occupied cells row-major, considers pairs `(i, j)` with
    /// `i < j` in that order, skips differing symbols, and returns the first
    /// pair the strategy connects with a within-ceiling path. Always runs in
    /// direct mode: a loaded simulation trace is never touched. `None` means
    /// no pair is currently clearable (reshuffle or give up).
    ///
    /// This is the auto-solve workhorse and costs O(pairs x search).
    pub fn find_first_matchable_pair(&mut self, strategy: Strategy) -> Option<(Coord, Coord, Path)> {
        let occupied: Vec<(Coord, u8)> = {
            let board = self.board.borrow();
            board
                .occupied_cells()
                .into_iter()
                .filter_map(|coord| board.symbol_at(coord).map(|id| (coord, id)))
                .collect()
        };

        for (i, &(a, symbol_a)) in occupied.iter().enumerate() {
            for &(b, symbol_b) in &occupied[i + 1..] {
                if symbol_a != symbol_b {
                    continue;
                }
                // Both coordinates come from the board, so bounds cannot fail.
                if let Ok(Some(path)) = self.run_strategy(strategy, a, b) {
                    return Some((a, b, path));
                }
            }
        }
        None
    }
}
