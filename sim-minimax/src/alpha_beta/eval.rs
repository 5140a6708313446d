use std::time::{Duration, Instant};

use derivative::Derivative;
use rand::{rngs::StdRng, SeedableRng};
use sim_board::{Board, Player, Segment};
use tracing::{debug, info, info_span};

use super::{
    move_ordering::MoveOrdering,
    score::{loses_immediately, Scorable, TrialDrawHeuristic},
    MinMaxReturn, WrappedScore,
};

#[derive(Derivative, Clone)]
#[derivative(Debug(bound = ""))]
/// This is the struct that wraps a scoring function and can be used to run minimax over a
/// [Board]
///
/// The searching side is always [Player::Two], the maximizer. It also outputs traces using the
/// [tracing] crate.
pub struct MinimaxSolver<ScorableType = TrialDrawHeuristic> {
    #[derivative(Debug = "ignore")]
    score_function: ScorableType,
    /// Shows up in the traces, handy when more than one solver is running
    pub name: &'static str,
    options: SolverOptions,
}

#[derive(Debug, Clone, Copy, Default)]
/// Optional properties that can be defined for a [MinimaxSolver]
///
/// The defaults (as implemented by [Default]) search every move in ascending order with no
/// limits on time or node count:
/// ```
/// use sim_minimax::alpha_beta::{MoveOrdering, SolverOptions};
///
/// let defaults: SolverOptions = Default::default();
///
/// assert_eq!(defaults.move_ordering, MoveOrdering::Ascending);
/// assert_eq!(defaults.node_budget, None);
/// ```
pub struct SolverOptions {
    /// How should moves be ordered in the tree search
    pub move_ordering: MoveOrdering,
    /// Seed for [MoveOrdering::Shuffled]. Without one the shuffle is seeded from entropy.
    pub seed: Option<u64>,
    /// Once this many nodes have been visited every node left to expand is scored as if it sat
    /// at the depth limit
    pub node_budget: Option<u64>,
    /// Same as `node_budget` but measured in wall clock time from the start of the search
    pub time_budget: Option<Duration>,
}

/// Per search bookkeeping, threaded through the recursion
struct SearchContext {
    rng: StdRng,
    nodes: u64,
    node_budget: Option<u64>,
    deadline: Option<Instant>,
    pruning: bool,
}

impl SearchContext {
    fn new(options: &SolverOptions, pruning: bool) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            nodes: 0,
            node_budget: options.node_budget,
            deadline: options.time_budget.map(|budget| Instant::now() + budget),
            pruning,
        }
    }

    fn out_of_budget(&self) -> bool {
        let out_of_nodes = self
            .node_budget
            .map_or(false, |budget| self.nodes > budget);
        let out_of_time = self
            .deadline
            .map_or(false, |deadline| Instant::now() >= deadline);

        out_of_nodes || out_of_time
    }
}

impl MinimaxSolver<TrialDrawHeuristic> {
    /// Construct a new `MinimaxSolver` that scores cut off positions with the
    /// [TrialDrawHeuristic]
    ///
    /// [SolverOptions] implements [Default] so you can override specific options and rely on
    /// defaults for the rest.
    ///
    /// ```rust
    /// use sim_board::{Board, Player};
    /// use sim_minimax::alpha_beta::{MinimaxSolver, SolverOptions};
    ///
    /// let mut board = Board::new(6);
    /// board.draw(0, 1, Player::One).unwrap();
    ///
    /// let solver = MinimaxSolver::new(SolverOptions::default());
    /// let result = solver.best_move(&mut board, 2);
    ///
    /// let chosen = result.best_move().unwrap();
    /// assert!(board.available_moves().contains(&chosen));
    /// assert!((0.0..=1.0).contains(&result.utility()));
    /// ```
    pub fn new(options: SolverOptions) -> Self {
        Self::with_scorer(TrialDrawHeuristic, options)
    }
}

impl Default for MinimaxSolver<TrialDrawHeuristic> {
    fn default() -> Self {
        Self::new(SolverOptions::default())
    }
}

impl<ScorableType> MinimaxSolver<ScorableType>
where
    ScorableType: Scorable,
{
    /// Construct a new `MinimaxSolver` with your own scoring function
    ///
    /// Anything implementing [Scorable] works, including closures taking `&mut Board`
    pub fn with_scorer(score_function: ScorableType, options: SolverOptions) -> Self {
        Self {
            score_function,
            name: "minimax",
            options,
        }
    }

    /// Builder style setter for [MinimaxSolver::name]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// The options this solver was built with
    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Pick the move for player two, searching `max_depth` plies before falling back to the
    /// scoring function
    ///
    /// The board is mutated during the search but always handed back exactly as it came in.
    ///
    /// The returned node only lacks a move when the game on `board` is already over. With a
    /// `max_depth` of zero the root itself is a cut off position; the utility is then the root's
    /// heuristic score and the move is the first one (in search order) that doesn't immediately
    /// complete a triangle for the side to move.
    pub fn best_move(&self, board: &mut Board, max_depth: usize) -> MinMaxReturn {
        info_span!(
            "minimax",
            solver_name = self.name,
            max_depth,
            points = board.points(),
            drawn = board.history().len(),
            chosen_move = tracing::field::Empty,
            utility = tracing::field::Empty,
            nodes = tracing::field::Empty,
        )
        .in_scope(|| {
            let mut context = SearchContext::new(&self.options, true);

            let result = self.search(
                &mut context,
                board,
                true,
                f64::NEG_INFINITY,
                f64::INFINITY,
                0,
                max_depth,
            );

            let result = match result {
                MinMaxReturn::Leaf { score } if !score.is_terminal() => {
                    match self.fallback_move(board, &mut context.rng) {
                        Some(best_move) => MinMaxReturn::Node {
                            best_move,
                            score,
                            is_maximizing: true,
                            moving_player: board.player_to_move(),
                            alpha_beta_cutoff: false,
                        },
                        None => result,
                    }
                }
                _ => result,
            };

            let current_span = tracing::Span::current();
            if let Some(chosen) = result.best_move() {
                current_span.record("chosen_move", chosen.to_string().as_str());
            }
            current_span.record("utility", result.utility());
            current_span.record("nodes", context.nodes);
            info!(
                nodes = context.nodes,
                utility = result.utility(),
                "finished minimax"
            );

            result
        })
    }

    /// Run minimax with alpha-beta pruning from an arbitrary node
    ///
    /// This is the full recursive contract that [MinimaxSolver::best_move] wraps. `depth` is how
    /// deep `board` already is in the tree; the scoring function takes over once it reaches
    /// `max_depth`.
    pub fn minimax(
        &self,
        board: &mut Board,
        is_maximizing: bool,
        alpha: f64,
        beta: f64,
        depth: usize,
        max_depth: usize,
    ) -> MinMaxReturn {
        let mut context = SearchContext::new(&self.options, true);

        self.search(
            &mut context,
            board,
            is_maximizing,
            alpha,
            beta,
            depth,
            max_depth,
        )
    }

    /// Plain minimax without any pruning
    ///
    /// Visits every node down to `max_depth`. The result always matches
    /// [MinimaxSolver::minimax], which makes this useful as a reference in tests and benchmarks.
    pub fn exhaustive_minimax(
        &self,
        board: &mut Board,
        is_maximizing: bool,
        depth: usize,
        max_depth: usize,
    ) -> MinMaxReturn {
        let mut context = SearchContext::new(&self.options, false);

        self.search(
            &mut context,
            board,
            is_maximizing,
            f64::NEG_INFINITY,
            f64::INFINITY,
            depth,
            max_depth,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn search(
        &self,
        context: &mut SearchContext,
        board: &mut Board,
        is_maximizing: bool,
        alpha: f64,
        beta: f64,
        depth: usize,
        max_depth: usize,
    ) -> MinMaxReturn {
        let mut alpha = alpha;
        let mut beta = beta;
        context.nodes += 1;

        if let Some(score) = WrappedScore::from_outcome(board.outcome()) {
            return MinMaxReturn::Leaf { score };
        }

        if depth >= max_depth || context.out_of_budget() {
            let value = self.score_function.score(board);
            debug_assert!(
                (0.0..=1.0).contains(&value),
                "Scores must be between 0 and 1, got {value}"
            );

            return MinMaxReturn::Leaf {
                score: WrappedScore::Scored(value),
            };
        }

        let moving_player = board.player_to_move();
        let possible_moves = self
            .options
            .move_ordering
            .order_moves(board, &mut context.rng);

        // Every real utility beats these, so the first move is always taken
        let mut best_value = if is_maximizing { -1.0 } else { 2.0 };
        let mut best: Option<(Segment, WrappedScore)> = None;
        let mut alpha_beta_cutoff = false;

        for segment in possible_moves {
            let score = {
                let mut guard = board
                    .draw_scoped(segment, moving_player)
                    .expect("Every available segment can be drawn");

                *self
                    .search(
                        context,
                        &mut guard,
                        !is_maximizing,
                        alpha,
                        beta,
                        depth + 1,
                        max_depth,
                    )
                    .score()
            };
            let value = score.utility();

            if is_maximizing {
                if value >= best_value {
                    best_value = value;
                    best = Some((segment, score));
                }
                alpha = alpha.max(value);

                if context.pruning && alpha > beta {
                    alpha_beta_cutoff = true;
                    break;
                }
            } else {
                if value <= best_value {
                    best_value = value;
                    best = Some((segment, score));
                }
                beta = beta.min(value);

                if context.pruning && beta < alpha {
                    alpha_beta_cutoff = true;
                    break;
                }
            }
        }

        let (best_move, score) =
            best.expect("A board that isn't over always has a segment left to draw");

        if depth == 0 {
            debug!(%best_move, utility = score.utility(), alpha_beta_cutoff, "root chose a move");
        }

        MinMaxReturn::Node {
            best_move,
            score,
            is_maximizing,
            moving_player,
            alpha_beta_cutoff,
        }
    }

    /// The move to play when the search didn't get to pick one, see [MinimaxSolver::best_move]
    fn fallback_move(&self, board: &mut Board, rng: &mut StdRng) -> Option<Segment> {
        let player: Player = board.player_to_move();
        let moves = self.options.move_ordering.order_moves(board, rng);

        moves
            .iter()
            .copied()
            .find(|&segment| !loses_immediately(board, segment, player))
            .or_else(|| moves.first().copied())
    }
}
