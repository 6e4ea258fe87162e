use std::{ops::Add, time::Instant};

use atree::{Arena, Token};
use zerosum_sim::{
    game::{Outcome, State},
    rng::RngState,
    smallvec::SmallVec,
};

use crate::{
    playout::{RolloutPolicy, UniformRandom},
    SearchError,
};

pub mod debug;

mod tally;
pub use tally::Tally;

/// Search tuning knobs.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MctsConfig {
    /// The `Cp` coefficient of the UCT exploration term.
    pub exploration: f32,
    /// Rollout RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Print per-search statistics and the top of the tree.
    pub debug: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: std::f32::consts::SQRT_2,
            seed: None,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchCounter {
    /// Number of states visited through game state advancements.
    pub states_visited: u64,
    /// Number of completed search iterations.
    pub playouts: u64,
}

impl SearchCounter {
    pub const ZERO: SearchCounter = SearchCounter {
        states_visited: 0,
        playouts: 0,
    };

    #[inline]
    pub fn add_in_place(&mut self, c: &SearchCounter) {
        self.states_visited += c.states_visited;
        self.playouts += c.playouts;
    }

    pub fn summary(&self, dt_ns: u128) -> String {
        let dt_ms: f64 = 1e-6 * (dt_ns as f64);
        let rate: f64 = (1e-6_f64 * 1e9_f64) * (self.states_visited as f64) / (dt_ns as f64);
        format!(
            "dt={dt_ms:.2}ms playouts={} rate={rate:.4} Mstates/s",
            self.playouts
        )
    }
}

impl Add for SearchCounter {
    type Output = SearchCounter;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        let mut a = self;
        a.add_in_place(&rhs);
        a
    }
}

/// Per-node payload: the position and its accumulated statistics.
#[derive(Debug, Clone)]
pub struct NodeData<S: State> {
    pub state: S,
    pub tally: Tally,
}

impl<S: State> NodeData<S> {
    /// Wraps a state, pre-crediting a terminal position with its own
    /// outcome so that a decided node never looks unexplored.
    pub fn new(state: S) -> Self {
        let mut tally = Tally::ZERO;
        if let Some(outcome) = state.outcome() {
            tally.record_playout();
            tally.record_outcome(outcome, state.last_mover());
        }
        Self { state, tally }
    }
}

/// Monte Carlo tree search over states of type `S`.
///
/// Each iteration runs the four phases in order: UCT selection down to
/// a leaf, expansion of every legal move, one simulated game from the
/// first new child, and back-propagation of the outcome along the
/// selected path.
pub struct Mcts<S: State, P: RolloutPolicy<S> = UniformRandom> {
    pub config: MctsConfig,
    pub tree: Arena<NodeData<S>>,
    pub root: Token,
    pub counter: SearchCounter,
    rollout: P,
    rng: RngState,
}

impl<S: State> Mcts<S> {
    pub fn new(start: S, config: MctsConfig) -> Self {
        Self::with_rollout_policy(start, config, UniformRandom)
    }
}

impl<S: State, P: RolloutPolicy<S>> Mcts<S, P> {
    pub fn with_rollout_policy(start: S, config: MctsConfig, rollout: P) -> Self {
        let (tree, root) = Arena::with_data(NodeData::new(start));
        let rng = match config.seed {
            Some(seed) => RngState::seeded(seed),
            None => RngState::from_entropy(),
        };
        Self {
            config,
            tree,
            root,
            counter: SearchCounter::ZERO,
            rollout,
            rng,
        }
    }

    pub fn root_state(&self) -> &S {
        &self.node(self.root).data.state
    }

    fn node(&self, token: Token) -> &atree::Node<NodeData<S>> {
        self.tree.get(token).expect("node: token not in tree")
    }

    fn children(&self, token: Token) -> SmallVec<[Token; 16]> {
        self.node(token).children_tokens(&self.tree).collect()
    }

    /// A node where selection stops: unexpanded or terminal.
    fn is_leaf(&self, token: Token) -> bool {
        let node = self.node(token);
        node.is_leaf() || node.data.state.is_terminal()
    }

    /// Materializes one child per legal move of `token`'s state.
    fn explore(&mut self, token: Token) -> Result<(), S::Error> {
        let state = self.node(token).data.state.clone();
        debug_assert!(!state.is_terminal());
        debug_assert!(self.node(token).is_leaf());
        for mv in state.moves(state.player())? {
            token.append(&mut self.tree, NodeData::new(state.next(mv)?));
            self.counter.states_visited += 1;
        }
        Ok(())
    }

    /// The child with the highest UCT score, first on ties.
    ///
    /// Unvisited children score infinite, so every child is tried once
    /// before any is revisited.
    fn select_uct(&self, parent: Token) -> Option<Token> {
        let parent_node = self.node(parent);
        let ln_n = (parent_node.data.tally.playouts as f32).ln();
        let mut best: Option<(Token, f32)> = None;
        for child in parent_node.children(&self.tree) {
            let tally = child.data.tally;
            let score = if tally.playouts == 0 {
                f32::INFINITY
            } else {
                tally.ratio()
                    + self.config.exploration * (ln_n / tally.playouts as f32).sqrt()
            };
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child.token(), score));
            }
        }
        best.map(|(token, _)| token)
    }

    /// Plays one game to the end from `token`'s state.
    fn simulate(&mut self, token: Token) -> Result<Outcome, S::Error> {
        let mut state = self.node(token).data.state.clone();
        loop {
            if let Some(outcome) = state.outcome() {
                return Ok(outcome);
            }
            let mv = self.rollout.choose_move(&state, state.player(), &mut self.rng)?;
            state = state.next(mv)?;
            self.counter.states_visited += 1;
        }
    }

    /// One full selection/expansion/simulation/back-propagation pass.
    fn iteration(&mut self) -> Result<(), S::Error> {
        let mut path: Vec<Token> = vec![self.root];
        let mut current = self.root;
        while !self.is_leaf(current) {
            let Some(selected) = self.select_uct(current) else {
                break;
            };
            current = selected;
            path.push(current);
        }

        if !self.node(current).data.state.is_terminal() {
            self.explore(current)?;
            if let Some(&first) = self.children(current).first() {
                current = first;
                path.push(current);
            }
        }

        let outcome = self.simulate(current)?;
        for token in path {
            let node = self.tree.get_mut(token).expect("iteration: token not in tree");
            let mover = node.data.state.last_mover();
            node.data.tally.record_playout();
            node.data.tally.record_outcome(outcome, mover);
        }
        self.counter.playouts += 1;
        Ok(())
    }

    /// Grows the tree by `iterations` passes.
    pub fn run_search(&mut self, iterations: u32) -> Result<(), SearchError<S::Error>> {
        let t0 = Instant::now();
        for _ in 0..iterations {
            self.iteration()?;
        }
        if self.config.debug {
            println!("  {}", self.counter.summary(t0.elapsed().as_nanos()));
            self.print_tree(self.root, 0, 4, 5);
        }
        Ok(())
    }

    /// Recomputes `token`'s tally as the sum over its direct children.
    pub fn aggregate_children(&mut self, token: Token) {
        let total = self
            .children(token)
            .iter()
            .map(|&child| self.node(child).data.tally)
            .fold(Tally::ZERO, Tally::add);
        self.tree
            .get_mut(token)
            .expect("aggregate_children: token not in tree")
            .data
            .tally = total;
    }

    /// The move leading to the most-visited root child, first on ties.
    pub fn best_move(&self) -> Result<S::Move, SearchError<S::Error>> {
        let mut best: Option<(Token, u32)> = None;
        for child in self.node(self.root).children(&self.tree) {
            let playouts = child.data.tally.playouts;
            if best.map_or(true, |(_, most)| playouts > most) {
                best = Some((child.token(), playouts));
            }
        }
        let (selected, _) = best.ok_or(SearchError::NoChildren)?;

        let root_state = self.root_state();
        let target = &self.node(selected).data.state;
        for mv in root_state.moves(root_state.player())? {
            if &root_state.next(mv)? == target {
                return Ok(mv);
            }
        }
        Err(SearchError::NoMatchingMove)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use zerosum_sim::prelude::*;

    use super::*;

    fn seeded(seed: u64) -> MctsConfig {
        MctsConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn terminal_states_are_pre_credited() {
        let won = NimGame::new([1])
            .start()
            .next(NimMove {
                player: PlayerId::PlayerFirst,
                pile: 0,
                take: 1,
            })
            .unwrap();
        assert_eq!(NodeData::new(won).tally, Tally::new(2, 1));

        let drawn = TicTacToeState::parse("X O X\nX O O\nO X X", PlayerId::PlayerSecond).unwrap();
        assert_eq!(NodeData::new(drawn).tally, Tally::new(1, 1));

        let open = NimGame::new([1]).start();
        assert_eq!(NodeData::new(open).tally, Tally::ZERO);
    }

    #[test]
    fn explore_materializes_every_legal_move() {
        let start = NimGame::new([3, 4, 5]).start();
        let mut mcts = Mcts::new(start.clone(), seeded(0));
        mcts.explore(mcts.root).unwrap();

        let children = mcts.children(mcts.root);
        let moves = start.moves(PlayerId::PlayerFirst).unwrap();
        assert_eq!(children.len(), 12);
        assert_eq!(children.len(), moves.len());
        for (token, mv) in children.iter().zip(moves) {
            assert_eq!(mcts.node(*token).data.state, start.next(mv).unwrap());
        }
        assert_eq!(mcts.counter.states_visited, 12);
    }

    #[test]
    fn unvisited_children_are_selected_before_any_revisit() {
        let mut mcts = Mcts::new(NimGame::new([2]).start(), seeded(0));
        mcts.explore(mcts.root).unwrap();
        let children = mcts.children(mcts.root);
        assert_eq!(children.len(), 2);

        mcts.tree.get_mut(mcts.root).unwrap().data.tally = Tally::new(0, 5);
        mcts.tree.get_mut(children[0]).unwrap().data.tally = Tally::new(2, 5);
        assert_eq!(mcts.select_uct(mcts.root), Some(children[1]));
    }

    #[test]
    fn select_uct_breaks_ties_toward_the_first_child() {
        let mut mcts = Mcts::new(NimGame::new([3]).start(), seeded(0));
        mcts.explore(mcts.root).unwrap();
        let children = mcts.children(mcts.root);

        mcts.tree.get_mut(mcts.root).unwrap().data.tally = Tally::new(0, 6);
        for &child in &children {
            mcts.tree.get_mut(child).unwrap().data.tally = Tally::new(1, 2);
        }
        assert_eq!(mcts.select_uct(mcts.root), Some(children[0]));
    }

    #[test]
    fn aggregate_children_sums_direct_children_only() {
        let mut mcts = Mcts::new(NimGame::new([1]).start(), seeded(0));
        mcts.explore(mcts.root).unwrap();
        mcts.aggregate_children(mcts.root);
        assert_eq!(mcts.node(mcts.root).data.tally, Tally::new(2, 1));
    }

    #[test]
    fn best_move_requires_an_expanded_root() {
        let mcts = Mcts::new(NimGame::new([3, 4, 5]).start(), seeded(0));
        assert!(matches!(mcts.best_move(), Err(SearchError::NoChildren)));
    }

    #[test]
    fn search_on_a_terminal_root_leaves_no_children() {
        let mut mcts = Mcts::new(NimGame::new([0]).start(), seeded(0));
        mcts.run_search(10).unwrap();
        assert!(mcts.children(mcts.root).is_empty());
        assert!(matches!(mcts.best_move(), Err(SearchError::NoChildren)));
    }

    #[test]
    fn seeded_searches_are_reproducible() {
        let run = || {
            let mut mcts = Mcts::new(NimGame::new([3, 4, 5]).start(), seeded(42));
            mcts.run_search(500).unwrap();
            (mcts.best_move().unwrap(), mcts.counter)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn backpropagation_reaches_the_root() {
        let mut mcts = Mcts::new(NimGame::new([2, 2]).start(), seeded(7));
        mcts.run_search(100).unwrap();
        assert_eq!(mcts.node(mcts.root).data.tally.playouts, 100);
        let child_playouts: u32 = mcts
            .children(mcts.root)
            .iter()
            .map(|&c| mcts.node(c).data.tally.playouts)
            .sum();
        assert_eq!(child_playouts, 100);
    }

    #[test]
    fn nim_search_prefers_moves_that_zero_the_nim_sum() {
        let start = NimGame::new([1, 2, 3, 4, 5]).start();
        let mut counts: HashMap<NimMove, u32> = HashMap::new();
        for seed in 0..20 {
            let mut mcts = Mcts::new(start.clone(), seeded(seed));
            mcts.run_search(2000).unwrap();
            *counts.entry(mcts.best_move().unwrap()).or_default() += 1;
        }

        let mut winning = 0;
        let mut worst_losing = 0;
        for (mv, count) in counts {
            if start.next(mv).unwrap().nim_sum() == 0 {
                winning += count;
            } else {
                worst_losing = worst_losing.max(count);
            }
        }
        assert!(
            winning > worst_losing,
            "winning={winning} worst_losing={worst_losing}"
        );
    }

    #[test]
    fn tictactoe_search_finds_the_immediate_win() {
        let state =
            TicTacToeState::parse("X X .\nO O .\n. . .", PlayerId::PlayerSecond).unwrap();
        let mut mcts = Mcts::new(state, seeded(1));
        mcts.run_search(2000).unwrap();
        assert_eq!(
            mcts.best_move().unwrap(),
            TicTacToeMove {
                player: PlayerId::PlayerFirst,
                row: 0,
                col: 2,
            }
        );
    }
}
