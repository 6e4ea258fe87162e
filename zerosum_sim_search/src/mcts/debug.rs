use atree::Token;
use itertools::Itertools;
use zerosum_sim::{game::State, smallvec::SmallVec};

use crate::playout::RolloutPolicy;

use super::{Mcts, NodeData, Tally};

impl Tally {
    fn format_ratio(self) -> String {
        format!("{self} = {:.2}", self.ratio())
    }
}

impl<S: State> NodeData<S> {
    fn debug_description(&self, children_count: usize) -> String {
        format!(
            "{:?} ({}), #children = {}",
            self.state,
            self.tally.format_ratio(),
            children_count
        )
    }
}

impl<S: State, P: RolloutPolicy<S>> Mcts<S, P> {
    /// Prints the subtree under `token`, most-visited children first,
    /// folding children with fewer than `min_n` playouts into a single
    /// summary line.
    pub fn print_tree(&self, token: Token, depth: u8, max_depth: u8, min_n: u32) {
        if depth > max_depth {
            return;
        }

        let Some(node) = self.tree.get(token) else {
            return;
        };

        fn indent_prefix(indent_depth: u8) -> String {
            let mut s = String::new();
            for _ in 0..indent_depth {
                s += "  ";
            }
            s += "- ";
            s
        }

        let node_part = node.data.debug_description(node.children(&self.tree).count());
        println!("{}{}", indent_prefix(depth), node_part);

        let mut omitted_tally = Tally::ZERO;
        let mut omitted = 0;
        let mut found = false;
        let children: SmallVec<[_; 16]> = node
            .children(&self.tree)
            .sorted_by_key(|c| std::cmp::Reverse(c.data.tally.playouts))
            .collect();
        let c = children.len();
        for (i, child) in children.iter().copied().enumerate() {
            let tally = child.data.tally;
            if tally.playouts != 0 && (c <= 1 || depth == 0 || tally.playouts >= min_n || i == 0) {
                found = depth < max_depth;
                self.print_tree(child.token(), depth + 1, max_depth, min_n);
            } else {
                omitted += 1;
                omitted_tally += tally;
            }
        }

        if found && omitted > 0 {
            println!(
                "{}...[{omitted} omitted] ({})",
                indent_prefix(depth + 1),
                omitted_tally.format_ratio()
            );
        }
    }
}
