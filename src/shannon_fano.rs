//! Shannon–Fano code tree construction.
//!
//! Top-down splitting: sort the distribution by weight, then recursively
//! cut each list at the prefix whose running weight lands closest to half
//! the total, attaching the two sides as children until single symbols
//! remain. Simpler than Huffman and older, but not always optimal.
//!
//! # Historical Context
//!
//! Shannon sketched the method in his 1948 paper and Fano refined it in a
//! 1949 technical report, three years before Huffman (then a student in
//! Fano's class) found the optimal bottom-up construction.

use num_traits::PrimInt;

use crate::symbol::SymbolList;
use crate::tree::{CodeTree, NodeContent, PrefixCoder, TreeNode};

/// The Shannon–Fano prefix coder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShannonFano;

impl ShannonFano {
    /// Index of the last symbol of the left half: the first position whose
    /// running weight minimizes the distance to half the total.
    ///
    /// With a non-decreasing list the first minimizer always leaves the
    /// right side nonempty, so both halves are nonempty for lists of two
    /// or more symbols.
    ///
    /// # Panics
    ///
    /// Panics on a zero-weight list; that is a caller bug.
    fn split_index<I, A: PrimInt>(list: &SymbolList<I, A>) -> usize {
        let total = list.total_weight();
        assert!(
            total > A::zero(),
            "cannot split a zero-weight distribution"
        );
        let half = total / (A::one() + A::one());

        let mut best = 0;
        let mut best_distance = total;
        let mut running = A::zero();
        for (index, symbol) in list.iter().enumerate() {
            running = running + symbol.weight();
            let distance = if running > half {
                running - half
            } else {
                half - running
            };
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        best
    }

    /// Split `list` at the balanced index: `[0..=i*]` and `(i*..]`.
    ///
    /// A single-symbol list comes back as `(list, empty)`.
    fn split<I: Clone, A: PrimInt>(
        list: &SymbolList<I, A>,
    ) -> (SymbolList<I, A>, SymbolList<I, A>) {
        if list.size() <= 1 {
            return (list.clone(), SymbolList::new());
        }
        let pivot = Self::split_index(list);
        debug_assert!(pivot < list.size() - 1, "split produced an empty side");
        let left = list.iter().take(pivot + 1).cloned().collect();
        let right = list.iter().skip(pivot + 1).cloned().collect();
        (left, right)
    }
}

impl PrefixCoder for ShannonFano {
    fn build_tree<I, A>(&self, distribution: &SymbolList<I, A>) -> CodeTree<I, A>
    where
        I: Clone + Eq + Ord,
        A: PrimInt,
    {
        assert!(!distribution.is_empty(), "empty distribution");

        let mut sorted = distribution.clone();
        sorted.sort_by_attribute();

        if sorted.size() == 1 {
            let symbol = sorted.at(0).clone();
            return CodeTree::with_root(TreeNode::new(NodeContent::Symbol(symbol)));
        }

        let mut tree = CodeTree::new();
        let root = tree.push_node(TreeNode::new(NodeContent::List(sorted)));
        let mut work = vec![root];

        while let Some(index) = work.pop() {
            let list = match tree.node(index).content() {
                NodeContent::List(list) => list.clone(),
                _ => unreachable!("work stack holds list nodes only"),
            };
            debug_assert!(list.is_sorted());

            let (left, right) = Self::split(&list);
            for (side, go_left) in [(left, true), (right, false)] {
                let child = if side.size() == 1 {
                    TreeNode::new(NodeContent::Symbol(side.at(0).clone()))
                } else {
                    TreeNode::new(NodeContent::List(side))
                };
                let child_index = if go_left {
                    tree.add_left_child(index, child)
                } else {
                    tree.add_right_child(index, child)
                };
                if matches!(tree.node(child_index).content(), NodeContent::List(_)) {
                    work.push(child_index);
                }
            }
            tree.node_mut(index).set_content(NodeContent::Branch);
        }

        tree
    }
}
