//! Huffman code tree construction.
//!
//! Bottom-up merging: start with a forest of single-leaf trees, then
//! repeatedly merge the two lowest-ranked roots until one tree remains.
//! The rank is a total order, so the encoder and the decoder rebuild the
//! exact same tree from the same distribution. That becomes a hard
//! requirement once the distributions adapt per symbol.
//!
//! # Historical Context
//!
//! David Huffman (1952) developed this algorithm as a term paper at MIT.
//! It was the first practical construction of optimal prefix codes and it
//! is still the workhorse coder wherever adaptive models rebuild small
//! trees on the fly.

use std::cmp::Ordering;

use num_traits::PrimInt;

use crate::symbol::SymbolList;
use crate::tree::{CodeTree, NodeContent, PrefixCoder, TreeNode};

/// The Huffman prefix coder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Huffman;

/// Whether root `a` outranks root `b`:
///
/// 1. the larger total weight outranks;
/// 2. at equal weight, between two symbol leaves the escape outranks any
///    concrete symbol, and otherwise the lexicographically smaller inner
///    value outranks;
/// 3. at equal weight, a symbol leaf outranks a branch root.
///
/// Two branch roots of equal weight compare equal; the stable forest sort
/// keeps their relative order, so builds stay deterministic.
fn greater_than<I, A>(a: &CodeTree<I, A>, b: &CodeTree<I, A>) -> bool
where
    I: Ord,
    A: PrimInt,
{
    let weight_a = a.root_weight();
    let weight_b = b.root_weight();
    if weight_a != weight_b {
        return weight_a > weight_b;
    }
    match (a.root().symbol(), b.root().symbol()) {
        (Some(sa), Some(sb)) => match (sa.is_unknown(), sb.is_unknown()) {
            (true, false) => true,
            (false, true) => false,
            (true, true) => false,
            (false, false) => {
                let ia = sa.inner().expect("concrete symbol has an inner value");
                let ib = sb.inner().expect("concrete symbol has an inner value");
                ib > ia
            }
        },
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => false,
    }
}

impl PrefixCoder for Huffman {
    fn build_tree<I, A>(&self, distribution: &SymbolList<I, A>) -> CodeTree<I, A>
    where
        I: Clone + Eq + Ord,
        A: PrimInt,
    {
        assert!(!distribution.is_empty(), "empty distribution");

        let mut forest: Vec<CodeTree<I, A>> = distribution
            .iter()
            .map(|symbol| CodeTree::with_root(TreeNode::new(NodeContent::Symbol(symbol.clone()))))
            .collect();

        while forest.len() > 1 {
            // Highest rank first; the two lowest-ranked roots end at the tail.
            forest.sort_by(|a, b| {
                if greater_than(a, b) {
                    Ordering::Less
                } else if greater_than(b, a) {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            });
            let last = forest.pop().expect("forest holds at least two trees");
            let second_to_last = forest.pop().expect("forest holds at least two trees");
            forest.push(CodeTree::merge(&second_to_last, &last));
        }

        forest.pop().expect("forest reduced to a single tree")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Code;
    use crate::symbol::Symbol;

    fn weighted(pairs: &[(char, u32)]) -> SymbolList<char, u32> {
        pairs
            .iter()
            .map(|&(ch, w)| Symbol::with_attribute(ch, w))
            .collect()
    }

    fn assert_prefix_free(code: &Code<char, u32>) {
        let words: Vec<_> = code
            .iter()
            .map(|(_, word)| {
                let mut root_first = *word;
                root_first.reverse_valid_bits();
                root_first
            })
            .collect();
        for (i, a) in words.iter().enumerate() {
            for (j, b) in words.iter().enumerate() {
                if i == j {
                    continue;
                }
                let shared = a.length().min(b.length());
                let is_prefix = (0..shared).all(|k| a.bit(k) == b.bit(k));
                assert!(
                    !(is_prefix && a.length() <= b.length()),
                    "code is not prefix-free"
                );
            }
        }
    }

    #[test]
    fn equal_counts_put_the_smaller_symbol_on_the_left() {
        let code = Huffman.encode(&weighted(&[('A', 1), ('B', 1)]));
        let a = code.get(&Symbol::new('A')).unwrap();
        let b = code.get(&Symbol::new('B')).unwrap();
        assert_eq!((a.length(), a.value()), (1, 0b0));
        assert_eq!((b.length(), b.value()), (1, 0b1));
    }

    #[test]
    fn escape_outranks_concrete_symbols_at_equal_count() {
        let mut list = weighted(&[('A', 5), ('B', 3), ('C', 1), ('D', 1)]);
        list.push(Symbol::escape_with_attribute(1));

        let code = Huffman.encode(&list);
        assert_eq!(code.len(), 5);
        assert_prefix_free(&code);

        // Optimal lengths for {5, 3, 1, 1, 1}: 1, 2, and three deeper codes
        // summing to 22 weighted bits.
        let weighted_length: u32 = [
            (Symbol::new('A'), 5u32),
            (Symbol::new('B'), 3),
            (Symbol::new('C'), 1),
            (Symbol::new('D'), 1),
            (Symbol::escape(), 1),
        ]
        .iter()
        .map(|(symbol, count)| u32::from(code.get(symbol).unwrap().length()) * count)
        .sum();
        assert_eq!(weighted_length, 22);

        // The escape wins the count-1 tie, so it sits above C and D.
        let rho = code.get(&Symbol::escape()).unwrap();
        let c = code.get(&Symbol::new('C')).unwrap();
        let d = code.get(&Symbol::new('D')).unwrap();
        assert!(rho.length() < c.length());
        assert_eq!(c.length(), d.length());
    }

    #[test]
    fn builds_are_deterministic() {
        let list = weighted(&[('E', 7), ('A', 7), ('O', 3), ('S', 3), ('R', 1)]);
        let first = Huffman.encode(&list);
        let second = Huffman.encode(&list);
        for (symbol, word) in first.iter() {
            assert_eq!(second.get(symbol), Some(*word));
        }
    }

    #[test]
    fn skewed_counts_give_short_codes_to_frequent_symbols() {
        let code = Huffman.encode(&weighted(&[('A', 50), ('B', 20), ('C', 5), ('D', 1)]));
        assert_prefix_free(&code);
        let a = code.get(&Symbol::new('A')).unwrap().length();
        let d = code.get(&Symbol::new('D')).unwrap().length();
        assert!(a < d);
        assert_eq!(a, 1);
    }

    #[test]
    fn average_length_is_within_one_bit_of_entropy() {
        let counts = [('A', 45u32), ('B', 13), ('C', 12), ('D', 16), ('E', 9), ('F', 5)];
        let code = Huffman.encode(&weighted(&counts));

        let total: u32 = counts.iter().map(|&(_, c)| c).sum();
        let entropy: f64 = counts
            .iter()
            .map(|&(_, c)| {
                let p = f64::from(c) / f64::from(total);
                -p * p.log2()
            })
            .sum();
        let average: f64 = counts
            .iter()
            .map(|&(ch, c)| {
                f64::from(code.get(&Symbol::new(ch)).unwrap().length()) * f64::from(c)
            })
            .sum::<f64>()
            / f64::from(total);

        assert!(average >= entropy);
        assert!(average < entropy + 1.0);
    }

    #[test]
    fn single_symbol_distribution_builds_a_single_leaf() {
        let tree = Huffman.build_tree(&weighted(&[('A', 4)]));
        assert_eq!(tree.len(), 1);
        assert!(tree.root().is_leaf());
    }
}
