//! Flat, index-addressed binary code trees.
//!
//! A [`CodeTree`] stores its nodes in one vector and links them by index,
//! so trees clone cheaply and sibling trees can be merged by reindexing
//! alone. Root-to-leaf paths spell the code words: left is bit 0, right is
//! bit 1. The tree is a pure data structure; the builders in
//! [`crate::shannon_fano`] and [`crate::huffman`] decide its shape.

use num_traits::PrimInt;

use crate::code::{Code, CodeWord};
use crate::symbol::{Symbol, SymbolList};

/// Bit value assigned to a left branch.
pub const LEFT_BIT: u8 = 0;
/// Bit value assigned to a right branch.
pub const RIGHT_BIT: u8 = 1;

/// What a tree node holds.
#[derive(Debug, Clone)]
pub enum NodeContent<I, A> {
    /// A leaf carrying the symbol it encodes.
    Symbol(Symbol<I, A>),
    /// An unfinished node still carrying the distribution to split.
    List(SymbolList<I, A>),
    /// An interior node.
    Branch,
}

/// A node of a [`CodeTree`], linked to its parent and children by index.
#[derive(Debug, Clone)]
pub struct TreeNode<I, A> {
    content: NodeContent<I, A>,
    index: usize,
    parent: Option<usize>,
    left: Option<usize>,
    right: Option<usize>,
}

impl<I, A> TreeNode<I, A> {
    /// Create an unattached node; [`CodeTree::push_node`] assigns its index.
    pub fn new(content: NodeContent<I, A>) -> Self {
        Self {
            content,
            index: 0,
            parent: None,
            left: None,
            right: None,
        }
    }

    /// The node's content.
    pub fn content(&self) -> &NodeContent<I, A> {
        &self.content
    }

    /// Replace the node's content.
    pub fn set_content(&mut self, content: NodeContent<I, A>) {
        self.content = content;
    }

    /// The symbol this node encodes, if it is a symbol leaf.
    pub fn symbol(&self) -> Option<&Symbol<I, A>> {
        match &self.content {
            NodeContent::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// The node's own index in its tree.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Index of the parent node, if any.
    pub fn parent_index(&self) -> Option<usize> {
        self.parent
    }

    /// Index of the left child, if any.
    pub fn left_index(&self) -> Option<usize> {
        self.left
    }

    /// Index of the right child, if any.
    pub fn right_index(&self) -> Option<usize> {
        self.right
    }
}

/// A binary code tree stored as a flat vector; the root is index 0.
#[derive(Debug, Clone)]
pub struct CodeTree<I, A> {
    nodes: Vec<TreeNode<I, A>>,
}

impl<I, A> CodeTree<I, A> {
    /// An empty tree.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// A tree holding a single root node.
    pub fn with_root(root: TreeNode<I, A>) -> Self {
        let mut tree = Self::new();
        tree.push_node(root);
        tree
    }

    /// Append `node`, writing its index back, and return that index.
    pub fn push_node(&mut self, mut node: TreeNode<I, A>) -> usize {
        let index = self.nodes.len();
        node.index = index;
        self.nodes.push(node);
        index
    }

    /// Attach `child` as the left child of `parent`.
    pub fn add_left_child(&mut self, parent: usize, child: TreeNode<I, A>) -> usize {
        let index = self.push_node(child);
        self.nodes[index].parent = Some(parent);
        self.nodes[parent].left = Some(index);
        index
    }

    /// Attach `child` as the right child of `parent`.
    pub fn add_right_child(&mut self, parent: usize, child: TreeNode<I, A>) -> usize {
        let index = self.push_node(child);
        self.nodes[index].parent = Some(parent);
        self.nodes[parent].right = Some(index);
        index
    }

    /// The node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; that is a caller bug.
    pub fn node(&self, index: usize) -> &TreeNode<I, A> {
        &self.nodes[index]
    }

    /// Mutable access to the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; that is a caller bug.
    pub fn node_mut(&mut self, index: usize) -> &mut TreeNode<I, A> {
        &mut self.nodes[index]
    }

    /// The root node.
    ///
    /// # Panics
    ///
    /// Panics on an empty tree.
    pub fn root(&self) -> &TreeNode<I, A> {
        &self.nodes[0]
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over the leaves in index order.
    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode<I, A>> + '_ {
        self.nodes.iter().filter(|node| node.is_leaf())
    }
}

impl<I: Clone + PartialEq, A: Clone> CodeTree<I, A> {
    /// Derive the code map: for every leaf, walk parent links toward the
    /// root, pushing [`LEFT_BIT`] or [`RIGHT_BIT`] per step via
    /// [`CodeWord::push_left`]. The finished word holds the root-adjacent
    /// bit at its highest index.
    pub fn code_map(&self) -> Code<I, A> {
        let mut code = Code::new();
        for leaf in self.leaves() {
            let mut word = CodeWord::new();
            let mut current = leaf.index();
            while let Some(parent) = self.nodes[current].parent {
                let bit = if self.nodes[parent].left == Some(current) {
                    LEFT_BIT
                } else {
                    RIGHT_BIT
                };
                word.push_left(bit);
                current = parent;
            }
            let symbol = leaf.symbol().expect("leaf without a symbol").clone();
            code.set(symbol, word);
        }
        code
    }
}

impl<I: Clone, A: Clone> CodeTree<I, A> {
    /// Merge two trees under a fresh branch root, `left` on the left and
    /// `right` on the right. Node indices are shifted so every link stays
    /// consistent. Used by the Huffman builder.
    pub fn merge(left: &CodeTree<I, A>, right: &CodeTree<I, A>) -> CodeTree<I, A> {
        let mut merged = CodeTree::new();
        let root = merged.push_node(TreeNode::new(NodeContent::Branch));
        let left_root = merged.append_subtree(left);
        merged.nodes[root].left = Some(left_root);
        merged.nodes[left_root].parent = Some(root);
        let right_root = merged.append_subtree(right);
        merged.nodes[root].right = Some(right_root);
        merged.nodes[right_root].parent = Some(root);
        merged
    }

    /// Copy `subtree`'s nodes to the back of this tree, offsetting every
    /// index, and return the new index of the subtree's root.
    fn append_subtree(&mut self, subtree: &CodeTree<I, A>) -> usize {
        let offset = self.nodes.len();
        for node in &subtree.nodes {
            let mut copy = node.clone();
            copy.index = node.index + offset;
            copy.parent = node.parent.map(|p| p + offset);
            copy.left = node.left.map(|c| c + offset);
            copy.right = node.right.map(|c| c + offset);
            self.nodes.push(copy);
        }
        offset
    }
}

impl<I, A: PrimInt> CodeTree<I, A> {
    /// Total weight of the tree: the sum of its leaf symbols' weights.
    pub fn root_weight(&self) -> A {
        self.leaves().fold(A::zero(), |total, leaf| {
            total + leaf.symbol().map_or_else(A::zero, Symbol::weight)
        })
    }
}

impl<I, A> Default for CodeTree<I, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// A prefix-code construction algorithm.
pub trait PrefixCoder {
    /// Build a code tree over `distribution`.
    ///
    /// # Panics
    ///
    /// Panics on an empty distribution; that is a caller bug.
    fn build_tree<I, A>(&self, distribution: &SymbolList<I, A>) -> CodeTree<I, A>
    where
        I: Clone + Eq + Ord,
        A: PrimInt;

    /// Build the tree over `distribution` and derive its code map.
    fn encode<I, A>(&self, distribution: &SymbolList<I, A>) -> Code<I, A>
    where
        I: Clone + Eq + Ord,
        A: PrimInt,
    {
        self.build_tree(distribution).code_map()
    }
}
