//! # Prefix-Code Compression with Context Modeling
//!
//! *Adaptive prefix coding driven by pluggable probability models.*
//!
//! ## Intuition First
//!
//! Imagine taking dictation in a language you know well. After writing
//! down "COMPRESSA" you would bet the next letter is "O", so you could jot
//! a single tick instead of a whole letter. A context model makes that bet
//! explicit: it remembers which symbols followed which recent prefixes and
//! hands the coder a probability table per position. The coder then spends
//! few bits on likely symbols and more on surprises.
//!
//! ## The Problem
//!
//! A fixed code table is only as good as its guess about the text. Real
//! text is wildly non-uniform *and* context-dependent: "q" is rare, but
//! after "q" the letter "u" is near-certain. Static prefix codes capture
//! the first effect; capturing the second needs a model that adapts while
//! encoder and decoder stay perfectly synchronized without any side
//! channel.
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon         Entropy as the fundamental limit
//! 1949  Fano            Top-down balanced splitting (Shannon–Fano)
//! 1952  Huffman         Optimal bottom-up prefix codes
//! 1984  Cleary & Witten Prediction by Partial Matching (PPM)
//! 1988  Moffat          PPMC: practical escape estimation
//! 1990  Howard & Vitter Practical arithmetic + context modeling
//! 2002  Shkarin         PPMd var. H: PPM as a production compressor
//! ```
//!
//! Cleary and Witten's key insight was the escape symbol: a context that
//! has never seen the upcoming symbol emits ρ, an explicit "drop one order"
//! marker, so the decoder can follow the model's retreat step by step.
//!
//! ## Mathematical Formulation
//!
//! For a source with symbol probabilities $p_s$, any uniquely decodable
//! code obeys Shannon's bound on the expected length $L$:
//!
//! ```text
//! H(P) = -\sum_s p_s \log_2 p_s \le L
//! ```
//!
//! Huffman's construction achieves $L < H(P) + 1$ for known $p_s$. PPM
//! replaces the fixed $P$ with per-context conditional distributions
//! $P(s \mid \text{last } k \text{ symbols})$, whose conditional entropy is
//! far lower for natural language.
//!
//! ## Complexity Analysis
//!
//! - **Time**: rebuilding a tree over an alphabet of $n$ symbols costs
//!   $O(n^2)$ per emitted pair with the flat forest here ($n \le 28$).
//! - **Space**: $O(\text{contexts} \cdot n)$ for the count tables.
//!
//! ## Failure Modes
//!
//! 1. **Desynchronization**: a single flipped bit corrupts every later
//!    symbol; adaptive coding has no resynchronization point.
//! 2. **Cold start**: early symbols ride the equiprobable fallback and can
//!    cost more bits than a static code until the contexts warm up.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **Shannon–Fano** and **Huffman** tree builders over one generic,
//!   index-addressed [`tree::CodeTree`].
//! - A **static model** with the Portuguese letter frequencies and an
//!   adaptive **PPM model** of bounded order, both behind [`model::Model`].
//! - A **driver** pairing any model with any coder over a bit-serialized
//!   container, plus the text normalization the models assume.
//!
//! ## References
//!
//! - Shannon, C. E. (1948). "A Mathematical Theory of Communication."
//! - Huffman, D. A. (1952). "A Method for the Construction of Minimum-Redundancy Codes."
//! - Cleary, J. G., & Witten, I. H. (1984). "Data Compression Using Adaptive Coding and Partial String Matching."
//! - Moffat, A. (1990). "Implementing the PPM Data Compression Scheme."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitstream;
pub mod code;
pub mod compressor;
pub mod error;
pub mod huffman;
pub mod model;
pub mod ppm;
pub mod shannon_fano;
pub mod symbol;
pub mod text;
pub mod tree;

pub use bitstream::{BitReader, BitWriter};
pub use code::{Code, CodeWord};
pub use compressor::{CompressionInfo, Compressor};
pub use error::{Error, Result};
pub use huffman::Huffman;
pub use model::{Distribution, Model, StaticModel, TextSymbol};
pub use ppm::PpmModel;
pub use shannon_fano::ShannonFano;
pub use symbol::{Symbol, SymbolList};
pub use tree::{CodeTree, NodeContent, PrefixCoder, TreeNode, LEFT_BIT, RIGHT_BIT};
