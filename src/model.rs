//! Probability models driving the prefix coders.
//!
//! A model decides, symbol by symbol, which distribution the coder builds
//! its tree over. The driver talks to models through the [`Model`] trait
//! so a fixed-table model and the adaptive PPM model are interchangeable.
//! Encode and decode share one state machine: `emit` is the encoder view,
//! `current_distribution`/`observe` the decoder view, and both must march
//! through identical distributions for the bit stream to round-trip.

use crate::symbol::{Symbol, SymbolList};
use crate::text;

/// A symbol of the text alphabet with an occurrence-count attribute.
pub type TextSymbol = Symbol<char, u32>;

/// A weighted list of text symbols, consumed by the coders as a
/// distribution.
pub type Distribution = SymbolList<char, u32>;

/// A probability model the compression driver can plug in.
pub trait Model {
    /// The ordered `(symbol, distribution)` pairs that encode `symbol`.
    ///
    /// Each pair is coded against its own tree, in order. Adaptive models
    /// return escape steps before the final concrete step; the
    /// distributions are snapshots taken before the model updates itself.
    fn emit(&mut self, symbol: &TextSymbol) -> Vec<(TextSymbol, Distribution)>;

    /// The distribution the next decoded symbol is drawn from.
    fn current_distribution(&mut self) -> Distribution;

    /// Report a decoded symbol (possibly the escape ρ) back to the model.
    fn observe(&mut self, symbol: &TextSymbol);
}

/// A fixed-weight model: every symbol is coded against the same weighted
/// alphabet and nothing adapts.
#[derive(Debug, Clone)]
pub struct StaticModel {
    distribution: Distribution,
}

impl StaticModel {
    /// A static model over the given weighted alphabet.
    pub fn new(distribution: Distribution) -> Self {
        assert!(!distribution.is_empty(), "empty alphabet");
        Self { distribution }
    }

    /// The static model loaded with the Portuguese character frequencies.
    pub fn portuguese() -> Self {
        Self::new(text::static_weights())
    }
}

impl Model for StaticModel {
    fn emit(&mut self, symbol: &TextSymbol) -> Vec<(TextSymbol, Distribution)> {
        assert!(
            self.distribution.contains(symbol),
            "symbol outside the model alphabet"
        );
        vec![(symbol.clone(), self.distribution.clone())]
    }

    fn current_distribution(&mut self) -> Distribution {
        self.distribution.clone()
    }

    fn observe(&mut self, _symbol: &TextSymbol) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_model_emits_one_pair_per_symbol() {
        let mut model = StaticModel::portuguese();
        let pairs = model.emit(&Symbol::new('A'));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, Symbol::new('A'));
        assert_eq!(pairs[0].1.size(), text::ALPHABET.len());
    }

    #[test]
    fn static_model_never_adapts() {
        let mut model = StaticModel::portuguese();
        let before = model.current_distribution();
        model.observe(&Symbol::new('A'));
        model.emit(&Symbol::new('A'));
        let after = model.current_distribution();
        assert_eq!(before.size(), after.size());
        for (a, b) in before.iter().zip(after.iter()) {
            assert_eq!(a.inner(), b.inner());
            assert_eq!(a.attribute(), b.attribute());
        }
    }

    #[test]
    #[should_panic(expected = "outside the model alphabet")]
    fn emitting_a_foreign_symbol_is_a_bug() {
        let mut model = StaticModel::portuguese();
        model.emit(&Symbol::new('é'));
    }
}
