//! Prediction by Partial Matching: an adaptive model of bounded order.
//!
//! The model keeps one symbol-count table per distinct context of every
//! order `0..=K`, where a context of order `k` is the sequence of the `k`
//! most recent message symbols. To code a symbol it scans from the longest
//! matching context downward: a context that knows the symbol supplies the
//! distribution to code it against; a context that does not emits the
//! escape ρ and drops one order. When every matching context has escaped,
//! the equiprobable list of never-seen symbols acts as the order −1
//! fallback.
//!
//! Encoder and decoder must walk through byte-identical distributions, so
//! both sides run the same round state machine: [`Model::emit`] is
//! implemented on top of [`Model::current_distribution`] and
//! [`Model::observe`], and every per-symbol count update happens exactly
//! once per order, after the round finishes.
//!
//! Contexts live in plain vectors scanned by equality. The tables are
//! small (at most the alphabet plus ρ) and the flat layout keeps both
//! sides trivially deterministic.

use crate::model::{Distribution, Model, TextSymbol};
use crate::symbol::Symbol;

/// A conditioning context: the preceding symbols (most recent first) and
/// the counts of the symbols seen after them, ρ included.
#[derive(Debug, Clone)]
struct Context {
    preceding: Vec<char>,
    symbols: Distribution,
}

/// Which distribution served the round's latest step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Serving {
    /// The matching context of this order.
    Order(usize),
    /// The order −1 equiprobable fallback.
    EquiProbable,
}

/// What a context order did during the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// The context escaped; the symbol was not in its table.
    Escaped,
    /// The context supplied the symbol.
    Emitted,
}

/// The PPM adaptive model of maximum order `K`.
#[derive(Debug, Clone)]
pub struct PpmModel {
    order: usize,
    /// `contexts[k]` holds every context whose sequence has length `k`.
    contexts: Vec<Vec<Context>>,
    /// Still-unseen alphabet symbols, each with count 1.
    eq_prob_list: Distribution,
    /// The most recent concrete symbols, newest first, at most `order` long.
    current_ctx: Vec<char>,
    /// Highest order the next distribution may come from; `None` once only
    /// the equiprobable fallback remains.
    ceiling: Option<usize>,
    /// The serving recorded by `current_distribution`, consumed by `observe`.
    pending: Option<Serving>,
    /// Per-order outcomes accumulated during the current round.
    round: Vec<(usize, Outcome)>,
}

impl PpmModel {
    /// A fresh model over `alphabet` with maximum context order `order`.
    pub fn new(alphabet: &[char], order: usize) -> Self {
        let eq_prob_list = alphabet
            .iter()
            .map(|&ch| Symbol::with_attribute(ch, 1))
            .collect();
        Self {
            order,
            contexts: vec![Vec::new(); order + 1],
            eq_prob_list,
            current_ctx: Vec::new(),
            ceiling: Some(0),
            pending: None,
            round: Vec::new(),
        }
    }

    /// The configured maximum context order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Index of the context of order `k` matching the current prefix.
    fn find_context(&self, k: usize) -> Option<usize> {
        let suffix = &self.current_ctx[..k];
        self.contexts[k]
            .iter()
            .position(|context| context.preceding == suffix)
    }

    /// Start a fresh round: every order up to the context length is in play.
    fn reset_round(&mut self) {
        self.ceiling = Some(self.current_ctx.len().min(self.order));
        self.pending = None;
        self.round.clear();
    }

    /// What `k` did this round, if it served a distribution.
    fn outcome_at(&self, k: usize) -> Option<Outcome> {
        self.round
            .iter()
            .find(|(order, _)| *order == k)
            .map(|(_, outcome)| *outcome)
    }

    /// Update every order exactly once for the finished symbol, then slide
    /// the context window. Orders that escaped this round gain the symbol
    /// and an ρ increment; the order that emitted it gains a count; orders
    /// the round never reached are created or updated from scratch.
    fn apply_update(&mut self, inner: char, from_eq_prob: bool) {
        let highest = self.current_ctx.len().min(self.order);
        for k in (0..=highest).rev() {
            match self.outcome_at(k) {
                Some(Outcome::Emitted) => {
                    let index = self.find_context(k).expect("emitting context exists");
                    let table = &mut self.contexts[k][index].symbols;
                    let position = table
                        .position_of(&Symbol::new(inner))
                        .expect("emitted symbol is in its table");
                    bump(table.at_mut(position));
                }
                Some(Outcome::Escaped) => {
                    let index = self.find_context(k).expect("escaping context exists");
                    add_novel(&mut self.contexts[k][index].symbols, inner);
                }
                None => match self.find_context(k) {
                    Some(index) => {
                        let table = &mut self.contexts[k][index].symbols;
                        match table.position_of(&Symbol::new(inner)) {
                            Some(position) => bump(table.at_mut(position)),
                            None => add_novel(table, inner),
                        }
                    }
                    None => {
                        let mut table = Distribution::new();
                        table.push(Symbol::escape_with_attribute(0));
                        add_novel(&mut table, inner);
                        self.contexts[k].push(Context {
                            preceding: self.current_ctx[..k].to_vec(),
                            symbols: table,
                        });
                    }
                },
            }
        }

        if from_eq_prob {
            self.eq_prob_list.remove(&Symbol::new(inner));
        }

        self.current_ctx.insert(0, inner);
        self.current_ctx.truncate(self.order);
        self.reset_round();
    }
}

/// Increment a symbol's count.
fn bump(symbol: &mut TextSymbol) {
    let count = symbol.attribute().unwrap_or(0);
    symbol.set_attribute(count + 1);
}

/// Add a symbol the table has never counted, incrementing ρ alongside.
fn add_novel(table: &mut Distribution, inner: char) {
    debug_assert!(!table.contains(&Symbol::new(inner)));
    table.push(Symbol::with_attribute(inner, 1));
    let rho = table
        .position_of(&Symbol::escape())
        .expect("every context table carries ρ");
    bump(table.at_mut(rho));
}

impl Model for PpmModel {
    fn emit(&mut self, symbol: &TextSymbol) -> Vec<(TextSymbol, Distribution)> {
        let mut pairs = Vec::new();
        loop {
            let distribution = self.current_distribution();
            let from_eq_prob = self.pending == Some(Serving::EquiProbable);
            if from_eq_prob || distribution.contains(symbol) {
                assert!(
                    distribution.contains(symbol),
                    "symbol outside the model alphabet"
                );
                pairs.push((symbol.clone(), distribution));
                self.observe(symbol);
                return pairs;
            }
            pairs.push((Symbol::escape(), distribution));
            self.observe(&Symbol::escape());
        }
    }

    fn current_distribution(&mut self) -> Distribution {
        if let Some(start) = self.ceiling {
            for k in (0..=start).rev() {
                if let Some(index) = self.find_context(k) {
                    self.pending = Some(Serving::Order(k));
                    return self.contexts[k][index].symbols.clone();
                }
            }
        }
        self.pending = Some(Serving::EquiProbable);
        self.eq_prob_list.clone()
    }

    fn observe(&mut self, symbol: &TextSymbol) {
        let serving = self
            .pending
            .take()
            .expect("observe without a served distribution");

        if symbol.is_unknown() {
            let k = match serving {
                Serving::Order(k) => k,
                Serving::EquiProbable => {
                    panic!("escape decoded from the equiprobable fallback")
                }
            };
            self.round.push((k, Outcome::Escaped));
            // Orders >= k already escaped this round and stay out of play.
            self.ceiling = k.checked_sub(1);
            return;
        }

        if let Serving::Order(k) = serving {
            self.round.push((k, Outcome::Emitted));
        }
        let inner = *symbol.inner().expect("concrete symbol has an inner value");
        self.apply_update(inner, serving == Serving::EquiProbable);
    }
}
