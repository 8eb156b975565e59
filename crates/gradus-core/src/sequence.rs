//! Signed operator sequences.
//!
//! An [`OpSequence`] is one multiplicative string of symbols inside a term,
//! together with a single overall sign. Terms hold several sequences as
//! disjunctive alternatives (branches emitted by the rewrite primitives);
//! each sequence is exclusively owned and deep-copied on clone.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::index::{Idx, IndexRegistry};
use crate::symbol::{Symbol, SymbolKind};

/// Sign carried by a whole sequence.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Sign {
    /// +1
    #[default]
    Plus,
    /// −1
    Minus,
}

impl Sign {
    /// Returns the flipped sign.
    #[must_use]
    pub const fn negated(self) -> Self {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }

    /// Returns the product of two signs.
    #[must_use]
    pub const fn mul(self, other: Self) -> Self {
        match (self, other) {
            (Sign::Plus, Sign::Plus) | (Sign::Minus, Sign::Minus) => Sign::Plus,
            _ => Sign::Minus,
        }
    }

    /// Returns true for [`Sign::Minus`].
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self, Sign::Minus)
    }
}

/// An ordered sequence of symbols with one overall sign.
///
/// Sequences stay short in practice (a handful of operators plus the deltas
/// that contraction prepends), so symbol storage is inline up to eight
/// entries.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct OpSequence {
    symbols: SmallVec<[Symbol; 8]>,
    sign: Sign,
}

impl OpSequence {
    /// Creates an empty sequence with positive sign.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sequence holding one symbol.
    #[must_use]
    pub fn single(symbol: Symbol) -> Self {
        let mut symbols = SmallVec::new();
        symbols.push(symbol);
        Self {
            symbols,
            sign: Sign::Plus,
        }
    }

    /// Creates a sequence from symbols in order, with positive sign.
    #[must_use]
    pub fn from_symbols(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
            sign: Sign::Plus,
        }
    }

    /// Returns the overall sign.
    #[must_use]
    pub const fn sign(&self) -> Sign {
        self.sign
    }

    /// Sets the overall sign.
    pub fn set_sign(&mut self, sign: Sign) {
        self.sign = sign;
    }

    /// Flips the overall sign in place.
    pub fn negate(&mut self) {
        self.sign = self.sign.negated();
    }

    /// Returns a copy with the sign flipped.
    #[must_use]
    pub fn negated(&self) -> Self {
        let mut out = self.clone();
        out.negate();
        out
    }

    /// Returns true if the sequence holds no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the symbols as a slice.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Returns the symbol at `pos`, if any.
    #[must_use]
    pub fn get(&self, pos: usize) -> Option<Symbol> {
        self.symbols.get(pos).copied()
    }

    /// Appends a symbol at the end.
    pub fn push(&mut self, symbol: Symbol) {
        self.symbols.push(symbol);
    }

    /// Inserts a symbol at the front.
    pub fn prepend(&mut self, symbol: Symbol) {
        self.symbols.insert(0, symbol);
    }

    /// Removes and returns the symbol at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    pub fn remove(&mut self, pos: usize) -> Symbol {
        self.symbols.remove(pos)
    }

    /// Swaps the symbols at two positions.
    ///
    /// # Panics
    ///
    /// Panics if either position is out of bounds.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.symbols.swap(a, b);
    }

    /// Drops every symbol; the sign is left untouched.
    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    /// Appends a copy of `other`'s symbols; the sign becomes the product of
    /// both signs.
    ///
    /// Identity symbols of `other` are absorbed (a nonempty product is its
    /// own unit) except when `self` is empty and the identity is `other`'s
    /// final symbol, which keeps a bare `1 * 1 = 1` alive.
    pub fn concat(&mut self, other: &Self) {
        self.sign = self.sign.mul(other.sign);
        let lhs_was_empty = self.symbols.is_empty();
        let last = other.symbols.len().wrapping_sub(1);
        for (pos, &symbol) in other.symbols.iter().enumerate() {
            if symbol.is_identity() && !(lhs_was_empty && pos == last) {
                continue;
            }
            self.symbols.push(symbol);
        }
    }

    /// Returns the sequence with deltas first, then the operators, each
    /// group in original relative order; identities are dropped.
    ///
    /// A single-symbol sequence passes through unchanged, so a bare
    /// identity (the `<0|0>` contribution) survives reordering.
    #[must_use]
    pub fn reorder_by_type(&self) -> Self {
        if self.symbols.len() <= 1 {
            return self.clone();
        }
        let mut out = Self {
            symbols: SmallVec::new(),
            sign: self.sign,
        };
        for &symbol in &self.symbols {
            if symbol.is_delta() {
                out.symbols.push(symbol);
            }
        }
        for &symbol in &self.symbols {
            if symbol.is_operator() {
                out.symbols.push(symbol);
            }
        }
        out
    }

    /// Returns the number of symbols of the given kind.
    #[must_use]
    pub fn count_of(&self, kind: SymbolKind) -> usize {
        self.symbols.iter().filter(|s| s.kind() == kind).count()
    }

    /// Returns the position of the first symbol of `kind`.
    #[must_use]
    pub fn first_index_of(&self, kind: SymbolKind) -> Option<usize> {
        self.symbols.iter().position(|s| s.kind() == kind)
    }

    /// Returns the position of the last symbol of `kind`.
    #[must_use]
    pub fn last_index_of(&self, kind: SymbolKind) -> Option<usize> {
        self.symbols.iter().rposition(|s| s.kind() == kind)
    }

    /// Returns true if the final symbol has the given kind.
    #[must_use]
    pub fn ends_with(&self, kind: SymbolKind) -> bool {
        self.symbols.last().is_some_and(|s| s.kind() == kind)
    }

    /// Returns `true` unless a symbol of `kind0` occurs before any symbol
    /// of `kind1`.
    ///
    /// With `(Creator, Annihilator)` this is the bra boundary check: a
    /// sequence whose first operator is a creator vanishes against
    /// `<0| b† = 0`. The scan keeps going on `kind1` hits and other
    /// kinds, and fails only on a `kind0` seen before any `kind1`; a
    /// sequence containing neither passes.
    #[must_use]
    pub fn first_in_order(&self, kind0: SymbolKind, kind1: SymbolKind) -> bool {
        for &symbol in &self.symbols {
            if symbol.kind() == kind0 {
                return false;
            }
            if symbol.kind() == kind1 {
                return true;
            }
        }
        true
    }

    /// Projects the operator symbols to kind ids (annihilator 0, creator
    /// 1) in order, skipping deltas and identities.
    #[must_use]
    pub fn kind_ids(&self) -> Vec<u8> {
        self.symbols
            .iter()
            .filter_map(|s| match s {
                Symbol::Annihilator(_) => Some(0),
                Symbol::Creator(_) => Some(1),
                _ => None,
            })
            .collect()
    }

    /// Returns true when every annihilator precedes every creator.
    #[must_use]
    pub fn is_normal_ordered(&self) -> bool {
        let mut seen_creator = false;
        for &symbol in &self.symbols {
            match symbol {
                Symbol::Creator(_) => seen_creator = true,
                Symbol::Annihilator(_) if seen_creator => return false,
                _ => {}
            }
        }
        true
    }

    /// Returns true if any index handle appears more than once across the
    /// operator and delta slots.
    #[must_use]
    pub fn has_duplicate_indices(&self) -> bool {
        let mut seen = FxHashSet::default();
        for &symbol in &self.symbols {
            for idx in [symbol.idx1(), symbol.idx2()].into_iter().flatten() {
                if !seen.insert(idx) {
                    return true;
                }
            }
        }
        false
    }

    /// Checks every delta's indices against the ambient dimension.
    ///
    /// A delta whose two indices are numeric, distinct and both within
    /// `1..=bound` is identically zero, and any numeric index above `bound`
    /// is out of range; either case fails the whole sequence. Equal numeric
    /// pairs (`δ_(i,i) = 1`) and symbolic indices pass. An empty sequence
    /// fails: it carries no contribution.
    #[must_use]
    pub fn all_deltas_index_valid(&self, bound: u32, registry: &IndexRegistry) -> bool {
        if self.symbols.is_empty() {
            return false;
        }
        let in_bounds = |v: i64| v > 0 && v <= i64::from(bound);
        for &symbol in &self.symbols {
            let Symbol::Delta(a, b) = symbol else {
                continue;
            };
            let na = registry.name(a).parse::<i64>().ok();
            let nb = registry.name(b).parse::<i64>().ok();
            if let (Some(na), Some(nb)) = (na, nb) {
                if na != nb && in_bounds(na) && in_bounds(nb) {
                    return false;
                }
            }
            if na.is_some_and(|v| v > i64::from(bound)) || nb.is_some_and(|v| v > i64::from(bound))
            {
                return false;
            }
        }
        true
    }

    /// Collects the annihilator indices and the creator indices, each in
    /// appearance order. Feeds the epsilon-tensor rendering.
    #[must_use]
    pub fn operator_ids(&self) -> (Vec<Idx>, Vec<Idx>) {
        let mut annihilators = Vec::new();
        let mut creators = Vec::new();
        for &symbol in &self.symbols {
            match symbol {
                Symbol::Annihilator(i) => annihilators.push(i),
                Symbol::Creator(i) => creators.push(i),
                _ => {}
            }
        }
        (annihilators, creators)
    }

    /// Renders the delta and identity factors, `*`-joined, in the
    /// external-tool form (`d_(a,b)*d_(c,d)`).
    ///
    /// # Panics
    ///
    /// Panics if an index handle was not issued by `registry`.
    #[must_use]
    pub fn render_deltas(&self, registry: &IndexRegistry) -> String {
        let pieces: Vec<String> = self
            .symbols
            .iter()
            .filter(|s| s.is_delta() || s.is_identity())
            .map(|s| s.render(registry))
            .collect();
        pieces.join("*")
    }

    /// Renders the symbols joined with ` * `, or `0` for an empty sequence.
    /// The sign is not included; the owning term prints it.
    ///
    /// # Panics
    ///
    /// Panics if an index handle was not issued by `registry`.
    #[must_use]
    pub fn render(&self, registry: &IndexRegistry) -> String {
        if self.symbols.is_empty() {
            return "0".to_owned();
        }
        let pieces: Vec<String> = self.symbols.iter().map(|s| s.render(registry)).collect();
        pieces.join(" * ")
    }
}
