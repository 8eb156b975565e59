//! The operator-sequence alphabet.
//!
//! Four symbols make up a sequence: the annihilation operator `b_i`, the
//! creation operator `b†_i`, the Kronecker delta `δ_(i,j)` produced by the
//! rewrite primitives, and the multiplicative identity.

use crate::index::{Idx, IndexRegistry};

/// Discriminant of a [`Symbol`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SymbolKind {
    /// Annihilation operator `b`.
    Annihilator,
    /// Creation operator `b†`.
    Creator,
    /// Kronecker delta between two indices.
    Delta,
    /// Multiplicative identity `1`.
    Identity,
}

/// One symbol of an operator sequence.
///
/// `Delta` carries two index handles, the operators carry one, `Identity`
/// carries none.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Symbol {
    /// Annihilation operator `b_i`.
    Annihilator(Idx),
    /// Creation operator `b†_i`.
    Creator(Idx),
    /// Kronecker delta `δ_(i,j)`.
    Delta(Idx, Idx),
    /// Multiplicative identity `1`.
    Identity,
}

impl Symbol {
    /// Returns the discriminant of this symbol.
    #[must_use]
    pub const fn kind(self) -> SymbolKind {
        match self {
            Symbol::Annihilator(_) => SymbolKind::Annihilator,
            Symbol::Creator(_) => SymbolKind::Creator,
            Symbol::Delta(_, _) => SymbolKind::Delta,
            Symbol::Identity => SymbolKind::Identity,
        }
    }

    /// Returns true for an annihilation operator.
    #[must_use]
    pub const fn is_annihilator(self) -> bool {
        matches!(self, Symbol::Annihilator(_))
    }

    /// Returns true for a creation operator.
    #[must_use]
    pub const fn is_creator(self) -> bool {
        matches!(self, Symbol::Creator(_))
    }

    /// Returns true for a delta.
    #[must_use]
    pub const fn is_delta(self) -> bool {
        matches!(self, Symbol::Delta(_, _))
    }

    /// Returns true for the identity.
    #[must_use]
    pub const fn is_identity(self) -> bool {
        matches!(self, Symbol::Identity)
    }

    /// Returns true for an annihilator or creator.
    #[must_use]
    pub const fn is_operator(self) -> bool {
        matches!(self, Symbol::Annihilator(_) | Symbol::Creator(_))
    }

    /// Returns the first index slot, if the symbol carries one.
    #[must_use]
    pub const fn idx1(self) -> Option<Idx> {
        match self {
            Symbol::Annihilator(i) | Symbol::Creator(i) | Symbol::Delta(i, _) => Some(i),
            Symbol::Identity => None,
        }
    }

    /// Returns the second index slot (deltas only).
    #[must_use]
    pub const fn idx2(self) -> Option<Idx> {
        match self {
            Symbol::Delta(_, j) => Some(j),
            _ => None,
        }
    }

    /// Renders the symbol in the external-tool form: `b(i)`, `bt(i)`,
    /// `d_(i,j)` or `1`.
    ///
    /// # Panics
    ///
    /// Panics if an index handle was not issued by `registry`.
    #[must_use]
    pub fn render(self, registry: &IndexRegistry) -> String {
        match self {
            Symbol::Annihilator(i) => format!("b({})", registry.name(i)),
            Symbol::Creator(i) => format!("bt({})", registry.name(i)),
            Symbol::Delta(i, j) => format!("d_({},{})", registry.name(i), registry.name(j)),
            Symbol::Identity => "1".to_owned(),
        }
    }
}
