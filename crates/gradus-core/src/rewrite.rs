//! The two anticommutation rewrite primitives.
//!
//! Each primitive performs one rewrite step on an adjacent operator pair:
//! the pair collapses to a delta prepended to the input sequence (the
//! shortened, continuing branch), and a sign-negated copy of the original
//! with the pair swapped in place is handed back as a new branch for the
//! caller's work list. Together they implement
//!
//! ```text
//! b_i b†_j = δ_(i,j) − b†_j b_i        (primitive A)
//! b†_j b_i = δ_(i,j) − b_i b†_j        (primitive B)
//! ```
//!
//! Neither primitive iterates: how often to apply them and where emitted
//! branches go is the job of the term-level loops upstream.

use crate::sequence::OpSequence;
use crate::symbol::{Symbol, SymbolKind};

/// Outcome of one rewrite step.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Rewrite {
    /// No applicable pair; the input was left untouched.
    Stuck,
    /// The input vanishes against the vacuum boundary and was cleared.
    Cleared,
    /// One pair was contracted in place; the swapped branch is emitted.
    Step(OpSequence),
}

/// Applies `b_i b†_j = δ_(i,j) − b†_j b_i` at the last annihilator.
///
/// The input keeps the shortened branch: the adjacent (annihilator,
/// creator) pair is removed and `δ_(i,j)` is prepended, so deltas
/// accumulate at the head. The returned branch is a copy of the original
/// input with the sign negated and the pair swapped in place.
///
/// With `terminal` set (braket boundary), an annihilator in final position
/// clears the input: that whole branch is `… b_i |0⟩ = 0`. Without it the
/// input is left as is. A last annihilator followed by anything but a
/// creator is also left untouched.
pub fn contract_annihilator_creator(seq: &mut OpSequence, terminal: bool) -> Rewrite {
    let Some(pos) = seq.last_index_of(SymbolKind::Annihilator) else {
        return Rewrite::Stuck;
    };
    if pos + 1 == seq.len() {
        if terminal {
            seq.clear();
            return Rewrite::Cleared;
        }
        return Rewrite::Stuck;
    }
    let Some(Symbol::Annihilator(ann)) = seq.get(pos) else {
        return Rewrite::Stuck;
    };
    let Some(Symbol::Creator(cre)) = seq.get(pos + 1) else {
        return Rewrite::Stuck;
    };

    let mut branch = seq.clone();
    branch.negate();
    branch.swap(pos, pos + 1);

    seq.remove(pos);
    seq.remove(pos);
    seq.prepend(Symbol::Delta(ann, cre));

    Rewrite::Step(branch)
}

/// Applies `b†_j b_i = δ_(i,j) − b_i b†_j` at the first disordered pair at
/// or after the first creator.
///
/// With `terminal` set, a creator in first position clears the input: that
/// whole branch is `⟨0| b†_j … = 0`. Otherwise the scan walks forward from
/// the first creator until it finds an adjacent (creator, annihilator)
/// pair; the pair is removed, `δ_(i,j)` is prepended, and the sign-negated
/// swapped copy is emitted. If no disordered pair exists the input is left
/// untouched.
pub fn order_creator_annihilator(seq: &mut OpSequence, terminal: bool) -> Rewrite {
    let Some(first) = seq.first_index_of(SymbolKind::Creator) else {
        return Rewrite::Stuck;
    };
    if first == 0 {
        if terminal {
            seq.clear();
            return Rewrite::Cleared;
        }
        return Rewrite::Stuck;
    }

    let mut pos = first;
    while pos + 1 < seq.len() {
        if let (Some(Symbol::Creator(cre)), Some(Symbol::Annihilator(ann))) =
            (seq.get(pos), seq.get(pos + 1))
        {
            let mut branch = seq.clone();
            branch.negate();
            branch.swap(pos, pos + 1);

            seq.remove(pos);
            seq.remove(pos);
            seq.prepend(Symbol::Delta(ann, cre));

            return Rewrite::Step(branch);
        }
        pos += 1;
    }
    Rewrite::Stuck
}
