//! Term-level reduction loops.
//!
//! Each loop walks a term's sequence list, applying one rewrite primitive
//! until a per-sequence stop condition holds. A rewrite step shortens the
//! sequence in place and emits a branch; branches are appended to the end
//! of the list and picked up by the same walk. Under ket/braket mode a
//! sequence ending in an annihilator vanishes against the vacuum: emitted
//! branches are dropped instead of pushed, and a continuing sequence is
//! erased.
//!
//! A primitive reporting no progress stops work on that sequence. The
//! batch tool this replaces would spin forever on such inputs; none are
//! reachable through its drivers, and stopping keeps the loops total.

use gradus_core::{
    contract_annihilator_creator, order_creator_annihilator, Limits, OpSequence, Rewrite,
    SymbolKind,
};

use crate::error::BraketError;
use crate::mode::Mode;

fn push_branch(
    seqs: &mut Vec<OpSequence>,
    branch: OpSequence,
    limits: Limits,
) -> Result<(), BraketError> {
    if let Some(limit) = limits.max_sequences {
        if seqs.len() >= limit {
            return Err(BraketError::WorkLimitExceeded { limit });
        }
    }
    seqs.push(branch);
    Ok(())
}

/// Entry gate shared by the contraction loops: an empty sequence has no
/// work, and one ending in an annihilator has nothing to its right to
/// contract with.
fn contraction_gate(seq: &OpSequence) -> bool {
    !seq.is_empty() && !seq.ends_with(SymbolKind::Annihilator)
}

/// Contracts every annihilator/creator pair down to deltas.
///
/// Runs primitive A on each sequence until no annihilator remains; under
/// mode none the sequence is also left alone once either operator kind is
/// exhausted (a free operator string keeps its uncontractable remainder).
pub fn contract_to_deltas(
    seqs: &mut Vec<OpSequence>,
    mode: Mode,
    limits: Limits,
) -> Result<(), BraketError> {
    let terminal = mode.is_terminal();
    let truncate = mode.truncates_trailing_annihilator();
    let mut i = 0;
    while i < seqs.len() {
        if !contraction_gate(&seqs[i]) {
            i += 1;
            continue;
        }
        let mut erased = false;
        loop {
            if seqs[i].first_index_of(SymbolKind::Annihilator).is_none() {
                break;
            }
            if mode == Mode::None && seqs[i].first_index_of(SymbolKind::Creator).is_none() {
                break;
            }
            match contract_annihilator_creator(&mut seqs[i], terminal) {
                Rewrite::Step(branch) => {
                    if !(truncate && branch.ends_with(SymbolKind::Annihilator)) {
                        push_branch(seqs, branch, limits)?;
                    }
                    if truncate && seqs[i].ends_with(SymbolKind::Annihilator) {
                        seqs.remove(i);
                        erased = true;
                        break;
                    }
                }
                Rewrite::Cleared => {
                    seqs.remove(i);
                    erased = true;
                    break;
                }
                Rewrite::Stuck => break,
            }
        }
        if !erased {
            i += 1;
        }
    }
    Ok(())
}

/// Contracts sequences whose annihilator count exceeds the
/// single-particle bound N, leaving sequences at or below it untouched.
pub fn reduce_to_canonical_count(
    seqs: &mut Vec<OpSequence>,
    mode: Mode,
    half_dim: u32,
    limits: Limits,
) -> Result<(), BraketError> {
    let terminal = mode.is_terminal();
    let truncate = mode.truncates_trailing_annihilator();
    let bound = half_dim as usize;
    let mut i = 0;
    while i < seqs.len() {
        if !contraction_gate(&seqs[i]) {
            i += 1;
            continue;
        }
        let mut erased = false;
        while seqs[i].count_of(SymbolKind::Annihilator) > bound {
            match contract_annihilator_creator(&mut seqs[i], terminal) {
                Rewrite::Step(branch) => {
                    if !(truncate && branch.ends_with(SymbolKind::Annihilator)) {
                        push_branch(seqs, branch, limits)?;
                    }
                    if truncate && seqs[i].ends_with(SymbolKind::Annihilator) {
                        seqs.remove(i);
                        erased = true;
                        break;
                    }
                }
                Rewrite::Cleared => {
                    seqs.remove(i);
                    erased = true;
                    break;
                }
                Rewrite::Stuck => break,
            }
        }
        if !erased {
            i += 1;
        }
    }
    Ok(())
}

/// Normal-orders every sequence: primitive B until each sequence's
/// operator projection is sorted (annihilators before creators) or the
/// sequence is eliminated.
pub fn normal_order_all(
    seqs: &mut Vec<OpSequence>,
    mode: Mode,
    limits: Limits,
) -> Result<(), BraketError> {
    let terminal = mode.is_terminal();
    let truncate = mode.truncates_trailing_annihilator();
    let mut i = 0;
    while i < seqs.len() {
        if seqs[i].is_empty() {
            i += 1;
            continue;
        }
        let mut erased = false;
        while !seqs[i].is_normal_ordered() {
            match order_creator_annihilator(&mut seqs[i], terminal) {
                Rewrite::Step(branch) => {
                    if !(truncate && branch.ends_with(SymbolKind::Annihilator)) {
                        push_branch(seqs, branch, limits)?;
                    }
                    if truncate && seqs[i].ends_with(SymbolKind::Annihilator) {
                        seqs.remove(i);
                        erased = true;
                        break;
                    }
                }
                Rewrite::Cleared => {
                    seqs.remove(i);
                    erased = true;
                    break;
                }
                Rewrite::Stuck => break,
            }
        }
        if !erased {
            i += 1;
        }
    }
    Ok(())
}
