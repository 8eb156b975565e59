//! Folds fully reduced braket terms into epsilon-tensor coefficients.
//!
//! After bound reduction and normal ordering, a braket term's sequences
//! hold at most N annihilators followed by creators. Against the vacuum
//! such a block is a Levi-Civita contraction, so each sequence becomes a
//! `±d_(..)*e_(..)*e_(..)` line of the coefficient string and the
//! symbolic part empties out.

use gradus_core::{Algebra, Idx, Sign};

use crate::term::Term;

/// Renders the paired epsilon tensors for one sequence.
///
/// The annihilator indices fill the first tensor in order, the creator
/// indices fill the second reversed. When fewer than N operators are
/// present, both tensors are padded with the same fresh summation
/// indices; the `t<k>` names skip any name already carried by the term,
/// and the repeated-padding overcount is divided back out as a factor of
/// m! for m padding slots.
fn levi_civita(annihilators: &[Idx], creators: &[Idx], used: &[Idx], alg: &mut Algebra) -> String {
    debug_assert_eq!(annihilators.len(), creators.len());
    let n = alg.half_dim() as usize;
    let mut eps_b = String::from("e_(");
    let mut eps_bt = String::from("e_(");
    for (j, (&a, &c)) in annihilators.iter().zip(creators.iter().rev()).enumerate() {
        eps_b.push_str(alg.index_name(a));
        eps_bt.push_str(alg.index_name(c));
        if j + 1 < n {
            eps_b.push(',');
            eps_bt.push(',');
        }
    }
    let pad = n.saturating_sub(annihilators.len());
    let mut factor: u64 = 1;
    let mut suffix: u32 = 1;
    for j in 0..pad {
        let name = loop {
            let candidate = format!("t{suffix}");
            suffix += 1;
            let id = alg.intern(&candidate);
            if !used.contains(&id) {
                break candidate;
            }
        };
        factor *= (j as u64) + 1;
        eps_b.push_str(&name);
        eps_bt.push_str(&name);
        if j + 1 < pad {
            eps_b.push(',');
            eps_bt.push(',');
        }
    }
    eps_b.push(')');
    eps_bt.push(')');
    let mut rendered = eps_b;
    rendered.push('*');
    rendered.push_str(&eps_bt);
    if factor > 1 {
        rendered.push_str(&format!("/{factor}"));
    }
    rendered
}

fn indices_in_use(term: &Term) -> Vec<Idx> {
    let mut used = Vec::new();
    for seq in &term.sequences {
        for symbol in seq.symbols() {
            for id in [symbol.idx1(), symbol.idx2()].into_iter().flatten() {
                if !used.contains(&id) {
                    used.push(id);
                }
            }
        }
    }
    used
}

/// Rewrites every sequence of `term` as an epsilon line of the
/// coefficient and clears the symbolic part. The caller has already
/// checked that the term belongs to a braket expression.
pub(crate) fn fold_into_coefficient(term: &mut Term, alg: &mut Algebra) {
    let mut out = if term.coefficient.is_empty() {
        String::from("(\n")
    } else {
        String::from("*(\n")
    };
    let used = indices_in_use(term);
    for seq in &term.sequences {
        if seq.is_empty() {
            continue;
        }
        out.push(match seq.sign() {
            Sign::Plus => '+',
            Sign::Minus => '-',
        });
        let deltas = seq.render_deltas(alg.registry());
        out.push_str(&deltas);
        let (annihilators, creators) = seq.operator_ids();
        let has_operators = !annihilators.is_empty() || !creators.is_empty();
        if has_operators {
            if !deltas.is_empty() {
                out.push('*');
            }
            out.push_str(&levi_civita(&annihilators, &creators, &used, alg));
        }
        out.push('\n');
    }
    out.push(')');
    term.sequences.clear();
    term.coefficient.push_str(&out);
}
