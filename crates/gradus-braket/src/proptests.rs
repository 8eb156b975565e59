//! Property-based tests for the reduction loops and the expression algebra.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use gradus_core::{Algebra, Idx, Limits, OpSequence, Symbol, SymbolKind};

    use crate::braket::Braket;
    use crate::mode::Mode;
    use crate::ops::bop;
    use crate::reduce::{contract_to_deltas, normal_order_all, reduce_to_canonical_count};
    use crate::term::Term;

    // Strategy over a fixed pool of eight index handles
    fn any_index() -> impl Strategy<Value = Idx> {
        (0u32..8).prop_map(Idx::new)
    }

    fn any_mode() -> impl Strategy<Value = Mode> {
        prop_oneof![
            Just(Mode::None),
            Just(Mode::Bra),
            Just(Mode::Ket),
            Just(Mode::Braket),
        ]
    }

    fn any_operator() -> impl Strategy<Value = Symbol> {
        prop_oneof![
            any_index().prop_map(Symbol::Annihilator),
            any_index().prop_map(Symbol::Creator),
        ]
    }

    fn operator_sequence() -> impl Strategy<Value = OpSequence> {
        (proptest::collection::vec(any_operator(), 0..8), any::<bool>()).prop_map(
            |(ops, negate)| {
                let mut seq = OpSequence::from_symbols(ops);
                if negate {
                    seq.negate();
                }
                seq
            },
        )
    }

    // Like operator_sequence, but a trailing annihilator is flipped to a
    // creator: the contraction loops gate such strands out instead of
    // walking them, and simplify prunes them before evaluation anyway.
    fn guarded_sequence() -> impl Strategy<Value = OpSequence> {
        (proptest::collection::vec(any_operator(), 0..8), any::<bool>()).prop_map(
            |(mut ops, negate)| {
                if let Some(Symbol::Annihilator(i)) = ops.last().copied() {
                    *ops.last_mut().unwrap() = Symbol::Creator(i);
                }
                let mut seq = OpSequence::from_symbols(ops);
                if negate {
                    seq.negate();
                }
                seq
            },
        )
    }

    fn small_term() -> impl Strategy<Value = Term> {
        (
            -3i32..=3,
            "[a-z]{0,3}",
            proptest::collection::vec(
                proptest::collection::vec(any_operator(), 1..4),
                1..3,
            ),
        )
            .prop_map(|(weight, coeff, seqs)| {
                Term::from_parts(
                    weight,
                    coeff,
                    seqs.into_iter().map(OpSequence::from_symbols).collect(),
                )
            })
    }

    fn free_expression() -> impl Strategy<Value = Braket> {
        proptest::collection::vec(small_term(), 1..3).prop_map(|terms| {
            let mut out = Braket::new(Mode::None);
            out.terms_mut().extend(terms);
            out
        })
    }

    proptest! {
        #[test]
        fn ordering_normalizes_every_surviving_sequence(
            seqs in proptest::collection::vec(operator_sequence(), 1..4)
        ) {
            let mut work = seqs;
            normal_order_all(&mut work, Mode::Braket, Limits::default()).unwrap();
            for seq in &work {
                prop_assert!(seq.is_normal_ordered());
            }
        }

        #[test]
        fn braket_contraction_eliminates_annihilators(
            seqs in proptest::collection::vec(guarded_sequence(), 1..4)
        ) {
            let mut work = seqs;
            contract_to_deltas(&mut work, Mode::Braket, Limits::default()).unwrap();
            for seq in &work {
                prop_assert_eq!(seq.count_of(SymbolKind::Annihilator), 0);
            }
        }

        #[test]
        fn bound_reduction_never_overshoots(
            seqs in proptest::collection::vec(guarded_sequence(), 1..4)
        ) {
            let mut work = seqs;
            reduce_to_canonical_count(&mut work, Mode::Braket, 2, Limits::default()).unwrap();
            for seq in &work {
                prop_assert!(seq.count_of(SymbolKind::Annihilator) <= 2);
            }
        }

        #[test]
        fn products_cross_terms_and_add_weights(
            lhs in free_expression(),
            rhs in free_expression(),
        ) {
            let alg = Algebra::so(4);
            let out = lhs.checked_mul(&rhs, &alg).unwrap();
            prop_assert_eq!(out.len(), lhs.len() * rhs.len());
            for (i, lt) in lhs.terms().iter().enumerate() {
                for (j, rt) in rhs.terms().iter().enumerate() {
                    let got = &out.terms()[i * rhs.len() + j];
                    prop_assert_eq!(got.weight(), lt.weight() + rt.weight());
                }
            }
        }

        #[test]
        fn double_negation_is_the_identity(expr in free_expression()) {
            prop_assert_eq!(-&(-&expr), expr);
        }

        // Reference picture for the product table: a factor is open on the
        // side it lacks a vacuum shell. A product is legal when the left
        // factor is open on its right and the right factor is open on its
        // left, or when both factors are closed brakets; the result carries
        // the left factor's left shell and the right factor's right shell.
        #[test]
        fn the_product_table_matches_the_boundary_picture(
            lhs in any_mode(),
            rhs in any_mode(),
        ) {
            let left_shell = |m: Mode| matches!(m, Mode::Bra | Mode::Braket);
            let right_shell = |m: Mode| matches!(m, Mode::Ket | Mode::Braket);
            let legal = (lhs == Mode::Braket && rhs == Mode::Braket)
                || (!right_shell(lhs) && !left_shell(rhs));

            let product = lhs.checked_mul(rhs).ok();
            if legal {
                let expected = match (left_shell(lhs), right_shell(rhs)) {
                    (false, false) => Mode::None,
                    (true, false) => Mode::Bra,
                    (false, true) => Mode::Ket,
                    (true, true) => Mode::Braket,
                };
                prop_assert_eq!(product, Some(expected));
            } else {
                prop_assert_eq!(product, None);
            }
        }

        #[test]
        fn the_product_operator_has_full_binomial_support(half in 1u32..=4) {
            let mut alg = Algebra::so(2 * half);
            let op = bop(&mut alg, "k").unwrap();
            prop_assert_eq!(op.len(), 1usize << half);
            let coeff = op.terms()[0].coefficient().to_owned();
            for term in op.terms() {
                prop_assert_eq!(term.coefficient(), coeff.as_str());
                prop_assert_eq!(term.sequences().len(), 1);
                prop_assert_eq!(term.sequences()[0].len(), half as usize);
            }
        }
    }
}
