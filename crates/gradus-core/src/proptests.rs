//! Property-based tests for sequences and the rewrite primitives.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::index::Idx;
    use crate::rewrite::{contract_annihilator_creator, order_creator_annihilator, Rewrite};
    use crate::sequence::OpSequence;
    use crate::symbol::{Symbol, SymbolKind};

    // Strategy over a fixed pool of eight index handles
    fn any_index() -> impl Strategy<Value = Idx> {
        (0u32..8).prop_map(Idx::new)
    }

    fn any_symbol() -> impl Strategy<Value = Symbol> {
        prop_oneof![
            any_index().prop_map(Symbol::Annihilator),
            any_index().prop_map(Symbol::Creator),
            (any_index(), any_index()).prop_map(|(a, b)| Symbol::Delta(a, b)),
            Just(Symbol::Identity),
        ]
    }

    fn any_sequence() -> impl Strategy<Value = OpSequence> {
        (proptest::collection::vec(any_symbol(), 0..10), any::<bool>()).prop_map(
            |(symbols, negate)| {
                let mut seq = OpSequence::from_symbols(symbols);
                if negate {
                    seq.negate();
                }
                seq
            },
        )
    }

    // m >= 2 annihilators then n >= 1 creators: normal ordered, so
    // primitive A acts exactly at the boundary pair and primitive B on the
    // emitted branch swaps the same pair back.
    fn ordered_soup() -> impl Strategy<Value = OpSequence> {
        (
            proptest::collection::vec(any_index(), 2..6),
            proptest::collection::vec(any_index(), 1..5),
        )
            .prop_map(|(bs, bts)| {
                OpSequence::from_symbols(
                    bs.into_iter()
                        .map(Symbol::Annihilator)
                        .chain(bts.into_iter().map(Symbol::Creator)),
                )
            })
    }

    proptest! {
        #[test]
        fn reorder_by_type_partitions(seq in any_sequence()) {
            let out = seq.reorder_by_type();
            prop_assert_eq!(out.sign(), seq.sign());
            if seq.len() > 1 {
                prop_assert_eq!(out.count_of(SymbolKind::Identity), 0);
                let first_op = [
                    out.first_index_of(SymbolKind::Annihilator),
                    out.first_index_of(SymbolKind::Creator),
                ]
                .into_iter()
                .flatten()
                .min();
                if let (Some(op), Some(delta)) = (first_op, out.last_index_of(SymbolKind::Delta)) {
                    prop_assert!(delta < op);
                }
            }
        }

        #[test]
        fn reorder_by_type_keeps_group_order(seq in any_sequence()) {
            prop_assume!(seq.len() > 1);
            let out = seq.reorder_by_type();
            let ops_in: Vec<Symbol> =
                seq.symbols().iter().copied().filter(|s| s.is_operator()).collect();
            let ops_out: Vec<Symbol> =
                out.symbols().iter().copied().filter(|s| s.is_operator()).collect();
            prop_assert_eq!(ops_in, ops_out);
            let deltas_in: Vec<Symbol> =
                seq.symbols().iter().copied().filter(|s| s.is_delta()).collect();
            let deltas_out: Vec<Symbol> =
                out.symbols().iter().copied().filter(|s| s.is_delta()).collect();
            prop_assert_eq!(deltas_in, deltas_out);
        }

        #[test]
        fn contraction_step_bookkeeping(seq in any_sequence()) {
            let mut work = seq.clone();
            match contract_annihilator_creator(&mut work, false) {
                Rewrite::Step(branch) => {
                    prop_assert_eq!(branch.len(), seq.len());
                    prop_assert_eq!(branch.sign(), seq.sign().negated());
                    prop_assert_eq!(work.len() + 1, seq.len());
                    prop_assert_eq!(
                        work.count_of(SymbolKind::Delta),
                        seq.count_of(SymbolKind::Delta) + 1
                    );
                    prop_assert_eq!(
                        work.count_of(SymbolKind::Annihilator) + 1,
                        seq.count_of(SymbolKind::Annihilator)
                    );
                }
                Rewrite::Stuck => prop_assert_eq!(&work, &seq),
                Rewrite::Cleared => prop_assert!(false, "terminal mode was off"),
            }
        }

        #[test]
        fn boundary_round_trip(seq in ordered_soup()) {
            let mut work = seq.clone();
            let Rewrite::Step(mut emitted) = contract_annihilator_creator(&mut work, false) else {
                return Err(TestCaseError::fail("boundary pair must contract"));
            };
            let Rewrite::Step(back) = order_creator_annihilator(&mut emitted, false) else {
                return Err(TestCaseError::fail("swapped pair must order back"));
            };
            prop_assert_eq!(back, seq);
        }

        #[test]
        fn normal_ordered_is_a_fixed_point_of_ordering(seq in ordered_soup()) {
            prop_assert!(seq.is_normal_ordered());
            let mut work = seq.clone();
            prop_assert_eq!(order_creator_annihilator(&mut work, false), Rewrite::Stuck);
            prop_assert_eq!(&work, &seq);
        }

        #[test]
        fn first_in_order_matches_reference(seq in any_sequence()) {
            let got = seq.first_in_order(SymbolKind::Creator, SymbolKind::Annihilator);
            let first_cre = seq.first_index_of(SymbolKind::Creator);
            let first_ann = seq.first_index_of(SymbolKind::Annihilator);
            let expected = match (first_cre, first_ann) {
                (Some(c), Some(a)) => a < c,
                (Some(_), None) => false,
                (None, _) => true,
            };
            prop_assert_eq!(got, expected);
        }
    }
}
