//! Composite operator builders.
//!
//! The building block is the alternating product
//! `(b(x1) - bdagger(x1)) * ... * (b(xN) - bdagger(xN))` over a family of
//! `N = dim/2` indices, scaled by the family's Levi-Civita symbol over
//! `N!` and an overall phase fixed by `N mod 4`.

use gradus_core::{Algebra, Idx, OpSequence, Symbol};

use crate::braket::Braket;
use crate::error::BraketError;

/// One `b - bdagger` factor as a free two-term expression.
fn difference_factor(alg: &Algebra, id: Idx) -> Result<Braket, BraketError> {
    let mut out = Braket::from_sequence(OpSequence::single(Symbol::Annihilator(id)));
    let creator = Braket::from_sequence(OpSequence::single(Symbol::Creator(id)));
    out.checked_sub_assign(&creator, alg)?;
    Ok(out)
}

/// Builds the product operator over the indices `<stem>1 .. <stem>N`.
///
/// Every index name is interned into `alg`. The scalar prefactor is
/// `1/N! * e_(<stem>1,..,<stem>N)`, with `1/` replaced by `i_/` for odd
/// `N`; the overall sign flips unless `N mod 4` is 0 or 3.
///
/// # Errors
///
/// Fails when the term cross products outgrow the configured work limits.
pub fn bop(alg: &mut Algebra, stem: &str) -> Result<Braket, BraketError> {
    let n = alg.half_dim();
    let first_name = format!("{stem}1");
    let first = alg.intern(&first_name);
    let mut out = difference_factor(alg, first)?;

    let mut eps = format!("*e_({first_name}");
    let mut factorial: u64 = 1;
    for i in 2..=n {
        let name = format!("{stem}{i}");
        let id = alg.intern(&name);
        let factor = difference_factor(alg, id)?;
        out.checked_mul_assign(&factor, alg)?;
        eps.push(',');
        eps.push_str(&name);
        factorial *= u64::from(i);
    }

    let mut coefficient = if n % 2 == 0 {
        String::from("1/")
    } else {
        String::from("i_/")
    };
    coefficient.push_str(&factorial.to_string());
    coefficient.push_str(&eps);
    coefficient.push(')');

    if !matches!(n % 4, 0 | 3) {
        out = -&out;
    }
    out.scalar_mul_assign(&coefficient);
    Ok(out)
}

/// Builds the product operator over the numeric indices `1 .. N`.
///
/// The epsilon factor is left out here: with literal indices it is the
/// constant `e_(1,..,N) = 1`, so the prefactor degenerates to `1` for even
/// `N` and `i_` for odd `N`. The sign rule matches [`bop`].
///
/// # Errors
///
/// Fails when the term cross products outgrow the configured work limits.
pub fn bop_numeric(alg: &mut Algebra) -> Result<Braket, BraketError> {
    let n = alg.half_dim();
    let first = alg.intern_num(1);
    let mut out = difference_factor(alg, first)?;
    for i in 2..=n {
        let id = alg.intern_num(i64::from(i));
        let factor = difference_factor(alg, id)?;
        out.checked_mul_assign(&factor, alg)?;
    }

    let coefficient = if n % 2 == 0 { "1" } else { "i_" };
    if !matches!(n % 4, 0 | 3) {
        out = -&out;
    }
    out.scalar_mul_assign(coefficient);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use gradus_core::{Algebra, Sign, Symbol, SymbolKind};

    use super::*;
    use crate::mode::Mode;

    #[test]
    fn the_product_operator_expands_over_the_index_family() {
        let mut alg = Algebra::so(4);
        let op = bop(&mut alg, "i").unwrap();

        assert_eq!(op.mode(), Mode::None);
        assert_eq!(op.len(), 4);
        for term in op.terms() {
            assert_eq!(term.coefficient(), "1/2*e_(i1,i2)");
            assert_eq!(term.sequences().len(), 1);
            assert_eq!(term.sequences()[0].len(), 2);
        }

        // (b1 - bt1)(b2 - bt2), then the n = 2 sign flip on top.
        let signs: Vec<Sign> = op
            .terms()
            .iter()
            .map(|t| t.sequences()[0].sign())
            .collect();
        assert_eq!(signs, [Sign::Minus, Sign::Plus, Sign::Plus, Sign::Minus]);
        assert_eq!(op.terms()[0].sequences()[0].kind_ids(), [0, 0]);
        assert_eq!(op.terms()[3].sequences()[0].kind_ids(), [1, 1]);
    }

    #[test]
    fn odd_half_dimension_picks_the_imaginary_scale() {
        let mut alg = Algebra::so(6);
        let op = bop(&mut alg, "i").unwrap();

        assert_eq!(op.len(), 8);
        for term in op.terms() {
            assert_eq!(term.coefficient(), "i_/6*e_(i1,i2,i3)");
        }
        // n = 3 leaves the overall sign alone.
        assert_eq!(op.terms()[0].sequences()[0].sign(), Sign::Plus);
        assert_eq!(op.terms()[7].sequences()[0].sign(), Sign::Minus);
    }

    #[test]
    fn a_single_pair_flips_the_sign() {
        let mut alg = Algebra::so(2);
        let op = bop(&mut alg, "x").unwrap();

        assert_eq!(op.len(), 2);
        assert_eq!(op.terms()[0].coefficient(), "i_/1*e_(x1)");
        assert_eq!(op.terms()[0].sequences()[0].sign(), Sign::Minus);
        assert_eq!(op.terms()[1].sequences()[0].sign(), Sign::Plus);
    }

    #[test]
    fn numeric_ids_take_a_bare_scale() {
        let mut alg = Algebra::so(4);
        let op = bop_numeric(&mut alg).unwrap();

        assert_eq!(op.len(), 4);
        for term in op.terms() {
            assert_eq!(term.coefficient(), "1");
        }
        assert_eq!(op.terms()[0].sequences()[0].sign(), Sign::Minus);

        let Symbol::Annihilator(id) = op.terms()[0].sequences()[0].symbols()[0] else {
            panic!("expected an annihilator in the first slot");
        };
        assert_eq!(alg.registry().name(id), "1");
        assert_eq!(
            op.terms()[0].sequences()[0].count_of(SymbolKind::Annihilator),
            2
        );
    }
}
