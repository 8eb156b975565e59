//! One additive term of an expression.
//!
//! A [`Term`] is `coefficient * (Σ signed sequences)`: an opaque scalar
//! factor, a net index-sum weight, and a list of operator sequences summed
//! as disjunctive alternatives. The coefficient string is never parsed
//! here; all scalar algebra is punted to the external tool.

use gradus_core::{IndexRegistry, OpSequence, SymbolKind};

use crate::mode::Mode;

/// One term of a [`crate::Braket`] expression.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Term {
    pub(crate) weight: i32,
    pub(crate) coefficient: String,
    pub(crate) sequences: Vec<OpSequence>,
}

impl Term {
    /// Creates a term holding one sequence.
    ///
    /// Spaces in the coefficient are stripped; the string is otherwise
    /// kept verbatim.
    #[must_use]
    pub fn new(weight: i32, coefficient: impl Into<String>, sequence: OpSequence) -> Self {
        Self::from_parts(weight, coefficient, vec![sequence])
    }

    /// Creates a term from a full sequence list.
    #[must_use]
    pub fn from_parts(
        weight: i32,
        coefficient: impl Into<String>,
        sequences: Vec<OpSequence>,
    ) -> Self {
        let mut coefficient = coefficient.into();
        coefficient.retain(|c| c != ' ');
        Self {
            weight,
            coefficient,
            sequences,
        }
    }

    /// Creates a weightless, coefficient-free term from one sequence.
    #[must_use]
    pub fn from_sequence(sequence: OpSequence) -> Self {
        Self {
            weight: 0,
            coefficient: String::new(),
            sequences: vec![sequence],
        }
    }

    /// Creates a coefficient-only term, as parsed back from the external
    /// tool. The text is kept verbatim.
    #[must_use]
    pub fn from_coefficient(text: impl Into<String>) -> Self {
        Self {
            weight: 0,
            coefficient: text.into(),
            sequences: Vec::new(),
        }
    }

    /// Copies `source`'s sequences under a new weight and coefficient.
    #[must_use]
    pub fn rewrap(weight: i32, coefficient: impl Into<String>, source: &Self) -> Self {
        Self::from_parts(weight, coefficient, source.sequences.clone())
    }

    /// Returns the index-sum weight.
    #[must_use]
    pub const fn weight(&self) -> i32 {
        self.weight
    }

    /// Returns a mutable handle on the weight.
    pub fn weight_mut(&mut self) -> &mut i32 {
        &mut self.weight
    }

    /// Returns the scalar coefficient.
    #[must_use]
    pub fn coefficient(&self) -> &str {
        &self.coefficient
    }

    /// Returns the sequence list.
    #[must_use]
    pub fn sequences(&self) -> &[OpSequence] {
        &self.sequences
    }

    /// Returns the sequence list mutably.
    pub fn sequences_mut(&mut self) -> &mut Vec<OpSequence> {
        &mut self.sequences
    }

    /// A term is empty (algebraically zero) iff it has neither a
    /// coefficient nor any sequence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coefficient.is_empty() && self.sequences.is_empty()
    }

    /// Drops everything, leaving an empty term.
    pub fn clear(&mut self) {
        self.weight = 0;
        self.coefficient.clear();
        self.sequences.clear();
    }

    /// Negates the term: every sequence's sign flips, or, for a pure
    /// scalar, the coefficient gains a `-1*` prefix.
    pub fn neg(&mut self) {
        if self.sequences.is_empty() {
            self.coefficient = format!("-1*{}", self.coefficient);
        } else {
            for seq in &mut self.sequences {
                seq.negate();
            }
        }
    }

    /// Returns a negated copy.
    #[must_use]
    pub fn negated(&self) -> Self {
        let mut out = self.clone();
        out.neg();
        out
    }

    /// Appends a scalar factor to the coefficient with `*`; an empty
    /// coefficient becomes the factor itself.
    pub fn scalar_mul_assign(&mut self, factor: &str) {
        if self.coefficient.is_empty() {
            self.coefficient = factor.to_owned();
        } else {
            self.coefficient.push('*');
            self.coefficient.push_str(factor);
        }
    }

    /// Term product: weights add, coefficients join with `*`, sequence
    /// lists take the pairwise concat cartesian product.
    ///
    /// An empty operand absorbs (zero times anything is zero). A side with
    /// a coefficient but no sequences contributes the other side's
    /// sequences unchanged.
    #[must_use]
    pub fn mul(&self, rhs: &Self) -> Self {
        if self.is_empty() {
            return self.clone();
        }
        if rhs.is_empty() {
            return rhs.clone();
        }

        let coefficient = match (self.coefficient.is_empty(), rhs.coefficient.is_empty()) {
            (true, _) => rhs.coefficient.clone(),
            (_, true) => self.coefficient.clone(),
            _ => format!("{}*{}", self.coefficient, rhs.coefficient),
        };

        let sequences = if self.sequences.is_empty() {
            rhs.sequences.clone()
        } else if rhs.sequences.is_empty() {
            self.sequences.clone()
        } else {
            let mut out = Vec::with_capacity(self.sequences.len() * rhs.sequences.len());
            for lhs_seq in &self.sequences {
                for rhs_seq in &rhs.sequences {
                    let mut joined = lhs_seq.clone();
                    joined.concat(rhs_seq);
                    out.push(joined);
                }
            }
            out
        };

        Self {
            weight: self.weight + rhs.weight,
            coefficient,
            sequences,
        }
    }

    /// Reorders every sequence: deltas first, then operators, identities
    /// dropped (single-symbol sequences pass through).
    pub fn rearrange(&mut self) {
        for seq in &mut self.sequences {
            *seq = seq.reorder_by_type();
        }
    }

    /// Drops every sequence failing the mode predicate; returns true if
    /// the term emptied out (and clears it).
    ///
    /// The predicates: `none` keeps any sequence with valid deltas; `bra`
    /// additionally requires no creator before the first annihilator
    /// (`<0| b† = 0`); `ket` requires the final symbol not be an
    /// annihilator (`b |0> = 0`); `braket` requires balanced
    /// annihilator/creator counts plus both boundary checks. Empty
    /// sequences fail the delta check and are always dropped.
    pub fn simplify(&mut self, mode: Mode, half_dim: u32, registry: &IndexRegistry) -> bool {
        self.sequences
            .retain(|seq| Self::mode_predicate(seq, mode, half_dim, registry));
        if self.sequences.is_empty() {
            self.clear();
            return true;
        }
        false
    }

    fn mode_predicate(
        seq: &OpSequence,
        mode: Mode,
        half_dim: u32,
        registry: &IndexRegistry,
    ) -> bool {
        let deltas_ok = seq.all_deltas_index_valid(half_dim, registry);
        match mode {
            Mode::None => deltas_ok,
            Mode::Bra => {
                seq.first_in_order(SymbolKind::Creator, SymbolKind::Annihilator) && deltas_ok
            }
            Mode::Ket => !seq.ends_with(SymbolKind::Annihilator) && deltas_ok,
            Mode::Braket => {
                seq.count_of(SymbolKind::Annihilator) == seq.count_of(SymbolKind::Creator)
                    && !seq.ends_with(SymbolKind::Annihilator)
                    && seq.first_in_order(SymbolKind::Creator, SymbolKind::Annihilator)
                    && deltas_ok
            }
        }
    }

    /// The global-index selection rule: the weight must be zero or reach
    /// `half_dim` in absolute value.
    #[must_use]
    pub fn weight_in_window(&self, half_dim: u32) -> bool {
        self.weight == 0 || self.weight.unsigned_abs() == half_dim
    }

    /// Renders the term. A pure scalar renders as its coefficient; a term
    /// with sequences renders as `(coefficient) * (` followed by one
    /// sign-prefixed sequence per line and a closing parenthesis.
    ///
    /// # Panics
    ///
    /// Panics if an index handle was not issued by `registry`.
    #[must_use]
    pub fn render(&self, registry: &IndexRegistry) -> String {
        if self.sequences.is_empty() {
            return self.coefficient.clone();
        }
        let mut out = if self.coefficient.is_empty() {
            "(\n".to_owned()
        } else {
            format!("({}) * (\n", self.coefficient)
        };
        for seq in &self.sequences {
            let sign = if seq.sign().is_negative() { " - " } else { " + " };
            out.push('\t');
            out.push_str(sign);
            out.push_str(&seq.render(registry));
            out.push('\n');
        }
        out.push(')');
        out
    }
}

#[cfg(test)]
mod tests {
    use gradus_core::{IndexRegistry, Sign, Symbol};

    use super::*;

    fn reg3() -> (IndexRegistry, Vec<gradus_core::Idx>) {
        let mut reg = IndexRegistry::new();
        let ids = ["i", "j", "k"].iter().map(|n| reg.intern(n)).collect();
        (reg, ids)
    }

    #[test]
    fn construction_strips_coefficient_spaces() {
        let term = Term::new(0, "1/2 * M(a, b)", OpSequence::new());
        assert_eq!(term.coefficient(), "1/2*M(a,b)");
    }

    #[test]
    fn negation_of_a_pure_scalar_prefixes_minus_one() {
        let mut term = Term::from_coefficient("x");
        term.neg();
        assert_eq!(term.coefficient(), "-1*x");
    }

    #[test]
    fn negation_flips_every_sequence_sign() {
        let (_, ids) = reg3();
        let mut term = Term::from_parts(
            0,
            "x",
            vec![
                OpSequence::single(Symbol::Annihilator(ids[0])),
                OpSequence::single(Symbol::Creator(ids[1])),
            ],
        );
        term.neg();
        assert_eq!(term.coefficient(), "x");
        assert!(term.sequences().iter().all(|s| s.sign() == Sign::Minus));
    }

    #[test]
    fn empty_term_absorbs_products() {
        let (_, ids) = reg3();
        let zero = Term::default();
        let one = Term::new(1, "x", OpSequence::single(Symbol::Creator(ids[0])));
        assert!(zero.mul(&one).is_empty());
        assert!(one.mul(&zero).is_empty());
    }

    #[test]
    fn product_adds_weights_and_joins_coefficients() {
        let (_, ids) = reg3();
        let lhs = Term::new(1, "a", OpSequence::single(Symbol::Annihilator(ids[0])));
        let rhs = Term::new(-2, "b", OpSequence::single(Symbol::Creator(ids[1])));
        let product = lhs.mul(&rhs);
        assert_eq!(product.weight(), -1);
        assert_eq!(product.coefficient(), "a*b");
        assert_eq!(product.sequences().len(), 1);
        assert_eq!(product.sequences()[0].len(), 2);
    }

    #[test]
    fn scalar_side_contributes_the_other_sides_sequences() {
        let (_, ids) = reg3();
        let scalar = Term::from_coefficient("1/2");
        let op = Term::new(0, "", OpSequence::single(Symbol::Creator(ids[2])));
        let product = scalar.mul(&op);
        assert_eq!(product.coefficient(), "1/2");
        assert_eq!(product.sequences().len(), 1);
    }

    #[test]
    fn simplify_prunes_by_mode() {
        let (reg, ids) = reg3();
        let b = Symbol::Annihilator(ids[0]);
        let bt = Symbol::Creator(ids[1]);

        // <0| b† ... vanishes
        let mut bra_term = Term::new(0, "x", OpSequence::from_symbols([bt, b]));
        assert!(bra_term.simplify(Mode::Bra, 5, &reg));
        assert!(bra_term.is_empty());

        // ... b |0> vanishes
        let mut ket_term = Term::new(0, "x", OpSequence::from_symbols([bt, b]));
        assert!(ket_term.simplify(Mode::Ket, 5, &reg));

        // balanced and well-bounded braket survives
        let mut braket_term = Term::new(0, "x", OpSequence::from_symbols([b, bt]));
        assert!(!braket_term.simplify(Mode::Braket, 5, &reg));
        assert_eq!(braket_term.sequences().len(), 1);

        // unbalanced braket vanishes
        let mut unbalanced = Term::new(0, "x", OpSequence::from_symbols([b, bt, bt]));
        assert!(unbalanced.simplify(Mode::Braket, 5, &reg));
    }

    #[test]
    fn weight_window() {
        let term = Term::from_coefficient("x");
        assert!(term.weight_in_window(2));
        let mut weighted = Term::from_coefficient("x");
        *weighted.weight_mut() = -2;
        assert!(weighted.weight_in_window(2));
        *weighted.weight_mut() = 1;
        assert!(!weighted.weight_in_window(2));
    }

    #[test]
    fn render_formats() {
        let (reg, ids) = reg3();
        assert_eq!(Term::from_coefficient("x").render(&reg), "x");

        let term = Term::new(0, "M(a)", OpSequence::single(Symbol::Annihilator(ids[0])));
        assert_eq!(term.render(&reg), "(M(a)) * (\n\t + b(i)\n)");

        let mut negative = Term::from_sequence(OpSequence::single(Symbol::Creator(ids[1])));
        negative.sequences_mut()[0].negate();
        assert_eq!(negative.render(&reg), "(\n\t - bt(j)\n)");
    }
}
