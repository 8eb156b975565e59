//! The expression type.
//!
//! A [`Braket`] is a sum of [`Term`]s tagged with a [`Mode`] (which vacuum
//! shells enclose the operators) and an [`EvalStage`] (how far evaluation
//! has progressed). Arithmetic combines modes and stages first and fails
//! without touching either operand when the combination is illegal; the
//! binary operators then rearrange and simplify the result, exactly as
//! construction-time normalization.

use std::ops::Neg;

use gradus_core::{Algebra, IndexRegistry, OpSequence};
use log::{debug, trace};

use crate::epsilon;
use crate::error::BraketError;
use crate::mode::{EvalStage, EvalTarget, Mode};
use crate::reduce;
use crate::term::Term;

/// A mode-tagged sum of terms over the CAR algebra.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Braket {
    terms: Vec<Term>,
    mode: Mode,
    stage: EvalStage,
}

impl Default for Braket {
    fn default() -> Self {
        Self::new(Mode::None)
    }
}

impl Braket {
    /// Creates an empty expression of the given mode.
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self {
            terms: Vec::new(),
            mode,
            stage: EvalStage::Raw,
        }
    }

    /// Wraps one bare operator sequence as a mode-free expression.
    #[must_use]
    pub fn from_sequence(sequence: OpSequence) -> Self {
        Self {
            terms: vec![Term::from_sequence(sequence)],
            mode: Mode::None,
            stage: EvalStage::Raw,
        }
    }

    fn single(weight: i32, coefficient: impl Into<String>, sequence: OpSequence, mode: Mode) -> Self {
        Self {
            terms: vec![Term::new(weight, coefficient, sequence)],
            mode,
            stage: EvalStage::Raw,
        }
    }

    /// `<0| coefficient * sequence`.
    #[must_use]
    pub fn bra(weight: i32, coefficient: impl Into<String>, sequence: OpSequence) -> Self {
        Self::single(weight, coefficient, sequence, Mode::Bra)
    }

    /// `coefficient * sequence |0>`.
    #[must_use]
    pub fn ket(weight: i32, coefficient: impl Into<String>, sequence: OpSequence) -> Self {
        Self::single(weight, coefficient, sequence, Mode::Ket)
    }

    /// `<0| coefficient * sequence |0>`.
    #[must_use]
    pub fn braket(weight: i32, coefficient: impl Into<String>, sequence: OpSequence) -> Self {
        Self::single(weight, coefficient, sequence, Mode::Braket)
    }

    /// A free operator string with no vacuum shell on either side.
    #[must_use]
    pub fn free(weight: i32, coefficient: impl Into<String>, sequence: OpSequence) -> Self {
        Self::single(weight, coefficient, sequence, Mode::None)
    }

    /// Stamps a new weight and coefficient onto every term of `source`
    /// and retags the copy with `mode`. The evaluation stage is kept.
    #[must_use]
    pub fn rewrap(
        weight: i32,
        coefficient: impl Into<String>,
        source: &Self,
        mode: Mode,
    ) -> Self {
        let coefficient = coefficient.into();
        Self {
            terms: source
                .terms
                .iter()
                .map(|t| Term::rewrap(weight, coefficient.clone(), t))
                .collect(),
            mode,
            stage: source.stage,
        }
    }

    /// Rebuilds an expression from the scalar chunks the external tool
    /// printed back. The result is a fully evaluated braket made of
    /// coefficient-only terms.
    #[must_use]
    pub fn from_form_terms<I>(chunks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            terms: chunks
                .into_iter()
                .map(|c| Term::from_coefficient(c.into()))
                .collect(),
            mode: Mode::Braket,
            stage: EvalStage::Epsilon,
        }
    }

    /// Returns the terms.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Returns the terms mutably.
    pub fn terms_mut(&mut self) -> &mut Vec<Term> {
        &mut self.terms
    }

    /// Returns the expression mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns how far the expression has been evaluated.
    #[must_use]
    pub const fn stage(&self) -> EvalStage {
        self.stage
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true when no term remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Drops every term and returns the expression to the raw stage. The
    /// mode is kept.
    pub fn clear(&mut self) {
        self.terms.clear();
        self.stage = EvalStage::Raw;
    }

    /// Sum. Both operands must carry the same mode; an evaluated
    /// expression cannot be combined with a raw one.
    ///
    /// # Errors
    ///
    /// Returns an error on a mode or stage mismatch.
    pub fn checked_add(&self, rhs: &Self, alg: &Algebra) -> Result<Self, BraketError> {
        let mut out = self.clone();
        out.checked_add_assign(rhs, alg)?;
        Ok(out)
    }

    /// In-place sum; see [`checked_add`](Self::checked_add).
    ///
    /// # Errors
    ///
    /// Returns an error on a mode or stage mismatch, leaving `self`
    /// untouched.
    pub fn checked_add_assign(&mut self, rhs: &Self, alg: &Algebra) -> Result<(), BraketError> {
        let mode = self.mode.checked_add(rhs.mode, '+')?;
        let stage = self.stage.combine(rhs.stage)?;
        self.mode = mode;
        self.stage = stage;
        self.terms.extend(rhs.terms.iter().cloned());
        self.rearrange();
        self.simplify(alg);
        Ok(())
    }

    /// Difference. Same mode and stage rules as the sum.
    ///
    /// # Errors
    ///
    /// Returns an error on a mode or stage mismatch.
    pub fn checked_sub(&self, rhs: &Self, alg: &Algebra) -> Result<Self, BraketError> {
        let mut out = self.clone();
        out.checked_sub_assign(rhs, alg)?;
        Ok(out)
    }

    /// In-place difference; see [`checked_sub`](Self::checked_sub).
    ///
    /// # Errors
    ///
    /// Returns an error on a mode or stage mismatch, leaving `self`
    /// untouched.
    pub fn checked_sub_assign(&mut self, rhs: &Self, alg: &Algebra) -> Result<(), BraketError> {
        let mode = self.mode.checked_add(rhs.mode, '-')?;
        let stage = self.stage.combine(rhs.stage)?;
        self.mode = mode;
        self.stage = stage;
        self.terms.extend(rhs.terms.iter().map(Term::negated));
        self.rearrange();
        self.simplify(alg);
        Ok(())
    }

    /// Product: the term-by-term cartesian product under the mode table.
    ///
    /// Two brakets may only be multiplied once the left side has been
    /// evaluated; their contraction against the shared vacuum makes no
    /// sense on raw operator strings.
    ///
    /// # Errors
    ///
    /// Returns an error for a raw braket x braket product, a stage or
    /// mode mismatch, or a product exceeding the configured term cap.
    pub fn checked_mul(&self, rhs: &Self, alg: &Algebra) -> Result<Self, BraketError> {
        if self.mode == Mode::Braket && rhs.mode == Mode::Braket && self.stage == EvalStage::Raw {
            return Err(BraketError::UnevaluatedBraket);
        }
        let stage = self.stage.combine(rhs.stage)?;
        let mode = self.mode.checked_mul(rhs.mode)?;
        let count = self.terms.len().saturating_mul(rhs.terms.len());
        if let Some(limit) = alg.limits().max_terms {
            if count > limit {
                return Err(BraketError::WorkLimitExceeded { limit });
            }
        }
        let mut terms = Vec::with_capacity(count);
        for lhs in &self.terms {
            for term in &rhs.terms {
                terms.push(lhs.mul(term));
            }
        }
        let mut out = Self { terms, mode, stage };
        out.rearrange();
        out.simplify(alg);
        Ok(out)
    }

    /// In-place product; see [`checked_mul`](Self::checked_mul).
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as
    /// [`checked_mul`](Self::checked_mul), leaving `self` untouched.
    pub fn checked_mul_assign(&mut self, rhs: &Self, alg: &Algebra) -> Result<(), BraketError> {
        *self = self.checked_mul(rhs, alg)?;
        Ok(())
    }

    /// Appends a scalar factor to every term's coefficient. No
    /// normalization runs; the factor is opaque text for the external
    /// tool.
    pub fn scalar_mul_assign(&mut self, factor: &str) {
        for term in &mut self.terms {
            term.scalar_mul_assign(factor);
        }
    }

    /// Returns a copy with a scalar factor appended to every term.
    #[must_use]
    pub fn scalar_mul(&self, factor: &str) -> Self {
        let mut out = self.clone();
        out.scalar_mul_assign(factor);
        out
    }

    /// Reorders every sequence of every term (deltas first, identities
    /// dropped). Skipped once the expression is fully evaluated, where
    /// no symbolic part remains.
    pub fn rearrange(&mut self) {
        if self.stage == EvalStage::Epsilon {
            return;
        }
        for term in &mut self.terms {
            term.rearrange();
        }
    }

    /// Applies the global index-sum selection and the per-mode vacuum
    /// predicates, dropping every term that vanishes.
    pub fn simplify(&mut self, alg: &Algebra) {
        let before = self.terms.len();
        self.check_index(alg);
        if self.stage != EvalStage::Epsilon {
            let mode = self.mode;
            let half = alg.half_dim();
            self.terms
                .retain_mut(|term| !term.simplify(mode, half, alg.registry()));
        }
        if self.terms.len() != before {
            trace!(
                "simplify dropped {} of {before} terms",
                before - self.terms.len()
            );
        }
    }

    /// Keeps only braket terms whose weight is zero or reaches the
    /// single-particle bound, when the session applies the index-sum
    /// selection rule.
    fn check_index(&mut self, alg: &Algebra) {
        if alg.simplify_index_sum() && self.mode == Mode::Braket {
            let half = alg.half_dim();
            self.terms.retain(|term| term.weight_in_window(half));
        }
    }

    /// Evaluates the expression against the vacuum.
    ///
    /// [`EvalTarget::Deltas`] contracts every annihilator into deltas.
    /// [`EvalTarget::Epsilon`] additionally enforces the single-particle
    /// bound, normal-orders what remains and folds each braket term into
    /// an epsilon-tensor coefficient; it does nothing on other modes. A
    /// second call is a no-op apart from re-simplification. After any
    /// successful evaluation the per-term weights are spent and reset.
    ///
    /// # Errors
    ///
    /// Returns an error when a reduction exceeds the session limits.
    pub fn evaluate(&mut self, alg: &mut Algebra, target: EvalTarget) -> Result<(), BraketError> {
        self.simplify(alg);
        if self.stage == EvalStage::Raw {
            debug!("evaluating {} {} terms", self.terms.len(), self.mode);
            let mode = self.mode;
            let limits = alg.limits();
            match target {
                EvalTarget::Deltas => {
                    Self::retain_reduced(&mut self.terms, |term| {
                        reduce::contract_to_deltas(term.sequences_mut(), mode, limits)
                    })?;
                    if self.mode == Mode::Braket {
                        self.stage = EvalStage::Deltas;
                    }
                }
                EvalTarget::Epsilon => {
                    if self.mode != Mode::Braket {
                        return Ok(());
                    }
                    let half = alg.half_dim();
                    Self::retain_reduced(&mut self.terms, |term| {
                        reduce::reduce_to_canonical_count(term.sequences_mut(), mode, half, limits)?;
                        reduce::normal_order_all(term.sequences_mut(), mode, limits)
                    })?;
                    for term in &mut self.terms {
                        epsilon::fold_into_coefficient(term, alg);
                    }
                    self.stage = EvalStage::Epsilon;
                }
            }
            debug!(
                "evaluation reached {:?} with {} terms",
                self.stage,
                self.terms.len()
            );
        }
        if self.stage > EvalStage::Raw {
            for term in &mut self.terms {
                *term.weight_mut() = 0;
            }
        }
        Ok(())
    }

    /// Runs `step` on every term, dropping terms whose sequences empty
    /// out. A loop over indices rather than `retain_mut` so errors can
    /// propagate.
    fn retain_reduced<F>(terms: &mut Vec<Term>, mut step: F) -> Result<(), BraketError>
    where
        F: FnMut(&mut Term) -> Result<(), BraketError>,
    {
        let mut i = 0;
        while i < terms.len() {
            step(&mut terms[i])?;
            if terms[i].sequences().is_empty() {
                terms.remove(i);
            } else {
                i += 1;
            }
        }
        Ok(())
    }

    /// Renders the expression in the external tool's input syntax, one
    /// `term;` per line, or a literal zero assignment when empty.
    ///
    /// # Panics
    ///
    /// Panics if a term holds an index handle not issued by `registry`.
    #[must_use]
    pub fn render(&self, registry: &IndexRegistry) -> String {
        if self.terms.is_empty() {
            return "Local R1 = 0;".to_owned();
        }
        let mut out = String::new();
        for term in &self.terms {
            out.push_str(&term.render(registry));
            out.push_str(";\n");
        }
        out
    }
}

impl Neg for &Braket {
    type Output = Braket;

    /// Negates every term. No normalization runs.
    fn neg(self) -> Braket {
        let mut out = self.clone();
        for term in &mut out.terms {
            term.neg();
        }
        out
    }
}

impl Neg for Braket {
    type Output = Braket;

    fn neg(self) -> Braket {
        -&self
    }
}
