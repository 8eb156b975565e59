//! Errors for the expression algebra.

use thiserror::Error;

use crate::mode::{EvalStage, Mode};

/// Errors that can occur when combining or reducing expressions.
///
/// Algebraic vanishing is never an error: sequences and terms that reduce
/// to zero are silently dropped. These variants cover structural misuse
/// (illegal mode or stage combinations) and resource exhaustion.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum BraketError {
    /// The two operand modes cannot be combined with this operator.
    #[error("invalid mode combination: {lhs} {op} {rhs}")]
    ModeMismatch {
        /// Operator that was attempted.
        op: char,
        /// Mode of the left operand.
        lhs: Mode,
        /// Mode of the right operand.
        rhs: Mode,
    },

    /// Multiplying two braket expressions requires both to be evaluated.
    #[error("braket * braket is only allowed after both sides were evaluated")]
    UnevaluatedBraket,

    /// One operand was evaluated and the other was not.
    #[error("cannot combine an evaluated expression with a raw one ({lhs} vs {rhs})")]
    StageMismatch {
        /// Stage of the left operand.
        lhs: EvalStage,
        /// Stage of the right operand.
        rhs: EvalStage,
    },

    /// A reduction or product exceeded the session's work cap.
    #[error("work list exceeded the configured cap of {limit}")]
    WorkLimitExceeded {
        /// The cap that was hit.
        limit: usize,
    },
}
