//! Algebraic modes and evaluation stages.
//!
//! A [`Mode`] records which vacuum boundaries an expression carries and
//! therefore which products are legal and which boundary simplifications
//! apply. An [`EvalStage`] tracks how far an expression has been reduced;
//! it only ever moves forward.

use std::fmt;

use crate::error::BraketError;

/// Algebraic context of an expression.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Mode {
    /// No boundary: a free operator string.
    #[default]
    None,
    /// `<0| ...`: left vacuum boundary.
    Bra,
    /// `... |0>`: right vacuum boundary.
    Ket,
    /// `<0| ... |0>`: both boundaries; the only mode that evaluates to a
    /// closed form.
    Braket,
}

impl Mode {
    /// Mode of a sum or difference. Both operands must carry the same
    /// mode.
    pub fn checked_add(self, rhs: Self, op: char) -> Result<Self, BraketError> {
        if self == rhs {
            Ok(self)
        } else {
            Err(BraketError::ModeMismatch {
                op,
                lhs: self,
                rhs,
            })
        }
    }

    /// Mode of a product.
    ///
    /// The table is order-sensitive: a bra absorbs a free factor on its
    /// right, a ket absorbs one on its left, bra times ket closes into a
    /// braket, and two brakets stay a braket. Everything else has no
    /// algebraic meaning.
    pub fn checked_mul(self, rhs: Self) -> Result<Self, BraketError> {
        match (self, rhs) {
            (Mode::Bra, Mode::Ket) => Ok(Mode::Braket),
            (Mode::Bra, Mode::None) => Ok(Mode::Bra),
            (Mode::None, Mode::Ket) => Ok(Mode::Ket),
            (Mode::None, Mode::None) => Ok(Mode::None),
            (Mode::Braket, Mode::Braket) => Ok(Mode::Braket),
            _ => Err(BraketError::ModeMismatch {
                op: '*',
                lhs: self,
                rhs,
            }),
        }
    }

    /// Returns true for [`Mode::Braket`], the terminal two-boundary mode.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Mode::Braket)
    }

    /// Returns true when a sequence ending in an annihilator vanishes
    /// against the right vacuum under this mode.
    #[must_use]
    pub const fn truncates_trailing_annihilator(self) -> bool {
        matches!(self, Mode::Ket | Mode::Braket)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::None => "none",
            Mode::Bra => "bra",
            Mode::Ket => "ket",
            Mode::Braket => "braket",
        };
        f.write_str(name)
    }
}

/// How far an expression has been reduced.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum EvalStage {
    /// Not yet evaluated.
    #[default]
    Raw,
    /// Contracted down to Kronecker deltas.
    Deltas,
    /// Rendered to the epsilon-tensor closed form.
    Epsilon,
}

impl EvalStage {
    /// Stage of a combined expression: the larger of the two, except that
    /// mixing a raw operand with an evaluated one is rejected outright.
    pub fn combine(self, rhs: Self) -> Result<Self, BraketError> {
        let one_raw = (self == EvalStage::Raw) != (rhs == EvalStage::Raw);
        if one_raw {
            Err(BraketError::StageMismatch {
                lhs: self,
                rhs,
            })
        } else {
            Ok(self.max(rhs))
        }
    }
}

impl fmt::Display for EvalStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvalStage::Raw => "raw",
            EvalStage::Deltas => "deltas",
            EvalStage::Epsilon => "epsilon",
        };
        f.write_str(name)
    }
}

/// What [`crate::Braket::evaluate`] reduces to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EvalTarget {
    /// Contract every annihilator/creator pair into Kronecker deltas.
    Deltas,
    /// Normal-order and render the epsilon-tensor closed form
    /// (braket mode only).
    Epsilon,
}
