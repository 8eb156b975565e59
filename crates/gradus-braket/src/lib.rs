//! # gradus-braket
//!
//! Expression algebra for the gradus CAR-algebra engine.
//!
//! This crate provides:
//! - [`Braket`], a mode-tagged sum of terms (`bra`, `ket`, `braket`, free)
//! - Checked arithmetic that combines modes and evaluation stages
//! - The vacuum reduction loops (delta contraction, single-particle bound,
//!   normal ordering) driving the rewrite primitives of `gradus-core`
//! - The epsilon-tensor fold that turns fully reduced braket terms into
//!   scalar coefficients
//! - The composite `b - bdagger` product operator builders
//!
//! ## Design Principles
//!
//! - **Fail before mutating**: every checked operation validates mode and
//!   stage compatibility before touching either operand
//! - **Branch, never backtrack**: rewrite steps push their second branch
//!   onto the worklist and continue in place
//! - **Bounded work**: every loop that can grow the worklist honors the
//!   session [`Limits`](gradus_core::Limits)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod braket;
pub mod error;
pub mod mode;
pub mod ops;
pub mod reduce;
pub mod term;

mod epsilon;

pub use braket::Braket;
pub use error::BraketError;
pub use mode::{EvalStage, EvalTarget, Mode};
pub use ops::{bop, bop_numeric};
pub use term::Term;

mod proptests;
