//! # gradus-core
//!
//! Core containers for the gradus CAR-algebra engine.
//!
//! This crate provides:
//! - Interned index names with stable compact handles
//! - The four-symbol operator alphabet (b, b†, δ, 1)
//! - Signed operator sequences with reorder/query support
//! - The two anticommutation rewrite primitives
//! - The [`Algebra`] session object carrying dimension, registry and limits
//!
//! ## Design Principles
//!
//! - **Explicit sessions**: no process-wide state; everything dimension- or
//!   name-dependent takes an [`Algebra`] (or its registry) by reference
//! - **Value semantics**: sequences are owned and deep-copied, never aliased
//! - **Single-step rewrites**: the primitives do one anticommutation step
//!   each; branching and termination live in the driving loops upstream

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod algebra;
pub mod index;
pub mod rewrite;
pub mod sequence;
pub mod symbol;

pub use algebra::{Algebra, Limits};
pub use index::{Idx, IndexRegistry};
pub use rewrite::{contract_annihilator_creator, order_creator_annihilator, Rewrite};
pub use sequence::{OpSequence, Sign};
pub use symbol::{Symbol, SymbolKind};

mod proptests;
