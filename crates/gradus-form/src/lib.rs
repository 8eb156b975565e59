//! # gradus-form
//!
//! Batch bridge from gradus expressions to the external FORM symbolic
//! tool.
//!
//! This crate provides:
//! - [`FormBridge`], a session that renders an expression into a batch
//!   request, runs the tool, and parses the response back into the
//!   expression
//! - [`FormConfig`], the file stem, index label, deadline, and rendering
//!   switches of a session
//! - [`FieldTable`], declared field functions with their symmetrization
//!   and vanishing rules
//!
//! ## Design Principles
//!
//! - **Files over pipes**: the request and response are plain files left
//!   on disk, so a failed run can be replayed by hand
//! - **Opaque coefficients**: response terms are carried verbatim as
//!   scalar text, never re-parsed into the operator algebra
//! - **Fail loudly**: a missing binary, a non-zero exit, a blown deadline,
//!   or a response without the result marker is a hard error

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bridge;
pub mod config;
pub mod error;
pub mod field;

mod script;

pub use bridge::{FormBridge, FORM_DIR_ENV};
pub use config::FormConfig;
pub use error::FormError;
pub use field::{FieldTable, Symmetry};
