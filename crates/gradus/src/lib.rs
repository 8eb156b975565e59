//! # Gradus
//!
//! A symbolic engine for the canonical anticommutation algebra.
//!
//! Gradus builds bra and ket expressions over fermionic ladder
//! operators, reduces them against the vacuum by anticommutation
//! rewriting, and hands the surviving scalar coefficients to the
//! external FORM tool for the remaining index algebra.
//!
//! ## Features
//!
//! - **Interned Indices**: operator subscripts live in a per-session
//!   registry and sequences carry compact handles
//! - **Vacuum Reduction**: delta contraction, the single-particle bound
//!   and normal ordering as branching rewrites
//! - **Mode Discipline**: bra, ket, braket and free expressions combine
//!   only where the algebra allows
//! - **Batch Bridge**: request rendering, field declarations and response
//!   parsing for the FORM tool
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gradus::prelude::*;
//!
//! let mut alg = Algebra::so(4);
//! let a = alg.intern("a");
//! let mut psi = Braket::ket(0, "M(a)", OpSequence::single(Symbol::Creator(a)));
//! psi.evaluate(&mut alg, EvalTarget::Deltas)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use gradus_braket as braket;
pub use gradus_core as core;
pub use gradus_form as form;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use gradus_braket::{
        bop, bop_numeric, Braket, BraketError, EvalStage, EvalTarget, Mode, Term,
    };
    pub use gradus_core::{Algebra, Idx, IndexRegistry, Limits, OpSequence, Sign, Symbol};
    pub use gradus_form::{FieldTable, FormBridge, FormConfig, FormError, Symmetry};
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// The standard overlap: a coefficient-only bra, the alternating
    /// product operator, a coefficient-only ket.
    fn vacuum_sandwich(alg: &mut Algebra) -> Braket {
        let lh = Braket::bra(0, "M(a)", OpSequence::single(Symbol::Identity));
        let rh = Braket::ket(0, "M(b)", OpSequence::single(Symbol::Identity));
        let middle = bop(alg, "i").unwrap();
        let mut psi = lh;
        psi.checked_mul_assign(&middle, alg).unwrap();
        psi.checked_mul_assign(&rh, alg).unwrap();
        psi
    }

    #[test]
    fn a_vacuum_sandwich_contracts_to_a_single_delta() {
        let mut alg = Algebra::so(4);
        alg.set_simplify_index_sum(false);
        let mut psi = vacuum_sandwich(&mut alg);
        assert_eq!(psi.mode(), Mode::Braket);
        assert_eq!(psi.len(), 1);

        psi.evaluate(&mut alg, EvalTarget::Deltas).unwrap();

        assert_eq!(psi.stage(), EvalStage::Deltas);
        assert_eq!(psi.len(), 1);
        assert_eq!(psi.terms()[0].coefficient(), "M(a)*1/2*e_(i1,i2)*M(b)");
        let rendered = psi.render(alg.registry());
        assert!(rendered.contains("d_(i1,i2)"));
        assert!(!rendered.contains("b("));
    }

    #[test]
    fn the_closed_form_folds_into_epsilon_tensors() {
        let mut alg = Algebra::so(4);
        alg.set_simplify_index_sum(false);
        let mut psi = vacuum_sandwich(&mut alg);

        psi.evaluate(&mut alg, EvalTarget::Epsilon).unwrap();

        assert_eq!(psi.stage(), EvalStage::Epsilon);
        assert_eq!(psi.len(), 1);
        let term = &psi.terms()[0];
        assert!(term.sequences().is_empty());
        assert_eq!(
            term.coefficient(),
            "M(a)*1/2*e_(i1,i2)*M(b)*(\n+e_(i1,t1)*e_(i2,t1)\n)"
        );
    }

    #[test]
    fn the_request_declares_every_registered_index() {
        let mut alg = Algebra::so(4);
        alg.set_simplify_index_sum(false);
        let mut psi = vacuum_sandwich(&mut alg);
        psi.evaluate(&mut alg, EvalTarget::Deltas).unwrap();
        alg.intern("a");
        alg.intern("b");

        let bridge = FormBridge::new(FormConfig::new());
        let request = bridge.render_request(&psi, &alg);

        assert!(request.contains("Dimension 2;"));
        assert!(request.contains("Indices a, b, i1, i2;"));
        assert!(request.contains("Local R1 = "));
        assert!(request.contains("id e_(1,2)=1;"));
    }

    #[test]
    #[cfg(unix)]
    fn the_batch_tool_response_replaces_the_expression() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let stub = dir.path().join("form");
        fs::write(&stub, "#!/bin/sh\necho 'R =X;'\n").unwrap();
        let mut perms = fs::metadata(&stub).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&stub, perms).unwrap();

        let mut alg = Algebra::so(4);
        alg.set_simplify_index_sum(false);
        let mut psi = vacuum_sandwich(&mut alg);
        psi.evaluate(&mut alg, EvalTarget::Deltas).unwrap();

        let config = FormConfig::new()
            .with_binary(stub)
            .with_workdir(dir.path());
        let mut bridge = FormBridge::new(config);
        bridge.run(&mut psi, &mut alg).unwrap();

        assert_eq!(psi.len(), 1);
        assert_eq!(psi.terms()[0].coefficient(), "X");
        assert!(psi.terms()[0].sequences().is_empty());
    }
}
