//! The algebra session.
//!
//! Everything the original batch tool kept as process-wide globals lives
//! here: the ambient SO(2N) dimension, the index registry, the policy
//! switches and the optional reduction limits. Operations that need a
//! dimension or an index name take the session by reference; [`reset`]
//! marks the boundary between independent derivations.
//!
//! [`reset`]: Algebra::reset

use crate::index::{Idx, IndexRegistry};

/// Optional resource caps for the reduction loops.
///
/// The defaults are unbounded. Configure a cap to make combinatorial
/// blow-up fail closed instead of running away.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Limits {
    /// Maximum live sequences per term during reduction.
    pub max_sequences: Option<usize>,
    /// Maximum terms resulting from an expression product.
    pub max_terms: Option<usize>,
}

impl Limits {
    /// Caps both sequences-per-term and product terms at `n`.
    #[must_use]
    pub const fn capped(n: usize) -> Self {
        Self {
            max_sequences: Some(n),
            max_terms: Some(n),
        }
    }
}

/// The session object for one derivation.
///
/// Deriving with a different dimension, or between unrelated expressions,
/// means either a fresh session or a [`reset`].
///
/// [`reset`]: Algebra::reset
#[derive(Clone, Debug)]
pub struct Algebra {
    dim: u32,
    registry: IndexRegistry,
    simplify_index_sum: bool,
    limits: Limits,
}

impl Default for Algebra {
    fn default() -> Self {
        Self::so(10)
    }
}

impl Algebra {
    /// Creates a session for the SO(`dim`) algebra.
    ///
    /// `dim` is the ambient dimension 2N; the single-particle bound used by
    /// the reduction loops is `dim / 2`.
    #[must_use]
    pub fn so(dim: u32) -> Self {
        Self {
            dim,
            registry: IndexRegistry::new(),
            simplify_index_sum: true,
            limits: Limits::default(),
        }
    }

    /// Replaces the reduction limits, builder style.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Returns the ambient dimension 2N.
    #[must_use]
    pub const fn dim(&self) -> u32 {
        self.dim
    }

    /// Returns the single-particle bound N (half the ambient dimension).
    #[must_use]
    pub const fn half_dim(&self) -> u32 {
        self.dim / 2
    }

    /// Returns true for an even ambient dimension.
    #[must_use]
    pub const fn is_even(&self) -> bool {
        self.dim % 2 == 0
    }

    /// Sets the ambient dimension.
    pub fn set_dim(&mut self, dim: u32) {
        self.dim = dim;
    }

    /// Returns the index registry.
    #[must_use]
    pub const fn registry(&self) -> &IndexRegistry {
        &self.registry
    }

    /// Returns the index registry mutably.
    pub fn registry_mut(&mut self) -> &mut IndexRegistry {
        &mut self.registry
    }

    /// Interns an index name.
    pub fn intern(&mut self, name: &str) -> Idx {
        self.registry.intern(name)
    }

    /// Interns the decimal rendering of a numeric index.
    pub fn intern_num(&mut self, n: i64) -> Idx {
        self.registry.intern_num(n)
    }

    /// Returns the name behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle was never issued by this session's registry.
    #[must_use]
    pub fn index_name(&self, idx: Idx) -> &str {
        self.registry.name(idx)
    }

    /// Whether the global index-sum selection rule is applied during
    /// simplification of braket expressions. On by default.
    #[must_use]
    pub const fn simplify_index_sum(&self) -> bool {
        self.simplify_index_sum
    }

    /// Switches the global index-sum selection rule.
    pub fn set_simplify_index_sum(&mut self, on: bool) {
        self.simplify_index_sum = on;
    }

    /// Returns the configured reduction limits.
    #[must_use]
    pub const fn limits(&self) -> Limits {
        self.limits
    }

    /// Replaces the reduction limits.
    pub fn set_limits(&mut self, limits: Limits) {
        self.limits = limits;
    }

    /// Clears the registry and restores the default policy switches.
    ///
    /// The dimension and limits are kept; outstanding index handles become
    /// dangling. Call between independent derivations.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.simplify_index_sum = true;
    }
}
