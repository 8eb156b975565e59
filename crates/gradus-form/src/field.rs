//! Field declarations for the request header.
//!
//! A field such as `H^{ij}_{klm}` enters the scalar coefficients as
//! `H23(i,j,k,l,m)`: the declaration step disambiguates the function name
//! with its index counts, records the matching (anti)symmetrization
//! directives, and emits `id ... = 0;` rules that kill every repeated
//! index pairing. Declarations are memoized by the disambiguated name.

use gradus_core::Algebra;

/// Index symmetry class of a declared field.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Symmetry {
    /// Symmetric under index exchange.
    Symmetric,
    /// Antisymmetric under index exchange.
    Antisymmetric,
}

impl Symmetry {
    const fn property(self) -> &'static str {
        match self {
            Symmetry::Symmetric => "(symmetric)",
            Symmetry::Antisymmetric => "(antisymmetric)",
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Symmetry::Symmetric => "symmetrize",
            Symmetry::Antisymmetric => "antisymmetrize",
        }
    }
}

/// Declared field functions and their rewrite directives.
#[derive(Clone, Debug, Default)]
pub struct FieldTable {
    functions: Vec<String>,
    directives: Vec<String>,
}

impl FieldTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field and returns the function name to use inside
    /// coefficients.
    ///
    /// `upper` and `lower` count the two index groups; `flavored` prepends
    /// an extra flavor slot that takes no part in the symmetry. The name is
    /// suffixed with the counts whenever any index is present; a field
    /// with only one index group carries its symmetry as a function
    /// property instead of symmetrization directives. Wildcard index names
    /// used by the emitted rules are interned into `alg` so they reach the
    /// request's index declaration. Re-declaring the same disambiguated
    /// name is a no-op.
    pub fn declare(
        &mut self,
        alg: &mut Algebra,
        name: &str,
        upper: u32,
        lower: u32,
        symmetry: Symmetry,
        flavored: bool,
    ) -> String {
        let mut fname = name.to_owned();
        if symmetry == Symmetry::Symmetric {
            fname.push('s');
        }
        if upper > 0 || lower > 0 {
            fname.push_str(&format!("{upper}{lower}"));
        }

        let mut header = fname.clone();
        if !flavored && (lower == 0 || upper == 0) {
            header.push_str(symmetry.property());
        }
        if !self.add_function(header) {
            return fname;
        }

        let pairable = if flavored {
            upper > 0 || lower > 0
        } else {
            upper > 0 && lower > 0
        };
        let offset = u32::from(flavored);
        if pairable && upper > 1 {
            let ids: Vec<String> = (1..=upper).map(|i| (i + offset).to_string()).collect();
            self.add_directive(format!("{}  {fname} {};", symmetry.verb(), ids.join(",")));
        }
        if pairable && lower > 1 {
            let ids: Vec<String> = (1..=lower)
                .map(|i| (i + offset + upper).to_string())
                .collect();
            self.add_directive(format!("{}  {fname} {};", symmetry.verb(), ids.join(",")));
        }

        // One vanishing rule per index pairing that can repeat.
        let total = upper + lower;
        if upper > 0 && lower > 0 {
            for i in 1..=upper {
                for j in 1..=lower {
                    let line = Self::vanish_rule(alg, &fname, flavored, total, i, j + upper);
                    self.add_directive(line);
                }
            }
        }
        if upper > 1 && lower > 0 {
            for i in 1..=upper {
                for j in i + 1..=upper {
                    let line = Self::vanish_rule(alg, &fname, flavored, total, i, j);
                    self.add_directive(line);
                }
            }
        }
        if upper > 0 && lower > 1 {
            for i in 1..=lower {
                for j in i + 1..=lower {
                    let line =
                        Self::vanish_rule(alg, &fname, flavored, total, i + upper, j + upper);
                    self.add_directive(line);
                }
            }
        }
        fname
    }

    /// `id fname(..,?x,..,?x,..) = 0;` with the wildcard pair at positions
    /// `a` and `b` (1-based, flavor slot excluded).
    fn vanish_rule(
        alg: &mut Algebra,
        fname: &str,
        flavored: bool,
        total: u32,
        a: u32,
        b: u32,
    ) -> String {
        let mut line = format!("id {fname}(");
        if flavored {
            line.push_str("i0?,");
            alg.intern("i0");
        }
        alg.intern("x");
        for k in 1..=total {
            if k == a || k == b {
                line.push_str("?x");
            } else {
                line.push_str(&format!("i{k}?"));
                alg.intern(&format!("i{k}"));
            }
            line.push_str(if k < total { "," } else { ")=0;" });
        }
        line
    }

    fn add_function(&mut self, header: String) -> bool {
        if self.functions.contains(&header) {
            return false;
        }
        self.functions.push(header);
        true
    }

    fn add_directive(&mut self, line: String) {
        if !self.directives.contains(&line) {
            self.directives.push(line);
        }
    }

    /// Renders the `Functions ...;` header line, if any field is declared.
    #[must_use]
    pub fn functions_line(&self) -> Option<String> {
        if self.functions.is_empty() {
            None
        } else {
            Some(format!("Functions {};", self.functions.join(", ")))
        }
    }

    /// Returns the recorded rewrite directives in declaration order.
    #[must_use]
    pub fn directives(&self) -> &[String] {
        &self.directives
    }

    /// Returns true when no field is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.directives.is_empty()
    }

    /// Drops every declaration.
    pub fn clear(&mut self) {
        self.functions.clear();
        self.directives.clear();
    }
}
