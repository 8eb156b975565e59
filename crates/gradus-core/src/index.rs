//! Index names and their interned handles.
//!
//! Every index that appears on an operator or delta is interned once into
//! the session's [`IndexRegistry`] and referred to through a compact
//! [`Idx`] handle afterwards. Interning keeps symbol values `Copy` and makes
//! index equality a word comparison.

use hashbrown::HashMap;

/// A handle to an interned index name.
///
/// Handles are issued densely in first-come order and stay valid until the
/// registry is cleared at a session boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Idx(u32);

impl Idx {
    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value of the handle.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for Idx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Idx({})", self.0)
    }
}

impl std::fmt::Display for Idx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Interning table mapping index names to [`Idx`] handles.
///
/// Append-only within a session: names are never removed individually, only
/// dropped wholesale by [`IndexRegistry::clear`] between derivations.
#[derive(Debug, Clone, Default)]
pub struct IndexRegistry {
    map: HashMap<String, u32>,
    names: Vec<String>,
}

impl IndexRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            names: Vec::new(),
        }
    }

    /// Interns a name, returning the existing handle if it was seen before.
    pub fn intern(&mut self, name: &str) -> Idx {
        if let Some(&id) = self.map.get(name) {
            return Idx(id);
        }
        let id = self.names.len() as u32;
        self.map.insert(name.to_owned(), id);
        self.names.push(name.to_owned());
        Idx(id)
    }

    /// Interns the decimal rendering of a numeric index.
    pub fn intern_num(&mut self, n: i64) -> Idx {
        self.intern(&n.to_string())
    }

    /// Returns the handle for `name` if it is already interned.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Idx> {
        self.map.get(name).copied().map(Idx)
    }

    /// Returns the name behind a handle, if it was issued.
    #[must_use]
    pub fn get(&self, idx: Idx) -> Option<&str> {
        self.names.get(idx.0 as usize).map(String::as_str)
    }

    /// Returns the name behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle was never issued by this registry.
    #[must_use]
    pub fn name(&self, idx: Idx) -> &str {
        &self.names[idx.0 as usize]
    }

    /// Returns the number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing is interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over `(handle, name)` pairs in first-come order.
    pub fn iter(&self) -> impl Iterator<Item = (Idx, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (Idx(i as u32), name.as_str()))
    }

    /// Returns the distinct non-numeric names, sorted lexicographically.
    ///
    /// Numeric names need no declaration on the external-tool side and are
    /// skipped. Interned names are unique, so sorting suffices.
    #[must_use]
    pub fn distinct_non_numeric(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .names
            .iter()
            .map(String::as_str)
            .filter(|n| n.parse::<i64>().is_err())
            .collect();
        names.sort_unstable();
        names
    }

    /// Drops every interned name. Session boundary only: outstanding
    /// handles become dangling.
    pub fn clear(&mut self) {
        self.map.clear();
        self.names.clear();
    }
}
