//! Bridge configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for one batch job against the external tool.
///
/// The defaults reproduce the stock batch setup: job files `form_in.frm`
/// and `form_out.frm` in the working directory, index summation on,
/// renumbering off, itemized printing, no deadline, and the binary looked
/// up from the environment.
#[derive(Clone, Debug)]
pub struct FormConfig {
    binary: Option<PathBuf>,
    workdir: Option<PathBuf>,
    stem: String,
    label: String,
    renumber: bool,
    index_sum: bool,
    itemized: bool,
    timeout: Option<Duration>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FormConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            binary: None,
            workdir: None,
            stem: "form".to_owned(),
            label: "j".to_owned(),
            renumber: false,
            index_sum: true,
            itemized: true,
            timeout: None,
        }
    }

    /// Uses an explicit tool binary instead of the lookup chain.
    #[must_use]
    pub fn with_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }

    /// Places the job files in `dir` instead of the working directory.
    #[must_use]
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Renames the job files to `<stem>_in.frm` and `<stem>_out.frm`.
    #[must_use]
    pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
        self.stem = stem.into();
        self
    }

    /// Prefix for indices minted while reading the tool's response.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Adds `renumber 1;` to the request.
    ///
    /// Renumbering lets the tool merge more terms but gets expensive on
    /// large expressions; the usual pattern is a first pass without it and
    /// a second pass with it. Off by default.
    #[must_use]
    pub fn renumber(mut self, on: bool) -> Self {
        self.renumber = on;
        self
    }

    /// Adds the index summation block (`sum ...;` plus the epsilon
    /// identity) to the request. On by default.
    #[must_use]
    pub fn index_sum(mut self, on: bool) -> Self {
        self.index_sum = on;
        self
    }

    /// Prints each output term separately (`print +s;`) instead of the
    /// combined result (`print R;`). On by default.
    #[must_use]
    pub fn itemized(mut self, on: bool) -> Self {
        self.itemized = on;
        self
    }

    /// Fails the run when the tool takes longer than `limit`.
    #[must_use]
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Returns the explicit binary path, if set.
    #[must_use]
    pub fn binary(&self) -> Option<&Path> {
        self.binary.as_deref()
    }

    /// Returns the job directory, if set.
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    /// Returns the job-file stem.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Returns the response index prefix.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns true when `renumber 1;` is requested.
    #[must_use]
    pub const fn renumber_on(&self) -> bool {
        self.renumber
    }

    /// Returns true when the index summation block is requested.
    #[must_use]
    pub const fn index_sum_on(&self) -> bool {
        self.index_sum
    }

    /// Returns true when itemized printing is requested.
    #[must_use]
    pub const fn itemized_on(&self) -> bool {
        self.itemized
    }

    /// Returns the run deadline, if set.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
