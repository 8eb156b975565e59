//! Running the external tool and reading back its result.
//!
//! One run renders the request file, invokes the tool with its output
//! redirected to the response file, rewrites tool-minted index
//! placeholders (`N1_?`, `N2_?`, ...) to freshly interned names, and
//! replaces the expression with the parsed result: one coefficient-only
//! term per signed chunk of the `R = ...;` assignment. Both job files are
//! left on disk for inspection.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use gradus_braket::Braket;
use gradus_core::Algebra;
use log::{debug, info};

use crate::config::FormConfig;
use crate::error::FormError;
use crate::field::{FieldTable, Symmetry};
use crate::script;

/// Environment variable naming the directory that holds the tool binary.
pub const FORM_DIR_ENV: &str = "PATH_TO_FORM";

/// One tool session: configuration, declared fields, and the resolved
/// binary location.
#[derive(Debug, Default)]
pub struct FormBridge {
    config: FormConfig,
    fields: FieldTable,
    resolved: Option<PathBuf>,
}

impl FormBridge {
    /// Creates a session with the given configuration.
    #[must_use]
    pub fn new(config: FormConfig) -> Self {
        Self {
            config,
            fields: FieldTable::new(),
            resolved: None,
        }
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Returns the declared fields.
    #[must_use]
    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    /// Returns the declared fields mutably.
    pub fn fields_mut(&mut self) -> &mut FieldTable {
        &mut self.fields
    }

    /// Declares a field function; see [`FieldTable::declare`].
    pub fn declare_field(
        &mut self,
        alg: &mut Algebra,
        name: &str,
        upper: u32,
        lower: u32,
        symmetry: Symmetry,
        flavored: bool,
    ) -> String {
        self.fields
            .declare(alg, name, upper, lower, symmetry, flavored)
    }

    /// Drops every field declaration and the cached binary location.
    /// Session boundary; the configuration is kept.
    pub fn reset(&mut self) {
        self.fields.clear();
        self.resolved = None;
    }

    /// Renders the request for `expr` without running anything.
    #[must_use]
    pub fn render_request(&self, expr: &Braket, alg: &Algebra) -> String {
        script::render_request(expr, &self.fields, &self.config, alg)
    }

    /// Runs the tool on `expr` and replaces it with the parsed result.
    ///
    /// # Errors
    ///
    /// Fails when the binary cannot be located, a job file cannot be
    /// written or read, the tool exceeds the configured deadline or exits
    /// non-zero, or the response carries no result marker.
    pub fn run(&mut self, expr: &mut Braket, alg: &mut Algebra) -> Result<(), FormError> {
        let binary = self.resolve_binary()?;
        let workdir = self
            .config
            .workdir()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let request_path = workdir.join(format!("{}_in.frm", self.config.stem()));
        let response_path = workdir.join(format!("{}_out.frm", self.config.stem()));

        let request = script::render_request(expr, &self.fields, &self.config, alg);
        fs::write(&request_path, request)?;
        info!("running {} on {}", binary.display(), request_path.display());

        let child = Command::new(&binary)
            .arg(&request_path)
            .stdin(Stdio::null())
            .stdout(fs::File::create(&response_path)?)
            .spawn()?;
        let status = self.wait_with_deadline(child)?;
        if !status.success() {
            return Err(FormError::Failed {
                status: status.code().unwrap_or(-1),
            });
        }

        let mut text = fs::read_to_string(&response_path)?;
        substitute_minted_indices(&mut text, self.config.label(), alg);
        fs::write(&response_path, &text)?;

        let chunks = extract_terms(&text, &response_path)?;
        debug!("form returned {} terms", chunks.len());
        *expr = Braket::from_form_terms(chunks);
        Ok(())
    }

    /// Locates the tool binary: the configured path, then `./form`, then
    /// `form` inside the `PATH_TO_FORM` directory. The result is cached.
    fn resolve_binary(&mut self) -> Result<PathBuf, FormError> {
        if let Some(path) = &self.resolved {
            return Ok(path.clone());
        }
        let found = if let Some(path) = self.config.binary() {
            if !path.is_file() {
                return Err(FormError::BinaryNotFound);
            }
            path.to_owned()
        } else if Path::new("form").is_file() {
            PathBuf::from("./form")
        } else {
            let dir = PathBuf::from(env::var_os(FORM_DIR_ENV).ok_or(FormError::BinaryNotFound)?);
            if !dir.is_dir() {
                return Err(FormError::BinaryNotFound);
            }
            let candidate = dir.join("form");
            if !candidate.is_file() {
                return Err(FormError::BinaryNotFound);
            }
            candidate
        };
        debug!("found form binary at {}", found.display());
        self.resolved = Some(found.clone());
        Ok(found)
    }

    fn wait_with_deadline(&self, mut child: Child) -> Result<ExitStatus, FormError> {
        let Some(limit) = self.config.timeout() else {
            return Ok(child.wait()?);
        };
        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if started.elapsed() >= limit {
                let _ = child.kill();
                let _ = child.wait();
                return Err(FormError::Timeout {
                    secs: limit.as_secs(),
                });
            }
            thread::sleep(Duration::from_millis(20));
        }
    }
}

/// Rewrites `N<k>_?` placeholders to `<label><k>` for consecutive `k`
/// starting at 1, interning each minted name.
fn substitute_minted_indices(text: &mut String, label: &str, alg: &mut Algebra) {
    let mut k = 1u32;
    loop {
        let pattern = format!("N{k}_?");
        if !text.contains(&pattern) {
            break;
        }
        let minted = format!("{label}{k}");
        *text = text.replace(&pattern, &minted);
        alg.intern(&minted);
        k += 1;
    }
}

/// Cuts the `R = ...;` assignment out of the response, flattens it, and
/// splits it into signed term chunks.
fn extract_terms(text: &str, file: &Path) -> Result<Vec<String>, FormError> {
    let missing = || FormError::MissingMarker {
        file: file.to_path_buf(),
    };
    let start = text.find("R =").ok_or_else(missing)?;
    let tail = &text[start..];
    let end = tail.find(';').ok_or_else(missing)?;
    let mut flat = tail[..end].to_owned();
    flat.retain(|c| c != ' ' && c != '\n');
    let body = flat.strip_prefix("R=").unwrap_or(&flat);
    Ok(split_signed(body))
}

fn split_signed(body: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;
    for (pos, ch) in body.char_indices() {
        if pos > 0 && (ch == '+' || ch == '-') {
            if pos > start {
                out.push(body[start..pos].to_owned());
            }
            start = pos;
        }
    }
    if start < body.len() {
        out.push(body[start..].to_owned());
    }
    out
}
