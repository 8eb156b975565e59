//! Errors for the external-tool bridge.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing, running or reading back a batch job.
///
/// A run that produces algebraically trivial output is not an error; these
/// variants cover a missing or broken tool installation and responses the
/// bridge cannot interpret.
#[derive(Debug, Error)]
pub enum FormError {
    /// The tool binary could not be located.
    #[error("form binary not found; configure a path or set PATH_TO_FORM")]
    BinaryNotFound,

    /// Reading or writing a job file, or spawning the tool, failed.
    #[error("job i/o failed")]
    Io(#[from] io::Error),

    /// The tool did not finish within the configured deadline.
    #[error("form run exceeded the {secs} s timeout")]
    Timeout {
        /// The deadline that was hit, in whole seconds.
        secs: u64,
    },

    /// The tool exited with a non-zero status.
    #[error("form exited with status {status}")]
    Failed {
        /// Exit code, or -1 when terminated by a signal.
        status: i32,
    },

    /// The output file carried no `R =` result marker.
    #[error("no result marker in form output {}", file.display())]
    MissingMarker {
        /// The output file that was searched.
        file: PathBuf,
    },
}
