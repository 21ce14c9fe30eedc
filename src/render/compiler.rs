//! External diagram compiler integration.
//!
//! The D2 compiler is an optional host tool. It is modeled as a
//! capability interface so callers probe for it and degrade gracefully,
//! and tests can substitute a stub without spawning processes.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{RenderError, RenderResult};

/// A tool that turns a diagram description file into an image.
pub trait DiagramCompiler {
    /// Returns true if the compiler can be invoked on this host.
    fn available(&self) -> bool;

    /// Compiles `description_file` into `output_file`.
    ///
    /// # Returns
    ///
    /// The path of the produced image.
    fn compile(&self, description_file: &Path, output_file: &Path) -> RenderResult<PathBuf>;
}

/// The real `d2` binary from <https://d2lang.com/>.
#[derive(Debug, Clone)]
pub struct D2Compiler {
    program: String,
}

impl D2Compiler {
    /// Creates a handle to the `d2` binary on PATH. Availability is
    /// probed per call, not cached, so a tool installed mid-session is
    /// picked up.
    pub fn new() -> Self {
        Self::with_program("d2")
    }

    /// Creates a handle invoking a specific program name or path.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for D2Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramCompiler for D2Compiler {
    fn available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn compile(&self, description_file: &Path, output_file: &Path) -> RenderResult<PathBuf> {
        log::debug!(
            "compiling {} -> {}",
            description_file.display(),
            output_file.display()
        );

        let output = Command::new(&self.program)
            .arg(description_file)
            .arg(output_file)
            .output()
            .map_err(|err| RenderError::CompilerFailed {
                reason: err.to_string(),
            })?;

        if !output.status.success() {
            return Err(RenderError::CompilerFailed {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output_file.to_path_buf())
    }
}
