//! Rendering of dependency graphs to D2 diagrams.
//!
//! A finished [`DependencyGraph`] is translated into a D2 description
//! (one relation statement per edge) and written next to the configured
//! output file; a [`DiagramCompiler`] then attempts to turn it into an
//! image. The compiler being absent or failing degrades the outcome to
//! "description produced, image not produced" and is never an error.

pub mod compiler;
pub mod d2;

use std::fs;
use std::path::{Path, PathBuf};

use crate::graph::DependencyGraph;

pub use compiler::{D2Compiler, DiagramCompiler};

/// Errors that can occur while rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Failed to write the diagram description file.
    #[error("Failed to write diagram description: {0}")]
    IoError(#[from] std::io::Error),

    /// The external diagram compiler could not be run or exited non-zero.
    #[error("Diagram compiler failed: {reason}")]
    CompilerFailed {
        /// Compiler stderr or the spawn failure.
        reason: String,
    },
}

/// Result type alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// The result of a render pass.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// The generated D2 description text.
    pub description: String,
    /// Where the description was written.
    pub description_path: PathBuf,
    /// The compiled image, when a compiler was available and succeeded.
    pub image_path: Option<PathBuf>,
}

impl RenderOutcome {
    /// Returns true if an image was produced.
    pub fn has_image(&self) -> bool {
        self.image_path.is_some()
    }
}

/// Renders dependency graphs to a configured output location.
#[derive(Debug, Clone)]
pub struct Renderer {
    output_file: PathBuf,
}

impl Renderer {
    /// Creates a renderer targeting `output_file` (the image path; the
    /// description lands next to it with a `.d2` extension).
    pub fn new(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
        }
    }

    /// The path the D2 description is written to.
    pub fn description_path(&self) -> PathBuf {
        self.output_file.with_extension("d2")
    }

    /// Generates the description, writes it, and attempts compilation.
    ///
    /// Only failing to write the description file is an error; an
    /// unavailable or failing compiler leaves `image_path` empty and is
    /// logged, not propagated.
    pub fn render(
        &self,
        graph: &DependencyGraph,
        compiler: &dyn DiagramCompiler,
    ) -> RenderResult<RenderOutcome> {
        let description = d2::to_d2(graph);
        let description_path = self.description_path();
        fs::write(&description_path, &description)?;

        if !compiler.available() {
            log::warn!("diagram compiler not available, keeping description only");
            return Ok(RenderOutcome {
                description,
                description_path,
                image_path: None,
            });
        }

        let image_path = match compiler.compile(&description_path, &self.output_file) {
            Ok(image) => Some(image),
            Err(err) => {
                log::warn!("diagram compilation failed: {err}");
                None
            }
        };

        Ok(RenderOutcome {
            description,
            description_path,
            image_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyGraph;

    /// Compiler stub that reports itself missing.
    struct Unavailable;

    impl DiagramCompiler for Unavailable {
        fn available(&self) -> bool {
            false
        }

        fn compile(&self, _description: &Path, _output: &Path) -> RenderResult<PathBuf> {
            panic!("compile called on unavailable compiler");
        }
    }

    /// Compiler stub that is present but always fails.
    struct Broken;

    impl DiagramCompiler for Broken {
        fn available(&self) -> bool {
            true
        }

        fn compile(&self, _description: &Path, _output: &Path) -> RenderResult<PathBuf> {
            Err(RenderError::CompilerFailed {
                reason: "boom".to_string(),
            })
        }
    }

    /// Compiler stub that "produces" the image file.
    struct Working;

    impl DiagramCompiler for Working {
        fn available(&self) -> bool {
            true
        }

        fn compile(&self, _description: &Path, output: &Path) -> RenderResult<PathBuf> {
            fs::write(output, b"<svg/>")?;
            Ok(output.to_path_buf())
        }
    }

    fn sample_graph() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        graph.insert_package("app", vec!["lib".to_string()]);
        graph.insert_package("lib", Vec::new());
        graph
    }

    #[test]
    fn test_description_path_swaps_extension() {
        let renderer = Renderer::new("out/graph.svg");
        assert_eq!(renderer.description_path(), PathBuf::from("out/graph.d2"));
    }

    #[test]
    fn test_render_without_compiler_keeps_description() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new(dir.path().join("graph.svg"));

        let outcome = renderer.render(&sample_graph(), &Unavailable).unwrap();

        assert!(!outcome.has_image());
        assert!(outcome.description_path.exists());
        let written = fs::read_to_string(&outcome.description_path).unwrap();
        assert_eq!(written, outcome.description);
        assert!(written.contains("app -> lib"));
    }

    #[test]
    fn test_render_compiler_failure_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new(dir.path().join("graph.svg"));

        let outcome = renderer.render(&sample_graph(), &Broken).unwrap();

        assert!(!outcome.has_image());
        assert!(outcome.description_path.exists());
    }

    #[test]
    fn test_render_with_working_compiler() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("graph.svg");
        let renderer = Renderer::new(&output);

        let outcome = renderer.render(&sample_graph(), &Working).unwrap();

        assert_eq!(outcome.image_path.as_deref(), Some(output.as_path()));
        assert!(output.exists());
    }

    #[test]
    fn test_render_unwritable_description_is_error() {
        let renderer = Renderer::new("no-such-dir/deeper/graph.svg");
        let result = renderer.render(&sample_graph(), &Unavailable);

        assert!(matches!(result, Err(RenderError::IoError(_))));
    }
}
