//! Renderer backed by the Graphviz `dot` executable

use super::{OutputFormat, RenderError, Renderer};
use crate::debug;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use std::thread;

/// Pipes DOT source into `dot -T<format> -o <path>`
#[derive(Debug, Clone, Default)]
pub struct GraphvizRenderer {
    /// Executable to run instead of the detected one
    command: Option<String>,
    /// Working executable, looked up on first render
    resolved: OnceLock<Option<String>>,
}

impl GraphvizRenderer {
    /// Create a renderer that looks for `dot` on first use
    #[must_use]
    pub const fn new() -> Self {
        Self {
            command: None,
            resolved: OnceLock::new(),
        }
    }

    /// Create a renderer with a specific `dot` executable
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn with_command(command: &str) -> Self {
        Self {
            command: Some(command.to_owned()),
            resolved: OnceLock::new(),
        }
    }

    /// Find a working `dot` executable
    #[must_use]
    pub fn detect() -> Option<String> {
        let candidates = [
            "dot",
            "/usr/bin/dot",
            "/usr/local/bin/dot",
            "/opt/homebrew/bin/dot", // macOS (Apple silicon)
            "C:\\Program Files\\Graphviz\\bin\\dot.exe",
        ];

        candidates
            .into_iter()
            .find(|candidate| Self::responds(candidate))
            .map(str::to_owned)
    }

    fn responds(command: &str) -> bool {
        Command::new(command)
            .arg("-V")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    fn resolve(&self) -> Result<String, RenderError> {
        self.resolved
            .get_or_init(|| match &self.command {
                Some(command) => Self::responds(command).then(|| command.clone()),
                None => Self::detect(),
            })
            .clone()
            .ok_or(RenderError::DotNotFound)
    }
}

impl Renderer for GraphvizRenderer {
    fn render(
        &self,
        dot_source: &str,
        format: &OutputFormat,
        output_path: &Path,
    ) -> Result<(), RenderError> {
        let command = self.resolve()?;
        debug!(
            "{} -T{} -o {}",
            command,
            format.extension(),
            output_path.display()
        );

        let mut child = Command::new(&command)
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(output_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;
        // stdin is fed from its own thread so stderr keeps draining
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || {
                stdin.map_or(Ok(()), |mut stdin| stdin.write_all(dot_source.as_bytes()))
            });
            let output = child.wait_with_output();
            (writer.join(), output)
        });
        let output = output?;

        if !output.status.success() {
            return Err(RenderError::DotFailed {
                format: format.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written.map_err(|_| io::Error::other("writing to dot panicked"))??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_command() {
        let renderer = GraphvizRenderer::with_command("/no/such/graphviz/dot");
        let format: OutputFormat = "svg".parse().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let err = renderer
            .render("digraph {}", &format, &dir.path().join("x.svg"))
            .unwrap_err();
        assert!(matches!(err, RenderError::DotNotFound));
    }

    #[test]
    fn test_renders_when_dot_is_installed() {
        let Some(dot) = GraphvizRenderer::detect() else {
            eprintln!("dot not installed, skipping");
            return;
        };
        let renderer = GraphvizRenderer::with_command(&dot);
        let format: OutputFormat = "svg".parse().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.svg");

        renderer
            .render("digraph \"g\" { \"a\" -> \"b\" }", &format, &path)
            .unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));

        let err = renderer
            .render("digraph {", &format, &dir.path().join("bad.svg"))
            .unwrap_err();
        assert!(matches!(err, RenderError::DotFailed { .. }));
    }

    /// Write an executable stand-in for `dot` that answers `-V` and then runs `body`
    #[cfg(unix)]
    fn fake_dot(dir: &Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-dot");
        std::fs::write(
            &path,
            format!("#!/bin/sh\nif [ \"$1\" = \"-V\" ]; then exit 0; fi\n{body}\n"),
        )
        .unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        let path = path.to_string_lossy().into_owned();
        // a freshly written script can be briefly busy while other tests fork
        for _ in 0..20 {
            match Command::new(&path).arg("-V").status() {
                Err(e) if e.raw_os_error() == Some(26) => {
                    std::thread::sleep(std::time::Duration::from_millis(50));
                }
                _ => break,
            }
        }
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_early_exit_reports_dot_error() {
        let dir = tempfile::tempdir().unwrap();
        let dot = fake_dot(dir.path(), "echo 'syntax error in line 1' >&2\nexit 1");
        let renderer = GraphvizRenderer::with_command(&dot);
        let format: OutputFormat = "svg".parse().unwrap();
        let source = format!("digraph {{ {} }}", "\"a\" -> \"b\"\n".repeat(100_000));

        let err = renderer
            .render(&source, &format, &dir.path().join("x.svg"))
            .unwrap_err();
        match err {
            RenderError::DotFailed { format, stderr } => {
                assert_eq!(format, "svg");
                assert_eq!(stderr, "syntax error in line 1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_is_resolved_once() {
        let dir = tempfile::tempdir().unwrap();
        let dot = fake_dot(dir.path(), "cat > \"$3\"");
        let renderer = GraphvizRenderer::with_command(&dot);
        let format: OutputFormat = "svg".parse().unwrap();

        renderer
            .render("digraph {}", &format, &dir.path().join("a.svg"))
            .unwrap();
        assert_eq!(renderer.resolved.get(), Some(&Some(dot.clone())));
        renderer
            .render("graph {}", &format, &dir.path().join("b.svg"))
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("b.svg")).unwrap(),
            "graph {}"
        );
    }
}
