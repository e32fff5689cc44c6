//! Code formatting for signatures and attribute values.
//!
//! Long signatures are handed to an external Python formatter. Black is
//! preferred, then Ruff; without either, code is returned untouched.

use std::fmt::Debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

/// Formats a snippet of Python code to a maximum line length.
///
/// Formatting failures are not errors: implementations return the input.
pub trait Formatter: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    fn format(&self, code: &str, line_length: usize) -> String;
}

/// Returns code unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFormatter;

impl Formatter for IdentityFormatter {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn format(&self, code: &str, _line_length: usize) -> String {
        code.to_string()
    }
}

/// Runs `black` on stdin.
#[derive(Debug, Clone)]
pub struct BlackFormatter {
    binary: PathBuf,
}

impl BlackFormatter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Formatter for BlackFormatter {
    fn name(&self) -> &'static str {
        "black"
    }

    fn format(&self, code: &str, line_length: usize) -> String {
        let line_length = line_length.to_string();
        run_formatter(&self.binary, &["--quiet", "--line-length", &line_length, "-"], code)
    }
}

/// Runs `ruff format` on stdin.
#[derive(Debug, Clone)]
pub struct RuffFormatter {
    binary: PathBuf,
}

impl RuffFormatter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Formatter for RuffFormatter {
    fn name(&self) -> &'static str {
        "ruff"
    }

    fn format(&self, code: &str, line_length: usize) -> String {
        let config = format!("line-length={line_length}");
        run_formatter(
            &self.binary,
            &["format", "--config", &config, "--stdin-filename", "file.py", "-"],
            code,
        )
    }
}

fn run_formatter(binary: &Path, args: &[&str], code: &str) -> String {
    let child = Command::new(binary)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn();
    let mut child = match child {
        Ok(child) => child,
        Err(error) => {
            debug!("Could not run {}: {error}", binary.display());
            return code.to_string();
        }
    };
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(error) = stdin.write_all(code.as_bytes()) {
            debug!("Could not write to {}: {error}", binary.display());
        }
    }
    match child.wait_with_output() {
        Ok(output) if output.status.success() => {
            String::from_utf8(output.stdout).unwrap_or_else(|_| code.to_string())
        }
        Ok(output) => {
            debug!("{} exited with {}", binary.display(), output.status);
            code.to_string()
        }
        Err(error) => {
            debug!("Could not wait for {}: {error}", binary.display());
            code.to_string()
        }
    }
}

/// Find an installed formatter on `PATH`.
#[must_use]
pub fn discover() -> Arc<dyn Formatter> {
    if let Ok(binary) = which::which("black") {
        debug!("Formatting signatures with {}", binary.display());
        return Arc::new(BlackFormatter::new(binary));
    }
    if let Ok(binary) = which::which("ruff") {
        debug!("Formatting signatures with {}", binary.display());
        return Arc::new(RuffFormatter::new(binary));
    }
    info!("Formatting signatures requires either Black or Ruff to be installed.");
    Arc::new(IdentityFormatter)
}

/// Process-wide formatter, discovered on first use.
#[must_use]
pub fn default_formatter() -> Arc<dyn Formatter> {
    static FORMATTER: OnceLock<Arc<dyn Formatter>> = OnceLock::new();
    Arc::clone(FORMATTER.get_or_init(discover))
}

/// Strip `code` and format it when it does not fit on one line.
#[must_use]
pub fn format_code(code: &str, line_length: usize, formatter: &dyn Formatter) -> String {
    let code = code.trim();
    if code.chars().count() < line_length {
        return code.to_string();
    }
    formatter.format(code, line_length)
}

/// Format `name` followed by its `signature` (parameters and return annotation).
///
/// The name is swapped for a same-length placeholder so that dotted paths
/// survive formatting as a function definition.
#[must_use]
pub fn format_signature_text(
    name: &str,
    signature: &str,
    line_length: usize,
    formatter: &dyn Formatter,
) -> String {
    let name = name.trim();
    let signature = signature.trim();
    if name.chars().count() + signature.chars().count() < line_length {
        return format!("{name}{signature}");
    }

    let placeholder = "x".repeat(name.chars().count());
    let formatted = formatter.format(&format!("def {placeholder}{signature}: pass"), line_length);
    let body = formatted
        .trim()
        .strip_prefix("def ")
        .and_then(|rest| rest.strip_suffix("pass"))
        .map(str::trim_end)
        .and_then(|rest| rest.strip_suffix(':'))
        .and_then(|rest| rest.strip_prefix(placeholder.as_str()));
    match body {
        Some(body) => format!("{name}{}", body.trim_end()),
        None => format!("{name}{signature}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Breaks parameters one per line, like Black does for long signatures.
    #[derive(Debug)]
    struct SplittingFormatter;

    impl Formatter for SplittingFormatter {
        fn name(&self) -> &'static str {
            "splitting"
        }

        fn format(&self, code: &str, _line_length: usize) -> String {
            let open = code.find('(').unwrap();
            let close = code.rfind(')').unwrap();
            let parameters: Vec<&str> = code[open + 1..close].split(", ").collect();
            format!(
                "{}(\n    {},\n){}\n    pass\n",
                &code[..open],
                parameters.join(",\n    "),
                code[close + 1..].replace(": pass", ":")
            )
        }
    }

    #[test]
    fn test_format_code_short_circuit() {
        assert_eq!(format_code("  x = 1  ", 60, &SplittingFormatter), "x = 1");
    }

    #[test]
    fn test_short_signature_is_concatenated() {
        let text = format_signature_text("pkg.func", "(a, b)", 60, &SplittingFormatter);
        assert_eq!(text, "pkg.func(a, b)");
    }

    #[test]
    fn test_long_signature_keeps_dotted_name() {
        let text = format_signature_text(
            "package.module.function",
            "(first_argument, second_argument) -> int",
            20,
            &SplittingFormatter,
        );
        assert_eq!(
            text,
            "package.module.function(\n    first_argument,\n    second_argument,\n) -> int"
        );
    }

    #[test]
    fn test_identity_formatter_keeps_signature() {
        let text = format_signature_text("pkg.func", "(a, b)", 5, &IdentityFormatter);
        assert_eq!(text, "pkg.func(a, b)");
    }

    #[test]
    fn test_missing_binary_returns_input() {
        let formatter = RuffFormatter::new("/nonexistent/ruff-binary");
        assert_eq!(formatter.format("x  =  1", 10), "x  =  1");
    }
}
