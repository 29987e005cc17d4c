//! Colored terminal output
//!
//! Respects the `NO_COLOR` environment variable and the `--color` flag.

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Styled writer for diagnostics on stderr
pub struct StyledOutput {
    stderr: StandardStream,
}

impl StyledOutput {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stderr: StandardStream::stderr(choice),
        }
    }

    fn write_styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = self.stderr.set_color(&spec);
        let _ = write!(self.stderr, "{}", text);
        let _ = self.stderr.reset();
    }

    /// Print an error and its chain of causes.
    pub fn report(&mut self, error: &anyhow::Error) {
        self.write_styled("error", Some(Color::Red), true);
        let _ = writeln!(self.stderr, ": {}", error);
        for cause in error.chain().skip(1) {
            self.write_styled("  caused by", Some(Color::Yellow), false);
            let _ = writeln!(self.stderr, ": {}", cause);
        }
    }

    /// Green confirmation line, e.g. the path that was written.
    pub fn success(&mut self, label: &str, text: &str) {
        self.write_styled(label, Some(Color::Green), true);
        let _ = writeln!(self.stderr, " {}", text);
    }
}
