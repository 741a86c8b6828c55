//! Terminal emitter.
//!
//! Renders diagnostics through `ariadne` with source snippets, caret labels,
//! and optional color.

use std::io::{self, Write};

use ariadne::{Color, Config, Report, ReportKind, Source};

use crate::{Diagnostic, Severity};

/// Returns "s" for plural counts, "" for singular.
#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Color output mode for the terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorMode {
    /// Resolve to a boolean based on terminal detection.
    ///
    /// For `Auto` mode, `is_tty` decides; it is ignored for `Always` and
    /// `Never`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Terminal emitter rendering rich reports with source context.
///
/// Give it the source text via [`with_source`](Self::with_source) so reports
/// can show the offending lines; without it, spans render against an empty
/// source.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
    source: String,
    path: String,
}

impl<W: Write> TerminalEmitter<W> {
    /// Create a new terminal emitter with explicit color mode.
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            source: String::new(),
            path: String::from("<input>"),
        }
    }

    /// Attach the source text diagnostics refer into.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Attach the display path for the source file.
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Emit a single diagnostic.
    pub fn emit(&mut self, diagnostic: &Diagnostic) {
        let kind = match diagnostic.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
            Severity::Note | Severity::Help => ReportKind::Advice,
        };
        let primary_color = match diagnostic.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Note | Severity::Help => Color::Cyan,
        };

        let offset = diagnostic
            .primary_span()
            .map_or(0, |span| span.start as usize);
        let path = self.path.as_str();

        let mut builder = Report::build(kind, path, offset)
            .with_code(diagnostic.code.as_str())
            .with_message(&diagnostic.message)
            .with_config(Config::default().with_color(self.colors));

        for label in &diagnostic.labels {
            let color = if label.is_primary {
                primary_color
            } else {
                Color::Blue
            };
            builder = builder.with_label(
                ariadne::Label::new((path, label.span.to_range()))
                    .with_message(&label.message)
                    .with_color(color),
            );
        }

        if !diagnostic.notes.is_empty() {
            builder = builder.with_note(diagnostic.notes.join("\n"));
        }
        if !diagnostic.suggestions.is_empty() {
            builder = builder.with_help(diagnostic.suggestions.join("\n"));
        }

        let _ = builder
            .finish()
            .write((path, Source::from(self.source.as_str())), &mut self.writer);
    }

    /// Emit multiple diagnostics.
    pub fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    /// Emit a summary of errors and warnings.
    pub fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        if error_count > 0 {
            let _ = writeln!(
                self.writer,
                "{error_count} error{} emitted",
                plural_s(error_count)
            );
        }
        if warning_count > 0 {
            let _ = writeln!(
                self.writer,
                "{warning_count} warning{} emitted",
                plural_s(warning_count)
            );
        }
    }

    /// Flush buffered output.
    pub fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

impl TerminalEmitter<io::Stderr> {
    /// Create a terminal emitter for stderr with explicit color mode.
    pub fn stderr(mode: ColorMode, is_tty: bool) -> TerminalEmitter<io::Stderr> {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use tern_ir::Span;

    fn render(diagnostic: &Diagnostic, source: &str) -> String {
        let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false)
            .with_source(source)
            .with_file_path("demo.tn");
        emitter.emit(diagnostic);
        String::from_utf8_lossy(&emitter.writer).into_owned()
    }

    #[test]
    fn color_mode_resolution() {
        assert!(ColorMode::Always.should_use_colors(false));
        assert!(!ColorMode::Never.should_use_colors(true));
        assert!(ColorMode::Auto.should_use_colors(true));
        assert!(!ColorMode::Auto.should_use_colors(false));
    }

    #[test]
    fn emit_renders_code_message_and_label() {
        let source = "print(value)\n";
        let diag = Diagnostic::error(ErrorCode::E6001)
            .with_message("undefined name `value`")
            .with_label(Span::new(6, 11), "not found in this scope");

        let output = render(&diag, source);
        assert!(output.contains("E6001"));
        assert!(output.contains("undefined name `value`"));
        assert!(output.contains("not found in this scope"));
        assert!(output.contains("demo.tn"));
        // ColorMode::Never leaves no escape codes behind
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn emit_includes_notes_and_help() {
        let source = "x = (f() as tmp)\nprint(tmp)\n";
        let diag = Diagnostic::error(ErrorCode::E6001)
            .with_message("undefined name `tmp`")
            .with_label(Span::new(23, 26), "not found")
            .with_note("`tmp` was bound by `as` in a previous statement")
            .with_suggestion("assign it to a variable to keep it");

        let output = render(&diag, source);
        assert!(output.contains("bound by `as`"));
        assert!(output.contains("assign it to a variable"));
    }

    #[test]
    fn summary_counts_and_pluralizes() {
        let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
        emitter.emit_summary(1, 2);
        let output = String::from_utf8_lossy(&emitter.writer).into_owned();
        assert!(output.contains("1 error emitted"));
        assert!(output.contains("2 warnings emitted"));
    }

    #[test]
    fn summary_silent_when_clean() {
        let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
        emitter.emit_summary(0, 0);
        assert!(emitter.writer.is_empty());
    }
}
