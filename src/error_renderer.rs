//! Error rendering using ariadne
//!
//! Compilation errors are printed with source snippets, labels and help
//! notes. Other errors carry no location and are printed as one line.

use crate::{Diagnostic, Error, Severity};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

/// Render an error to stderr
///
/// # Example
/// ```no_run
/// use jsonx::{EngineOptions, MemoryStorage, Session, render_error};
/// use bumpalo::Bump;
///
/// let arena = Bump::new();
/// let mut session = Session::new(&arena, EngineOptions::default(), MemoryStorage::new());
///
/// if let Err(e) = session.load_source("config", "{ port: 80 80 }") {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
///
/// This is useful when you want to control where the error is written,
/// such as to a file, a buffer, or a custom output stream.
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (for logs, editors and the like)
///
/// # Example
/// ```no_run
/// use jsonx::{EngineOptions, MemoryStorage, Session, render_error_to_string};
/// use bumpalo::Bump;
///
/// let arena = Bump::new();
/// let mut session = Session::new(&arena, EngineOptions::default(), MemoryStorage::new());
///
/// if let Err(e) = session.load_source("config", "{ name: 'unterminated }") {
///     let formatted = render_error_to_string(&e);
///     eprintln!("{}", formatted);
/// }
/// ```
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
///
/// This is the same as `render_error_to_string` but without ANSI color codes,
/// making the output easier to compare in tests.
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error {
        Error::Compilation {
            diagnostics,
            source,
        } => render_diagnostics(source, diagnostics, writer, use_color),
        Error::Runtime(_) | Error::ResourceExceeded(_) | Error::Api(_) | Error::Storage(_) => {
            writeln!(writer, "{}", error)
        }
    }
}

fn render_diagnostics(
    source: &str,
    diagnostics: &[Diagnostic],
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    for diag in diagnostics {
        let mut colors = ColorGenerator::new();
        colors.next(); // Skip the first color.

        let kind = match diag.severity {
            Severity::Error => ReportKind::Error,
        };

        let mut report = Report::build(kind, ("<unknown>", diag.span.0.clone()))
            .with_message(&diag.message)
            .with_config(ariadne::Config::default().with_color(use_color));

        // Add error code if present
        if let Some(code) = &diag.code {
            report = report.with_code(code);
        }

        // Primary label with the main error span
        let color = colors.next();
        report = report.with_label(
            Label::new(("<unknown>", diag.span.0.clone()))
                .with_message(&diag.message)
                .with_color(color),
        );

        // Related info as secondary labels (shows context breadcrumbs!)
        for related in &diag.related {
            let color = colors.next();
            report = report.with_label(
                Label::new(("<unknown>", related.span.0.clone()))
                    .with_message(&related.message)
                    .with_color(color),
            );
        }

        // Help text as notes
        for help_msg in &diag.help {
            report = report.with_help(help_msg);
        }

        // Render to the writer (need to reborrow to avoid moving)
        report.finish().write(("<unknown>", Source::from(source)), &mut *writer)?;
    }

    Ok(())
}
