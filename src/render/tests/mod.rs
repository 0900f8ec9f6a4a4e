#![allow(unused_imports)] // for pretty_assertions::{assert_eq, assert_ne}

use termcolor::Buffer;
use pretty_assertions::{assert_eq, assert_ne};
use crate::diagnostic::{Annotation, AnnotationStyle, Diagnostic, Severity};
use crate::file::{SimpleFile, SimpleFiles};
use crate::render::color::DefaultColorConfig;
use super::*;

mod singleline;
mod notes;

fn render_no_color<FileId, F>(files: F, diagnostics: Vec<Diagnostic<FileId>>, config: RenderConfig) -> String
    where FileId: Copy + std::fmt::Debug + Eq, F: Files<FileId=FileId> {
    let mut buf = Buffer::no_color();
    let mut renderer = DiagnosticRenderer::new(&mut buf, DefaultColorConfig, files, config);
    renderer.render(diagnostics).unwrap();

    let buf = buf.into_inner();
    String::from_utf8_lossy(&buf).into_owned()
}

#[test]
fn test_header_1() {
    let result = render_no_color(SimpleFile::new("main.test", "unused source"), vec![
        Diagnostic::new(Severity::Error)
            .with_name("test/diagnostic_1")
            .with_message("Test message")
    ], RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, "error[test/diagnostic_1]: Test message\n");
}

#[test]
fn test_header_no_message_1() {
    let result = render_no_color(SimpleFile::new("main.test", "unused source"), vec![
        Diagnostic::new(Severity::Error)
            .with_name("test/diagnostic_2")
    ], RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, "error[test/diagnostic_2]\n");
}

#[test]
fn test_multiple_diagnostics_1() {
    // Diagnostics are separated by a blank line
    let result = render_no_color(SimpleFile::new("main.test", "unused source"), vec![
        Diagnostic::new(Severity::Error).with_message("first"),
        Diagnostic::new(Severity::Warning).with_message("second"),
    ], RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, "error: first\n\nwarning: second\n");
}

#[test]
fn test_empty_1() {
    let result = render_no_color(SimpleFile::new("main.test", "unused source"),
        vec![], RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, "");
}

#[test]
fn test_multiple_files_1() {
    // Files are shown in the order they first appear in the diagnostic
    let mut files = SimpleFiles::new();
    let main_id = files.add("main.test", "fn main() {}\n");
    let other_id = files.add("other.test", "let x = 1;\n");

    let result = render_no_color(files, vec![
        Diagnostic::new(Severity::Error)
            .with_message("Some message")
            .with_annotation(Annotation::new(AnnotationStyle::Primary, main_id, 3..7)
                .with_label("function name"))
            .with_annotation(Annotation::new(AnnotationStyle::Secondary, other_id, 4..5)
                .with_label("variable"))
    ], RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Some message\n",
        " --> main.test:1:4\n",
        "1 | fn main() {}\n",
        "  |    ^^^^ function name\n",
        " --> other.test:1:5\n",
        "1 | let x = 1;\n",
        "  |     - variable\n",
    ));
}

#[test]
fn test_deterministic_1() {
    // Rendering the same diagnostics twice gives byte-identical output
    let diagnostic = || Diagnostic::new(Severity::Error)
        .with_message("Mismatched types")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 4..13)
            .with_label("something"))
        .with_annotation(Annotation::new(AnnotationStyle::Secondary, (), 8..11)
            .with_label("something else"));
    let file = || SimpleFile::new("test_file.test", "let main = 23;\nsomething += 3.0;\n");
    let config = RenderConfig { surrounding_lines: 0, tab_length: 4 };

    let first = render_no_color(file(), vec![diagnostic()], config.clone());
    let second = render_no_color(file(), vec![diagnostic()], config);

    assert_eq!(first, second);
}
