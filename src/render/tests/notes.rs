use pretty_assertions::assert_eq;
use super::*;
use crate::diagnostic::Note;

#[test]
fn test_note_1() {
    let file = SimpleFile::new("test_file.test", "test file contents");
    let diagnostic = Diagnostic::new(Severity::Error)
        .with_message("Test message")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 5..9)
            .with_label("test label"))
        .with_note(Note::note("some note text"));

    let result = render_no_color(file, vec![diagnostic],
        RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Test message\n",
        " --> test_file.test:1:6\n",
        "1 | test file contents\n",
        "  |      ^^^^ test label\n",
        "  = note: some note text\n",
    ));
}

#[test]
fn test_note_multiline_1() {
    // Later lines of a note are aligned under the first message column
    let file = SimpleFile::new("test_file.test", "test file contents");
    let diagnostic = Diagnostic::new(Severity::Error)
        .with_message("Test message")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 5..9)
            .with_label("test label"))
        .with_note(Note::note("first line\nsecond line"));

    let result = render_no_color(file, vec![diagnostic],
        RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Test message\n",
        " --> test_file.test:1:6\n",
        "1 | test file contents\n",
        "  |      ^^^^ test label\n",
        "  = note: first line\n",
        "          second line\n",
    ));
}

#[test]
fn test_note_severities_1() {
    let file = SimpleFile::new("test_file.test", "test file contents");
    let diagnostic = Diagnostic::new(Severity::Error)
        .with_message("Test message")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 5..9)
            .with_label("test label"))
        .with_note(Note::note("some note text"))
        .with_note(Note::help("try changing this"));

    let result = render_no_color(file, vec![diagnostic],
        RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Test message\n",
        " --> test_file.test:1:6\n",
        "1 | test file contents\n",
        "  |      ^^^^ test label\n",
        "  = note: some note text\n",
        "  = help: try changing this\n",
    ));
}

#[test]
fn test_suppressed_count_1() {
    let file = SimpleFile::new("test_file.test", "test file contents");
    let diagnostic = Diagnostic::new(Severity::Error)
        .with_message("Test message")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 5..9)
            .with_label("test label"))
        .with_suppressed_count(2);

    let result = render_no_color(file, vec![diagnostic],
        RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Test message\n",
        " --> test_file.test:1:6\n",
        "1 | test file contents\n",
        "  |      ^^^^ test label\n",
        "  ... and 2 more\n",
    ));
}
