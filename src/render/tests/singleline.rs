use pretty_assertions::assert_eq;
use super::*;

#[test]
fn test_1() {
    let file = SimpleFile::new("test_file.test", "test file contents");
    let diagnostic = Diagnostic::new(Severity::Error)
        .with_message("Test message")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 5..9)
            .with_label("test label"));

    let result = render_no_color(file, vec![diagnostic],
        RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Test message\n",
        " --> test_file.test:1:6\n",
        "1 | test file contents\n",
        "  |      ^^^^ test label\n",
    ));
}

#[test]
fn test_separate_lines_1() {
    let file = SimpleFile::new("test_file.test", "let main = 23;\nsomething += 3.0;\nprint(example_source);\n");
    let diagnostic: Diagnostic<()> = Diagnostic::new(Severity::Error)
        .with_message("Mismatched types")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 3..13)
            .with_label("expected type annotation here"))
        .with_annotation(Annotation::new(AnnotationStyle::Secondary, (), 28..31)
            .with_label("due to this"));

    let result = render_no_color(file, vec![diagnostic],
        RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Mismatched types\n",
        " --> test_file.test:1:4\n",
        "1 | let main = 23;\n",
        "  |    ^^^^^^^^^^ expected type annotation here\n",
        "2 | something += 3.0;\n",
        "  |              --- due to this\n",
    ));
}

#[test]
fn test_same_line_1() {
    let file = SimpleFile::new("test_file.test", "let main = 23;\nsomething += 3.0;\nprint(example_source);\n");
    let diagnostic: Diagnostic<()> = Diagnostic::new(Severity::Error)
        .with_message("Mismatched types")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 11..13)
            .with_label("number"))
        .with_annotation(Annotation::new(AnnotationStyle::Secondary, (), 4..8)
            .with_label("identifier"));

    let result = render_no_color(file, vec![diagnostic],
        RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Mismatched types\n",
        " --> test_file.test:1:12\n",
        "1 | let main = 23;\n",
        "  |     ----   ^^ number\n",
        "  |     |\n",
        "  |     identifier\n",
    ));
}

#[test]
fn test_overlapping_1() {
    let file = SimpleFile::new("test_file.test", "let main = 23;\nsomething += 3.0;\nprint(example_source);\n");
    let diagnostic: Diagnostic<()> = Diagnostic::new(Severity::Error)
        .with_message("Mismatched types")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 4..13)
            .with_label("something"))
        .with_annotation(Annotation::new(AnnotationStyle::Secondary, (), 8..11)
            .with_label("something else"));

    let result = render_no_color(file, vec![diagnostic],
        RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Mismatched types\n",
        " --> test_file.test:1:5\n",
        "1 | let main = 23;\n",
        "  |     ^^^^---^^\n",
        "  |     |   |\n",
        "  |     |   something else\n",
        "  |     something\n",
    ));
}

#[test]
fn test_zero_width_1() {
    let file = SimpleFile::new("test_file.test", "let main = 23;");
    let diagnostic = Diagnostic::new(Severity::Error)
        .with_message("Some message")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 4..4)
            .with_label("here"));

    let result = render_no_color(file, vec![diagnostic],
        RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Some message\n",
        " --> test_file.test:1:5\n",
        "1 | let main = 23;\n",
        "  |     ^ here\n",
    ));
}

#[test]
fn test_multiline_label_1() {
    let file = SimpleFile::new("test_file.test", "test file contents");
    let diagnostic = Diagnostic::new(Severity::Error)
        .with_message("Some message")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 5..9)
            .with_label("test label\nsecond line"));

    let result = render_no_color(file, vec![diagnostic],
        RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Some message\n",
        " --> test_file.test:1:6\n",
        "1 | test file contents\n",
        "  |      ^^^^ test label\n",
        "  |           second line\n",
    ));
}

#[test]
fn test_tab_1() {
    let file = SimpleFile::new("test_file.test", "\tlet x = 1;\n");
    let diagnostic = Diagnostic::new(Severity::Error)
        .with_message("Some message")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 1..4)
            .with_label("binding"));

    // The tab expands to four columns in both the source line and the
    // column accounting
    let result = render_no_color(file, vec![diagnostic],
        RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Some message\n",
        " --> test_file.test:1:5\n",
        "1 |     let x = 1;\n",
        "  |     ^^^ binding\n",
    ));
}

#[test]
fn test_unicode_width_1() {
    let file = SimpleFile::new("test_file.test", "let \u{6f22}x = 1;");
    let diagnostic = Diagnostic::new(Severity::Error)
        .with_message("Some message")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 7..8)
            .with_label("the variable"));

    // The East-Asian wide character before the annotation takes two columns
    let result = render_no_color(file, vec![diagnostic],
        RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Some message\n",
        " --> test_file.test:1:7\n",
        "1 | let \u{6f22}x = 1;\n",
        "  |       ^ the variable\n",
    ));
}

#[test]
fn test_combining_character_1() {
    let file = SimpleFile::new("test_file.test", "he\u{0301}llo = 1;");
    let diagnostic = Diagnostic::new(Severity::Error)
        .with_message("Some message")
        .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 0..5)
            .with_label("name"));

    // "e" plus a combining acute accent is three bytes, but one column
    let result = render_no_color(file, vec![diagnostic],
        RenderConfig { surrounding_lines: 0, tab_length: 4 });

    assert_eq!(result, concat!(
        "error: Some message\n",
        " --> test_file.test:1:1\n",
        "1 | he\u{0301}llo = 1;\n",
        "  | ^^^ name\n",
    ));
}
