//! Verifies the line+caret report format shared by all three error taxa.

use loom::Engine;

#[test]
fn lex_error_reports_line_and_caret() {
    // The only fatal lex error is an inconsistent dedent: line 3 dedents to
    // a width (2) that matches none of the enclosing indent levels (0, 4).
    let source = "if true:\n    a = 1\n  b = 2\n";
    let engine = Engine::new();
    let err = engine.tokenize(source).unwrap_err();
    let report = loom::LoomError::from(err).report(source);
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "Error at line 3:");
    assert_eq!(lines[1], "  b = 2");
    assert_eq!(lines[2], "^");
    assert!(report.contains("inconsistent dedent"));
}

#[test]
fn parse_error_reports_line_and_caret() {
    let source = "x = 1\ny = \n";
    let engine = Engine::new();
    let err = engine.parse(source).unwrap_err();
    let report = err.report(source);
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "Error at line 2:");
    assert_eq!(lines[1], "y = ");
    assert!(lines[2].ends_with('^'));
    assert!(report.contains("Expected"));
}

#[test]
fn runtime_error_reports_line_and_caret() {
    let source = "a = 1\nb = a / 0\n";
    let engine = Engine::new();
    let err = engine.eval(source).unwrap_err();
    let report = err.report(source);
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "Error at line 2:");
    assert_eq!(lines[1], "b = a / 0");
    assert!(report.contains("division by zero"));
}

#[test]
fn undefined_variable_error_names_the_variable() {
    let engine = Engine::new();
    let err = engine.eval("missing_name").unwrap_err();
    assert!(err.to_string().contains("missing_name"));
}

#[test]
fn report_is_stable_across_the_loomerror_and_typed_error_paths() {
    // `Engine::parse` returns a `LoomError` directly; its `.report()` must
    // agree with going through the typed `ParseError` first.
    let source = "x = \n";
    let engine = Engine::new();
    let via_loom_error = engine.parse(source).unwrap_err();
    assert_eq!(
        via_loom_error.report(source),
        loom::LoomError::from(match via_loom_error {
            loom::LoomError::Parse(e) => e,
            _ => panic!("expected a parse error"),
        })
        .report(source)
    );
}
