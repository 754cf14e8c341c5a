use loom::Parser as LoomParser;
use loom::{tokenize, Engine};

fn pretty(source: &str) -> String {
    let tokens = tokenize(source).unwrap();
    let (program, error) = LoomParser::new(tokens).parse();
    assert!(error.is_none(), "unexpected parse error: {error:?}");
    program.pretty()
}

#[test]
fn literals_pretty_print_python_style() {
    assert_eq!(pretty("3"), "Integer(3)");
    assert_eq!(pretty("1.5"), "Float(1.5)");
    assert_eq!(pretty("true"), "Bool(True)");
    assert_eq!(pretty("false"), "Bool(False)");
    assert_eq!(pretty(r#""hello""#), "String(hello)");
    assert_eq!(pretty("x"), "Identifier(x)");
}

#[test]
fn whole_valued_floats_keep_their_fractional_part() {
    assert_eq!(pretty("1.0"), "Float(1.0)");
    assert_eq!(pretty("100.0"), "Float(100.0)");
}

#[test]
fn binary_operators_use_reference_class_names() {
    assert_eq!(pretty("1 + 1"), "PlusOperation(Integer(1), Integer(1))");
    assert_eq!(pretty("1 < 2"), "LessOperation(Integer(1), Integer(2))");
    assert_eq!(pretty("a and b"), "AndOperation(Identifier(a), Identifier(b))");
}

#[test]
fn unary_operators_pretty_print() {
    assert_eq!(pretty("-2"), "NegativeOperation(Integer(2))");
    assert_eq!(pretty("not true"), "NotOperation(Bool(True))");
}

#[test]
fn assignment_pretty_prints() {
    assert_eq!(pretty("x = 1"), "Assignment(Identifier(x), Integer(1))");
}

#[test]
fn if_elif_else_desugars_into_nested_conditionals() {
    let source = "if a:\n    x = 1\nelif b:\n    x = 2\nelse:\n    x = 3\n";
    let out = pretty(source);
    assert_eq!(
        out,
        "Conditional(Identifier(a)) Then [Assignment(Identifier(x), Integer(1))] \
Else [Conditional(Identifier(b)) Then [Assignment(Identifier(x), Integer(2))] \
Else [Conditional(Bool(True)) Then [Assignment(Identifier(x), Integer(3))]]]"
    );
}

#[test]
fn function_definition_and_call_pretty_print() {
    let source = "def add(a, b):\n    return a + b\nadd(1, 2)\n";
    let out = pretty(source);
    assert_eq!(
        out,
        "FunctionDefinition(Identifier(add), [Identifier(a), Identifier(b)], \
[ReturnStatement(PlusOperation(Identifier(a), Identifier(b)))])\n\
FunctionCall(Identifier(add), [Integer(1), Integer(2)])"
    );
}

#[test]
fn subscript_chains_left_associatively() {
    assert_eq!(pretty("a[0]"), "Index(Identifier(a), Integer(0))");
    assert_eq!(pretty("a[0][1]"), "Index(Index(Identifier(a), Integer(0)), Integer(1))");
}

#[test]
fn break_and_continue_pretty_print() {
    let source = "while true:\n    break\n";
    assert_eq!(pretty(source), "While(Bool(True)) Then [BreakStatement]");
    let source = "while true:\n    continue\n";
    assert_eq!(pretty(source), "While(Bool(True)) Then [ContinueStatement]");
}

#[test]
fn missing_token_reports_expected_and_offset() {
    let engine = Engine::new();
    let err = engine.parse("x = ").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Expected"));
    assert!(message.contains("in position"));
}

#[test]
fn first_parse_error_wins() {
    let engine = Engine::new();
    // Two syntax errors; only the first is reported.
    let err = engine.parse("x = \ny = \n").unwrap_err();
    assert!(err.to_string().contains("position 4"));
}
