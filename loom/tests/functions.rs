use loom::{Engine, Environment, Value};

fn run(source: &str) -> Environment {
    let engine = Engine::new();
    let env = Environment::root();
    engine.eval_with_scope(source, &env).unwrap();
    env
}

#[test]
fn recursion() {
    let env = run(
        r#"
def fib(n):
    if n < 2:
        return n
    return fib(n - 1) + fib(n - 2)
result = fib(7)
"#,
    );
    assert_eq!(env.lookup("result"), Some(Value::Int(13)));
}

#[test]
fn functions_are_first_class_values() {
    let env = run(
        r#"
def increment(n):
    return n + 1
def apply_twice(fn, x):
    return fn(fn(x))
result = apply_twice(increment, 3)
"#,
    );
    assert_eq!(env.lookup("result"), Some(Value::Int(5)));
}

#[test]
fn closures_capture_the_definition_environment_by_reference() {
    // `inner` closes over `counter`'s *environment*, not a snapshot of its
    // value, so a later mutation of `counter` from outside is visible.
    let env = run(
        r#"
counter = 0
def make_reader():
    def read():
        return counter
    return read
reader = make_reader()
before = reader()
counter = 99
after = reader()
"#,
    );
    assert_eq!(env.lookup("before"), Some(Value::Int(0)));
    assert_eq!(env.lookup("after"), Some(Value::Int(99)));
}

#[test]
fn call_frame_parent_is_the_definition_environment_not_the_callers() {
    // `g` is defined inside `f`, where `x` is bound. Calling `g` from the
    // top level (where `x` is unbound) must still resolve `x` lexically
    // through `g`'s captured definition environment.
    let env = run(
        r#"
def f():
    x = 10
    def g():
        return x
    return g
g = f()
result = g()
"#,
    );
    assert_eq!(env.lookup("result"), Some(Value::Int(10)));
}

#[test]
fn missing_arguments_are_simply_unbound_until_referenced() {
    let engine = Engine::new();
    let env = Environment::root();
    engine
        .eval_with_scope("def f(a, b):\n    return a\nresult = f(1)\n", &env)
        .unwrap();
    assert_eq!(env.lookup("result"), Some(Value::Int(1)));
}

#[test]
fn extra_arguments_are_silently_ignored() {
    let env = run("def f(a):\n    return a\nresult = f(1, 2, 3)\n");
    assert_eq!(env.lookup("result"), Some(Value::Int(1)));
}

#[test]
fn deep_recursion_is_a_stack_overflow_error_not_a_crash() {
    let engine = Engine::new();
    let result = engine.eval("def loop(n):\n    return loop(n + 1)\nloop(0)\n");
    assert!(result.is_err());
}
